//! Interface configuration snapshot parser.
//!
//! Turns the output of `show running-config interface <name>` into the
//! handful of attributes that survive a `default interface`:
//!
//! ```text
//! Building configuration...
//!
//! Current configuration : 231 bytes
//! !
//! interface GigabitEthernet1/0/7
//!  description Room 214 jack 3
//!  switchport access vlan 210
//!  switchport mode access
//!  switchport port-security maximum 2
//!  speed 100
//!  duplex full
//! end
//! ```
//!
//! Only whitelisted attributes are kept. Everything else is reported
//! through [`Snapshot::dropped`] and lost on reset.

use log::debug;

use crate::error::ParseError;

/// Port-security maximum when the interface has none configured.
pub const DEFAULT_PORT_SECURITY_MAXIMUM: u32 = 2;

/// Extra MAC addresses reserved on top of the captured maximum, for a
/// phone sharing the port with the workstation.
pub const PORT_SECURITY_HEADROOM: u32 = 1;

const HEADER_KEYWORD: &str = "interface";
const TERMINATOR_KEYWORD: &str = "end";
const PORT_SECURITY_PREFIX: &str = "switchport port-security maximum";

/// Captured interface attributes, as reapplicable command lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceSnapshot {
    pub description: Option<String>,
    pub duplex: Option<String>,
    pub speed: Option<String>,
    pub access_vlan_command: Option<String>,
    /// Maximum to apply: captured value plus headroom, or the default.
    pub port_security_max: u32,
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub interface: InterfaceSnapshot,
    /// Attribute lines that were not whitelisted, in order.
    pub dropped: Vec<String>,
}

/// Attributes being collected before post-processing.
#[derive(Default)]
struct Captured {
    description: Option<String>,
    duplex: Option<String>,
    speed: Option<String>,
    access_vlan: Option<String>,
    port_security: Option<String>,
}

/// A recognized attribute prefix and what to do with a matching line.
struct AttributeRule {
    prefix: &'static str,
    apply: fn(&mut Captured, &str),
}

/// Whitelist, evaluated in order; the first matching prefix wins.
const ATTRIBUTE_RULES: &[AttributeRule] = &[
    AttributeRule {
        prefix: "description",
        apply: |c, line| c.description = Some(line.to_string()),
    },
    AttributeRule {
        prefix: "duplex",
        apply: |c, line| c.duplex = Some(line.to_string()),
    },
    AttributeRule {
        prefix: "speed",
        apply: |c, line| c.speed = Some(line.to_string()),
    },
    AttributeRule {
        prefix: "switchport access vlan",
        apply: |c, line| c.access_vlan = Some(line.to_string()),
    },
    AttributeRule {
        prefix: PORT_SECURITY_PREFIX,
        apply: |c, line| c.port_security = Some(line.to_string()),
    },
    // Always reasserted by the planner, so whatever was there is irrelevant.
    AttributeRule {
        prefix: "power inline",
        apply: |_, _| {},
    },
    AttributeRule {
        prefix: "no logging event link-status",
        apply: |_, _| {},
    },
];

/// Parse one interface's configuration dump.
pub fn parse_snapshot<S: AsRef<str>>(lines: &[S], interface: &str) -> Result<Snapshot, ParseError> {
    let mut lines = lines.iter().map(|l| l.as_ref().trim_start());

    if !lines.by_ref().any(|line| line.starts_with(HEADER_KEYWORD)) {
        return Err(ParseError::MissingInterfaceHeader {
            interface: interface.to_string(),
        });
    }

    let mut captured = Captured::default();
    let mut dropped = Vec::new();
    let mut terminated = false;

    for line in lines {
        if line.starts_with(TERMINATOR_KEYWORD) {
            terminated = true;
            break;
        }

        let line = line.trim_end();
        if line.is_empty() || line == "!" {
            continue;
        }

        match ATTRIBUTE_RULES.iter().find(|rule| line.starts_with(rule.prefix)) {
            Some(rule) => (rule.apply)(&mut captured, line),
            None => dropped.push(line.to_string()),
        }
    }

    if !terminated {
        return Err(ParseError::MissingTerminator {
            interface: interface.to_string(),
        });
    }

    if !dropped.is_empty() {
        debug!("{}: not carried over: {:?}", interface, dropped);
    }

    let port_security_max = match captured.port_security {
        None => DEFAULT_PORT_SECURITY_MAXIMUM,
        Some(line) => port_security_maximum(&line, interface)?,
    };

    Ok(Snapshot {
        interface: InterfaceSnapshot {
            description: captured.description,
            duplex: captured.duplex,
            speed: captured.speed,
            access_vlan_command: captured.access_vlan,
            port_security_max,
        },
        dropped,
    })
}

/// Extract N from `switchport port-security maximum N [vlan ...]` and
/// add the headroom.
fn port_security_maximum(line: &str, interface: &str) -> Result<u32, ParseError> {
    let value = line[PORT_SECURITY_PREFIX.len()..]
        .split_whitespace()
        .next()
        .unwrap_or_default();

    value
        .parse::<u32>()
        .ok()
        .and_then(|max| max.checked_add(PORT_SECURITY_HEADROOM))
        .ok_or_else(|| ParseError::MalformedPortSecurity {
            interface: interface.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "\
Building configuration...

Current configuration : 312 bytes
!
interface GigabitEthernet1/0/7
 description Room 214 jack 3
 switchport access vlan 210
 switchport mode access
 switchport port-security maximum 5
 switchport port-security
 speed 100
 duplex full
 no logging event link-status
 power inline never
 spanning-tree portfast
end
";

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn test_full_snapshot() {
        let snapshot = parse_snapshot(&lines(FULL), "Gi1/0/7").unwrap();
        let iface = snapshot.interface;

        assert_eq!(iface.description.as_deref(), Some("description Room 214 jack 3"));
        assert_eq!(iface.speed.as_deref(), Some("speed 100"));
        assert_eq!(iface.duplex.as_deref(), Some("duplex full"));
        assert_eq!(
            iface.access_vlan_command.as_deref(),
            Some("switchport access vlan 210")
        );
        assert_eq!(iface.port_security_max, 6);
    }

    #[test]
    fn test_unlisted_attributes_are_dropped() {
        let snapshot = parse_snapshot(&lines(FULL), "Gi1/0/7").unwrap();
        assert_eq!(
            snapshot.dropped,
            vec![
                "switchport mode access",
                "switchport port-security",
                "spanning-tree portfast",
            ]
        );
    }

    #[test]
    fn test_absent_attributes_stay_absent() {
        let text = "interface GigabitEthernet1/0/9\n switchport mode access\nend\n";
        let snapshot = parse_snapshot(&lines(text), "Gi1/0/9").unwrap();

        assert_eq!(
            snapshot.interface,
            InterfaceSnapshot {
                port_security_max: DEFAULT_PORT_SECURITY_MAXIMUM,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_last_occurrence_wins() {
        let text = "\
interface GigabitEthernet1/0/1
 description first
 speed 10
 description second
 speed 100
end";
        let snapshot = parse_snapshot(&lines(text), "Gi1/0/1").unwrap();
        assert_eq!(
            snapshot.interface.description.as_deref(),
            Some("description second")
        );
        assert_eq!(snapshot.interface.speed.as_deref(), Some("speed 100"));
    }

    #[test]
    fn test_repeated_identical_lines_are_idempotent() {
        let once = "interface Gi1/0/1\n duplex half\nend";
        let twice = "interface Gi1/0/1\n duplex half\n duplex half\nend";
        assert_eq!(
            parse_snapshot(&lines(once), "Gi1/0/1"),
            parse_snapshot(&lines(twice), "Gi1/0/1")
        );
    }

    #[test]
    fn test_missing_header() {
        let text = "Building configuration...\n description orphan\nend\n";
        assert_eq!(
            parse_snapshot(&lines(text), "Gi1/0/3"),
            Err(ParseError::MissingInterfaceHeader {
                interface: "Gi1/0/3".to_string()
            })
        );
    }

    #[test]
    fn test_missing_terminator() {
        let text = "interface GigabitEthernet1/0/3\n description a\n speed 100\n duplex full\n";
        assert_eq!(
            parse_snapshot(&lines(text), "Gi1/0/3"),
            Err(ParseError::MissingTerminator {
                interface: "Gi1/0/3".to_string()
            })
        );

        let header_only = ["interface GigabitEthernet1/0/3"];
        assert!(matches!(
            parse_snapshot(&header_only, "Gi1/0/3"),
            Err(ParseError::MissingTerminator { .. })
        ));
    }

    #[test]
    fn test_empty_output() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            parse_snapshot(&empty, "Gi1/0/3"),
            Err(ParseError::MissingInterfaceHeader { .. })
        ));
    }

    #[test]
    fn test_port_security_variants() {
        let with_vlan = "interface Gi1/0/1\n switchport port-security maximum 4 vlan access\nend";
        let snapshot = parse_snapshot(&lines(with_vlan), "Gi1/0/1").unwrap();
        assert_eq!(snapshot.interface.port_security_max, 5);

        let malformed = "interface Gi1/0/1\n switchport port-security maximum many\nend";
        assert_eq!(
            parse_snapshot(&lines(malformed), "Gi1/0/1"),
            Err(ParseError::MalformedPortSecurity {
                interface: "Gi1/0/1".to_string(),
                value: "many".to_string()
            })
        );

        let at_limit = "interface Gi1/0/1\n switchport port-security maximum 4294967295\nend";
        assert_eq!(
            parse_snapshot(&lines(at_limit), "Gi1/0/1"),
            Err(ParseError::MalformedPortSecurity {
                interface: "Gi1/0/1".to_string(),
                value: "4294967295".to_string()
            })
        );

        let bare = "interface Gi1/0/1\n switchport port-security maximum\nend";
        assert!(matches!(
            parse_snapshot(&lines(bare), "Gi1/0/1"),
            Err(ParseError::MalformedPortSecurity { .. })
        ));
    }

    #[test]
    fn test_lines_after_terminator_ignored() {
        let text = "interface Gi1/0/1\nend\n description after\n";
        let snapshot = parse_snapshot(&lines(text), "Gi1/0/1").unwrap();
        assert!(snapshot.interface.description.is_none());
        assert!(snapshot.dropped.is_empty());
    }
}
