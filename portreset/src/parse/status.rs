//! Interface status listing rows.

use crate::platform::PlatformDefinition;

/// One row of `show interfaces status`, reduced to what classification needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceStatusEntry {
    pub port_name: String,
    /// VLAN id, `trunk`, or other status text such as `routed`.
    pub vlan_field: String,
}

impl InterfaceStatusEntry {
    /// Parse one row.
    ///
    /// Rows whose first field is not a physical access port (headers,
    /// port-channels, uplink modules) and rows too short to hold the
    /// VLAN column yield `None`.
    pub fn parse(row: &str, platform: &PlatformDefinition) -> Option<Self> {
        let fields: Vec<&str> = row.split_whitespace().collect();
        let port_name = *fields.first()?;
        if !platform.is_physical_port(port_name) {
            return None;
        }

        // The port itself is never the VLAN column.
        let offset = platform.vlan_field_offset_from_end;
        if offset == 0 || fields.len() <= offset {
            return None;
        }

        Some(Self {
            port_name: port_name.to_string(),
            vlan_field: fields[fields.len() - offset].to_string(),
        })
    }
}

/// Parse a whole status listing into eligible rows, in listing order.
pub fn parse_status_listing<S: AsRef<str>>(
    lines: &[S],
    platform: &PlatformDefinition,
) -> Vec<InterfaceStatusEntry> {
    lines
        .iter()
        .filter_map(|line| InterfaceStatusEntry::parse(line.as_ref(), platform))
        .collect()
}
