//! Cisco Catalyst access-switch platform definition.
//!
//! Covers 3750 and 3850 stacks running IOS / IOS-XE. Every command the
//! engine sends to a switch is defined here.
//!
//! # Prompt Examples
//!
//! ```text
//! sw-cl-214#                         # privileged exec
//! sw-cl-214(config)#                 # global configuration
//! sw-cl-214(config-if)#              # interface configuration
//! ```
//!
//! # Status Listing
//!
//! ```text
//! Port      Name               Status       Vlan       Duplex  Speed Type
//! Gi1/0/1   Room 214 jack 3    connected    210        a-full a-1000 10/100/1000BaseTX
//! Gi1/0/48  uplink             connected    trunk      a-full a-1000 10/100/1000BaseTX
//! ```
//!
//! The Name column may hold spaces and may be empty, so the VLAN column
//! is located from the end of the row. A Type containing a space (such
//! as `Not Present` on empty module slots) shifts the columns; those
//! ports are kept out by the physical-port rule, but any other format
//! drift breaks the offset without an error.

use crate::platform::PlatformDefinition;

pub const PLATFORM_NAME: &str = "cisco_catalyst";

/// VLAN column position counted from the end of a status row
/// (Vlan, Duplex, Speed, Type).
pub const VLAN_FIELD_OFFSET_FROM_END: usize = 4;

/// Stack member / module 0 / port: the switch's own copper access ports.
pub const PHYSICAL_PORT_PATTERN: &str = r"^Gi\d+/0/\d+$";

/// End-of-command prompt in exec, config and config sub-modes.
pub const PROMPT_PATTERN: &str = r"[\w.\-@/:]{1,63}(?:\(config[\w.\-@/:]{0,32}\))?#\s*$";

pub const CONFIGURE_TERMINAL: &str = "configure terminal";
pub const EXIT_INTERFACE: &str = "exit";
pub const END_CONFIGURATION: &str = "end";

pub const DISABLE_LINK_STATUS_LOGGING: &str = "no logging event link-status";
pub const INLINE_POWER_AUTO: &str = "power inline auto";
pub const DISABLE_LEGACY_PORTFAST: &str = "no spanning-tree portfast";

/// SRR egress queue sharing for 3750 access ports.
pub const LEGACY_QOS_COMMANDS: &[&str] = &[
    "srr-queue bandwidth share 10 10 60 20",
    "srr-queue bandwidth shape 10 0 0 0",
];

/// Command that wipes an interface back to factory defaults.
pub fn default_interface(interface: &str) -> String {
    format!("default interface {interface}")
}

/// Command that enters an interface's configuration context.
pub fn interface(interface: &str) -> String {
    format!("interface {interface}")
}

/// Command setting the port-security MAC limit.
pub fn port_security_maximum(maximum: u32) -> String {
    format!("switchport port-security maximum {maximum}")
}

/// Command attaching an interface template.
pub fn source_template(template: &str) -> String {
    format!("source template {template}")
}

/// Create the Catalyst platform definition.
pub fn platform() -> Result<PlatformDefinition, regex::Error> {
    Ok(PlatformDefinition::new(PLATFORM_NAME)?
        .with_prompt(PROMPT_PATTERN)?
        .with_physical_port(PHYSICAL_PORT_PATTERN)?
        .with_status_command("show interfaces status", VLAN_FIELD_OFFSET_FROM_END)
        .with_interface_config_command("show running-config interface")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 511")
        .with_on_close_command("exit"))
}
