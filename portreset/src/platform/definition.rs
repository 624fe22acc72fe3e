//! Platform definition for the device command language.

use regex::bytes::Regex;

use crate::channel::compile_prompt_pattern;

/// Everything the engine needs to know about a device family's CLI.
///
/// Built once per run with the builder methods and shared read-only by
/// the connector and the run controller.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Platform name (e.g., "cisco_catalyst").
    pub name: String,

    /// Prompt that ends every command's output, in any mode.
    pub prompt: Regex,

    /// Port names that are physical access ports; everything else in a
    /// status listing is ignored. `None` accepts no port at all.
    pub physical_port: Option<Regex>,

    /// Command producing the one-row-per-interface status listing.
    pub status_command: String,

    /// Command prefix producing one interface's configuration dump.
    /// The interface name is appended.
    pub interface_config_command: String,

    /// Position of the VLAN column counted from the end of a status row
    /// (1 = last field).
    pub vlan_field_offset_from_end: usize,

    /// Commands to run when connection is established.
    pub on_open_commands: Vec<String>,

    /// Commands to run before connection is closed.
    pub on_close_commands: Vec<String>,
}

impl PlatformDefinition {
    /// Create a new platform definition.
    ///
    /// The prompt defaults to a generic `#` prompt and the port filter
    /// accepts nothing until one is set.
    pub fn new(name: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            prompt: Regex::new(r"#\s*$")?,
            physical_port: None,
            status_command: String::new(),
            interface_config_command: String::new(),
            vlan_field_offset_from_end: 1,
            on_open_commands: vec![],
            on_close_commands: vec![],
        })
    }

    /// Set the end-of-command prompt pattern (end-anchored if it is not already).
    pub fn with_prompt(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.prompt = compile_prompt_pattern(pattern)?;
        Ok(self)
    }

    /// Set the physical-port naming rule.
    pub fn with_physical_port(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.physical_port = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Set the status listing command and where its VLAN column sits.
    pub fn with_status_command(
        mut self,
        command: impl Into<String>,
        vlan_field_offset_from_end: usize,
    ) -> Self {
        self.status_command = command.into();
        self.vlan_field_offset_from_end = vlan_field_offset_from_end;
        self
    }

    /// Set the per-interface configuration dump command prefix.
    pub fn with_interface_config_command(mut self, command: impl Into<String>) -> Self {
        self.interface_config_command = command.into();
        self
    }

    /// Add an on_open command.
    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    /// Add an on_close command.
    pub fn with_on_close_command(mut self, command: impl Into<String>) -> Self {
        self.on_close_commands.push(command.into());
        self
    }

    /// Full configuration dump command for one interface.
    pub fn interface_config_for(&self, interface: &str) -> String {
        format!("{} {}", self.interface_config_command, interface)
    }

    /// Whether `port` follows the physical access-port naming convention.
    pub fn is_physical_port(&self, port: &str) -> bool {
        self.physical_port
            .as_ref()
            .is_some_and(|rule| rule.is_match(port.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_no_ports() {
        let platform = PlatformDefinition::new("empty").unwrap();
        assert!(!platform.is_physical_port("Gi1/0/1"));
        assert!(!platform.is_physical_port(""));
    }

    #[test]
    fn test_builder() {
        let platform = PlatformDefinition::new("lab")
            .unwrap()
            .with_prompt(r"lab#")
            .unwrap()
            .with_physical_port(r"^Fa0/\d+$")
            .unwrap()
            .with_status_command("show int status", 3)
            .with_interface_config_command("show run int")
            .with_on_open_command("terminal length 0");

        assert!(platform.prompt.is_match(b"lab#"));
        assert!(!platform.prompt.is_match(b"lab# show clock"));
        assert!(platform.is_physical_port("Fa0/3"));
        assert!(!platform.is_physical_port("Po1"));
        assert_eq!(platform.vlan_field_offset_from_end, 3);
        assert_eq!(platform.interface_config_for("Fa0/3"), "show run int Fa0/3");
        assert_eq!(platform.on_open_commands, vec!["terminal length 0"]);
    }
}
