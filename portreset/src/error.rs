//! Error types for portreset.
//!
//! Errors are layered the same way the run is: transport and channel
//! failures end a single switch, inventory and parse failures skip a
//! switch or an interface, and [`Error::SilentStepViolation`] ends the
//! whole run.

use std::io;
use thiserror::Error;

/// Main error type for portreset operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Operator inventory errors
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Device output could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A configuration command that must be silent produced output.
    ///
    /// The device rejected or reinterpreted the command, so the command
    /// language no longer matches what the planner expects. Never caught
    /// below the top-level run loop.
    #[error("Command '{command}' was expected to be silent but produced output: {output:?}")]
    SilentStepViolation {
        command: String,
        output: Vec<String>,
    },
}

impl Error {
    /// Whether this error must halt the entire run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::SilentStepViolation { .. })
    }
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Address does not resolve in DNS
    #[error("{host} does not resolve: {reason}")]
    HostNotFound { host: String, reason: String },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host key does not match the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Host is not in known_hosts and strict checking is enabled
    #[error("Host key for {host}:{port} is unknown")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Channel layer errors (pattern matching, PTY operations).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Pattern matching timed out
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(std::time::Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Errors in the operator-supplied switch inventory.
///
/// Every variant skips the whole switch described by the offending line.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InventoryError {
    /// Model is not one of the recognized switch families
    #[error("line {line}: unknown switch model '{model}'")]
    UnknownSwitchModel { line: usize, model: String },

    /// VLAN entry is missing its `:keep` / `:reset` suffix
    #[error("line {line}: VLAN entry '{entry}' lacks a ':keep' or ':reset' mode suffix")]
    MalformedVlanPolicy { line: usize, entry: String },

    /// VLAN id is not a number in 1..=4094
    #[error("line {line}: invalid VLAN id '{entry}'")]
    InvalidVlanId { line: usize, entry: String },

    /// Same VLAN id listed twice for one switch
    #[error("line {line}: VLAN {vlan_id} listed more than once")]
    DuplicateVlan { line: usize, vlan_id: u16 },

    /// Record does not have all required fields
    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },
}

/// Per-interface parse failures.
///
/// None of these are fatal: the interface is skipped and counted and the
/// switch run continues.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Configuration dump never declared the interface
    #[error("{interface}: no interface declaration in configuration output")]
    MissingInterfaceHeader { interface: String },

    /// Configuration dump was cut off before its closing line
    #[error("{interface}: configuration output has no terminating 'end' line")]
    MissingTerminator { interface: String },

    /// Port-security maximum is not a number, or leaves no room for headroom
    #[error("{interface}: malformed port-security maximum '{value}'")]
    MalformedPortSecurity { interface: String, value: String },

    /// VLAN column of the status listing is neither numeric nor "trunk"
    #[error("{interface}: non-numeric VLAN field '{field}'")]
    NonNumericVlanField { interface: String, field: String },
}

/// Result type alias using portreset's Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_silent_violation_is_fatal() {
        let fatal = Error::SilentStepViolation {
            command: "description x".to_string(),
            output: vec!["% Invalid input".to_string()],
        };
        assert!(fatal.is_fatal());

        let parse: Error = ParseError::MissingTerminator {
            interface: "Gi1/0/1".to_string(),
        }
        .into();
        assert!(!parse.is_fatal());

        let channel: Error = ChannelError::Closed.into();
        assert!(!channel.is_fatal());

        let dns: Error = TransportError::HostNotFound {
            host: "sw-gone".to_string(),
            reason: "no addresses".to_string(),
        }
        .into();
        assert!(!dns.is_fatal());
    }

    #[test]
    fn test_messages_name_the_interface() {
        let err = ParseError::MalformedPortSecurity {
            interface: "Gi1/0/7".to_string(),
            value: "lots".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Gi1/0/7"));
        assert!(msg.contains("lots"));
    }
}
