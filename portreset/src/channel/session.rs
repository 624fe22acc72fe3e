//! Session Channel contract.
//!
//! The reconfiguration engine only ever talks to a switch through these
//! two traits, which keeps the SSH plumbing swappable for a scripted
//! session in tests.

use std::future::Future;

use regex::bytes::Regex;

use crate::error::Result;

/// An open interactive CLI session on one switch.
pub trait SessionChannel: Send {
    /// Send `command` and read until `prompt` matches.
    ///
    /// Returns the output lines between the command echo and the prompt,
    /// with the prompt line itself as the last element.
    fn send(
        &mut self,
        prompt: &Regex,
        command: &str,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Log out and release the session.
    fn close(self) -> impl Future<Output = Result<()>> + Send;
}

/// Opens authenticated sessions to switches by address.
pub trait Connector: Send + Sync {
    /// Session type produced by this connector.
    type Session: SessionChannel;

    /// Check that `address` resolves before any connection attempt.
    fn resolve(&self, address: &str) -> impl Future<Output = Result<()>> + Send;

    /// Connect, authenticate and wait for the first prompt.
    fn connect(&self, address: &str) -> impl Future<Output = Result<Self::Session>> + Send;
}
