//! SSH-backed session channel.

use std::time::Duration;

use log::{debug, trace, warn};
use regex::bytes::Regex;
use russh::client::Msg;
use russh::{Channel, ChannelMsg};

use super::buffer::PatternBuffer;
use super::patterns::split_output;
use super::session::{Connector, SessionChannel};
use crate::error::{ChannelError, Result, TransportError};
use crate::platform::PlatformDefinition;
use crate::transport::{SshConfig, SshTransport};

/// Interactive shell on one switch over SSH.
pub struct SshSession {
    transport: SshTransport,
    channel: Channel<Msg>,
    buffer: PatternBuffer,
    timeout: Duration,
    /// Platform on-open commands, sent ahead of the first real command.
    pending_setup: Vec<String>,
    /// Whether anything was written to the shell yet.
    started: bool,
    on_close_commands: Vec<String>,
}

impl SshSession {
    /// Write one line of input to the shell.
    async fn write_line(&mut self, input: &str) -> Result<()> {
        let line = format!("{input}\n");
        self.channel
            .data(line.as_bytes())
            .await
            .map_err(ChannelError::Ssh)?;
        Ok(())
    }

    /// Write one line and read until `prompt` matches.
    async fn exchange(&mut self, prompt: &Regex, command: &str) -> Result<Vec<u8>> {
        self.started = true;
        self.write_line(command).await?;
        self.read_until_prompt(prompt).await
    }

    /// Read until `prompt` matches in the buffer tail, then drain the buffer.
    async fn read_until_prompt(&mut self, prompt: &Regex) -> Result<Vec<u8>> {
        let timeout = self.timeout;
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if self.buffer.tail_contains(prompt) {
                return Ok(self.buffer.take());
            }

            let msg = tokio::time::timeout_at(deadline, self.channel.wait())
                .await
                .map_err(|_| ChannelError::PatternTimeout(timeout))?;

            match msg {
                Some(ChannelMsg::Data { data }) => {
                    trace!("read {} bytes", data.len());
                    self.buffer.extend(&data);
                }
                Some(ChannelMsg::ExtendedData { data, .. }) => self.buffer.extend(&data),
                Some(ChannelMsg::Eof | ChannelMsg::Close) | None => {
                    return Err(ChannelError::Closed.into());
                }
                Some(_) => {}
            }
        }
    }
}

impl SessionChannel for SshSession {
    async fn send(&mut self, prompt: &Regex, command: &str) -> Result<Vec<String>> {
        for setup in std::mem::take(&mut self.pending_setup) {
            debug!("{}: session setup {:?}", self.transport.host(), setup);
            self.exchange(prompt, &setup).await?;
        }

        debug!("{}: sending {:?}", self.transport.host(), command);
        let raw = self.exchange(prompt, command).await?;
        Ok(split_output(&raw, command))
    }

    async fn close(mut self) -> Result<()> {
        // A shell that never received input has nothing to leave.
        let on_close = if self.started {
            std::mem::take(&mut self.on_close_commands)
        } else {
            Vec::new()
        };
        for command in on_close {
            if let Err(e) = self.write_line(&command).await {
                warn!("{}: '{}' failed during logout: {}", self.transport.host(), command, e);
            }
        }
        self.transport.close().await
    }
}

/// Opens [`SshSession`]s using one set of credentials for every switch.
pub struct SshConnector {
    config: SshConfig,
    platform: PlatformDefinition,
}

impl SshConnector {
    /// Create a connector for switches speaking `platform`'s CLI.
    pub fn new(config: SshConfig, platform: PlatformDefinition) -> Self {
        Self { config, platform }
    }
}

impl Connector for SshConnector {
    type Session = SshSession;

    async fn resolve(&self, address: &str) -> Result<()> {
        let not_found = |reason: String| TransportError::HostNotFound {
            host: address.to_string(),
            reason,
        };

        let mut addrs = tokio::net::lookup_host((address, self.config.port))
            .await
            .map_err(|e| not_found(e.to_string()))?;
        match addrs.next() {
            Some(addr) => {
                debug!("{} resolves to {}", address, addr.ip());
                Ok(())
            }
            None => Err(not_found("no addresses".to_string()).into()),
        }
    }

    async fn connect(&self, address: &str) -> Result<SshSession> {
        let transport = SshTransport::connect(address, &self.config).await?;
        let channel = transport.open_channel().await?;

        let mut session = SshSession {
            transport,
            channel,
            buffer: PatternBuffer::default(),
            timeout: self.config.timeout,
            pending_setup: self.platform.on_open_commands.clone(),
            started: false,
            on_close_commands: self.platform.on_close_commands.clone(),
        };

        // Login banner and MOTD end at the first prompt.
        session.read_until_prompt(&self.platform.prompt).await?;

        debug!("{}: session ready", address);
        Ok(session)
    }
}
