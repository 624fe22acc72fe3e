//! Scripted in-memory session for tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use regex::bytes::Regex;

use super::session::{Connector, SessionChannel};
use crate::error::{Result, TransportError};

/// Every command sent, as `(address, command)`, shared with the test.
pub(crate) type Transcript = Arc<Mutex<Vec<(String, String)>>>;

/// Replays canned output per command and records what was sent.
pub(crate) struct ScriptedSession {
    address: String,
    prompt_line: String,
    replies: HashMap<String, Vec<String>>,
    transcript: Transcript,
    logouts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSession {
    pub(crate) fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            prompt_line: "sw1#".to_string(),
            replies: HashMap::new(),
            transcript: Transcript::default(),
            logouts: Arc::default(),
        }
    }

    /// Reply to `command` with `output` (prompt line appended automatically).
    pub(crate) fn reply(mut self, command: &str, output: &str) -> Self {
        self.replies
            .insert(command.to_string(), output.lines().map(str::to_string).collect());
        self
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.transcript
            .lock()
            .unwrap()
            .iter()
            .map(|(_, command)| command.clone())
            .collect()
    }
}

impl SessionChannel for ScriptedSession {
    async fn send(&mut self, _prompt: &Regex, command: &str) -> Result<Vec<String>> {
        self.transcript
            .lock()
            .unwrap()
            .push((self.address.clone(), command.to_string()));

        let mut lines = self.replies.get(command).cloned().unwrap_or_default();
        lines.push(self.prompt_line.clone());
        Ok(lines)
    }

    async fn close(self) -> Result<()> {
        self.logouts.lock().unwrap().push(self.address);
        Ok(())
    }
}

/// Hands out [`ScriptedSession`]s per address; unknown addresses refuse.
#[derive(Default)]
pub(crate) struct ScriptedConnector {
    switches: HashMap<String, HashMap<String, Vec<String>>>,
    refused: HashSet<String>,
    unresolvable: HashSet<String>,
    pub(crate) transcript: Transcript,
    pub(crate) logouts: Arc<Mutex<Vec<String>>>,
    /// Every address a connection was attempted to.
    pub(crate) connects: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConnector {
    pub(crate) fn switch(mut self, address: &str, session: ScriptedSession) -> Self {
        self.switches.insert(address.to_string(), session.replies);
        self
    }

    pub(crate) fn refuse(mut self, address: &str) -> Self {
        self.refused.insert(address.to_string());
        self
    }

    pub(crate) fn unresolvable(mut self, address: &str) -> Self {
        self.unresolvable.insert(address.to_string());
        self
    }

    pub(crate) fn sent_to(&self, address: &str) -> Vec<String> {
        self.transcript
            .lock()
            .unwrap()
            .iter()
            .filter(|(addr, _)| addr == address)
            .map(|(_, command)| command.clone())
            .collect()
    }
}

impl Connector for ScriptedConnector {
    type Session = ScriptedSession;

    async fn resolve(&self, address: &str) -> Result<()> {
        if self.unresolvable.contains(address) {
            return Err(TransportError::HostNotFound {
                host: address.to_string(),
                reason: "no addresses".to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn connect(&self, address: &str) -> Result<ScriptedSession> {
        self.connects.lock().unwrap().push(address.to_string());
        if self.refused.contains(address) {
            return Err(TransportError::AuthenticationFailed {
                user: "netops".to_string(),
            }
            .into());
        }

        let replies = self.switches.get(address).cloned().unwrap_or_default();
        Ok(ScriptedSession {
            address: address.to_string(),
            prompt_line: format!("{address}#"),
            replies,
            transcript: self.transcript.clone(),
            logouts: self.logouts.clone(),
        })
    }
}
