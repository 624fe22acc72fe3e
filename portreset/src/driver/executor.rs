//! Command executor with dry-run support and silence checking.

use std::time::Duration;

use log::{debug, error, info};
use regex::bytes::Regex;

use crate::channel::{SessionChannel, is_prompt_line};
use crate::error::{Error, Result};

/// Whether configuration commands reach the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Log configuration commands instead of sending them.
    #[default]
    DryRun,
    /// Send everything.
    Live,
}

/// Drives one switch session, one command at a time.
///
/// In [`RunMode::DryRun`] nothing reaches the session: both
/// [`execute`](Self::execute) and [`query`](Self::query) only record the
/// command and return no output.
pub struct CommandExecutor<'a, S> {
    session: &'a mut S,
    prompt: &'a Regex,
    mode: RunMode,
    settle_delay: Duration,
    recorded: Vec<String>,
}

impl<'a, S: SessionChannel> CommandExecutor<'a, S> {
    /// Create an executor over an open session.
    pub fn new(
        session: &'a mut S,
        prompt: &'a Regex,
        mode: RunMode,
        settle_delay: Duration,
    ) -> Self {
        Self {
            session,
            prompt,
            mode,
            settle_delay,
            recorded: Vec::new(),
        }
    }

    /// Send a configuration command.
    ///
    /// With `must_be_silent`, any output other than the prompt is a
    /// [`Error::SilentStepViolation`]: the device rejected or reinterpreted
    /// the command.
    pub async fn execute(&mut self, command: &str, must_be_silent: bool) -> Result<Vec<String>> {
        let Some(output) = self.send(command).await? else {
            return Ok(Vec::new());
        };

        if must_be_silent {
            let unexpected = self.strip_prompt(&output);
            if !unexpected.is_empty() {
                error!("'{}' produced output: {:?}", command, unexpected);
                return Err(Error::SilentStepViolation {
                    command: command.to_string(),
                    output: unexpected,
                });
            }
        } else {
            debug!("'{}' -> {:?}", command, output);
        }

        Ok(output)
    }

    /// Send a read-only command and return its output without the prompt.
    pub async fn query(&mut self, command: &str) -> Result<Vec<String>> {
        match self.send(command).await? {
            Some(output) => Ok(self.strip_prompt(&output)),
            None => Ok(Vec::new()),
        }
    }

    /// Consume the executor, returning the commands a dry run would have sent.
    pub fn into_recorded(self) -> Vec<String> {
        self.recorded
    }

    /// Send `command` in live mode, then wait out the settle delay.
    /// Returns `None` after recording it in dry-run mode.
    async fn send(&mut self, command: &str) -> Result<Option<Vec<String>>> {
        if self.mode == RunMode::DryRun {
            info!("[dry-run] {}", command);
            self.recorded.push(command.to_string());
            return Ok(None);
        }

        let output = self.session.send(self.prompt, command).await?;

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        Ok(Some(output))
    }

    /// Output lines without the trailing prompt and without blank lines.
    fn strip_prompt(&self, output: &[String]) -> Vec<String> {
        let body = match output.split_last() {
            Some((last, rest)) if is_prompt_line(self.prompt, last) => rest,
            _ => output,
        };

        body.iter()
            .filter(|line| !line.trim().is_empty())
            .cloned()
            .collect()
    }
}
