//! Switch run controller.
//!
//! Processes switches strictly one at a time:
//!
//! ```text
//! Resolving -> LoggingIn -> Ready -> Listing
//!           -> (Classifying -> Snapshotting -> Executing)*
//!           -> Verifying -> LoggingOut -> Done
//! Resolving | LoggingIn -> SwitchFailed
//! ```
//!
//! Interface-level problems skip the interface, switch-level problems
//! skip the switch, and a
//! [`SilentStepViolation`](crate::error::Error::SilentStepViolation)
//! ends the run without logging out.

use std::time::Duration;

use indexmap::IndexMap;
use log::{debug, error, info, warn};
use serde::Serialize;

use crate::channel::{Connector, SessionChannel};
use crate::driver::{self, CommandExecutor, RunMode};
use crate::error::{InventoryError, Result};
use crate::inventory::SwitchTarget;
use crate::parse::{parse_snapshot, parse_status_listing};
use crate::platform::PlatformDefinition;
use crate::policy::{Classification, classify};

/// Where a switch run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    Resolving,
    LoggingIn,
    Ready,
    Listing,
    Classifying,
    Snapshotting,
    Executing,
    Verifying,
    LoggingOut,
    Done,
    SwitchFailed,
}

/// An interface that was reconfigured (or would be, in a dry run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifiedInterface {
    pub switch: String,
    pub port: String,
}

/// Counters accumulated over the whole run.
#[derive(Debug, Default, Serialize)]
pub struct RunStatistics {
    pub dry_run: bool,
    pub switches_skipped: usize,
    /// Skipped interfaces per switch address, in processing order.
    pub interfaces_skipped: IndexMap<String, usize>,
    pub modified_interfaces: Vec<ModifiedInterface>,
    /// Commands a dry run withheld, per switch address.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub dry_run_commands: IndexMap<String, Vec<String>>,
}

impl RunStatistics {
    /// Log the end-of-run summary.
    pub fn log_summary(&self) {
        let verb = if self.dry_run { "planned" } else { "modified" };

        info!("switches skipped: {}", self.switches_skipped);
        for (switch, skipped) in &self.interfaces_skipped {
            info!("{}: {} interfaces skipped", switch, skipped);
        }
        info!("interfaces {}: {}", verb, self.modified_interfaces.len());
        for modified in &self.modified_interfaces {
            info!("  {} {}", modified.switch, modified.port);
        }
        for (switch, commands) in &self.dry_run_commands {
            info!("{}: {} commands withheld by dry run", switch, commands.len());
        }
    }
}

/// Run-wide settings and counters, passed explicitly to every switch run.
#[derive(Debug, Default)]
pub struct RunContext {
    pub mode: RunMode,
    /// Pause after every live command.
    pub settle_delay: Duration,
    pub stats: RunStatistics,
}

impl RunContext {
    pub fn new(mode: RunMode, settle_delay: Duration) -> Self {
        Self {
            mode,
            settle_delay,
            stats: RunStatistics {
                dry_run: mode == RunMode::DryRun,
                ..Default::default()
            },
        }
    }
}

/// What happened on one switch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchReport {
    pub address: String,
    /// Ports reconfigured, in listing order.
    pub modified: Vec<String>,
    pub interfaces_skipped: usize,
    /// Post-change running configuration of every modified port.
    /// Only captured in live mode.
    pub capture: Option<String>,
    /// Commands recorded instead of sent, in dry-run mode.
    pub dry_run_commands: Vec<String>,
}

impl SwitchReport {
    fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            ..Default::default()
        }
    }
}

fn enter(address: &str, state: SwitchState) {
    debug!("{}: -> {:?}", address, state);
}

/// Process every inventory record in order.
///
/// `on_report` sees each completed switch as soon as it is logged out, so
/// its capture survives a later fatal error. Bad records and unresolvable,
/// unreachable or failing switches are counted and skipped. Returns `Err`
/// only for a fatal error, which stops the run at once.
pub async fn run_all<C, F>(
    connector: &C,
    platform: &PlatformDefinition,
    records: Vec<std::result::Result<SwitchTarget, InventoryError>>,
    ctx: &mut RunContext,
    mut on_report: F,
) -> Result<Vec<SwitchReport>>
where
    C: Connector,
    F: FnMut(&SwitchReport),
{
    let mut reports = Vec::new();

    for record in records {
        let target = match record {
            Ok(target) => target,
            Err(e) => {
                warn!("skipping switch: {}", e);
                ctx.stats.switches_skipped += 1;
                continue;
            }
        };

        match run_switch(connector, platform, &target, ctx).await {
            Ok(report) => {
                on_report(&report);
                reports.push(report);
            }
            Err(e) if e.is_fatal() => {
                error!("{}: aborting run: {}", target.address, e);
                return Err(e);
            }
            Err(e) => {
                warn!("{}: skipping switch: {}", target.address, e);
                ctx.stats.switches_skipped += 1;
            }
        }
    }

    Ok(reports)
}

/// Run one switch from name resolution to logout.
pub async fn run_switch<C: Connector>(
    connector: &C,
    platform: &PlatformDefinition,
    target: &SwitchTarget,
    ctx: &mut RunContext,
) -> Result<SwitchReport> {
    let address = target.address.as_str();

    enter(address, SwitchState::Resolving);
    if let Err(e) = connector.resolve(address).await {
        enter(address, SwitchState::SwitchFailed);
        return Err(e);
    }

    enter(address, SwitchState::LoggingIn);
    let mut session = match connector.connect(address).await {
        Ok(session) => session,
        Err(e) => {
            enter(address, SwitchState::SwitchFailed);
            return Err(e);
        }
    };
    enter(address, SwitchState::Ready);

    let mut report = SwitchReport::new(address);
    let mut executor =
        CommandExecutor::new(&mut session, &platform.prompt, ctx.mode, ctx.settle_delay);
    let result = process_interfaces(&mut executor, platform, target, ctx.mode, &mut report).await;
    report.dry_run_commands = executor.into_recorded();

    record(&mut ctx.stats, &report);

    if let Err(e) = result {
        if e.is_fatal() {
            return Err(e);
        }
        logout(session, address).await;
        return Err(e);
    }

    logout(session, address).await;
    enter(address, SwitchState::Done);
    Ok(report)
}

async fn logout<S: SessionChannel>(session: S, address: &str) {
    enter(address, SwitchState::LoggingOut);
    if let Err(e) = session.close().await {
        warn!("{}: logout failed: {}", address, e);
    }
}

fn record(stats: &mut RunStatistics, report: &SwitchReport) {
    stats
        .interfaces_skipped
        .insert(report.address.clone(), report.interfaces_skipped);
    stats
        .modified_interfaces
        .extend(report.modified.iter().map(|port| ModifiedInterface {
            switch: report.address.clone(),
            port: port.clone(),
        }));
    if !report.dry_run_commands.is_empty() {
        stats
            .dry_run_commands
            .insert(report.address.clone(), report.dry_run_commands.clone());
    }
}

async fn process_interfaces<S: SessionChannel>(
    executor: &mut CommandExecutor<'_, S>,
    platform: &PlatformDefinition,
    target: &SwitchTarget,
    mode: RunMode,
    report: &mut SwitchReport,
) -> Result<()> {
    let address = target.address.as_str();

    enter(address, SwitchState::Listing);
    let listing = executor.query(&platform.status_command).await?;
    if mode == RunMode::DryRun {
        info!("{}: dry run, device output not read", address);
    }
    let entries = parse_status_listing(&listing, platform);
    debug!("{}: {} physical ports listed", address, entries.len());

    for entry in entries {
        let port = entry.port_name.as_str();
        if report.modified.iter().any(|m| m == port) {
            continue;
        }

        enter(address, SwitchState::Classifying);
        let policy = match classify(&entry, &target.vlan_policies, platform) {
            Ok(Classification::Matched(policy)) => policy,
            Ok(Classification::Trunk) => {
                debug!("{}: {} is a trunk, leaving it alone", address, port);
                continue;
            }
            Ok(Classification::Ignored | Classification::OutOfScope) => continue,
            Err(e) => {
                warn!("{}: skipping interface: {}", address, e);
                report.interfaces_skipped += 1;
                continue;
            }
        };

        enter(address, SwitchState::Snapshotting);
        let dump = executor.query(&platform.interface_config_for(port)).await?;
        let snapshot = match parse_snapshot(&dump, port) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("{}: skipping interface: {}", address, e);
                report.interfaces_skipped += 1;
                continue;
            }
        };
        for line in &snapshot.dropped {
            info!("{}: {}: not carried over: {}", address, port, line);
        }

        enter(address, SwitchState::Executing);
        let plan = driver::plan(
            port,
            &snapshot.interface,
            target.model,
            policy.preserve_speed_duplex,
            &target.template,
        );
        driver::apply(&plan, executor).await?;
        report.modified.push(entry.port_name.clone());
    }

    if mode == RunMode::Live && !report.modified.is_empty() {
        enter(address, SwitchState::Verifying);
        let mut capture = String::new();
        for port in &report.modified {
            capture.push_str(&format!("! {port}\n"));
            for line in executor.query(&platform.interface_config_for(port)).await? {
                capture.push_str(&line);
                capture.push('\n');
            }
        }
        report.capture = Some(capture);
    }

    info!(
        "{}: {} interfaces {}, {} skipped",
        address,
        report.modified.len(),
        if mode == RunMode::Live { "modified" } else { "planned" },
        report.interfaces_skipped
    );
    Ok(())
}
