//! # portreset
//!
//! Bulk access-port reconfiguration for Catalyst switch fleets.
//!
//! For every switch in an operator inventory, portreset logs in over SSH,
//! lists the physical access ports, picks the ones whose VLAN the operator
//! named, snapshots the attributes worth keeping, then resets each port to
//! defaults and rebuilds it under a fixed access-port policy.
//!
//! ## Features
//!
//! - Async SSH sessions via russh, with prompt detection on a tail-searched buffer
//! - Dry-run mode that reads the switch but never changes it
//! - Silence checking: a configuration command that produces output stops the run
//! - Per-switch post-change configuration capture and a JSON run summary
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use portreset::platform::vendors::catalyst;
//! use portreset::{AuthMethod, RunContext, RunMode, SshConfig, SshConnector};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let platform = catalyst::platform()?;
//!     let config = SshConfig::new("netops", AuthMethod::Password("secret".to_string().into()));
//!     let connector = SshConnector::new(config, platform.clone());
//!
//!     let records = portreset::parse_inventory("3750 10.0.0.5 WORKSTATION 210:keep");
//!     let mut ctx = RunContext::new(RunMode::DryRun, Duration::from_millis(100));
//!     portreset::run_all(&connector, &platform, records, &mut ctx, |_| {}).await?;
//!
//!     ctx.stats.log_summary();
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod driver;
pub mod error;
pub mod inventory;
pub mod parse;
pub mod platform;
pub mod policy;
pub mod runner;
pub mod transport;

// Re-export main types for convenience
pub use channel::{Connector, SessionChannel, SshConnector};
pub use driver::{ChangePlan, CommandExecutor, RunMode};
pub use error::Error;
pub use inventory::{SwitchTarget, VlanPolicy, parse_inventory};
pub use platform::{PlatformDefinition, SwitchModel};
pub use runner::{RunContext, RunStatistics, SwitchReport, run_all, run_switch};
pub use transport::{AuthMethod, HostKeyVerification, SshConfig};
