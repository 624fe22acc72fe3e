//! Interface change planning.
//!
//! A plan is the full command sequence that resets one access port and
//! puts back what is worth keeping, plus the fixed access-port policy.

use log::info;

use super::executor::CommandExecutor;
use crate::channel::SessionChannel;
use crate::error::Result;
use crate::parse::InterfaceSnapshot;
use crate::platform::SwitchModel;
use crate::platform::vendors::catalyst;

/// One command in a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCommand {
    pub command: String,
    /// Any output besides the prompt aborts the run.
    pub must_be_silent: bool,
}

/// Ordered command sequence for one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePlan {
    interface: String,
    commands: Vec<PlannedCommand>,
}

impl ChangePlan {
    fn new(interface: &str) -> Self {
        Self {
            interface: interface.to_string(),
            commands: Vec::new(),
        }
    }

    fn push(&mut self, command: impl Into<String>, must_be_silent: bool) {
        self.commands.push(PlannedCommand {
            command: command.into(),
            must_be_silent,
        });
    }

    fn push_silent(&mut self, command: Option<&String>) {
        if let Some(command) = command {
            self.push(command.as_str(), true);
        }
    }

    /// Interface this plan reconfigures.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Commands in send order.
    pub fn commands(&self) -> &[PlannedCommand] {
        &self.commands
    }
}

/// Build the command sequence for one interface.
///
/// Speed and duplex are only carried over when `preserve_speed_duplex`
/// is set; otherwise the device default applies after the reset. The QoS
/// queue commands are emitted for the legacy family only.
pub fn plan(
    interface: &str,
    snapshot: &InterfaceSnapshot,
    model: SwitchModel,
    preserve_speed_duplex: bool,
    template: &str,
) -> ChangePlan {
    let mut plan = ChangePlan::new(interface);

    plan.push(catalyst::CONFIGURE_TERMINAL, false);
    plan.push(catalyst::default_interface(interface), false);
    plan.push(catalyst::interface(interface), true);

    plan.push_silent(snapshot.description.as_ref());
    if preserve_speed_duplex {
        plan.push_silent(snapshot.speed.as_ref());
        plan.push_silent(snapshot.duplex.as_ref());
    }
    plan.push_silent(snapshot.access_vlan_command.as_ref());
    plan.push(catalyst::port_security_maximum(snapshot.port_security_max), true);

    plan.push(catalyst::DISABLE_LINK_STATUS_LOGGING, true);
    plan.push(catalyst::INLINE_POWER_AUTO, true);

    for command in model.qos_commands() {
        plan.push(*command, true);
    }

    // Some releases print a portfast advisory here.
    plan.push(catalyst::DISABLE_LEGACY_PORTFAST, false);
    plan.push(catalyst::source_template(template), false);

    plan.push(catalyst::EXIT_INTERFACE, false);
    plan.push(catalyst::END_CONFIGURATION, false);

    plan
}

/// Send every command of `plan` through `executor`, stopping at the first error.
pub async fn apply<S: SessionChannel>(
    plan: &ChangePlan,
    executor: &mut CommandExecutor<'_, S>,
) -> Result<()> {
    info!(
        "{}: applying {} commands",
        plan.interface(),
        plan.commands().len()
    );

    for step in plan.commands() {
        executor.execute(&step.command, step.must_be_silent).await?;
    }

    Ok(())
}
