//! Switch hardware families.

use std::fmt;
use std::str::FromStr;

use super::vendors::catalyst;

/// Hardware family of a target switch.
///
/// The family decides which fixed QoS policy an access port receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchModel {
    /// Catalyst 3750 stacks, the older chassis family with explicit
    /// SRR queue sharing.
    Catalyst3750,

    /// Catalyst 3850 stacks, whose QoS defaults are implicit.
    Catalyst3850,
}

impl SwitchModel {
    /// Interface QoS commands this family needs reapplied after a reset.
    pub fn qos_commands(self) -> &'static [&'static str] {
        match self {
            SwitchModel::Catalyst3750 => catalyst::LEGACY_QOS_COMMANDS,
            SwitchModel::Catalyst3850 => &[],
        }
    }
}

impl FromStr for SwitchModel {
    type Err = ();

    /// Accepts `3750`, `c3750` and `ws-c3750` (any case), likewise 3850.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let bare = lower
            .strip_prefix("ws-c")
            .or_else(|| lower.strip_prefix('c'))
            .unwrap_or(&lower);

        match bare {
            "3750" => Ok(SwitchModel::Catalyst3750),
            "3850" => Ok(SwitchModel::Catalyst3850),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SwitchModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchModel::Catalyst3750 => write!(f, "3750"),
            SwitchModel::Catalyst3850 => write!(f, "3850"),
        }
    }
}
