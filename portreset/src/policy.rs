//! VLAN policy matching.
//!
//! Decides from an interface's live VLAN assignment whether the operator
//! asked for it to be reconfigured, and how.

use crate::error::ParseError;
use crate::inventory::VlanPolicy;
use crate::parse::InterfaceStatusEntry;
use crate::platform::PlatformDefinition;

/// Status text the listing shows for trunk ports.
const TRUNK: &str = "trunk";

/// Outcome of matching one status row against the policy list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Not a physical access port.
    Ignored,
    /// Trunk ports are never touched.
    Trunk,
    /// Access port in a VLAN nobody asked about.
    OutOfScope,
    /// First policy whose VLAN id equals the port's VLAN.
    Matched(VlanPolicy),
}

/// Classify one status row.
///
/// Policies are compared by numeric VLAN id only, in operator order.
/// A VLAN field that is neither `trunk` nor a number is a parse error
/// for that interface.
pub fn classify(
    entry: &InterfaceStatusEntry,
    policies: &[VlanPolicy],
    platform: &PlatformDefinition,
) -> Result<Classification, ParseError> {
    if !platform.is_physical_port(&entry.port_name) {
        return Ok(Classification::Ignored);
    }

    if entry.vlan_field == TRUNK {
        return Ok(Classification::Trunk);
    }

    let non_numeric = || ParseError::NonNumericVlanField {
        interface: entry.port_name.clone(),
        field: entry.vlan_field.clone(),
    };
    if entry.vlan_field.is_empty() || !entry.vlan_field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(non_numeric());
    }
    // All digits but too large for any VLAN: cannot match a policy.
    let Ok(vlan_id) = entry.vlan_field.parse::<u16>() else {
        return Ok(Classification::OutOfScope);
    };

    Ok(policies
        .iter()
        .find(|policy| policy.vlan_id == vlan_id)
        .map_or(Classification::OutOfScope, |policy| {
            Classification::Matched(*policy)
        }))
}
