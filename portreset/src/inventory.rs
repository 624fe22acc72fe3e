//! Operator switch inventory.
//!
//! One record per line, whitespace separated:
//!
//! ```text
//! # model  address            template       vlans
//! 3750     sw-cl-214.pitt.edu  WORKSTATION    210:keep,211:reset
//! 3850     sw-bh-101.pitt.edu  WORKSTATION    100:reset
//! ```
//!
//! `keep` preserves an interface's captured speed and duplex; `reset`
//! leaves them at the device default. Blank lines and `#` comments are
//! ignored.

use std::collections::HashSet;

use crate::error::InventoryError;
use crate::platform::SwitchModel;

/// Highest assignable 802.1Q VLAN id.
const MAX_VLAN_ID: u16 = 4094;

/// What to do with interfaces found in one VLAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanPolicy {
    /// VLAN the interface must currently be assigned to.
    pub vlan_id: u16,

    /// Reapply captured speed/duplex after the reset.
    pub preserve_speed_duplex: bool,
}

impl VlanPolicy {
    /// Parse one `<id>:<keep|reset>` entry.
    fn parse(line: usize, entry: &str) -> Result<Self, InventoryError> {
        let malformed = || InventoryError::MalformedVlanPolicy {
            line,
            entry: entry.to_string(),
        };

        let (id, mode) = entry.split_once(':').ok_or_else(malformed)?;
        let preserve_speed_duplex = match mode.to_ascii_lowercase().as_str() {
            "keep" => true,
            "reset" => false,
            _ => return Err(malformed()),
        };

        let vlan_id = id
            .parse::<u16>()
            .ok()
            .filter(|id| (1..=MAX_VLAN_ID).contains(id))
            .ok_or_else(|| InventoryError::InvalidVlanId {
                line,
                entry: entry.to_string(),
            })?;

        Ok(Self {
            vlan_id,
            preserve_speed_duplex,
        })
    }
}

/// One switch to process, immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchTarget {
    pub model: SwitchModel,
    pub address: String,
    /// Policies in operator order; the first matching id wins.
    pub vlan_policies: Vec<VlanPolicy>,
    pub template: String,
}

impl SwitchTarget {
    /// Parse one inventory record. `line` is 1-based and only used in errors.
    pub fn parse_record(line: usize, record: &str) -> Result<Self, InventoryError> {
        let mut fields = record.split_whitespace();
        let mut next = |field: &'static str| {
            fields
                .next()
                .ok_or(InventoryError::MissingField { line, field })
        };

        let model_field = next("model")?;
        let model = model_field
            .parse::<SwitchModel>()
            .map_err(|_| InventoryError::UnknownSwitchModel {
                line,
                model: model_field.to_string(),
            })?;
        let address = next("address")?.to_string();
        let template = next("template")?.to_string();
        let vlans = next("VLAN list")?;

        let mut seen = HashSet::new();
        let mut vlan_policies = Vec::new();
        for entry in vlans.split(',').filter(|e| !e.is_empty()) {
            let policy = VlanPolicy::parse(line, entry)?;
            if !seen.insert(policy.vlan_id) {
                return Err(InventoryError::DuplicateVlan {
                    line,
                    vlan_id: policy.vlan_id,
                });
            }
            vlan_policies.push(policy);
        }

        if vlan_policies.is_empty() {
            return Err(InventoryError::MissingField {
                line,
                field: "VLAN list",
            });
        }

        Ok(Self {
            model,
            address,
            vlan_policies,
            template,
        })
    }
}

/// Parse a whole inventory file.
///
/// Yields one result per record so a bad line only skips its own switch.
pub fn parse_inventory(text: &str) -> Vec<Result<SwitchTarget, InventoryError>> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| SwitchTarget::parse_record(line_no, line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record() {
        let target =
            SwitchTarget::parse_record(1, "3750 sw-cl-214 WORKSTATION 210:keep,211:reset").unwrap();

        assert_eq!(target.model, SwitchModel::Catalyst3750);
        assert_eq!(target.address, "sw-cl-214");
        assert_eq!(target.template, "WORKSTATION");
        assert_eq!(
            target.vlan_policies,
            vec![
                VlanPolicy {
                    vlan_id: 210,
                    preserve_speed_duplex: true
                },
                VlanPolicy {
                    vlan_id: 211,
                    preserve_speed_duplex: false
                },
            ]
        );
    }

    #[test]
    fn test_unknown_model() {
        let err = SwitchTarget::parse_record(4, "2960 sw1 WORKSTATION 10:keep").unwrap_err();
        assert_eq!(
            err,
            InventoryError::UnknownSwitchModel {
                line: 4,
                model: "2960".to_string()
            }
        );
    }

    #[test]
    fn test_missing_mode_suffix() {
        let err = SwitchTarget::parse_record(2, "3850 sw1 WORKSTATION 10:keep,11").unwrap_err();
        assert_eq!(
            err,
            InventoryError::MalformedVlanPolicy {
                line: 2,
                entry: "11".to_string()
            }
        );

        let err = SwitchTarget::parse_record(2, "3850 sw1 WORKSTATION 10:fast").unwrap_err();
        assert!(matches!(err, InventoryError::MalformedVlanPolicy { .. }));
    }

    #[test]
    fn test_invalid_and_duplicate_vlan() {
        let err = SwitchTarget::parse_record(1, "3850 sw1 T 0:keep").unwrap_err();
        assert!(matches!(err, InventoryError::InvalidVlanId { .. }));

        let err = SwitchTarget::parse_record(1, "3850 sw1 T abc:keep").unwrap_err();
        assert!(matches!(err, InventoryError::InvalidVlanId { .. }));

        let err = SwitchTarget::parse_record(1, "3850 sw1 T 10:keep,10:reset").unwrap_err();
        assert_eq!(err, InventoryError::DuplicateVlan { line: 1, vlan_id: 10 });
    }

    #[test]
    fn test_missing_fields() {
        let err = SwitchTarget::parse_record(7, "3850 sw1").unwrap_err();
        assert_eq!(
            err,
            InventoryError::MissingField {
                line: 7,
                field: "template"
            }
        );

        let err = SwitchTarget::parse_record(7, "3850 sw1 T ,").unwrap_err();
        assert!(matches!(err, InventoryError::MissingField { .. }));
    }

    #[test]
    fn test_parse_inventory_keeps_line_numbers() {
        let text = "# fleet\n\n3750 sw1 T 10:keep\n9300 sw2 T 10:keep\n  3850 sw3 T 20:reset  \n";
        let records = parse_inventory(text);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_ref().unwrap().address, "sw1");
        assert_eq!(
            records[1].as_ref().unwrap_err(),
            &InventoryError::UnknownSwitchModel {
                line: 4,
                model: "9300".to_string()
            }
        );
        assert_eq!(records[2].as_ref().unwrap().address, "sw3");
    }
}
