//! Platform definitions.
//!
//! This module holds the device command language: prompt patterns, show
//! commands, the physical-port naming rule and the switch families.

mod definition;
mod model;
pub mod vendors;

pub use definition::PlatformDefinition;
pub use model::SwitchModel;
