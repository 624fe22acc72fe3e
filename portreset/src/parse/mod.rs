//! Parsers for device output.

mod snapshot;
mod status;

pub use snapshot::{
    DEFAULT_PORT_SECURITY_MAXIMUM, InterfaceSnapshot, PORT_SECURITY_HEADROOM, Snapshot,
    parse_snapshot,
};
pub use status::{InterfaceStatusEntry, parse_status_listing};
