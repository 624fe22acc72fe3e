//! Vendor-specific platform definitions.

pub mod catalyst;
