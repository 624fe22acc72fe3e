//! Channel layer: the session contract the engine drives, and its SSH
//! implementation with pattern-based prompt detection and ANSI stripping.

mod buffer;
#[cfg(test)]
pub(crate) mod mock;
mod patterns;
mod session;
mod ssh;

pub use buffer::PatternBuffer;
pub use patterns::{compile_prompt_pattern, is_prompt_line, split_output};
pub use session::{Connector, SessionChannel};
pub use ssh::{SshConnector, SshSession};
