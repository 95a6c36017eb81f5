//! Command implementations for the cache CLI
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod replay;
mod validate;

pub use replay::Replay;
pub use validate::Validate;
