// actions-sdk: Foundation layer for the GitHub Actions core library.
// This crate has ZERO dependencies on the other actions crates and provides
// value coercion, wire escaping, and the environment key registry.

pub mod command_value;
pub mod environment;

// Re-export commonly used items at crate root
pub use command_value::{escape_data, escape_property, CommandValue, ValueError};
pub use environment::{Environment, MapEnvironment, ProcessEnvironment};
