/// Environment configuration
pub mod environment;
/// Error types
pub mod error;

pub use environment::{Environment, ReadMode, TodoConfig};
pub use error::{ConfigError, TodoError, TodoResult};
