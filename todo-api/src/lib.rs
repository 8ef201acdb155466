//! Todo API Lambda functions

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Lambda event handlers
pub mod handlers;

/// Todo domain: model, id generation, time and the application service
pub mod todo;

/// Configuration and error types
pub mod types;

/// Startup wiring shared by the Lambda binaries
pub mod bootstrap;
