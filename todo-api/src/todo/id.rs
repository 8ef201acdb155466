//! Todo identifier generation

use uuid::Uuid;

/// Produces a fresh identifier for every new todo
pub trait IdGenerator: Send + Sync {
    /// Returns a new, unique id
    fn generate(&self) -> String;
}

/// Random (v4) UUID generator
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
