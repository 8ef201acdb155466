/// Time source
pub mod clock;
/// Identifier generation
pub mod id;
/// Todo payload and stored record
pub mod model;
/// Create / read / index orchestration
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use id::{IdGenerator, UuidGenerator};
pub use model::{Todo, TodoRecord};
pub use service::TodoService;
