pub mod error;
pub mod messages;

// Re-export commonly used types
pub use error::*;
pub use messages::{MessageTemplate, ResMessage, ResStatus};
