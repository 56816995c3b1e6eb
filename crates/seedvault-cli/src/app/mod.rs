//! Application layer: shared context and path resolution.

mod context;
mod resolver;

pub use context::AppContext;
pub use resolver::missing_file_message;
