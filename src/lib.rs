pub mod assertion;
pub mod collection;
pub mod error;
pub mod history;
pub mod http;
pub mod input;
pub mod logger;
pub mod runner;
pub mod session;
pub mod utils;
pub mod variable;

// Re-export commonly used types
pub use error::{Result, RuprobeError};
