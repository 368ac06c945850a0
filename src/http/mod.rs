pub mod client;
pub mod request;
pub mod response;
pub mod types;

// Re-export commonly used types for convenient access
pub use client::Client;
pub use request::{DEFAULT_TIMEOUT, Request, RequestBody, RequestBuilder};
pub use response::{ResponseContent, ResponseRecord};
pub use types::{BasicAuth, Method, Status, normalize_url};
