pub mod executor;
pub mod reporter;
pub mod types;

pub use executor::CollectionRunner;
pub use reporter::TestReporter;
pub use types::{RunSummary, entry_passed};
