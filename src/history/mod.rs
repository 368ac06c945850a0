pub mod model;
pub mod printer;
pub mod storage;

pub use model::{ComparisonRow, HistoryEntry};
pub use printer::{comparison_table, history_table, print_comparison, print_history};
pub use storage::HistoryStore;
