pub mod history_error;
pub use history_error::*;

pub mod query_history;
pub use query_history::*;
