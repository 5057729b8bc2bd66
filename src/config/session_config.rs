use std::time::Duration;

use crate::config::IdType;

/// Default number of SQL queries kept in the history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Session configuration.
///
/// - `id_type` controls how structured-query node identifiers are generated.
/// - `id_prefix` is prepended to sequential identifiers.
/// - `history_capacity` bounds the SQL query history.
/// - `execution_timeout` caps how long a single execution request may take.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Strategy for generated node identifiers
    pub id_type: IdType,
    /// Prefix for sequential identifiers
    pub id_prefix: String,
    /// Maximum number of history entries
    pub history_capacity: usize,
    /// Optional per-request execution timeout
    pub execution_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            id_type: Default::default(),
            id_prefix: "node_".to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            execution_timeout: None,
        }
    }
}

impl SessionConfig {
    /// Create default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: sequential identifiers using `id_prefix`.
    pub fn int(id_prefix: &str) -> Self {
        Self {
            id_type: IdType::Int,
            id_prefix: id_prefix.to_string(),
            ..Self::default()
        }
    }

    /// Convenience: UUID identifiers.
    pub fn uuid() -> Self {
        Self {
            id_type: IdType::Uuid,
            id_prefix: String::new(),
            ..Self::default()
        }
    }

    pub fn with_history_capacity(mut self, history_capacity: usize) -> Self {
        self.history_capacity = history_capacity;
        self
    }

    pub fn with_execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout = Some(timeout);
        self
    }
}
