use uuid::Uuid;

use crate::config::IdType;

/// Hands out structured-query node identifiers.
///
/// Every node receives its identifier once, when it is created, so recompiling
/// the same node always yields the same `id` in the IR.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IdManager {
    id_type: IdType,
    prefix: String,
    allocated: u64,
}

impl IdManager {
    pub fn new(id_type: IdType, prefix: &str) -> Self {
        Self {
            id_type,
            prefix: prefix.to_string(),
            allocated: 0,
        }
    }

    /// Number of identifiers handed out so far.
    pub fn allocated(&self) -> u64 {
        self.allocated
    }

    /// `<prefix><n>` for integer ids, a bare v4 uuid otherwise.
    pub fn next_query_id(&mut self) -> String {
        self.allocated += 1;
        match self.id_type {
            IdType::Int => format!("{}{}", self.prefix, self.allocated),
            IdType::Uuid => Uuid::new_v4().to_string(),
        }
    }
}
