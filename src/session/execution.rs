use std::{fmt::Display, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ir::StructuredQuery, nodes::NodeId};

/// Tabular result of running a structured query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionErrorKind {
    /// The engine rejected or failed the query.
    Engine,
    Timeout,
    /// The node did not compile, nothing was sent.
    Uncompilable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionError {
    pub kind: ExecutionErrorKind,
    pub message: String,
}

impl ExecutionError {
    pub fn engine(message: &str) -> Self {
        Self { kind: ExecutionErrorKind::Engine, message: message.to_string() }
    }

    pub fn timeout(limit: Duration) -> Self {
        Self {
            kind: ExecutionErrorKind::Timeout,
            message: format!("query did not finish within {} ms", limit.as_millis()),
        }
    }

    pub fn uncompilable(node: NodeId) -> Self {
        Self {
            kind: ExecutionErrorKind::Uncompilable,
            message: format!("node {node} cannot be compiled"),
        }
    }
}

impl Display for ExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ExecutionErrorKind::Engine => write!(f, "execution failed: {}", self.message),
            ExecutionErrorKind::Timeout => write!(f, "execution timed out: {}", self.message),
            ExecutionErrorKind::Uncompilable => write!(f, "not executed: {}", self.message),
        }
    }
}

impl std::error::Error for ExecutionError {}

/// Runs compiled queries, typically against a trace processor.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn execute(&self, query: &StructuredQuery) -> Result<QueryResult, ExecutionError>;
}

/// Identifies one execution request. A result is applied only while the
/// node still exists, neither it nor any node above it has been edited since,
/// and no newer request for it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecutionTicket {
    pub node: NodeId,
    pub generation: u64,
    pub request_seq: u64,
}

#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub ticket: ExecutionTicket,
    pub query: StructuredQuery,
}

/// What the result panel shows for a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeResult {
    Rows(QueryResult),
    Failed(ExecutionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The node was edited after the request was issued.
    Stale,
    /// A newer request for the node was issued.
    Superseded,
    NodeRemoved,
}
