use std::fmt::Display;

use crate::nodes::{NodeId, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    UnknownNode(NodeId),
    UnknownTable(String),
    UnknownColumn(String),
    /// Another column of the node already has this output name.
    DuplicateColumn(String),
    /// The node kind cannot consume another node's output.
    NotChainable { parent: NodeId, kind: NodeKind },
    /// The node already has a downstream consumer.
    AlreadyHasDownstream(NodeId),
    IndexOutOfRange { what: &'static str, index: usize, len: usize },
    /// The edit does not apply to this kind of node.
    UnsupportedEdit { kind: NodeKind, edit: &'static str },
}

impl Display for NodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeError::UnknownNode(id) => write!(f, "unknown node {id}"),
            NodeError::UnknownTable(name) => write!(f, "unknown table '{name}'"),
            NodeError::UnknownColumn(name) => write!(f, "unknown column '{name}'"),
            NodeError::DuplicateColumn(name) => write!(f, "column name '{name}' is already in use"),
            NodeError::NotChainable { parent, kind } =>
                write!(f, "a {kind} node cannot be attached below node {parent}"),
            NodeError::AlreadyHasDownstream(id) => write!(f, "node {id} already has a downstream node"),
            NodeError::IndexOutOfRange { what, index, len } =>
                write!(f, "{what} index {index} out of range (len {len})"),
            NodeError::UnsupportedEdit { kind, edit } => write!(f, "{edit} does not apply to a {kind} node"),
        }
    }
}

impl std::error::Error for NodeError {}
