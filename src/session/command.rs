use crate::nodes::{NodeEdit, NodeId, QueryNode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExploreMode {
    #[default]
    QueryBuilder,
    DataVisualiser,
}

/// Every change to a session goes through one of these.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Add a node as a new root and select it.
    AddNode(QueryNode),
    /// Add a node below `parent` and select it.
    AddDownstream { parent: NodeId, node: QueryNode },
    Edit { node: NodeId, edit: NodeEdit },
    Duplicate(NodeId),
    /// Delete the node and everything below it.
    Delete(NodeId),
    Select(NodeId),
    Deselect,
    ClearAll,
    /// Select the node and switch to the data visualiser.
    Visualize(NodeId),
    SetMode(ExploreMode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Added(NodeId),
    Edited(NodeId),
    Duplicated { source: NodeId, copy: NodeId },
    Deleted(Vec<NodeId>),
    Selected(Option<NodeId>),
    Cleared(usize),
    ModeChanged(ExploreMode),
}
