use std::fmt::Display;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::{IdManager, SessionConfig},
    nodes::{NodeError, QueryNode},
};

/// Handle to a node in a [`NodeGraph`]. Never reused within a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct NodeSlot {
    pub node: QueryNode,
    /// Stable IR id, assigned once when the node is created.
    pub query_id: String,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    /// Bumped on every edit of this node or of a node above it.
    pub generation: u64,
}

/// Arena of nodes linked into linear chains. Every chain starts at a root;
/// a node has at most one upstream and one downstream neighbour.
#[derive(Debug, Clone)]
pub struct NodeGraph {
    slots: IndexMap<NodeId, NodeSlot>,
    roots: Vec<NodeId>,
    next_id: u64,
    query_ids: IdManager,
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl NodeGraph {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            slots: IndexMap::new(),
            roots: Vec::new(),
            next_id: 1,
            query_ids: IdManager::new(config.id_type, &config.id_prefix),
        }
    }

    fn allocate(&mut self, node: QueryNode, prev: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let query_id = self.query_ids.next_query_id();
        debug!("node {} added as {} ({})", id, query_id, node.kind());
        self.slots.insert(id, NodeSlot { node, query_id, prev, next: None, generation: 0 });
        id
    }

    /// Add a node as the start of a new chain.
    pub fn add_root(&mut self, node: QueryNode) -> NodeId {
        let id = self.allocate(node, None);
        self.roots.push(id);
        id
    }

    /// Add `node` directly below `parent`.
    pub fn add_downstream(&mut self, parent: NodeId, node: QueryNode) -> Result<NodeId, NodeError> {
        let slot = self.slots.get(&parent).ok_or(NodeError::UnknownNode(parent))?;
        if slot.next.is_some() {
            return Err(NodeError::AlreadyHasDownstream(parent));
        }
        if !node.accepts_upstream() {
            return Err(NodeError::NotChainable { parent, kind: node.kind() });
        }

        let id = self.allocate(node, Some(parent));
        if let Some(slot) = self.slots.get_mut(&parent) {
            slot.next = Some(id);
        }
        Ok(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&QueryNode> {
        self.slots.get(&id).map(|s| &s.node)
    }

    pub fn slot(&self, id: NodeId) -> Option<&NodeSlot> {
        self.slots.get(&id)
    }

    pub fn generation(&self, id: NodeId) -> Option<u64> {
        self.slots.get(&id).map(|s| s.generation)
    }

    pub fn query_id(&self, id: NodeId) -> Option<&str> {
        self.slots.get(&id).map(|s| s.query_id.as_str())
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(&id).and_then(|s| s.prev)
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(&id).and_then(|s| s.next)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Run `f` against the node. When it succeeds the generation of the node
    /// and of every node below it is bumped, since their compiled queries
    /// nest this one.
    pub fn edit<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut QueryNode) -> Result<R, NodeError>,
    ) -> Result<R, NodeError> {
        let slot = self.slots.get_mut(&id).ok_or(NodeError::UnknownNode(id))?;
        let result = f(&mut slot.node)?;
        for node in self.downstream(id) {
            if let Some(slot) = self.slots.get_mut(&node) {
                slot.generation += 1;
            }
        }
        Ok(result)
    }

    /// The chain from its root down to `id`, both included.
    pub fn chain(&self, id: NodeId) -> Option<Vec<NodeId>> {
        let mut chain = vec![id];
        let mut current = self.slots.get(&id)?;
        while let Some(prev) = current.prev {
            // Links are kept acyclic, the bound only guards against corruption.
            if chain.len() > self.slots.len() {
                return None;
            }
            chain.push(prev);
            current = self.slots.get(&prev)?;
        }
        chain.reverse();
        Some(chain)
    }

    /// `id` followed by everything below it.
    pub fn downstream(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.slots.contains_key(&id).then_some(id);
        while let Some(node) = current {
            if out.len() >= self.slots.len() {
                break;
            }
            out.push(node);
            current = self.next(node);
        }
        out
    }

    /// Remove `id` together with every node below it. The upstream
    /// neighbour, if any, loses its downstream link.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<NodeId>, NodeError> {
        if !self.slots.contains_key(&id) {
            return Err(NodeError::UnknownNode(id));
        }

        let removed = self.downstream(id);
        if let Some(parent) = self.prev(id) {
            if let Some(slot) = self.slots.get_mut(&parent) {
                slot.next = None;
            }
        }
        for node in &removed {
            self.slots.shift_remove(node);
        }
        self.roots.retain(|r| !removed.contains(r));
        debug!("removed nodes {:?}", removed);
        Ok(removed)
    }

    /// Copy `id` into a new, unlinked root with a fresh IR id.
    pub fn duplicate(&mut self, id: NodeId) -> Result<NodeId, NodeError> {
        let attrs = self.get(id).ok_or(NodeError::UnknownNode(id))?.get_state_copy();
        let copy = self.add_root(QueryNode::from_attrs(attrs));
        debug!("node {} duplicated as {}", id, copy);
        Ok(copy)
    }

    /// Drop every node. Ids and IR ids keep counting up.
    pub fn clear(&mut self) -> usize {
        let count = self.slots.len();
        self.slots.clear();
        self.roots.clear();
        count
    }

    /// Every node, chain by chain in root order, upstream first.
    pub fn all_nodes(&self) -> Vec<NodeId> {
        self.roots.iter().flat_map(|root| self.downstream(*root)).collect()
    }
}
