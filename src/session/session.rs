use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::{
    catalog::Catalog,
    compiler::StructuredQueryCompiler,
    config::SessionConfig,
    history::QueryHistory,
    ir::StructuredQuery,
    nodes::{
        NodeError, NodeGraph, NodeId, QueryNode, SlicesSourceNode, SqlSourceAttrs, SqlSourceNode,
        StdlibTableNode, TableSelection,
    },
    session::{
        ApplyOutcome, CommandOutcome, ExecutionEngine, ExecutionError, ExecutionRequest,
        ExecutionTicket, ExploreMode, NodeResult, QueryResult, SessionCommand, TablePicker,
    },
};

/// The explore page's model: every node chain, the selection, the current
/// mode and the last result of each node. All mutation goes through
/// [`Session::apply`]; execution results come back through
/// [`Session::apply_result`].
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    graph: NodeGraph,
    selected: Option<NodeId>,
    mode: ExploreMode,
    results: HashMap<NodeId, NodeResult>,
    in_flight: HashMap<NodeId, ExecutionTicket>,
    request_seq: u64,
    history: QueryHistory,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            graph: NodeGraph::new(&config),
            history: QueryHistory::new(config.history_capacity),
            config,
            selected: None,
            mode: ExploreMode::default(),
            results: HashMap::new(),
            in_flight: HashMap::new(),
            request_seq: 0,
        }
    }

    pub fn with_history(mut self, history: QueryHistory) -> Self {
        self.history = history;
        self
    }

    pub fn config(&self) -> &SessionConfig { &self.config }
    pub fn graph(&self) -> &NodeGraph { &self.graph }
    pub fn selected(&self) -> Option<NodeId> { self.selected }
    pub fn mode(&self) -> ExploreMode { self.mode }
    pub fn history(&self) -> &QueryHistory { &self.history }
    pub fn history_mut(&mut self) -> &mut QueryHistory { &mut self.history }

    pub fn node(&self, id: NodeId) -> Option<&QueryNode> {
        self.graph.get(id)
    }

    pub fn selected_node(&self) -> Option<&QueryNode> {
        self.selected.and_then(|id| self.graph.get(id))
    }

    pub fn result(&self, id: NodeId) -> Option<&NodeResult> {
        self.results.get(&id)
    }

    pub fn is_running(&self, id: NodeId) -> bool {
        self.in_flight.contains_key(&id)
    }

    pub fn compile(&self, id: NodeId) -> Option<StructuredQuery> {
        StructuredQueryCompiler::compile(&self.graph, id)
    }

    pub fn apply(&mut self, command: SessionCommand) -> Result<CommandOutcome, NodeError> {
        match command {
            SessionCommand::AddNode(node) => {
                let id = self.graph.add_root(node);
                self.selected = Some(id);
                Ok(CommandOutcome::Added(id))
            }
            SessionCommand::AddDownstream { parent, node } => {
                let id = self.graph.add_downstream(parent, node)?;
                self.selected = Some(id);
                Ok(CommandOutcome::Added(id))
            }
            SessionCommand::Edit { node, edit } => {
                self.graph.edit(node, |n| n.apply_edit(edit))?;
                Ok(CommandOutcome::Edited(node))
            }
            SessionCommand::Duplicate(source) => {
                let copy = self.graph.duplicate(source)?;
                Ok(CommandOutcome::Duplicated { source, copy })
            }
            SessionCommand::Delete(id) => {
                let removed = self.graph.remove(id)?;
                for node in &removed {
                    self.results.remove(node);
                    self.in_flight.remove(node);
                }
                if self.selected.is_some_and(|s| removed.contains(&s)) {
                    self.selected = None;
                }
                Ok(CommandOutcome::Deleted(removed))
            }
            SessionCommand::Select(id) => {
                self.ensure_node(id)?;
                self.selected = Some(id);
                Ok(CommandOutcome::Selected(Some(id)))
            }
            SessionCommand::Deselect => {
                self.selected = None;
                Ok(CommandOutcome::Selected(None))
            }
            SessionCommand::ClearAll => {
                let count = self.graph.clear();
                self.results.clear();
                self.in_flight.clear();
                self.selected = None;
                info!("cleared {} nodes", count);
                Ok(CommandOutcome::Cleared(count))
            }
            SessionCommand::Visualize(id) => {
                self.ensure_node(id)?;
                self.selected = Some(id);
                self.mode = ExploreMode::DataVisualiser;
                Ok(CommandOutcome::ModeChanged(self.mode))
            }
            SessionCommand::SetMode(mode) => {
                self.mode = mode;
                Ok(CommandOutcome::ModeChanged(mode))
            }
        }
    }

    fn ensure_node(&self, id: NodeId) -> Result<(), NodeError> {
        if self.graph.contains(id) { Ok(()) } else { Err(NodeError::UnknownNode(id)) }
    }

    fn add(&mut self, node: QueryNode) -> NodeId {
        let id = self.graph.add_root(node);
        self.selected = Some(id);
        id
    }

    pub fn add_slices_source(&mut self) -> NodeId {
        self.add(SlicesSourceNode::default().into())
    }

    pub fn add_sql_source(&mut self) -> NodeId {
        self.add(SqlSourceNode::new(SqlSourceAttrs::default()).into())
    }

    /// Add a table straight from the catalog with all of its columns.
    pub fn add_table_by_name(&mut self, catalog: &dyn Catalog, name: &str) -> Result<NodeId, NodeError> {
        let table = catalog.get_table(name).ok_or_else(|| NodeError::UnknownTable(name.to_string()))?;
        Ok(self.add(StdlibTableNode::from_selection(TableSelection::from_table(table)).into()))
    }

    /// Ask `picker` for a table and add it. Cancelling changes nothing.
    pub async fn add_stdlib_table_source_with(
        &mut self,
        picker: &dyn TablePicker,
        catalog: &dyn Catalog,
    ) -> Option<NodeId> {
        let modules = catalog.list_modules();
        let Some(selection) = picker.pick_table(modules).await else {
            debug!("table selection cancelled");
            return None;
        };
        Some(self.add(StdlibTableNode::from_selection(selection).into()))
    }

    /// Compile `id` and register a new request for it. SQL sources have
    /// their text saved to the history.
    pub fn begin_execution(&mut self, id: NodeId) -> Result<ExecutionRequest, ExecutionError> {
        let query = self.compile(id).ok_or_else(|| ExecutionError::uncompilable(id))?;
        let generation = self.graph.generation(id).ok_or_else(|| ExecutionError::uncompilable(id))?;

        if let Some(sql) = self.graph.get(id).and_then(QueryNode::sql_text) {
            self.history.save(sql);
        }

        self.request_seq += 1;
        let ticket = ExecutionTicket { node: id, generation, request_seq: self.request_seq };
        self.in_flight.insert(id, ticket);
        Ok(ExecutionRequest { ticket, query })
    }

    /// Apply an execution result. Results for removed, edited or superseded
    /// requests are dropped and leave the node's visible result as it was.
    pub fn apply_result(&mut self, ticket: ExecutionTicket, result: Result<QueryResult, ExecutionError>) -> ApplyOutcome {
        let Some(generation) = self.graph.generation(ticket.node) else {
            debug!("discarding result for removed node {}", ticket.node);
            return ApplyOutcome::NodeRemoved;
        };

        if self.in_flight.get(&ticket.node) != Some(&ticket) {
            debug!("discarding superseded result for node {} (request {})", ticket.node, ticket.request_seq);
            return ApplyOutcome::Superseded;
        }
        self.in_flight.remove(&ticket.node);

        if generation != ticket.generation {
            debug!(
                "discarding stale result for node {} (generation {}, now {})",
                ticket.node, ticket.generation, generation
            );
            return ApplyOutcome::Stale;
        }

        let entry = match result {
            Ok(rows) => NodeResult::Rows(rows),
            Err(err) => {
                warn!("node {}: {}", ticket.node, err);
                NodeResult::Failed(err)
            }
        };
        self.results.insert(ticket.node, entry);
        ApplyOutcome::Applied
    }

    /// Compile, execute and apply in one go, honouring the configured
    /// timeout.
    pub async fn run_node(&mut self, engine: &dyn ExecutionEngine, id: NodeId) -> Result<ApplyOutcome, ExecutionError> {
        let request = self.begin_execution(id)?;
        let result = match self.config.execution_timeout {
            Some(limit) => tokio::time::timeout(limit, engine.execute(&request.query))
                .await
                .unwrap_or_else(|_| Err(ExecutionError::timeout(limit))),
            None => engine.execute(&request.query).await,
        };
        Ok(self.apply_result(request.ticket, result))
    }
}
