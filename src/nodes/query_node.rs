use std::fmt::Display;

use crate::{
    ir::QueryBody,
    lineage::{ColumnInfo, ReferenceWarning},
    nodes::{
        NodeEdit, NodeError, NodeState, SlicesSourceAttrs, SlicesSourceNode, SqlSourceAttrs,
        SqlSourceNode, StdlibTableAttrs, StdlibTableNode,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    StdlibTable,
    Slices,
    SqlSource,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::StdlibTable => write!(f, "stdlib table"),
            NodeKind::Slices => write!(f, "slices"),
            NodeKind::SqlSource => write!(f, "sql source"),
        }
    }
}

/// Copy of everything needed to rebuild a node of the same kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNodeAttrs {
    StdlibTable(StdlibTableAttrs),
    Slices(SlicesSourceAttrs),
    SqlSource(SqlSourceAttrs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    StdlibTable(StdlibTableNode),
    Slices(SlicesSourceNode),
    SqlSource(SqlSourceNode),
}

impl From<StdlibTableNode> for QueryNode {
    fn from(node: StdlibTableNode) -> Self { QueryNode::StdlibTable(node) }
}

impl From<SlicesSourceNode> for QueryNode {
    fn from(node: SlicesSourceNode) -> Self { QueryNode::Slices(node) }
}

impl From<SqlSourceNode> for QueryNode {
    fn from(node: SqlSourceNode) -> Self { QueryNode::SqlSource(node) }
}

impl QueryNode {
    pub fn from_attrs(attrs: QueryNodeAttrs) -> Self {
        match attrs {
            QueryNodeAttrs::StdlibTable(a) => QueryNode::StdlibTable(StdlibTableNode::new(a)),
            QueryNodeAttrs::Slices(a) => QueryNode::Slices(SlicesSourceNode::new(a)),
            QueryNodeAttrs::SqlSource(a) => QueryNode::SqlSource(SqlSourceNode::new(a)),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            QueryNode::StdlibTable(_) => NodeKind::StdlibTable,
            QueryNode::Slices(_) => NodeKind::Slices,
            QueryNode::SqlSource(_) => NodeKind::SqlSource,
        }
    }

    pub fn state(&self) -> &NodeState {
        match self {
            QueryNode::StdlibTable(n) => n.state(),
            QueryNode::Slices(n) => n.state(),
            QueryNode::SqlSource(n) => n.state(),
        }
    }

    fn state_mut(&mut self) -> &mut NodeState {
        match self {
            QueryNode::StdlibTable(n) => n.state_mut(),
            QueryNode::Slices(n) => n.state_mut(),
            QueryNode::SqlSource(n) => n.state_mut(),
        }
    }

    pub fn validate(&self) -> bool {
        match self {
            QueryNode::StdlibTable(n) => n.validate(),
            QueryNode::Slices(n) => n.validate(),
            QueryNode::SqlSource(n) => n.validate(),
        }
    }

    pub fn get_title(&self) -> String {
        match self {
            QueryNode::StdlibTable(n) => n.title(),
            QueryNode::Slices(n) => n.title(),
            QueryNode::SqlSource(n) => n.title(),
        }
    }

    pub fn get_state_copy(&self) -> QueryNodeAttrs {
        match self {
            QueryNode::StdlibTable(n) => QueryNodeAttrs::StdlibTable(n.state_copy()),
            QueryNode::Slices(n) => QueryNodeAttrs::Slices(n.state_copy()),
            QueryNode::SqlSource(n) => QueryNodeAttrs::SqlSource(n.state_copy()),
        }
    }

    /// The variant-specific part of the IR, `None` when the node is not
    /// ready to compile.
    pub fn body(&self) -> Option<QueryBody> {
        match self {
            QueryNode::StdlibTable(n) => n.body(),
            QueryNode::Slices(n) => Some(n.body()),
            QueryNode::SqlSource(n) => n.body(),
        }
    }

    /// Whether the node can consume another node's output.
    pub fn accepts_upstream(&self) -> bool {
        matches!(self, QueryNode::SqlSource(_))
    }

    pub fn final_cols(&self) -> &[ColumnInfo] {
        self.state().final_cols()
    }

    pub fn reference_warnings(&self) -> &[ReferenceWarning] {
        self.state().reference_warnings()
    }

    /// The SQL text to record in history, for SQL sources.
    pub fn sql_text(&self) -> Option<&str> {
        match self {
            QueryNode::SqlSource(n) => n.sql().filter(|s| !s.trim().is_empty()),
            _ => None,
        }
    }

    pub fn apply_edit(&mut self, edit: NodeEdit) -> Result<(), NodeError> {
        let kind = self.kind();
        match edit {
            NodeEdit::AddFilter(filter) => self.state_mut().add_filter(filter),
            NodeEdit::RemoveFilter(index) => { self.state_mut().remove_filter(index)?; }
            NodeEdit::SetFilters(filters) => self.state_mut().set_filters(filters),
            NodeEdit::SetGroupBy { column, selected } => self.state_mut().set_group_by(&column, selected)?,
            NodeEdit::SetGroupByColumns(columns) => self.state_mut().set_group_by_columns(columns),
            NodeEdit::AddAggregation(aggregation) => self.state_mut().add_aggregation(aggregation),
            NodeEdit::RemoveAggregation(index) => { self.state_mut().remove_aggregation(index)?; }
            NodeEdit::SetAggregations(aggregations) => self.state_mut().set_aggregations(aggregations),
            NodeEdit::SetColumnSelected { column, selected } =>
                self.state_mut().set_column_selected(&column, selected)?,
            NodeEdit::RenameColumn { column, name } => self.state_mut().rename_column(&column, &name)?,
            NodeEdit::SetCustomTitle(title) => self.state_mut().set_custom_title(title),
            edit @ (NodeEdit::SetSql(_) | NodeEdit::SetSqlColumns(_)) => {
                let QueryNode::SqlSource(node) = self else {
                    return Err(NodeError::UnsupportedEdit { kind, edit: edit.name() });
                };
                match edit {
                    NodeEdit::SetSql(sql) => node.set_sql(sql),
                    NodeEdit::SetSqlColumns(columns) => node.set_sql_columns(columns),
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
