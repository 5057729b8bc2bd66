use crate::lineage::{Aggregation, ColumnInfo, Filter};

/// A single change to a node's state. Applying an edit bumps the node's
/// generation, so results requested before it are discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeEdit {
    AddFilter(Filter),
    RemoveFilter(usize),
    SetFilters(Vec<Filter>),
    SetGroupBy { column: String, selected: bool },
    SetGroupByColumns(Vec<ColumnInfo>),
    AddAggregation(Aggregation),
    RemoveAggregation(usize),
    SetAggregations(Vec<Aggregation>),
    SetColumnSelected { column: String, selected: bool },
    RenameColumn { column: String, name: String },
    SetCustomTitle(Option<String>),
    /// SQL source only.
    SetSql(String),
    /// SQL source only.
    SetSqlColumns(Vec<String>),
}

impl NodeEdit {
    pub fn name(&self) -> &'static str {
        match self {
            NodeEdit::AddFilter(_) => "AddFilter",
            NodeEdit::RemoveFilter(_) => "RemoveFilter",
            NodeEdit::SetFilters(_) => "SetFilters",
            NodeEdit::SetGroupBy { .. } => "SetGroupBy",
            NodeEdit::SetGroupByColumns(_) => "SetGroupByColumns",
            NodeEdit::AddAggregation(_) => "AddAggregation",
            NodeEdit::RemoveAggregation(_) => "RemoveAggregation",
            NodeEdit::SetAggregations(_) => "SetAggregations",
            NodeEdit::SetColumnSelected { .. } => "SetColumnSelected",
            NodeEdit::RenameColumn { .. } => "RenameColumn",
            NodeEdit::SetCustomTitle(_) => "SetCustomTitle",
            NodeEdit::SetSql(_) => "SetSql",
            NodeEdit::SetSqlColumns(_) => "SetSqlColumns",
        }
    }
}
