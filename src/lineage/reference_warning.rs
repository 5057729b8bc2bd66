use std::fmt::Display;

use crate::lineage::FilterOp;

/// A filter, group-by entry or aggregation that cannot be honoured. These
/// never make a node invalid; the offending entry is left out of the lineage
/// and of the compiled query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceWarning {
    UnknownFilterColumn(String),
    IncompleteFilter { column: String, op: FilterOp },
    UnknownGroupByColumn(String),
    UnknownAggregationColumn(String),
}

impl ReferenceWarning {
    pub fn column(&self) -> &str {
        match self {
            ReferenceWarning::UnknownFilterColumn(column)
            | ReferenceWarning::UnknownGroupByColumn(column)
            | ReferenceWarning::UnknownAggregationColumn(column) => column,
            ReferenceWarning::IncompleteFilter { column, .. } => column,
        }
    }
}

impl Display for ReferenceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceWarning::UnknownFilterColumn(c) => write!(f, "filter references unknown column '{c}'"),
            ReferenceWarning::IncompleteFilter { column, op } => write!(f, "filter '{column} {op}' is missing its value"),
            ReferenceWarning::UnknownGroupByColumn(c) => write!(f, "group by references unknown column '{c}'"),
            ReferenceWarning::UnknownAggregationColumn(c) => write!(f, "aggregation references unknown column '{c}'"),
        }
    }
}
