use serde::{Deserialize, Serialize};

use crate::catalog::ColumnType;

/// Aggregate function. Serialized with the names the execution engine expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateOp {
    #[serde(rename = "COUNT")]
    Count,
    #[serde(rename = "SUM")]
    Sum,
    #[serde(rename = "MIN")]
    Min,
    #[serde(rename = "MAX")]
    Max,
    #[serde(rename = "MEAN")]
    Avg,
}

impl AggregateOp {
    /// Canonical lowercase function name ("count", "sum", ...).
    pub fn function_name(self) -> &'static str {
        match self {
            AggregateOp::Count => "count",
            AggregateOp::Sum => "sum",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
            AggregateOp::Avg => "avg",
        }
    }

    /// Type of the aggregated column given the input column type.
    pub fn result_type(self, input: ColumnType) -> ColumnType {
        match self {
            AggregateOp::Count => ColumnType::Int,
            AggregateOp::Avg => ColumnType::Double,
            AggregateOp::Sum => match input {
                ColumnType::Double => ColumnType::Double,
                ColumnType::Unknown => ColumnType::Unknown,
                t if t.is_numeric() => t,
                _ => ColumnType::Int,
            },
            AggregateOp::Min | AggregateOp::Max => input,
        }
    }
}

/// One aggregate computed over a node's groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aggregation {
    /// Upstream name of the aggregated column.
    pub column: String,
    pub op: AggregateOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
}

impl Aggregation {
    pub fn new(column: &str, op: AggregateOp) -> Self {
        Self { column: column.to_string(), op, output_name: None }
    }

    pub fn with_output_name(mut self, output_name: &str) -> Self {
        self.output_name = Some(output_name.to_string());
        self
    }

    /// `<function>_<column>`, used when no output name was given.
    pub fn default_output_name(&self) -> String {
        format!("{}_{}", self.op.function_name(), self.column)
    }

    /// Requested output name: the explicit one unless blank, else the default.
    pub fn requested_output_name(&self) -> String {
        match &self.output_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => self.default_output_name(),
        }
    }
}
