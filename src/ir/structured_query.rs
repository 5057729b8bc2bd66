use serde::Serialize;

use crate::lineage::{AggregateOp, FilterOp};

/// Structured query handed to the execution engine. Each node of a pipeline
/// compiles to one of these; a downstream node nests its upstream's query in
/// `inner_query`.
///
/// Empty clauses are omitted from the serialized form. Field order is fixed,
/// so equal queries always serialize to identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredQuery {
    /// Stable identifier of the node that produced this query.
    pub id: String,

    #[serde(flatten)]
    pub body: QueryBody,

    /// Upstream node's query, for nodes that consume another node's output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_query: Option<Box<StructuredQuery>>,

    /// Row filters, combined with AND.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterExpr>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<GroupByClause>,

    /// Projection in output order. Absent means every column.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub select_columns: Vec<SelectColumn>,
}

/// Where a query's rows come from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryBody {
    /// Standard-library table.
    Table(TableBody),
    /// Built-in slices table.
    SimpleSlices(SimpleSlicesBody),
    /// Free-form SQL.
    Sql(SqlBody),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableBody {
    pub table_name: String,
    /// Include key of the module that defines the table.
    pub module_name: String,
    pub column_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleSlicesBody {
    pub table_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlBody {
    pub sql: String,
    pub column_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterExpr {
    pub column_name: String,
    pub op: FilterOp,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub string_rhs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub int64_rhs: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub double_rhs: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupByClause {
    /// Grouping keys; empty for a whole-result aggregate.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub column_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aggregates: Vec<AggregateExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateExpr {
    pub column_name: String,
    pub op: AggregateOp,
    pub result_column_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectColumn {
    pub column_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl SelectColumn {
    /// Name the column has after projection.
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.column_name)
    }
}

impl StructuredQuery {
    pub fn new(id: &str, body: QueryBody) -> Self {
        Self {
            id: id.to_string(),
            body,
            inner_query: None,
            filters: Vec::new(),
            group_by: None,
            select_columns: Vec::new(),
        }
    }

    pub fn upstream(&self) -> Option<&StructuredQuery> {
        self.inner_query.as_deref()
    }

    /// Number of queries in this document, this one included.
    pub fn depth(&self) -> usize {
        1 + self.upstream().map_or(0, StructuredQuery::depth)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
