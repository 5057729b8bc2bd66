use crate::{
    ir::{QueryBody, SqlBody},
    lineage::ColumnInfo,
    nodes::{carry_over_columns, NodeAttrs, NodeState},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlSourceAttrs {
    pub sql: Option<String>,
    /// Columns the SQL text is declared to produce.
    pub sql_columns: Vec<String>,
    pub node: NodeAttrs,
}

/// Arbitrary SQL text with declared output columns. The only node kind that
/// may sit below another node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlSourceNode {
    sql: Option<String>,
    sql_columns: Vec<String>,
    state: NodeState,
}

/// Trimmed, non-blank names, each kept at its first occurrence.
fn unique_column_names(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

fn columns_from_names(names: &[String]) -> Vec<ColumnInfo> {
    names.iter().map(|n| ColumnInfo::from_name(n)).collect()
}

impl SqlSourceNode {
    /// Source columns are derived from `sql_columns`.
    pub fn new(mut attrs: SqlSourceAttrs) -> Self {
        attrs.sql_columns = unique_column_names(attrs.sql_columns);
        attrs.node.source_cols = carry_over_columns(columns_from_names(&attrs.sql_columns), &attrs.node.source_cols);
        attrs.node.offer_group_by_candidates();
        Self {
            sql: attrs.sql,
            sql_columns: attrs.sql_columns,
            state: NodeState::new(attrs.node),
        }
    }

    pub fn sql(&self) -> Option<&str> { self.sql.as_deref() }
    pub fn sql_columns(&self) -> &[String] { &self.sql_columns }

    pub fn state(&self) -> &NodeState { &self.state }
    pub fn state_mut(&mut self) -> &mut NodeState { &mut self.state }

    pub fn set_sql(&mut self, sql: String) {
        self.sql = Some(sql);
    }

    pub fn set_sql_columns(&mut self, sql_columns: Vec<String>) {
        let sql_columns = unique_column_names(sql_columns);
        let source_cols = carry_over_columns(columns_from_names(&sql_columns), self.state.source_cols());
        self.sql_columns = sql_columns;
        self.state.set_source_cols(source_cols);
    }

    pub fn validate(&self) -> bool {
        self.sql.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    pub fn title(&self) -> String {
        self.state.custom_title().unwrap_or("Sql source").to_string()
    }

    pub fn state_copy(&self) -> SqlSourceAttrs {
        SqlSourceAttrs {
            sql: self.sql.clone(),
            sql_columns: self.sql_columns.to_vec(),
            node: self.state.state_copy(),
        }
    }

    pub fn body(&self) -> Option<QueryBody> {
        let sql = self.sql.as_deref().filter(|s| !s.trim().is_empty())?;
        Some(QueryBody::Sql(SqlBody {
            sql: sql.trim().to_string(),
            column_names: self.sql_columns.to_vec(),
        }))
    }
}
