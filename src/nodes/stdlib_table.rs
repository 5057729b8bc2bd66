use std::sync::Arc;

use crate::{
    catalog::CatalogTable,
    ir::{QueryBody, TableBody},
    lineage::ColumnInfo,
    nodes::{NodeAttrs, NodeError, NodeState},
};

/// What the table picker hands back: a catalog table and the columns the
/// user started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSelection {
    pub table: Arc<CatalogTable>,
    pub source_cols: Vec<ColumnInfo>,
}

impl TableSelection {
    /// Every column of the table, selected.
    pub fn from_table(table: Arc<CatalogTable>) -> Self {
        let source_cols = table.columns.iter()
            .map(|c| ColumnInfo::from_catalog_column(c, true))
            .collect();
        Self { table, source_cols }
    }

    /// Only the named columns, in the given order.
    pub fn with_columns(table: Arc<CatalogTable>, columns: &[&str]) -> Result<Self, NodeError> {
        let source_cols = columns.iter()
            .map(|name| table.column(name)
                .map(|c| ColumnInfo::from_catalog_column(c, true))
                .ok_or_else(|| NodeError::UnknownColumn(name.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { table, source_cols })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StdlibTableAttrs {
    pub table: Option<Arc<CatalogTable>>,
    pub node: NodeAttrs,
}

/// Reads a table from the standard-library catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdlibTableNode {
    table: Option<Arc<CatalogTable>>,
    state: NodeState,
}

impl StdlibTableNode {
    pub fn new(attrs: StdlibTableAttrs) -> Self {
        Self {
            table: attrs.table,
            state: NodeState::new(attrs.node),
        }
    }

    pub fn from_selection(selection: TableSelection) -> Self {
        Self::new(StdlibTableAttrs {
            table: Some(selection.table),
            node: NodeAttrs::with_source_cols(selection.source_cols),
        })
    }

    pub fn table(&self) -> Option<&Arc<CatalogTable>> {
        self.table.as_ref()
    }

    pub fn state(&self) -> &NodeState { &self.state }
    pub fn state_mut(&mut self) -> &mut NodeState { &mut self.state }

    pub fn validate(&self) -> bool {
        self.table.is_some()
    }

    pub fn title(&self) -> String {
        match (self.state.custom_title(), &self.table) {
            (Some(title), _) => title.to_string(),
            (None, Some(table)) => table.name.clone(),
            (None, None) => "Table".to_string(),
        }
    }

    pub fn state_copy(&self) -> StdlibTableAttrs {
        StdlibTableAttrs {
            table: self.table.clone(),
            node: self.state.state_copy(),
        }
    }

    pub fn body(&self) -> Option<QueryBody> {
        let table = self.table.as_ref()?;
        Some(QueryBody::Table(TableBody {
            table_name: table.name.clone(),
            module_name: table.include_key.clone(),
            column_names: self.state.source_cols().iter().map(|c| c.source_name.clone()).collect(),
        }))
    }
}
