use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::ColumnType;

/// A column as declared by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogColumn {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CatalogColumn {
    pub fn new(name: &str, ty: ColumnType) -> Self {
        Self { name: name.to_string(), ty, description: None }
    }
}

/// A standard-library table definition. Shared immutably between nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTable {
    pub name: String,
    /// Key of the module that must be included before the table can be used.
    #[serde(default)]
    pub include_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub columns: Vec<CatalogColumn>,
}

impl CatalogTable {
    pub fn new(name: &str, include_key: &str, columns: Vec<CatalogColumn>) -> Self {
        Self {
            name: name.to_string(),
            include_key: include_key.to_string(),
            description: None,
            columns,
        }
    }

    pub fn column(&self, name: &str) -> Option<&CatalogColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// A module groups tables under one include key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogModule {
    pub include_key: String,
    pub tables: Vec<Arc<CatalogTable>>,
}
