use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogColumn, ColumnType};

/// A named column as seen by one node.
///
/// `source_name` is the column's name in the upstream relation and never
/// changes; `name` is the output name and differs from `source_name` only
/// once the column has been renamed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub source_name: String,
    #[serde(rename = "type", default)]
    pub ty: ColumnType,
    pub selected: bool,
}

impl ColumnInfo {
    pub fn new(name: &str, ty: ColumnType, selected: bool) -> Self {
        Self {
            name: name.to_string(),
            source_name: name.to_string(),
            ty,
            selected,
        }
    }

    /// Column known only by name (e.g. declared by a SQL source).
    pub fn from_name(name: &str) -> Self {
        Self::new(name, ColumnType::Unknown, true)
    }

    pub fn from_catalog_column(column: &CatalogColumn, selected: bool) -> Self {
        Self::new(&column.name, column.ty, selected)
    }

    pub fn is_renamed(&self) -> bool {
        self.name != self.source_name
    }

    /// The output alias, present only for renamed columns.
    pub fn alias(&self) -> Option<&str> {
        self.is_renamed().then_some(self.name.as_str())
    }
}

/// Fresh, independent copies of `columns`. When `selected` is given every
/// copy gets that flag, otherwise the original flags are kept.
pub fn new_column_info_list(columns: &[ColumnInfo], selected: Option<bool>) -> Vec<ColumnInfo> {
    columns
        .iter()
        .map(|c| ColumnInfo {
            name: c.name.clone(),
            source_name: c.source_name.clone(),
            ty: c.ty,
            selected: selected.unwrap_or(c.selected),
        })
        .collect()
}
