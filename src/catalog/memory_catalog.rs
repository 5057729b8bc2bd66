use std::{ffi::OsString, fs, sync::Arc};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::{Catalog, CatalogModule, CatalogTable};

#[derive(Deserialize)]
struct ModuleSpec {
    include_key: String,
    #[serde(default)]
    tables: Vec<CatalogTable>,
}

/// In-memory catalog keyed by include key, tables kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    /// include key -> table name -> table
    modules: IndexMap<String, IndexMap<String, Arc<CatalogTable>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table under its include key. A table with the same name in
    /// the same module is replaced.
    pub fn add_table(&mut self, table: CatalogTable) -> Arc<CatalogTable> {
        let table = Arc::new(table);
        self.modules
            .entry(table.include_key.clone())
            .or_default()
            .insert(table.name.clone(), Arc::clone(&table));
        table
    }

    pub fn table_count(&self) -> usize {
        self.modules.values().map(|m| m.len()).sum()
    }

    /// Build a catalog from a JSON array of modules:
    /// `[{ "include_key": "..", "tables": [{ "name": "..", "columns": [..] }] }]`.
    pub fn from_json(json_value: Value) -> Result<Self, String> {
        let Value::Array(_) = json_value else {
            return Err("catalog JSON must contain an array of modules in the root".to_string());
        };

        let specs: Vec<ModuleSpec> = serde_json::from_value(json_value)
            .map_err(|e| format!("invalid catalog JSON: {e}"))?;

        let mut catalog = Self::new();
        for spec in specs {
            catalog.modules.entry(spec.include_key.clone()).or_default();
            for mut table in spec.tables {
                table.include_key = spec.include_key.clone();
                catalog.add_table(table);
            }
        }
        Ok(catalog)
    }

    pub fn load_from_file(file_path: &OsString) -> Result<Self, String> {
        let file_path_lossy = file_path.to_string_lossy();

        let file_content = fs::read_to_string(file_path)
            .map_err(|_| format!("could not read catalog file {}", file_path_lossy))?;

        let json_value = serde_json::from_str::<Value>(&file_content)
            .map_err(|_| format!("catalog file {} does not contain valid JSON", file_path_lossy))?;

        Self::from_json(json_value)
    }
}

impl Catalog for MemoryCatalog {
    fn list_modules(&self) -> Vec<CatalogModule> {
        self.modules
            .iter()
            .map(|(include_key, tables)| CatalogModule {
                include_key: include_key.clone(),
                tables: tables.values().cloned().collect(),
            })
            .collect()
    }

    fn get_table(&self, name: &str) -> Option<Arc<CatalogTable>> {
        self.modules.values().find_map(|tables| tables.get(name).cloned())
    }
}
