pub mod column_type;
pub use column_type::*;

pub mod catalog_table;
pub use catalog_table::*;

pub mod memory_catalog;
pub use memory_catalog::*;

use std::sync::Arc;

/// Read-only view over the available standard-library modules and tables.
pub trait Catalog {
    /// All modules in a stable order.
    fn list_modules(&self) -> Vec<CatalogModule>;

    /// Look a table up by its name, if known.
    fn get_table(&self, name: &str) -> Option<Arc<CatalogTable>>;
}
