use async_trait::async_trait;

use crate::{catalog::CatalogModule, nodes::TableSelection};

/// Prompts the user for a standard-library table.
#[async_trait]
pub trait TablePicker: Send + Sync {
    /// `None` when the user cancels.
    async fn pick_table(&self, modules: Vec<CatalogModule>) -> Option<TableSelection>;
}
