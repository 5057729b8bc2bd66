use once_cell::sync::Lazy;

use crate::{
    catalog::{CatalogColumn, ColumnType},
    ir::{QueryBody, SimpleSlicesBody},
    lineage::ColumnInfo,
    nodes::{carry_over_columns, NodeAttrs, NodeState},
};

pub const SLICES_TABLE_NAME: &str = "thread_or_process_slice";

static SLICES_COLUMNS: Lazy<Vec<CatalogColumn>> = Lazy::new(|| vec![
    CatalogColumn::new("id", ColumnType::Id),
    CatalogColumn::new("ts", ColumnType::Timestamp),
    CatalogColumn::new("dur", ColumnType::Duration),
    CatalogColumn::new("slice_name", ColumnType::String),
    CatalogColumn::new("thread_name", ColumnType::String),
    CatalogColumn::new("process_name", ColumnType::String),
    CatalogColumn::new("track_name", ColumnType::String),
]);

/// The built-in slice schema as column descriptors.
pub fn slices_source_node_columns(selected: bool) -> Vec<ColumnInfo> {
    SLICES_COLUMNS.iter()
        .map(|c| ColumnInfo::from_catalog_column(c, selected))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlicesSourceAttrs {
    pub node: NodeAttrs,
}

/// Reads every slice in the trace through a fixed schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicesSourceNode {
    state: NodeState,
}

impl Default for SlicesSourceNode {
    fn default() -> Self {
        Self::new(SlicesSourceAttrs {
            node: NodeAttrs::with_source_cols(slices_source_node_columns(true)),
        })
    }
}

impl SlicesSourceNode {
    /// The source columns always follow the built-in schema. Renames and
    /// selection flags supplied in `attrs` are kept.
    pub fn new(mut attrs: SlicesSourceAttrs) -> Self {
        attrs.node.source_cols = carry_over_columns(slices_source_node_columns(true), &attrs.node.source_cols);
        attrs.node.offer_group_by_candidates();
        Self { state: NodeState::new(attrs.node) }
    }

    pub fn state(&self) -> &NodeState { &self.state }
    pub fn state_mut(&mut self) -> &mut NodeState { &mut self.state }

    pub fn validate(&self) -> bool {
        true
    }

    pub fn title(&self) -> String {
        self.state.custom_title().unwrap_or("Simple slices").to_string()
    }

    pub fn state_copy(&self) -> SlicesSourceAttrs {
        SlicesSourceAttrs { node: self.state.state_copy() }
    }

    pub fn body(&self) -> QueryBody {
        QueryBody::SimpleSlices(SimpleSlicesBody { table_name: SLICES_TABLE_NAME.to_string() })
    }
}
