use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    lineage::{new_column_info_list, Aggregation, ColumnInfo, Filter, Lineage, ReferenceWarning},
    nodes::NodeError,
};

/// The mutable, caller-supplied part of a node's state. This is what gets
/// copied when a node is duplicated; derived columns are never part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAttrs {
    pub source_cols: Vec<ColumnInfo>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Group-by candidates; the selected ones are the active keys.
    #[serde(default)]
    pub group_by_columns: Vec<ColumnInfo>,
    #[serde(default)]
    pub aggregations: Vec<Aggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
}

impl NodeAttrs {
    /// Every source column is offered as an unselected group-by candidate.
    pub fn with_source_cols(source_cols: Vec<ColumnInfo>) -> Self {
        let group_by_columns = new_column_info_list(&source_cols, Some(false));
        Self {
            source_cols,
            group_by_columns,
            ..Self::default()
        }
    }

    /// Offer every source column as a group-by candidate, unless candidates
    /// were already given.
    pub fn offer_group_by_candidates(&mut self) {
        if self.group_by_columns.is_empty() {
            self.group_by_columns = new_column_info_list(&self.source_cols, Some(false));
        }
    }
}

/// Shared state embedded in every node variant. `final_cols` (through the
/// lineage) is recomputed after every change and cannot be set directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeState {
    attrs: NodeAttrs,
    lineage: Lineage,
}

impl NodeState {
    pub fn new(attrs: NodeAttrs) -> Self {
        let lineage = Self::compute_lineage(&attrs);
        Self { attrs, lineage }
    }

    fn compute_lineage(attrs: &NodeAttrs) -> Lineage {
        Lineage::compute(&attrs.source_cols, &attrs.filters, &attrs.group_by_columns, &attrs.aggregations)
    }

    fn refresh(&mut self) {
        self.lineage = Self::compute_lineage(&self.attrs);
    }

    /// Deep copy of the mutable state with freshly allocated lists.
    pub fn state_copy(&self) -> NodeAttrs {
        NodeAttrs {
            source_cols: new_column_info_list(&self.attrs.source_cols, None),
            filters: self.attrs.filters.to_vec(),
            group_by_columns: new_column_info_list(&self.attrs.group_by_columns, None),
            aggregations: self.attrs.aggregations.to_vec(),
            custom_title: self.attrs.custom_title.clone(),
        }
    }

    pub fn attrs(&self) -> &NodeAttrs { &self.attrs }
    pub fn lineage(&self) -> &Lineage { &self.lineage }
    pub fn source_cols(&self) -> &[ColumnInfo] { &self.attrs.source_cols }
    pub fn final_cols(&self) -> &[ColumnInfo] { &self.lineage.final_cols }
    pub fn filters(&self) -> &[Filter] { &self.attrs.filters }
    pub fn group_by_columns(&self) -> &[ColumnInfo] { &self.attrs.group_by_columns }
    pub fn aggregations(&self) -> &[Aggregation] { &self.attrs.aggregations }
    pub fn custom_title(&self) -> Option<&str> { self.attrs.custom_title.as_deref() }
    pub fn reference_warnings(&self) -> &[ReferenceWarning] { &self.lineage.warnings }

    pub fn set_source_cols(&mut self, source_cols: Vec<ColumnInfo>) {
        self.attrs.source_cols = source_cols;
        self.refresh();
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.attrs.filters.push(filter);
        self.refresh();
    }

    pub fn remove_filter(&mut self, index: usize) -> Result<Filter, NodeError> {
        let len = self.attrs.filters.len();
        if index >= len {
            return Err(NodeError::IndexOutOfRange { what: "filter", index, len });
        }
        let removed = self.attrs.filters.remove(index);
        self.refresh();
        Ok(removed)
    }

    pub fn set_filters(&mut self, filters: Vec<Filter>) {
        self.attrs.filters = filters;
        self.refresh();
    }

    /// Turn a column into an active group-by key, or back into a candidate.
    /// Source columns missing from the candidate list are added to it.
    pub fn set_group_by(&mut self, column: &str, selected: bool) -> Result<(), NodeError> {
        match self.attrs.group_by_columns.iter_mut().find(|c| c.source_name == column) {
            Some(entry) => entry.selected = selected,
            None => {
                let source = self.attrs.source_cols.iter()
                    .find(|c| c.source_name == column)
                    .ok_or_else(|| NodeError::UnknownColumn(column.to_string()))?;
                let mut entry = source.clone();
                entry.selected = selected;
                self.attrs.group_by_columns.push(entry);
            }
        }
        self.refresh();
        Ok(())
    }

    pub fn set_group_by_columns(&mut self, group_by_columns: Vec<ColumnInfo>) {
        self.attrs.group_by_columns = group_by_columns;
        self.refresh();
    }

    pub fn add_aggregation(&mut self, aggregation: Aggregation) {
        self.attrs.aggregations.push(aggregation);
        self.refresh();
    }

    pub fn remove_aggregation(&mut self, index: usize) -> Result<Aggregation, NodeError> {
        let len = self.attrs.aggregations.len();
        if index >= len {
            return Err(NodeError::IndexOutOfRange { what: "aggregation", index, len });
        }
        let removed = self.attrs.aggregations.remove(index);
        self.refresh();
        Ok(removed)
    }

    pub fn set_aggregations(&mut self, aggregations: Vec<Aggregation>) {
        self.attrs.aggregations = aggregations;
        self.refresh();
    }

    pub fn set_column_selected(&mut self, column: &str, selected: bool) -> Result<(), NodeError> {
        let entry = self.source_col_mut(column)?;
        entry.selected = selected;
        self.refresh();
        Ok(())
    }

    /// Give a source column a new output name. A blank name restores the
    /// upstream name. Output names stay unique within the node.
    pub fn rename_column(&mut self, column: &str, name: &str) -> Result<(), NodeError> {
        let name = name.trim();
        let name = if name.is_empty() { column } else { name };
        let taken = self.attrs.source_cols.iter()
            .any(|c| c.source_name != column && c.name == name);
        if taken {
            return Err(NodeError::DuplicateColumn(name.to_string()));
        }

        let entry = self.source_col_mut(column)?;
        entry.name = name.to_string();
        self.refresh();
        Ok(())
    }

    pub fn set_custom_title(&mut self, title: Option<String>) {
        self.attrs.custom_title = title.filter(|t| !t.trim().is_empty());
    }

    fn source_col_mut(&mut self, column: &str) -> Result<&mut ColumnInfo, NodeError> {
        self.attrs.source_cols.iter_mut()
            .find(|c| c.source_name == column)
            .ok_or_else(|| NodeError::UnknownColumn(column.to_string()))
    }
}

/// Rebuild `base` keeping the name and selection of any column `previous`
/// already knew under the same upstream name. Repeated upstream names keep
/// their first occurrence, and a rename that would shadow another column's
/// upstream name is dropped.
pub fn carry_over_columns(base: Vec<ColumnInfo>, previous: &[ColumnInfo]) -> Vec<ColumnInfo> {
    let mut seen = HashSet::new();
    let base: Vec<ColumnInfo> = base.into_iter()
        .filter(|col| seen.insert(col.source_name.clone()))
        .collect();

    base.iter()
        .map(|col| {
            let mut col = col.clone();
            if let Some(old) = previous.iter().find(|p| p.source_name == col.source_name) {
                col.selected = old.selected;
                if old.name == col.source_name || !seen.contains(&old.name) {
                    col.name = old.name.clone();
                }
            }
            col
        })
        .collect()
}
