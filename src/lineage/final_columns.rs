use std::collections::HashSet;

use crate::{
    catalog::ColumnType,
    lineage::{AggregateOp, Aggregation, ColumnInfo, Filter, ReferenceWarning},
};

/// An aggregation whose column resolved, with its final output name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedAggregation {
    /// Upstream name of the aggregated column.
    pub column: String,
    pub op: AggregateOp,
    pub output_name: String,
    pub ty: ColumnType,
}

impl NamedAggregation {
    pub fn as_column(&self) -> ColumnInfo {
        ColumnInfo::new(&self.output_name, self.ty, true)
    }
}

/// Everything derived from a node's source columns and operations: which
/// filters, group-by keys and aggregations survive reference resolution, and
/// the final projected columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lineage {
    pub filters: Vec<Filter>,
    /// Active group-by keys, in the order given, as source columns.
    pub group_by: Vec<ColumnInfo>,
    pub aggregations: Vec<NamedAggregation>,
    pub final_cols: Vec<ColumnInfo>,
    pub warnings: Vec<ReferenceWarning>,
}

impl Lineage {
    /// Resolve every operation against `source_cols` and derive the final
    /// columns.
    ///
    /// Without active group-by keys the final columns are the selected source
    /// columns followed by one column per aggregation. With group-by keys they
    /// are the keys followed by the aggregations; other source columns are
    /// dropped. References to unknown columns become warnings and are skipped.
    ///
    /// Aggregation output names are made unique against the columns that
    /// precede them in `final_cols` only. A source column dropped by the
    /// group-by may share a name with an aggregation, since it is no longer
    /// part of the output.
    pub fn compute(
        source_cols: &[ColumnInfo],
        filters: &[Filter],
        group_by_columns: &[ColumnInfo],
        aggregations: &[Aggregation],
    ) -> Lineage {
        let find = |name: &str| source_cols.iter().find(|c| c.source_name == name);
        let mut warnings = Vec::new();

        let mut resolved_filters = Vec::new();
        for filter in filters {
            if find(&filter.column).is_none() {
                warnings.push(ReferenceWarning::UnknownFilterColumn(filter.column.clone()));
            } else if !filter.is_complete() {
                warnings.push(ReferenceWarning::IncompleteFilter { column: filter.column.clone(), op: filter.op });
            } else {
                resolved_filters.push(filter.clone());
            }
        }

        let mut group_by: Vec<ColumnInfo> = Vec::new();
        for entry in group_by_columns.iter().filter(|c| c.selected) {
            match find(&entry.source_name) {
                Some(source) => {
                    if group_by.iter().all(|g| g.source_name != source.source_name) {
                        let mut key = source.clone();
                        key.selected = true;
                        group_by.push(key);
                    }
                }
                None => warnings.push(ReferenceWarning::UnknownGroupByColumn(entry.source_name.clone())),
            }
        }

        let leading: Vec<ColumnInfo> = if group_by.is_empty() {
            source_cols.iter().filter(|c| c.selected).cloned().collect()
        } else {
            group_by.clone()
        };

        // Aggregate names must not clash with columns already in the projection.
        let mut used: HashSet<String> = leading.iter().map(|c| c.name.clone()).collect();
        let mut named = Vec::new();
        for agg in aggregations {
            let Some(source) = find(&agg.column) else {
                warnings.push(ReferenceWarning::UnknownAggregationColumn(agg.column.clone()));
                continue;
            };

            let base = agg.requested_output_name();
            let mut name = base.clone();
            let mut k = 1usize;
            while used.contains(&name) {
                name = format!("{}_{}", base, k);
                k += 1;
            }
            used.insert(name.clone());

            named.push(NamedAggregation {
                column: source.source_name.clone(),
                op: agg.op,
                output_name: name,
                ty: agg.op.result_type(source.ty),
            });
        }

        let mut final_cols = leading;
        final_cols.extend(named.iter().map(NamedAggregation::as_column));

        Lineage {
            filters: resolved_filters,
            group_by,
            aggregations: named,
            final_cols,
            warnings,
        }
    }

    pub fn has_group_by(&self) -> bool {
        !self.group_by.is_empty()
    }

    pub fn final_column_names(&self) -> Vec<&str> {
        self.final_cols.iter().map(|c| c.name.as_str()).collect()
    }
}
