use crate::{
    ir::{AggregateExpr, GroupByClause},
    lineage::{ColumnInfo, NamedAggregation},
};

pub struct GroupByBuilder;

impl GroupByBuilder {
    /// Build the group-by clause from resolved keys and named aggregations.
    ///
    /// Emitted when there is at least one key or one aggregation; aggregations
    /// without keys describe a whole-result aggregate.
    pub fn build(group_by: &[ColumnInfo], aggregations: &[NamedAggregation]) -> Option<GroupByClause> {
        if group_by.is_empty() && aggregations.is_empty() {
            return None;
        }

        Some(GroupByClause {
            column_names: group_by.iter().map(|c| c.source_name.clone()).collect(),
            aggregates: aggregations
                .iter()
                .map(|a| AggregateExpr {
                    column_name: a.column.clone(),
                    op: a.op,
                    result_column_name: a.output_name.clone(),
                })
                .collect(),
        })
    }
}
