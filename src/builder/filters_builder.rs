use crate::{
    ir::FilterExpr,
    lineage::{Filter, FilterValue},
};

pub struct FiltersBuilder;

impl FiltersBuilder {
    /// Map filters to IR filter expressions, in order. Incomplete filters are
    /// skipped. `None` when nothing is left.
    pub fn build(filters: &[Filter]) -> Option<Vec<FilterExpr>> {
        let exprs: Vec<FilterExpr> = filters.iter().filter_map(Self::build_one).collect();
        if exprs.is_empty() {
            return None;
        }
        Some(exprs)
    }

    fn build_one(filter: &Filter) -> Option<FilterExpr> {
        if !filter.is_complete() {
            return None;
        }

        let mut expr = FilterExpr {
            column_name: filter.column.clone(),
            op: filter.op,
            string_rhs: Vec::new(),
            int64_rhs: Vec::new(),
            double_rhs: Vec::new(),
        };

        if !filter.op.is_unary() {
            match &filter.value {
                Some(FilterValue::String(s)) => expr.string_rhs.push(s.clone()),
                Some(FilterValue::Int(i)) => expr.int64_rhs.push(*i),
                Some(FilterValue::Double(d)) => expr.double_rhs.push(d.into_inner()),
                None => return None,
            }
        }
        Some(expr)
    }
}
