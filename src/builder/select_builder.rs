use crate::{ir::SelectColumn, lineage::ColumnInfo};

pub struct SelectBuilder;

impl SelectBuilder {
    /// Project `final_cols` in order; renamed columns carry an alias.
    pub fn build(final_cols: &[ColumnInfo]) -> Option<Vec<SelectColumn>> {
        if final_cols.is_empty() {
            return None;
        }
        Some(
            final_cols
                .iter()
                .map(|c| SelectColumn {
                    column_name: c.source_name.clone(),
                    alias: c.alias().map(str::to_string),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_alias() {
        let mut b = ColumnInfo::from_name("b");
        b.name = "bee".into();
        let cols = vec![ColumnInfo::from_name("a"), b];

        let select = SelectBuilder::build(&cols).unwrap();
        assert_eq!(select[0], SelectColumn { column_name: "a".into(), alias: None });
        assert_eq!(select[1], SelectColumn { column_name: "b".into(), alias: Some("bee".into()) });
    }

    #[test]
    fn test_empty_projection() {
        assert!(SelectBuilder::build(&[]).is_none());
    }
}
