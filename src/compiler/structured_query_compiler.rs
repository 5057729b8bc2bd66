use tracing::debug;

use crate::{
    builder::{FiltersBuilder, GroupByBuilder, SelectBuilder},
    ir::StructuredQuery,
    nodes::{NodeGraph, NodeId, QueryNode},
};

pub struct StructuredQueryCompiler;

impl StructuredQueryCompiler {
    /// Compile the chain ending at `id` into one IR document, the upstream
    /// nodes nested as `inner_query`. Declines with `None` when the node is
    /// unknown or any node of the chain is invalid.
    pub fn compile(graph: &NodeGraph, id: NodeId) -> Option<StructuredQuery> {
        let Some(chain) = graph.chain(id) else {
            debug!("compile declined: unknown node {}", id);
            return None;
        };

        let mut upstream: Option<StructuredQuery> = None;
        for node_id in chain {
            let slot = graph.slot(node_id)?;
            let query = Self::compile_node(&slot.node, &slot.query_id, upstream.take());
            if query.is_none() {
                debug!("compile declined: node {} ({}) is not valid", node_id, slot.node.get_title());
            }
            upstream = Some(query?);
        }
        upstream
    }

    /// Compile a single node on top of an already compiled upstream query.
    /// Same state and id always yield the same document.
    pub fn compile_node(node: &QueryNode, query_id: &str, upstream: Option<StructuredQuery>) -> Option<StructuredQuery> {
        if !node.validate() {
            return None;
        }
        let body = node.body()?;

        let lineage = node.state().lineage();
        for warning in &lineage.warnings {
            debug!("{}: {} omitted from the query", query_id, warning);
        }

        let mut query = StructuredQuery::new(query_id, body);
        query.inner_query = upstream.filter(|_| node.accepts_upstream()).map(Box::new);
        query.filters = FiltersBuilder::build(&lineage.filters).unwrap_or_default();
        query.group_by = GroupByBuilder::build(&lineage.group_by, &lineage.aggregations);
        query.select_columns = SelectBuilder::build(&lineage.final_cols).unwrap_or_default();
        Some(query)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        catalog::{CatalogColumn, CatalogTable, ColumnType},
        config::SessionConfig,
        ir::QueryBody,
        lineage::{AggregateOp, Aggregation, Filter, FilterOp},
        nodes::{
            NodeAttrs, NodeEdit, SlicesSourceNode, SqlSourceAttrs, SqlSourceNode, StdlibTableAttrs,
            StdlibTableNode, TableSelection,
        },
    };

    fn slice_table() -> Arc<CatalogTable> {
        Arc::new(CatalogTable::new("slice", "slices.slices", vec![
            CatalogColumn::new("ts", ColumnType::Timestamp),
            CatalogColumn::new("dur", ColumnType::Duration),
            CatalogColumn::new("name", ColumnType::String),
        ]))
    }

    fn sql(text: &str, cols: &[&str]) -> QueryNode {
        QueryNode::from(SqlSourceNode::new(SqlSourceAttrs {
            sql: Some(text.into()),
            sql_columns: cols.iter().map(|c| c.to_string()).collect(),
            node: NodeAttrs::default(),
        }))
    }

    #[test]
    fn test_compile_table_with_group_by() {
        let mut graph = NodeGraph::default();
        let id = graph.add_root(StdlibTableNode::from_selection(TableSelection::from_table(slice_table())).into());
        graph.edit(id, |n| {
            n.apply_edit(NodeEdit::AddFilter(Filter::compare("dur", FilterOp::Gt, 1000)))?;
            n.apply_edit(NodeEdit::SetGroupBy { column: "name".into(), selected: true })?;
            n.apply_edit(NodeEdit::AddAggregation(Aggregation::new("dur", AggregateOp::Sum).with_output_name("total_dur")))
        }).unwrap();

        let query = StructuredQueryCompiler::compile(&graph, id).unwrap();
        assert_eq!(serde_json::to_value(&query).unwrap(), json!({
            "id": "node_1",
            "table": {
                "table_name": "slice",
                "module_name": "slices.slices",
                "column_names": ["ts", "dur", "name"]
            },
            "filters": [
                { "column_name": "dur", "op": "GREATER_THAN", "int64_rhs": [1000] }
            ],
            "group_by": {
                "column_names": ["name"],
                "aggregates": [
                    { "column_name": "dur", "op": "SUM", "result_column_name": "total_dur" }
                ]
            },
            "select_columns": [
                { "column_name": "name" },
                { "column_name": "total_dur" }
            ]
        }));
    }

    #[test]
    fn test_compile_plain_sql_source() {
        let mut graph = NodeGraph::default();
        let id = graph.add_root(sql("select a, b from t", &["a", "b"]));

        let query = StructuredQueryCompiler::compile(&graph, id).unwrap();
        assert_eq!(serde_json::to_value(&query).unwrap(), json!({
            "id": "node_1",
            "sql": {
                "sql": "select a, b from t",
                "column_names": ["a", "b"]
            },
            "select_columns": [
                { "column_name": "a" },
                { "column_name": "b" }
            ]
        }));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let mut graph = NodeGraph::default();
        let id = graph.add_root(SlicesSourceNode::default().into());
        let first = StructuredQueryCompiler::compile(&graph, id).unwrap();
        let second = StructuredQueryCompiler::compile(&graph, id).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
        assert!(matches!(first.body, QueryBody::SimpleSlices(_)));
    }

    #[test]
    fn test_invalid_node_declines() {
        let mut graph = NodeGraph::default();
        let missing = graph.add_root(StdlibTableNode::new(StdlibTableAttrs::default()).into());
        let blank = graph.add_root(sql("  ", &["a"]));
        assert!(StructuredQueryCompiler::compile(&graph, missing).is_none());
        assert!(StructuredQueryCompiler::compile(&graph, blank).is_none());
        assert!(StructuredQueryCompiler::compile(&graph, NodeId(42)).is_none());
    }

    #[test]
    fn test_chain_nests_upstream() {
        let mut graph = NodeGraph::new(&SessionConfig::int("q"));
        let root = graph.add_root(SlicesSourceNode::default().into());
        let child = graph.add_downstream(root, sql("select name, count(*) as n from $upstream", &["name", "n"])).unwrap();

        let query = StructuredQueryCompiler::compile(&graph, child).unwrap();
        assert_eq!(query.id, "q2");
        assert_eq!(query.depth(), 2);
        assert_eq!(query.upstream().map(|q| q.id.as_str()), Some("q1"));
    }

    #[test]
    fn test_invalid_upstream_declines_chain() {
        let mut graph = NodeGraph::default();
        let root = graph.add_root(sql("select a from t", &["a"]));
        let child = graph.add_downstream(root, sql("select a from x", &["a"])).unwrap();
        graph.edit(root, |n| n.apply_edit(NodeEdit::SetSql(String::new()))).unwrap();
        assert!(StructuredQueryCompiler::compile(&graph, child).is_none());
    }

    #[test]
    fn test_dangling_references_are_omitted() {
        let mut graph = NodeGraph::default();
        let id = graph.add_root(sql("select a, b from t", &["a", "b"]));
        graph.edit(id, |n| {
            n.apply_edit(NodeEdit::AddFilter(Filter::compare("b", FilterOp::Eq, "x")))?;
            n.apply_edit(NodeEdit::AddAggregation(Aggregation::new("b", AggregateOp::Count)))?;
            n.apply_edit(NodeEdit::SetSqlColumns(vec!["a".into()]))
        }).unwrap();

        let query = StructuredQueryCompiler::compile(&graph, id).unwrap();
        assert!(query.filters.is_empty());
        assert!(query.group_by.is_none());
        assert_eq!(query.select_columns.len(), 1);
        assert_eq!(graph.get(id).unwrap().reference_warnings().len(), 2);
    }

    #[test]
    fn test_renamed_column_gets_alias() {
        let mut graph = NodeGraph::default();
        let id = graph.add_root(sql("select a from t", &["a"]));
        graph.edit(id, |n| n.apply_edit(NodeEdit::RenameColumn { column: "a".into(), name: "alpha".into() })).unwrap();

        let query = StructuredQueryCompiler::compile(&graph, id).unwrap();
        assert_eq!(query.select_columns[0].column_name, "a");
        assert_eq!(query.select_columns[0].output_name(), "alpha");
    }
}
