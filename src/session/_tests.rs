#[cfg(test)]
pub mod fixtures {
    use std::{sync::Mutex, time::Duration};

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use crate::{
        catalog::{CatalogColumn, CatalogModule, CatalogTable, ColumnType, MemoryCatalog},
        ir::StructuredQuery,
        nodes::TableSelection,
        session::{ExecutionEngine, ExecutionError, QueryResult, TablePicker},
    };

    pub fn catalog() -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new();
        catalog.add_table(CatalogTable::new("slice", "slices.slices", vec![
            CatalogColumn::new("ts", ColumnType::Timestamp),
            CatalogColumn::new("dur", ColumnType::Duration),
            CatalogColumn::new("name", ColumnType::String),
        ]));
        catalog.add_table(CatalogTable::new("thread", "prelude", vec![
            CatalogColumn::new("utid", ColumnType::Id),
            CatalogColumn::new("tid", ColumnType::Int),
            CatalogColumn::new("name", ColumnType::String),
        ]));
        catalog
    }

    /// Answers every query with one row per output column, recording what it
    /// was asked to run.
    #[derive(Default)]
    pub struct RecordingEngine {
        pub queries: Mutex<Vec<StructuredQuery>>,
    }

    impl RecordingEngine {
        pub fn seen(&self) -> usize {
            self.queries.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ExecutionEngine for RecordingEngine {
        async fn execute(&self, query: &StructuredQuery) -> Result<QueryResult, ExecutionError> {
            self.queries.lock().unwrap().push(query.clone());
            let columns: Vec<String> = query.select_columns.iter().map(|c| c.output_name().to_string()).collect();
            let row: Vec<Value> = columns.iter().map(|c| json!(c)).collect();
            Ok(QueryResult::new(columns, vec![row]))
        }
    }

    pub struct FailingEngine;

    #[async_trait]
    impl ExecutionEngine for FailingEngine {
        async fn execute(&self, _query: &StructuredQuery) -> Result<QueryResult, ExecutionError> {
            Err(ExecutionError::engine("no such table: slice"))
        }
    }

    pub struct SlowEngine(pub Duration);

    #[async_trait]
    impl ExecutionEngine for SlowEngine {
        async fn execute(&self, _query: &StructuredQuery) -> Result<QueryResult, ExecutionError> {
            tokio::time::sleep(self.0).await;
            Ok(QueryResult::default())
        }
    }

    /// Picks a table by name, or cancels when given `None`.
    pub struct NamedPicker(pub Option<&'static str>);

    #[async_trait]
    impl TablePicker for NamedPicker {
        async fn pick_table(&self, modules: Vec<CatalogModule>) -> Option<TableSelection> {
            let name = self.0?;
            modules.into_iter()
                .flat_map(|m| m.tables)
                .find(|t| t.name == name)
                .map(TableSelection::from_table)
        }
    }

    mod tests {
        use std::time::Duration;

        use super::*;
        use crate::{
            config::SessionConfig,
            lineage::{AggregateOp, Aggregation, Filter, FilterOp},
            nodes::{NodeEdit, NodeError, NodeId, QueryNode, SqlSourceAttrs, SqlSourceNode},
            session::{
                ApplyOutcome, CommandOutcome, ExecutionErrorKind, ExploreMode, NodeResult, Session,
                SessionCommand,
            },
        };

        fn edit(session: &mut Session, node: NodeId, edit: NodeEdit) {
            session.apply(SessionCommand::Edit { node, edit }).unwrap();
        }

        fn sql_node(sql: &str, cols: &[&str]) -> QueryNode {
            SqlSourceNode::new(SqlSourceAttrs {
                sql: Some(sql.into()),
                sql_columns: cols.iter().map(|c| c.to_string()).collect(),
                ..SqlSourceAttrs::default()
            }).into()
        }

        fn final_names(session: &Session, id: NodeId) -> Vec<String> {
            session.node(id).unwrap().final_cols().iter().map(|c| c.name.clone()).collect()
        }

        #[test]
        fn adding_a_node_selects_it() {
            let mut session = Session::default();
            let a = session.add_slices_source();
            let b = session.add_sql_source();
            assert_eq!(session.selected(), Some(b));

            assert_eq!(session.apply(SessionCommand::Select(a)), Ok(CommandOutcome::Selected(Some(a))));
            assert_eq!(session.selected_node().map(|n| n.get_title()), Some("Simple slices".to_string()));

            session.apply(SessionCommand::Deselect).unwrap();
            assert_eq!(session.selected(), None);
            assert_eq!(session.apply(SessionCommand::Select(NodeId(77))), Err(NodeError::UnknownNode(NodeId(77))));
        }

        #[test]
        fn table_click_to_add() {
            let mut session = Session::default();
            let id = session.add_table_by_name(&catalog(), "slice").unwrap();

            let node = session.node(id).unwrap();
            assert!(node.validate());
            assert_eq!(node.get_title(), "slice");
            assert_eq!(final_names(&session, id), vec!["ts", "dur", "name"]);
            assert!(node.state().group_by_columns().iter().all(|c| !c.selected));

            assert_eq!(
                session.add_table_by_name(&catalog(), "nope"),
                Err(NodeError::UnknownTable("nope".into()))
            );
        }

        #[tokio::test]
        async fn cancelled_table_picker_changes_nothing() {
            let mut session = Session::default();
            let existing = session.add_slices_source();

            let added = session.add_stdlib_table_source_with(&NamedPicker(None), &catalog()).await;
            assert_eq!(added, None);
            assert_eq!(session.graph().all_nodes(), vec![existing]);
            assert_eq!(session.selected(), Some(existing));

            let added = session.add_stdlib_table_source_with(&NamedPicker(Some("thread")), &catalog()).await;
            let id = added.unwrap();
            assert_eq!(session.selected(), Some(id));
            assert_eq!(final_names(&session, id), vec!["utid", "tid", "name"]);
        }

        #[test]
        fn group_by_name_sums_duration() {
            let mut session = Session::default();
            let id = session.add_table_by_name(&catalog(), "slice").unwrap();
            edit(&mut session, id, NodeEdit::SetGroupBy { column: "name".into(), selected: true });
            edit(&mut session, id, NodeEdit::AddAggregation(
                Aggregation::new("dur", AggregateOp::Sum).with_output_name("total_dur"),
            ));

            assert_eq!(final_names(&session, id), vec!["name", "total_dur"]);
            let query = session.compile(id).unwrap();
            let clause = query.group_by.unwrap();
            assert_eq!(clause.column_names, vec!["name"]);
            assert_eq!(clause.aggregates[0].result_column_name, "total_dur");
        }

        #[test]
        fn duplicate_does_not_share_filters() {
            let mut session = Session::default();
            let original = session.add_table_by_name(&catalog(), "slice").unwrap();
            edit(&mut session, original, NodeEdit::AddFilter(Filter::compare("dur", FilterOp::Gt, 1000)));
            edit(&mut session, original, NodeEdit::AddFilter(Filter::glob("name", "Choreographer*")));

            let Ok(CommandOutcome::Duplicated { copy, .. }) = session.apply(SessionCommand::Duplicate(original)) else {
                panic!("duplicate failed");
            };
            assert_eq!(session.selected(), Some(original));
            edit(&mut session, copy, NodeEdit::RemoveFilter(0));

            assert_eq!(session.node(original).unwrap().state().filters().len(), 2);
            assert_eq!(session.node(copy).unwrap().state().filters().len(), 1);
            assert_ne!(session.compile(copy).unwrap().id, session.compile(original).unwrap().id);
        }

        #[test]
        fn delete_cascades_and_clears_selection() {
            let mut session = Session::default();
            let root = session.add_slices_source();
            let child = match session.apply(SessionCommand::AddDownstream {
                parent: root,
                node: sql_node("select slice_name from $upstream", &["slice_name"]),
            }) {
                Ok(CommandOutcome::Added(id)) => id,
                other => panic!("unexpected {other:?}"),
            };
            assert_eq!(session.selected(), Some(child));

            assert_eq!(session.apply(SessionCommand::Delete(root)), Ok(CommandOutcome::Deleted(vec![root, child])));
            assert_eq!(session.selected(), None);
            assert!(session.graph().is_empty());
        }

        #[test]
        fn broken_ancestor_breaks_the_chain() {
            let mut session = Session::default();
            let outcome = session.apply(SessionCommand::AddNode(sql_node("select a from t", &["a"])));
            let Ok(CommandOutcome::Added(first)) = outcome else { panic!("unexpected {outcome:?}") };
            let mut chain = vec![first];
            for _ in 0..3 {
                let parent = *chain.last().unwrap();
                let outcome = session.apply(SessionCommand::AddDownstream {
                    parent,
                    node: sql_node("select a from x", &["a"]),
                });
                let Ok(CommandOutcome::Added(id)) = outcome else { panic!("unexpected {outcome:?}") };
                chain.push(id);
            }
            assert!(chain.iter().all(|id| session.compile(*id).is_some()));

            edit(&mut session, chain[1], NodeEdit::SetSql("   ".into()));
            assert!(session.compile(chain[0]).is_some());
            assert!(chain[1..].iter().all(|id| session.compile(*id).is_none()));
        }

        #[test]
        fn rename_onto_existing_column_is_refused() {
            let mut session = Session::default();
            let outcome = session.apply(SessionCommand::AddNode(sql_node("select a, b from t", &["a", "b"])));
            let Ok(CommandOutcome::Added(id)) = outcome else { panic!("unexpected {outcome:?}") };
            let before = session.compile(id);

            let result = session.apply(SessionCommand::Edit {
                node: id,
                edit: NodeEdit::RenameColumn { column: "a".into(), name: "b".into() },
            });
            assert_eq!(result, Err(NodeError::DuplicateColumn("b".into())));
            assert_eq!(final_names(&session, id), vec!["a", "b"]);
            assert_eq!(session.compile(id), before);
            assert_eq!(session.graph().generation(id), Some(0));
        }

        #[test]
        fn stale_result_is_discarded() {
            let mut session = Session::default();
            let id = session.add_slices_source();
            let request = session.begin_execution(id).unwrap();

            edit(&mut session, id, NodeEdit::SetColumnSelected { column: "id".into(), selected: false });
            let outcome = session.apply_result(request.ticket, Ok(QueryResult::default()));

            assert_eq!(outcome, ApplyOutcome::Stale);
            assert!(session.result(id).is_none());
            assert!(!session.is_running(id));
        }

        #[test]
        fn upstream_edit_makes_child_result_stale() {
            let mut session = Session::default();
            let root = session.add_slices_source();
            let outcome = session.apply(SessionCommand::AddDownstream {
                parent: root,
                node: sql_node("select slice_name from $upstream", &["slice_name"]),
            });
            let Ok(CommandOutcome::Added(child)) = outcome else { panic!("unexpected {outcome:?}") };

            let request = session.begin_execution(child).unwrap();
            edit(&mut session, root, NodeEdit::AddFilter(Filter::compare("dur", FilterOp::Gt, 0)));
            assert_ne!(session.compile(child), Some(request.query.clone()));

            assert_eq!(session.apply_result(request.ticket, Ok(QueryResult::default())), ApplyOutcome::Stale);
            assert!(session.result(child).is_none());

            let retry = session.begin_execution(child).unwrap();
            assert_eq!(session.apply_result(retry.ticket, Ok(QueryResult::default())), ApplyOutcome::Applied);
        }

        #[tokio::test]
        async fn edit_while_running_discards_the_result() {
            let engine = RecordingEngine::default();
            let mut session = Session::default();
            let id = session.add_slices_source();

            assert_eq!(session.run_node(&engine, id).await, Ok(ApplyOutcome::Applied));
            let before = session.result(id).cloned();
            assert!(matches!(before, Some(NodeResult::Rows(_))));

            let request = session.begin_execution(id).unwrap();
            let pending = engine.execute(&request.query);
            edit(&mut session, id, NodeEdit::AddFilter(Filter::compare("dur", FilterOp::Gt, 0)));
            let result = pending.await;

            assert_eq!(session.apply_result(request.ticket, result), ApplyOutcome::Stale);
            assert_eq!(session.result(id).cloned(), before);
            assert_eq!(engine.seen(), 2);
        }

        #[test]
        fn only_the_newest_request_applies() {
            let mut session = Session::default();
            let id = session.add_slices_source();
            let first = session.begin_execution(id).unwrap();
            let second = session.begin_execution(id).unwrap();

            assert_eq!(session.apply_result(first.ticket, Ok(QueryResult::default())), ApplyOutcome::Superseded);
            assert_eq!(session.apply_result(second.ticket, Ok(QueryResult::default())), ApplyOutcome::Applied);
            assert_eq!(session.apply_result(second.ticket, Ok(QueryResult::default())), ApplyOutcome::Superseded);
        }

        #[test]
        fn result_for_deleted_node_is_dropped() {
            let mut session = Session::default();
            let id = session.add_slices_source();
            let request = session.begin_execution(id).unwrap();
            session.apply(SessionCommand::Delete(id)).unwrap();
            assert_eq!(session.apply_result(request.ticket, Ok(QueryResult::default())), ApplyOutcome::NodeRemoved);
        }

        #[tokio::test]
        async fn failure_is_recorded_and_node_stays_editable() {
            let mut session = Session::default();
            let id = session.add_table_by_name(&catalog(), "slice").unwrap();

            assert_eq!(session.run_node(&FailingEngine, id).await, Ok(ApplyOutcome::Applied));
            match session.result(id) {
                Some(NodeResult::Failed(err)) => assert_eq!(err.kind, ExecutionErrorKind::Engine),
                other => panic!("unexpected {other:?}"),
            }

            edit(&mut session, id, NodeEdit::SetColumnSelected { column: "ts".into(), selected: false });
            let engine = RecordingEngine::default();
            assert_eq!(session.run_node(&engine, id).await, Ok(ApplyOutcome::Applied));
            match session.result(id) {
                Some(NodeResult::Rows(rows)) => assert_eq!(rows.columns, vec!["dur", "name"]),
                other => panic!("unexpected {other:?}"),
            }
        }

        #[tokio::test]
        async fn slow_engine_times_out() {
            let config = SessionConfig::default().with_execution_timeout(Duration::from_millis(20));
            let mut session = Session::new(config);
            let id = session.add_slices_source();

            session.run_node(&SlowEngine(Duration::from_secs(5)), id).await.unwrap();
            match session.result(id) {
                Some(NodeResult::Failed(err)) => assert_eq!(err.kind, ExecutionErrorKind::Timeout),
                other => panic!("unexpected {other:?}"),
            }
        }

        #[tokio::test]
        async fn uncompilable_node_is_not_sent() {
            let engine = RecordingEngine::default();
            let mut session = Session::default();
            let id = session.add_sql_source();

            let err = session.run_node(&engine, id).await.unwrap_err();
            assert_eq!(err.kind, ExecutionErrorKind::Uncompilable);
            assert_eq!(engine.seen(), 0);
            assert!(session.result(id).is_none());
        }

        #[tokio::test]
        async fn running_sql_saves_history() {
            let engine = RecordingEngine::default();
            let mut session = Session::new(SessionConfig::default().with_history_capacity(2));
            let id = session.add_sql_source();

            for sql in ["select 1 as a", "select 2 as a", "select 1 as a", "select 3 as a"] {
                edit(&mut session, id, NodeEdit::SetSql(sql.into()));
                session.run_node(&engine, id).await.unwrap();
            }
            assert_eq!(session.history().queries(), vec!["select 3 as a", "select 1 as a"]);

            let slices = session.add_slices_source();
            session.run_node(&engine, slices).await.unwrap();
            assert_eq!(session.history().len(), 2);
        }

        #[test]
        fn visualize_and_clear_all() {
            let mut session = Session::default();
            let a = session.add_slices_source();
            session.add_sql_source();

            assert_eq!(
                session.apply(SessionCommand::Visualize(a)),
                Ok(CommandOutcome::ModeChanged(ExploreMode::DataVisualiser))
            );
            assert_eq!(session.selected(), Some(a));
            assert_eq!(session.mode(), ExploreMode::DataVisualiser);

            assert_eq!(session.apply(SessionCommand::ClearAll), Ok(CommandOutcome::Cleared(2)));
            assert_eq!(session.selected(), None);
            assert!(session.graph().all_nodes().is_empty());

            session.apply(SessionCommand::SetMode(ExploreMode::QueryBuilder)).unwrap();
            assert_eq!(session.mode(), ExploreMode::QueryBuilder);
        }
    }
}
