pub mod config;
pub use config::{IdType, SessionConfig};

pub mod catalog;
pub use catalog::{Catalog, CatalogTable, ColumnType, MemoryCatalog};

pub mod lineage;
pub use lineage::{AggregateOp, Aggregation, ColumnInfo, Filter, FilterOp, FilterValue};

pub mod ir;
pub use ir::StructuredQuery;

pub mod builder;

pub mod nodes;
pub use nodes::{NodeEdit, NodeError, NodeGraph, NodeId, QueryNode};

pub mod compiler;
pub use compiler::StructuredQueryCompiler;

pub mod history;
pub use history::QueryHistory;

pub mod session;
pub use session::{ExecutionEngine, Session, SessionCommand, TablePicker};
