pub mod node_error;
pub use node_error::*;

pub mod node_state;
pub use node_state::*;

pub mod node_edit;
pub use node_edit::*;

pub mod stdlib_table;
pub use stdlib_table::*;

pub mod slices_source;
pub use slices_source::*;

pub mod sql_source;
pub use sql_source::*;

pub mod query_node;
pub use query_node::*;

pub mod node_graph;
pub use node_graph::*;
