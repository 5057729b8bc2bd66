pub mod structured_query_compiler;
pub use structured_query_compiler::*;
