pub mod column_info;
pub use column_info::*;

pub mod filter;
pub use filter::*;

pub mod aggregation;
pub use aggregation::*;

pub mod reference_warning;
pub use reference_warning::*;

pub mod final_columns;
pub use final_columns::*;
