pub mod filters_builder;
pub use filters_builder::*;

pub mod group_by_builder;
pub use group_by_builder::*;

pub mod select_builder;
pub use select_builder::*;
