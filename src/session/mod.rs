pub mod execution;
pub use execution::*;

pub mod table_picker;
pub use table_picker::*;

pub mod command;
pub use command::*;

pub mod session;
pub use session::*;

mod _tests;
