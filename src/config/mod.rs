pub mod id_type;
pub use id_type::*;

pub mod id_manager;
pub use id_manager::*;

pub mod session_config;
pub use session_config::*;
