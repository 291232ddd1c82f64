//! Command implementations.

pub mod admin;
pub mod catalog;
pub mod search;
pub mod session;

pub use admin::{run_analytics, run_create, run_delete, run_update};
pub use catalog::{run_list, run_show};
pub use search::run_search;
pub use session::{run_session_clear, run_session_show};
