//! Command implementations.

pub mod config;
pub mod resolve;
pub mod templates;

pub use self::config::execute_config;
pub use self::resolve::execute_resolve;
pub use self::templates::execute_templates;
