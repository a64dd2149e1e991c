pub mod analytics_impl;
pub mod backend;
pub mod queries;
pub mod schema;
pub mod website;

pub use backend::DuckDbBackend;
