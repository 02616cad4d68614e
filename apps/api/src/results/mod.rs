pub mod handlers;
pub mod import;
pub mod models;
pub mod store;
pub mod template;
