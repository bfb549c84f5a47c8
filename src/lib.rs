pub mod analysis;
pub mod commands;
pub mod models;
pub mod store;
