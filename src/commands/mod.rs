pub mod classify;
pub mod db;
pub mod settings;
pub mod workspace;
