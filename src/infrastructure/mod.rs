// Infrastructure layer - Configuration and file I/O
pub mod config;
pub mod json_store;
