// Domain layer - Time series models and their building blocks
pub mod error;
pub mod table;
pub mod timeseries;
pub mod timestamp;
