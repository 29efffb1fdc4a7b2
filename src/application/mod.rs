// Application layer - Use cases
pub mod series_service;
