// Presentation layer - Command line and terminal output
pub mod cli;
pub mod render;
