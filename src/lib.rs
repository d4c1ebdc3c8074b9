pub mod backends;
pub mod cli;
pub mod clipboard;
pub mod color;
pub mod config;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod tui;
