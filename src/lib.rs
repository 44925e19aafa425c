pub mod config;
pub mod drag;
pub mod error;
pub mod puzzle;
pub mod ui;
pub mod view;
