pub mod cli;
pub mod commands;
pub mod config;
pub mod tui;

pub use daydash_core as core;
pub use daydash_core::model;
pub use daydash_core::view;

pub use daydash_core::AppConfig;
