pub use daydash_tui::cli;
pub use daydash_tui::commands;
pub use daydash_tui::config;
pub use daydash_tui::tui;
pub use daydash_tui::AppConfig;

pub use daydash_core as core;
pub use daydash_core::model;
pub use daydash_core::view;
