#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CleanArgs, CleanupArgs, Cli, Command, CountUpArgs};
pub use toml_config::AppConfig;
