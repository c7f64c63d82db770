//! Configuration merging for the `optimize` command.
//!
//! Values are resolved in increasing precedence: built-in defaults, the TOML file given with
//! `-c`, explicit command-line flags, and finally `-S key=value` overrides.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::build_config;
pub use models::AppConfig;
