//! cukegen_cli: file system, templating and command line around `cukegen_core`.

pub mod config;
pub mod discovery;
pub mod error;
pub mod generate;
pub mod render;

pub use config::{Cli, Settings};
pub use error::GenerateError;
pub use generate::{run, GenerationReport};
