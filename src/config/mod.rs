//! Configuration subsystem: tokenizer, parser, typed model, and path
//! cleaning (§3, §4.1-§4.3).

pub mod model;
pub mod parser;
pub mod path_clean;
pub mod token;

pub use model::{LocationBlock, Modifier, ServerConfig, ServerType};
pub use path_clean::{clean, PathKind};

use crate::error::ConfigError;
use std::path::Path;

/// Reads and parses a config file, anchoring relative paths to `working_directory`.
pub fn load(config_path: &Path, working_directory: &str) -> Result<Vec<ServerConfig>, ConfigError> {
    let source = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
        path: config_path.display().to_string(),
        source,
    })?;
    parser::parse(&source, working_directory)
}
