//! Output handler traits and errors
//!
//! This module defines the interface a finished link map is handed to.

use crate::state::LinkMap;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
///
/// An output handler persists the link map of a finished crawl run.
pub trait OutputHandler {
    /// Persists the link map
    ///
    /// # Arguments
    ///
    /// * `link_map` - The records of a finished crawl run
    ///
    /// # Returns
    ///
    /// Where the link map was written
    fn write_link_map(&self, link_map: &LinkMap) -> OutputResult<PathBuf>;
}
