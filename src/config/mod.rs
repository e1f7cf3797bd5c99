//! Configuration module for Krawler
//!
//! Configuration can come from an optional TOML file; command-line flags are applied on
//! top of it before the result is validated.
//!
//! # Example
//!
//! ```no_run
//! use krawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("krawler.toml")).unwrap();
//! println!("Recursion limit: {}", config.recursion_limit());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, FetcherConfig, OutputConfig, RecursionLimit};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, read_config, read_config_with_hash};
pub use validation::validate;
