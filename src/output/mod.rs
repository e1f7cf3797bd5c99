//! Output module for persisting and summarising crawl results
//!
//! This module handles:
//! - Writing the link map of a finished run as a JSON file
//! - Computing and displaying crawl statistics

mod json;
pub mod stats;
mod traits;

pub use json::{output_file_name, JsonFileOutput};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult};
