//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlRecord`: what is known about a single discovered link
//! - `CrawlState`: the records plus the skip set of one crawl run
//! - `LinkMap`: the insertion-ordered map a finished run produces

mod crawl_state;
mod record;

// Re-export main types
pub use crawl_state::{CrawlState, Link, LinkMap};
pub use record::{CrawlRecord, RECURSION_LIMIT_REACHED};
