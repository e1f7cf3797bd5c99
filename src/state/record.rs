//! Record definitions for tracking crawl progress
//!
//! Every discovered link gets exactly one record: created as `Queued` when the link is
//! first seen, then settled once when its processing finishes.

use serde::{Serialize, Serializer};
use std::fmt;

/// Value written for links the crawl stopped short of
pub const RECURSION_LIMIT_REACHED: &str = "not processed - recursion limit reached";

/// Represents what is known about a discovered link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlRecord {
    /// Discovered and scheduled, not yet finished
    Queued,

    /// Fetched; every link found on the page, in first-seen order
    Completed(Vec<String>),

    /// The recursion limit was reached before this link could be fetched
    SkippedRecursionLimit,
}

impl CrawlRecord {
    /// Returns true if processing of this link has finished
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Queued)
    }

    /// Returns the links found on the page, if it was fetched
    pub fn links(&self) -> Option<&[String]> {
        match self {
            Self::Completed(links) => Some(links),
            _ => None,
        }
    }
}

/// Serializes as a link array, the recursion-limit marker string, or `null` while queued
impl Serialize for CrawlRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Queued => serializer.serialize_none(),
            Self::Completed(links) => links.serialize(serializer),
            Self::SkippedRecursionLimit => serializer.serialize_str(RECURSION_LIMIT_REACHED),
        }
    }
}

impl fmt::Display for CrawlRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Completed(links) => write!(f, "completed ({} links)", links.len()),
            Self::SkippedRecursionLimit => write!(f, "{}", RECURSION_LIMIT_REACHED),
        }
    }
}
