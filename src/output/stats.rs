//! Statistics generation from a finished link map
//!
//! This module provides functionality for summarising and displaying the outcome of a
//! crawl run.

use crate::state::{CrawlRecord, LinkMap};
use std::collections::HashSet;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of links with a record
    pub total_pages: usize,

    /// Pages that were fetched (including ones that failed with a network error)
    pub pages_completed: usize,

    /// Pages the recursion limit stopped before fetching
    pub pages_skipped_recursion_limit: usize,

    /// Pages still queued (only non-zero if a run was cut short)
    pub pages_queued: usize,

    /// Sum of links found across all fetched pages
    pub total_links: usize,

    /// Distinct links found across all fetched pages
    pub unique_links: usize,
}

impl CrawlStatistics {
    /// Computes statistics for a link map
    pub fn from_link_map(link_map: &LinkMap) -> Self {
        let mut stats = Self {
            total_pages: link_map.len(),
            ..Self::default()
        };
        let mut unique = HashSet::new();

        for (_, record) in link_map {
            match record {
                CrawlRecord::Queued => stats.pages_queued += 1,
                CrawlRecord::SkippedRecursionLimit => stats.pages_skipped_recursion_limit += 1,
                CrawlRecord::Completed(links) => {
                    stats.pages_completed += 1;
                    stats.total_links += links.len();
                    unique.extend(links.iter().map(String::as_str));
                }
            }
        }

        stats.unique_links = unique.len();
        stats
    }

    /// Logs the statistics at info level
    pub fn log(&self) {
        tracing::info!(
            "Crawl finished: {} pages recorded ({} fetched, {} over recursion limit), {} links found ({} unique)",
            self.total_pages,
            self.pages_completed,
            self.pages_skipped_recursion_limit,
            self.total_links,
            self.unique_links
        );

        if self.pages_queued > 0 {
            tracing::warn!("{} pages were still queued", self.pages_queued);
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Total pages recorded: {}", stats.total_pages);
    println!("  Total links found: {}", stats.total_links);
    println!("  Unique links found: {}", stats.unique_links);
    println!();

    println!("Pages by State:");
    for (label, count) in [
        ("Fetched", stats.pages_completed),
        ("Recursion limit reached", stats.pages_skipped_recursion_limit),
        ("Queued", stats.pages_queued),
    ] {
        if count == 0 {
            continue;
        }
        let percentage = if stats.total_pages > 0 {
            (count as f64 / stats.total_pages as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", label, count, percentage);
    }
}
