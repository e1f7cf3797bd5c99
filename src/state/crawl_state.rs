use crate::link::ExtractedLinks;
use crate::state::CrawlRecord;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// A page identifier, used verbatim as a map key
pub type Link = String;

/// The result of a crawl: every recorded link mapped to what is known about it
///
/// Keys keep discovery order, because a link's `Queued` placeholder is always inserted
/// before any branch that could complete it starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LinkMap(IndexMap<Link, CrawlRecord>);

impl LinkMap {
    /// Returns the record for `link`, if it was recorded
    pub fn get(&self, link: &str) -> Option<&CrawlRecord> {
        self.0.get(link)
    }

    /// Returns true if `link` has a record
    pub fn contains(&self, link: &str) -> bool {
        self.0.contains_key(link)
    }

    /// Number of recorded links
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over records in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&Link, &CrawlRecord)> {
        self.0.iter()
    }

    /// Iterates over recorded links in discovery order
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.0.keys()
    }
}

impl<'a> IntoIterator for &'a LinkMap {
    type Item = (&'a Link, &'a CrawlRecord);
    type IntoIter = indexmap::map::Iter<'a, Link, CrawlRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Mutable state of one crawl run
///
/// Holds the records of every discovered link and the set of links that must never be
/// queued. All transitions are synchronous; callers sharing a `CrawlState` between tasks
/// must hold one lock across each method call.
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    records: LinkMap,
    skip: HashSet<Link>,
}

impl CrawlState {
    /// Starts a crawl at `base_link`
    ///
    /// The base link is recorded as queued. If it ends with `/`, the slash-less form is
    /// skip-listed so a bare host and the host with a trailing slash are not crawled twice.
    pub fn seeded(base_link: &str) -> Self {
        let mut state = Self::default();
        state.records.0.insert(base_link.to_string(), CrawlRecord::Queued);

        if let Some(stripped) = base_link.strip_suffix('/') {
            state.skip.insert(stripped.to_string());
        }

        state
    }

    /// Marks a recorded link as stopped by the recursion limit
    pub fn mark_recursion_limit(&mut self, link: &str) {
        if let Some(record) = self.records.0.get_mut(link) {
            *record = CrawlRecord::SkippedRecursionLimit;
        }
    }

    /// Drops a link from the records and skip-lists it for the rest of the run
    pub fn exclude(&mut self, link: &str) {
        self.records.0.shift_remove(link);
        self.skip.insert(link.to_string());
    }

    /// Records a fetched page and queues its newly discovered local links
    ///
    /// Every local link that is neither recorded nor skip-listed is recorded as `Queued`.
    /// Those links are returned, in page order, for the caller to process.
    pub fn complete(&mut self, link: &str, links: ExtractedLinks) -> Vec<Link> {
        let ExtractedLinks { all, local } = links;
        self.records
            .0
            .insert(link.to_string(), CrawlRecord::Completed(all));

        let mut to_recurse = Vec::new();
        for candidate in local {
            if self.records.contains(&candidate) || self.skip.contains(&candidate) {
                continue;
            }
            self.records.0.insert(candidate.clone(), CrawlRecord::Queued);
            to_recurse.push(candidate);
        }

        to_recurse
    }

    /// Returns true if `link` must never be queued
    pub fn is_skipped(&self, link: &str) -> bool {
        self.skip.contains(link)
    }

    /// The records collected so far
    pub fn records(&self) -> &LinkMap {
        &self.records
    }

    /// Consumes the state, returning the final link map
    pub fn into_link_map(self) -> LinkMap {
        self.records
    }
}
