use log::debug;
use std::collections::hash_map::{Entry, HashMap};

use crate::error::Result;
use crate::fetch::Fetcher;
use crate::sniff::{classify, Payload};

/// Decoded fixtures keyed by their fully resolved URL.
///
/// A URL is fetched at most once per cache lifetime. Entries only go away on
/// [`FixtureCache::clear`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureCache {
    entries: HashMap<String, Payload>,
}

impl FixtureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the payload for `url`, fetching and classifying it on a miss.
    /// A failed fetch leaves no entry behind.
    pub fn load<F: Fetcher + ?Sized>(&mut self, url: &str, fetcher: &F) -> Result<&Payload> {
        match self.entries.entry(url.to_string()) {
            Entry::Occupied(entry) => {
                debug!("Cache hit for {}", url);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                debug!("Cache miss for {}", url);
                let response = fetcher.fetch(url)?;
                let payload = classify(response.body, response.document);
                debug!("Cached {} as {}", url, payload.kind());
                Ok(entry.insert(payload))
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<&Payload> {
        self.entries.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Payload)> {
        self.entries.iter().map(|(url, payload)| (url.as_str(), payload))
    }

    pub fn clear(&mut self) {
        debug!("Clearing {} cached fixtures", self.entries.len());
        self.entries.clear();
    }
}
