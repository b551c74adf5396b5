use log::debug;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use crate::cache::FixtureCache;
use crate::config::{Config, SetupOptions};
use crate::dom::{Dom, MemoryDom};
use crate::error::Result;
use crate::fetch::{FileFetcher, Fetcher, HttpFetcher};
use crate::presentation::StyleRegistry;
use crate::sniff::Payload;

/// One path or an ordered list of paths.
pub trait FixturePaths {
    fn into_paths(self) -> Vec<String>;
}

impl FixturePaths for &str {
    fn into_paths(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl FixturePaths for String {
    fn into_paths(self) -> Vec<String> {
        vec![self]
    }
}

impl FixturePaths for &String {
    fn into_paths(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<S: AsRef<str>> FixturePaths for &[S] {
    fn into_paths(self) -> Vec<String> {
        self.iter().map(|path| path.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>, const N: usize> FixturePaths for [S; N] {
    fn into_paths(self) -> Vec<String> {
        self.iter().map(|path| path.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>> FixturePaths for Vec<S> {
    fn into_paths(self) -> Vec<String> {
        self.iter().map(|path| path.as_ref().to_string()).collect()
    }
}

/// Fixture loader state: configuration, cache, injected styles, and the
/// fetcher and document it works against.
///
/// Every operation runs to completion before returning; fetches block.
#[derive(Debug)]
pub struct Fixtures<F = HttpFetcher, D = MemoryDom> {
    pub(crate) config: Config,
    pub(crate) cache: FixtureCache,
    pub(crate) styles: StyleRegistry,
    pub(crate) fetcher: F,
    pub(crate) dom: D,
}

impl<D: Dom> Fixtures<FileFetcher, D> {
    /// Loader that reads fixtures from `root` on disk.
    pub fn from_dir<P: AsRef<Path>>(root: P, dom: D) -> Self {
        Self::new(FileFetcher::new(root), dom)
    }
}

impl<F: Fetcher, D: Dom> Fixtures<F, D> {
    pub fn new(fetcher: F, dom: D) -> Self {
        Fixtures {
            config: Config::default(),
            cache: FixtureCache::new(),
            styles: StyleRegistry::default(),
            fetcher,
            dom,
        }
    }

    /// Change and/or retrieve the configuration.
    ///
    /// `None` leaves it untouched. The returned value is a copy.
    pub fn setup(&mut self, options: Option<SetupOptions>) -> Config {
        if let Some(options) = options {
            self.config.merge(options);
            debug!("Fixture configuration is now {:?}", self.config);
        }
        self.config.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &FixtureCache {
        &self.cache
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// Fetch and cache every path not cached yet, in order.
    ///
    /// Stops at the first failure. Fixtures cached before it stay cached.
    pub fn preload<P: FixturePaths>(&mut self, paths: P) -> Result<()> {
        for path in paths.into_paths() {
            let url = self.config.resolve(&path);
            self.cache.load(&url, &self.fetcher)?;
        }
        Ok(())
    }

    /// Content of the fixture at `path`, fetched on first use.
    pub fn read(&mut self, path: &str) -> Result<&Payload> {
        let url = self.config.resolve(path);
        self.cache.load(&url, &self.fetcher)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Post-test cleanup: drop injected styles and the container. The cache
    /// survives across tests.
    pub fn after_each(&mut self) {
        self.clear_css();
        self.clear_html();
    }

    /// Borrow the loader for one test. Cleanup runs when the scope is dropped.
    pub fn scope(&mut self) -> FixtureScope<'_, F, D> {
        FixtureScope { fixtures: self }
    }

    /// Markup of the fixture at `path`, fetched on first use.
    pub(crate) fn markup(&mut self, path: &str) -> Result<String> {
        let payload = self.read(path)?;
        Ok(payload.to_markup().into_owned())
    }
}

/// Runs [`Fixtures::after_each`] when dropped, even if the test panics.
pub struct FixtureScope<'a, F: Fetcher, D: Dom> {
    fixtures: &'a mut Fixtures<F, D>,
}

impl<F: Fetcher, D: Dom> Deref for FixtureScope<'_, F, D> {
    type Target = Fixtures<F, D>;

    fn deref(&self) -> &Self::Target {
        self.fixtures
    }
}

impl<F: Fetcher, D: Dom> DerefMut for FixtureScope<'_, F, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.fixtures
    }
}

impl<F: Fetcher, D: Dom> Drop for FixtureScope<'_, F, D> {
    fn drop(&mut self) {
        self.fixtures.after_each();
    }
}
