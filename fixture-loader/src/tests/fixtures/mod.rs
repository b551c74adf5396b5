use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fetch::{Fetcher, Response};

/// Directory served to the loader. The default base path "fixtures/"
/// resolves to this folder.
pub fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src/tests")
}

/// Load a fixture file by name, bypassing the loader
pub fn load_fixture(fixture_name: &str) -> String {
    let path = fixture_root().join("fixtures").join(fixture_name);
    fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("Failed to load test fixture: {}", fixture_name))
}

/// Records every URL requested through it before delegating.
#[derive(Debug)]
pub struct CountingFetcher<F> {
    inner: F,
    requests: RefCell<Vec<String>>,
}

impl<F: Fetcher> CountingFetcher<F> {
    pub fn new(inner: F) -> Self {
        CountingFetcher {
            inner,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl<F: Fetcher> Fetcher for CountingFetcher<F> {
    fn fetch(&self, url: &str) -> Result<Response> {
        self.requests.borrow_mut().push(url.to_string());
        self.inner.fetch(url)
    }
}
