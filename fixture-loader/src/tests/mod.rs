use crate::dom::MemoryDom;
use crate::fetch::FileFetcher;
use crate::loader::Fixtures;

pub mod fixtures;

use fixtures::CountingFetcher;

pub type TestFixtures = Fixtures<CountingFetcher<FileFetcher>, MemoryDom>;

/// Loader over the on-disk fixtures with a fresh document and request counter
pub fn test_fixtures() -> TestFixtures {
    let fetcher = CountingFetcher::new(FileFetcher::new(fixtures::fixture_root()));
    Fixtures::new(fetcher, MemoryDom::new())
}
