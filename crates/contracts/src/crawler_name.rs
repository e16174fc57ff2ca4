//! CrawlerName - registry key shared by spawned tasks and run summaries

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Name under which a crawler is registered (`blockchaininfo_15m`, `kraken`)
///
/// Cloned into every spawned crawl task, so the string is shared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CrawlerName(Arc<str>);

impl CrawlerName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Lets `BTreeMap<CrawlerName, _>` be queried with `&str`
impl Borrow<str> for CrawlerName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CrawlerName {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for CrawlerName {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl fmt::Display for CrawlerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
