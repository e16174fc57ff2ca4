//! CrawlerRegistry - immutable name → crawler table

use std::collections::BTreeMap;

use contracts::CrawlerName;

use crate::crawler::Crawler;
use crate::error::DispatchError;

/// Name → crawler table, built once and shared read-only by the dispatcher
#[derive(Debug, Clone, Default)]
pub struct CrawlerRegistry {
    crawlers: BTreeMap<CrawlerName, Crawler>,
}

impl CrawlerRegistry {
    pub fn builder() -> CrawlerRegistryBuilder {
        CrawlerRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&Crawler> {
        self.crawlers.get(name)
    }

    /// Registered entry with its shared name
    pub fn entry(&self, name: &str) -> Option<(&CrawlerName, &Crawler)> {
        self.crawlers.get_key_value(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.crawlers.contains_key(name)
    }

    /// Registered names in lexicographic order
    pub fn names(&self) -> impl Iterator<Item = &CrawlerName> {
        self.crawlers.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CrawlerName, &Crawler)> {
        self.crawlers.iter()
    }

    pub fn len(&self) -> usize {
        self.crawlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crawlers.is_empty()
    }
}

/// Builder for [`CrawlerRegistry`]
///
/// The first duplicate name is remembered and reported by `build`.
#[derive(Debug, Default)]
pub struct CrawlerRegistryBuilder {
    crawlers: BTreeMap<CrawlerName, Crawler>,
    duplicate: Option<CrawlerName>,
}

impl CrawlerRegistryBuilder {
    pub fn register(mut self, name: impl Into<CrawlerName>, crawler: Crawler) -> Self {
        let name = name.into();
        if self.crawlers.contains_key(&name) {
            self.duplicate.get_or_insert(name);
        } else {
            self.crawlers.insert(name, crawler);
        }
        self
    }

    /// Freeze the table
    ///
    /// # Errors
    /// `DuplicateCrawler` if any name was registered twice.
    pub fn build(self) -> Result<CrawlerRegistry, DispatchError> {
        if let Some(name) = self.duplicate {
            return Err(DispatchError::duplicate_crawler(name.as_str()));
        }
        Ok(CrawlerRegistry {
            crawlers: self.crawlers,
        })
    }
}
