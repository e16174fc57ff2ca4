//! Dispatcher error types

use thiserror::Error;

/// Errors that stop a dispatch run before anything is launched
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The selection named no crawler at all
    #[error("no crawler selected")]
    NoSourcesSelected,

    /// Selected names with no registered crawler (only when rejecting unknown names)
    #[error("unknown crawler(s): {}", names.join(", "))]
    UnknownSource { names: Vec<String> },

    /// Two crawlers registered under one name
    #[error("crawler '{name}' registered twice")]
    DuplicateCrawler { name: String },
}

impl DispatchError {
    pub fn duplicate_crawler(name: impl Into<String>) -> Self {
        Self::DuplicateCrawler { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_source_lists_names() {
        let err = DispatchError::UnknownSource {
            names: vec!["foo".into(), "bar".into()],
        };
        assert_eq!(err.to_string(), "unknown crawler(s): foo, bar");
    }
}
