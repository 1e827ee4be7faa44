//! Source-text parse cache
//!
//! Parsing is deterministic, so every outcome, including errors, is worth
//! keeping. The cache is keyed by the exact source text and shared behind a
//! `DashMap`; concurrent first parses of the same text may race, which only
//! duplicates work, never changes the result.

use crate::error::ParseError;
use crate::grammar::parse_tokens;
use crate::lexer::tokenize;
use dashmap::DashMap;
use jsoncalc_ast::CalcNode;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Parse without touching any cache.
pub fn parse_uncached(text: &str) -> Result<CalcNode, ParseError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    parse_tokens(&tokens)
}

/// A memo of parse outcomes, keyed by source text.
///
/// Hits return the same `Arc`-shared node, so everything parsed through one
/// cache also shares node identity, and thereby evaluator memo entries.
#[derive(Debug, Default)]
pub struct ParseCache {
    entries: DashMap<String, Result<Arc<CalcNode>, ParseError>>,
}

impl ParseCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text`, reusing a previous outcome for the identical text.
    pub fn parse(&self, text: &str) -> Result<Arc<CalcNode>, ParseError> {
        if let Some(hit) = self.entries.get(text) {
            log::trace!("parse cache hit for {} bytes", text.len());
            return hit.clone();
        }
        let outcome = parse_uncached(text).map(Arc::new);
        self.entries.insert(text.to_string(), outcome.clone());
        outcome
    }

    /// Drop every cached outcome.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of distinct texts cached.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static DEFAULT_CACHE: Lazy<ParseCache> = Lazy::new(ParseCache::new);

/// Parse through the process-wide default cache.
pub fn parse(text: &str) -> Result<Arc<CalcNode>, ParseError> {
    DEFAULT_CACHE.parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hits_share_node_identity() {
        let cache = ParseCache::new();
        let first = cache.parse("1 + $x").unwrap();
        let second = cache.parse("1 + $x").unwrap();
        assert_eq!(first.id(), second.id());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_texts_get_distinct_nodes() {
        let cache = ParseCache::new();
        let spaced = cache.parse("1 + 2").unwrap();
        let compact = cache.parse("1+2").unwrap();
        assert_eq!(*spaced, *compact);
        assert_ne!(spaced.id(), compact.id());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn errors_are_cached_too() {
        let cache = ParseCache::new();
        let first = cache.parse("1 2").unwrap_err();
        let second = cache.parse("1 2").unwrap_err();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_resets_identity_sharing() {
        let cache = ParseCache::new();
        let before = cache.parse("$x").unwrap();
        cache.clear();
        assert!(cache.is_empty());
        let after = cache.parse("$x").unwrap();
        assert_ne!(before.id(), after.id());
    }

    #[test]
    fn empty_input_is_its_own_error() {
        assert_eq!(parse_uncached("").unwrap_err(), ParseError::Empty);
        assert_eq!(parse_uncached("   ").unwrap_err(), ParseError::Empty);
    }
}
