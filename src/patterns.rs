use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::config::ScrubConfig;

lazy_static! {
    // Compiled once; the default config's patterns are known-good.
    static ref DEFAULT_LIBRARY: PatternLibrary =
        PatternLibrary::from_config(&ScrubConfig::default());
}

/// A group of case-insensitive regexes with "any pattern matches" semantics.
#[derive(Debug, Clone)]
pub struct PatternGroup {
    patterns: Vec<Regex>,
}

impl PatternGroup {
    /// Compile a group from pattern sources. Invalid patterns are skipped
    /// with a warning rather than failing the whole group, since pattern
    /// lists may come from user configuration.
    pub fn compile(sources: &[String]) -> Self {
        let mut patterns = Vec::with_capacity(sources.len());
        for source in sources {
            match RegexBuilder::new(source).case_insensitive(true).build() {
                Ok(regex) => patterns.push(regex),
                Err(e) => {
                    warn!(pattern = %source, error = %e, "skipping invalid pattern");
                }
            }
        }
        PatternGroup { patterns }
    }

    /// True if any pattern in the group matches `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// The three read-only matcher groups the classifier works from.
///
/// Pure data: no state, no side effects. Groups never change after
/// compilation.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    /// Matched against class list + id.
    pub attribute: PatternGroup,
    /// Matched against aria-label + visible text.
    pub text: PatternGroup,
    /// Matched against individual class names on the root scroll elements.
    pub scroll_lock: PatternGroup,
}

impl PatternLibrary {
    pub fn from_config(config: &ScrubConfig) -> Self {
        PatternLibrary {
            attribute: PatternGroup::compile(&config.attribute_patterns),
            text: PatternGroup::compile(&config.text_patterns),
            scroll_lock: PatternGroup::compile(&config.scroll_lock_patterns),
        }
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        DEFAULT_LIBRARY.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_group_matches_case_insensitively() {
        let library = PatternLibrary::default();
        assert!(library.attribute.is_match("newsletter-modal__backdrop"));
        assert!(library.attribute.is_match("PAYWALL-shield promo"));
        assert!(library.attribute.is_match("sign-up banner"));
        assert!(!library.attribute.is_match("article-content"));
    }

    #[test]
    fn test_text_group() {
        let library = PatternLibrary::default();
        assert!(library.text.is_match("Subscribe now for full access"));
        assert!(library.text.is_match("Sign  Up today"));
        assert!(library.text.is_match("log in to continue reading"));
        assert!(!library.text.is_match("Chapter one: the beginning"));
    }

    #[test]
    fn test_scroll_lock_group() {
        let library = PatternLibrary::default();
        assert!(library.scroll_lock.is_match("modal-open"));
        assert!(library.scroll_lock.is_match("noScroll"));
        assert!(library.scroll_lock.is_match("overflow_hidden"));
        assert!(!library.scroll_lock.is_match("scrollable"));
    }

    #[test]
    fn test_empty_string_matches_nothing() {
        let library = PatternLibrary::default();
        assert!(!library.attribute.is_match(""));
        assert!(!library.text.is_match(""));
        assert!(!library.scroll_lock.is_match(""));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let group = PatternGroup::compile(&["valid".to_string(), "(unclosed".to_string()]);
        assert_eq!(group.len(), 1);
        assert!(group.is_match("a valid thing"));
    }
}
