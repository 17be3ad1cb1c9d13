//! # Fuzzy Name Matching
//!
//! Narrows a list of playlists down to those whose title resembles a search
//! term. Similarity is a 0-100 score; the default scorer is a case-insensitive
//! partial ratio, so a short term matches any title containing something close
//! to it.

use bridge_traits::{CollectionDetail, CollectionRef};
use core_runtime::EngineConfig;
use std::fmt;
use std::sync::Arc;

/// Anything with a display name that can be matched
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for CollectionRef {
    fn name(&self) -> &str {
        &self.title
    }
}

impl Named for CollectionDetail {
    fn name(&self) -> &str {
        self.title()
    }
}

impl Named for String {
    fn name(&self) -> &str {
        self
    }
}

/// Similarity function returning a score in `0..=100`
pub type Scorer = Arc<dyn Fn(&str, &str) -> u8 + Send + Sync>;

/// Best normalized Levenshtein similarity between the shorter string and any
/// equally long window of the longer one, scaled to `0..=100`.
///
/// Both inputs are lower-cased first, so unlike the usual partial-ratio
/// scorers this one is case-insensitive: `"ROCK"` and `"rock"` score 100.
/// An empty side scores 0.
pub fn partial_ratio(left: &str, right: &str) -> u8 {
    let left: Vec<char> = left.to_lowercase().chars().collect();
    let right: Vec<char> = right.to_lowercase().chars().collect();
    if left.is_empty() || right.is_empty() {
        return 0;
    }

    let (shorter, longer) = if left.len() <= right.len() {
        (left, right)
    } else {
        (right, left)
    };
    let needle: String = shorter.iter().collect();

    let best = longer
        .windows(shorter.len())
        .map(|window| {
            let candidate: String = window.iter().collect();
            strsim::normalized_levenshtein(&needle, &candidate)
        })
        .fold(0.0_f64, f64::max);

    (best * 100.0).round() as u8
}

/// Threshold-and-cap filter over candidate names
#[derive(Clone)]
pub struct NameMatcher {
    threshold: u8,
    limit: usize,
    scorer: Scorer,
}

impl fmt::Debug for NameMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameMatcher")
            .field("threshold", &self.threshold)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl NameMatcher {
    pub fn new(threshold: u8, limit: usize) -> Self {
        Self {
            threshold,
            limit,
            scorer: Arc::new(partial_ratio),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.match_threshold, config.match_limit)
    }

    pub fn with_scorer(mut self, scorer: impl Fn(&str, &str) -> u8 + Send + Sync + 'static) -> Self {
        self.scorer = Arc::new(scorer);
        self
    }

    pub fn score(&self, term: &str, name: &str) -> u8 {
        (self.scorer)(term, name)
    }

    /// Keep candidates scoring at least the threshold against `term`, in
    /// input order, at most `limit` of them.
    pub fn filter<T: Named>(&self, candidates: Vec<T>, term: &str) -> Vec<T> {
        candidates
            .into_iter()
            .filter(|candidate| self.score(term, candidate.name()) >= self.threshold)
            .take(self.limit)
            .collect()
    }
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
