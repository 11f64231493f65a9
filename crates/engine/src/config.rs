//! Engine configuration.

use pipeline::StopWords;

/// Number of recommendations returned when the caller does not ask for a
/// specific count
pub const DEFAULT_TOP_K: usize = 19;

/// Size of the random explore list
pub const DEFAULT_EXPLORE_SAMPLE_SIZE: usize = 12;

/// Knobs for [`RecommendationEngine`](crate::RecommendationEngine)
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub top_k: usize,
    pub explore_sample_size: usize,
    /// Tokens ignored by the vectorizer
    pub stop_words: StopWords,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            explore_sample_size: DEFAULT_EXPLORE_SAMPLE_SIZE,
            stop_words: StopWords::English,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_explore_sample_size(mut self, size: usize) -> Self {
        self.explore_sample_size = size;
        self
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.top_k, 19);
        assert_eq!(config.explore_sample_size, 12);
        assert_eq!(config.stop_words, StopWords::English);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_top_k(5)
            .with_explore_sample_size(3)
            .with_stop_words(StopWords::None);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.explore_sample_size, 3);
        assert_eq!(config.stop_words, StopWords::None);
    }
}
