//! # Recommendation Engine
//!
//! Owns one loaded catalog and everything derived from it:
//! 1. Load and normalize the catalog
//! 2. Vectorize genres and build the similarity matrix (once)
//! 3. Answer recommendation, browsing and random-pick queries against the
//!    shared, read-only data
//!
//! Cloning the engine is cheap; clones share the same table and matrix.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, instrument};

use data_loader::{GenreId, Movie, MovieId, MovieTable};
use pipeline::filters::{GenreFilter, MinimumVotesFilter};
use pipeline::{build_similarity_with, FeatureMatrix, FilterPipeline, SimilarityMatrix, TfidfVectorizer};

use crate::config::EngineConfig;
use crate::recommend::rank_rows;

/// One recommended movie, as handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecommendation {
    /// Row in the engine's table
    pub row: usize,
    pub movie_id: MovieId,
    pub title: String,
    pub genre_ids: Vec<GenreId>,
    pub year: Option<u16>,
    pub score: f64,
    pub explanation: String,
}

/// Loaded catalog plus its similarity matrix
#[derive(Clone)]
pub struct RecommendationEngine {
    table: Arc<MovieTable>,
    features: Arc<FeatureMatrix>,
    similarity: Arc<SimilarityMatrix>,
    config: EngineConfig,
}

impl RecommendationEngine {
    /// Load the catalog at `path` and build the similarity matrix
    #[instrument(skip(config))]
    pub fn load(path: &Path, config: EngineConfig) -> Result<Self> {
        let table = MovieTable::load_from_csv(path)
            .with_context(|| format!("Failed to load movie catalog from {}", path.display()))?;
        Self::from_table(table, config)
    }

    /// Build the engine over an already loaded table
    pub fn from_table(table: MovieTable, config: EngineConfig) -> Result<Self> {
        let start = Instant::now();

        let vectorizer = TfidfVectorizer::new().with_stop_words(config.stop_words.clone());
        let (features, similarity) = build_similarity_with(&table, &vectorizer)
            .context("Failed to build genre similarity")?;

        info!(
            "Engine ready: {} movies, top_k {}, built in {:.2?}",
            table.len(),
            config.top_k,
            start.elapsed()
        );

        Ok(Self {
            table: Arc::new(table),
            features: Arc::new(features),
            similarity: Arc::new(similarity),
            config,
        })
    }

    pub fn table(&self) -> &MovieTable {
        &self.table
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Top `config.top_k` recommendations for `title`
    pub fn recommend(&self, title: &str) -> Vec<MovieRecommendation> {
        self.recommend_with_limit(title, self.config.top_k)
    }

    /// Up to `limit` recommendations for `title`; empty when the title is
    /// unknown
    pub fn recommend_with_limit(&self, title: &str, limit: usize) -> Vec<MovieRecommendation> {
        match self.table.find_by_title(title) {
            Some(row) => self.recommend_row(row, limit),
            None => {
                debug!("No movie titled {:?}", title);
                Vec::new()
            }
        }
    }

    /// Up to `limit` recommendations for the movie at `row`
    pub fn recommend_row(&self, row: usize, limit: usize) -> Vec<MovieRecommendation> {
        let Some(query) = self.table.get(row) else {
            return Vec::new();
        };

        rank_rows(row, &self.similarity, limit)
            .into_iter()
            .filter_map(|scored| {
                let movie = self.table.get(scored.row)?;
                Some(MovieRecommendation {
                    row: scored.row,
                    movie_id: movie.id,
                    title: movie.title.clone(),
                    genre_ids: movie.genre_ids.clone(),
                    year: movie.release_year(),
                    score: scored.score,
                    explanation: explain(query, movie),
                })
            })
            .collect()
    }

    /// Rows tagged with any of `genres` (all rows when empty) and with at
    /// least `min_votes` votes, in table order
    pub fn browse(&self, genres: &[GenreId], min_votes: Option<u32>) -> Vec<usize> {
        let mut pipeline = FilterPipeline::new().add_filter(GenreFilter::new(genres.iter().copied()));
        if let Some(min_votes) = min_votes {
            pipeline = pipeline.add_filter(MinimumVotesFilter::new(min_votes));
        }
        pipeline.apply_all(&self.table)
    }

    /// One uniformly random row, `None` for an empty catalog
    pub fn surprise<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.table.is_empty() {
            return None;
        }
        Some(rng.random_range(0..self.table.len()))
    }

    /// `min(n, len)` distinct random rows
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<usize> {
        let amount = n.min(self.table.len());
        rand::seq::index::sample(rng, self.table.len(), amount).into_vec()
    }

    /// Random explore list of `config.explore_sample_size` rows
    pub fn explore_sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        self.sample(rng, self.config.explore_sample_size)
    }
}

fn explain(query: &Movie, candidate: &Movie) -> String {
    let shared: Vec<String> = candidate
        .genre_ids
        .iter()
        .filter(|g| query.has_genre(**g))
        .map(|g| g.to_string())
        .collect();

    if shared.is_empty() {
        format!("No genres in common with {}", query.title)
    } else {
        format!("Shares genres [{}] with {}", shared.join(", "), query.title)
    }
}
