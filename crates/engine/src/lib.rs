//! Engine crate for the movie recommender.
//!
//! Ties the loaded catalog to its similarity matrix and exposes the
//! queries the presentation layer needs:
//! - `recommend` / `recommend_scored`: stateless top-K lookup
//! - `RecommendationEngine`: shared, read-only catalog + matrix
//! - `ExploreSession`: explicit interactive state driven by `SessionAction`

pub mod config;
pub mod engine;
pub mod recommend;
pub mod session;

pub use config::{EngineConfig, DEFAULT_EXPLORE_SAMPLE_SIZE, DEFAULT_TOP_K};
pub use engine::{MovieRecommendation, RecommendationEngine};
pub use recommend::{rank_rows, recommend, recommend_scored, ScoredRow};
pub use session::{ExploreSession, SessionAction};
