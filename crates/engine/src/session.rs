//! Explicit state for an interactive explore session.
//!
//! The session records which movie is selected and which rows are on
//! screen. Transitions take the old state and return the new one; the
//! engine is only read.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use data_loader::GenreId;

use crate::engine::RecommendationEngine;

/// Something the user did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Submitted the title box; `None` when no title was chosen
    Submit { title: Option<String> },
    /// Chose genres to browse by
    ApplyGenreFilter { genres: Vec<GenreId> },
    /// Asked for a random movie; the explore list stays as it is
    Surprise,
    /// Clicked a row of the explore list
    Pick { row: usize },
    /// Asked for a fresh random explore list
    Shuffle,
}

/// Selected movie, current genre choice and the rows on display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExploreSession {
    selected: Option<usize>,
    genres: Vec<GenreId>,
    explore: Vec<usize>,
}

impl ExploreSession {
    /// Nothing selected, a random explore list
    pub fn start<R: Rng + ?Sized>(engine: &RecommendationEngine, rng: &mut R) -> Self {
        Self {
            selected: None,
            genres: Vec::new(),
            explore: engine.explore_sample(rng),
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn genres(&self) -> &[GenreId] {
        &self.genres
    }

    /// Rows currently on display, in display order
    pub fn explore(&self) -> &[usize] {
        &self.explore
    }

    /// Apply one user action and return the next state
    pub fn apply<R: Rng + ?Sized>(
        self,
        action: SessionAction,
        engine: &RecommendationEngine,
        rng: &mut R,
    ) -> Self {
        debug!("Session action: {:?}", action);

        match action {
            SessionAction::Submit { title } => {
                // without a title the previous selection is shown again
                let selected = match title {
                    Some(title) => engine.table().find_by_title(&title),
                    None => self.selected,
                };
                let explore = match selected {
                    Some(row) => recommended_rows(engine, row),
                    None if !self.genres.is_empty() => engine.browse(&self.genres, None),
                    None => engine.explore_sample(rng),
                };
                Self {
                    selected,
                    explore,
                    ..self
                }
            }
            SessionAction::ApplyGenreFilter { genres } => {
                if genres.is_empty() {
                    return Self {
                        genres,
                        ..self
                    };
                }
                let explore = engine.browse(&genres, None);
                Self {
                    genres,
                    explore,
                    ..self
                }
            }
            SessionAction::Surprise => match engine.surprise(rng) {
                Some(row) => Self {
                    selected: Some(row),
                    ..self
                },
                None => self,
            },
            SessionAction::Pick { row } => {
                if row < engine.table().len() {
                    self.select(engine, row)
                } else {
                    self
                }
            }
            SessionAction::Shuffle => Self {
                explore: engine.explore_sample(rng),
                ..self
            },
        }
    }

    fn select(self, engine: &RecommendationEngine, row: usize) -> Self {
        Self {
            selected: Some(row),
            explore: recommended_rows(engine, row),
            ..self
        }
    }
}

fn recommended_rows(engine: &RecommendationEngine, row: usize) -> Vec<usize> {
    engine
        .recommend_row(row, engine.config().top_k)
        .into_iter()
        .map(|rec| rec.row)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use data_loader::{Movie, MovieTable};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn create_test_engine() -> RecommendationEngine {
        let table = MovieTable::from_movies(vec![
            Movie::new(1, "Alien", vec![27, 878]),
            Movie::new(2, "Aliens", vec![28, 27, 878]),
            Movie::new(3, "Up", vec![16, 12]),
            Movie::new(4, "Heat", vec![28, 80]),
            Movie::new(5, "Big", vec![35]),
        ]);
        let config = EngineConfig::new().with_top_k(2).with_explore_sample_size(3);
        RecommendationEngine::from_table(table, config).unwrap()
    }

    #[test]
    fn test_start_samples_explore_list() {
        let engine = create_test_engine();
        let mut rng = StdRng::seed_from_u64(42);

        let session = ExploreSession::start(&engine, &mut rng);
        assert_eq!(session.selected(), None);
        assert_eq!(session.explore().len(), 3);
    }

    #[test]
    fn test_submit_known_title_shows_recommendations() {
        let engine = create_test_engine();
        let mut rng = StdRng::seed_from_u64(42);

        let session = ExploreSession::default().apply(
            SessionAction::Submit { title: Some(" alien ".into()) },
            &engine,
            &mut rng,
        );
        assert_eq!(session.selected(), Some(0));
        assert_eq!(session.explore()[0], 1);
        assert_eq!(session.explore().len(), 2);
    }

    #[test]
    fn test_submit_unknown_title_falls_back_to_genres() {
        let engine = create_test_engine();
        let mut rng = StdRng::seed_from_u64(42);

        let session = ExploreSession::default()
            .apply(SessionAction::ApplyGenreFilter { genres: vec![28] }, &engine, &mut rng)
            .apply(SessionAction::Submit { title: Some("Nope".into()) }, &engine, &mut rng);

        assert_eq!(session.selected(), None);
        assert_eq!(session.genres(), &[28]);
        assert_eq!(session.explore(), &[1, 3]);
    }

    #[test]
    fn test_submit_unknown_title_without_genres_samples() {
        let engine = create_test_engine();
        let mut rng = StdRng::seed_from_u64(42);

        let session = ExploreSession::default()
            .apply(SessionAction::Submit { title: Some("Nope".into()) }, &engine, &mut rng);
        assert_eq!(session.selected(), None);
        assert_eq!(session.explore().len(), 3);
    }

    #[test]
    fn test_empty_genre_filter_keeps_explore_list() {
        let engine = create_test_engine();
        let mut rng = StdRng::seed_from_u64(42);

        let before = ExploreSession::default()
            .apply(SessionAction::Pick { row: 3 }, &engine, &mut rng);
        let after = before
            .clone()
            .apply(SessionAction::ApplyGenreFilter { genres: vec![] }, &engine, &mut rng);

        assert_eq!(after.explore(), before.explore());
        assert_eq!(after.selected(), Some(3));
    }

    #[test]
    fn test_pick_and_surprise_select_a_row() {
        let engine = create_test_engine();
        let mut rng = StdRng::seed_from_u64(42);

        let session = ExploreSession::default()
            .apply(SessionAction::Pick { row: 1 }, &engine, &mut rng);
        assert_eq!(session.selected(), Some(1));
        assert!(!session.explore().contains(&1));

        let unchanged = session
            .clone()
            .apply(SessionAction::Pick { row: 99 }, &engine, &mut rng);
        assert_eq!(unchanged, session);

        let surprised = session
            .clone()
            .apply(SessionAction::Surprise, &engine, &mut rng);
        let row = surprised.selected().unwrap();
        assert!(row < 5);
        assert_eq!(surprised.explore(), session.explore());
    }

    #[test]
    fn test_submit_without_title_reshows_selection() {
        let engine = create_test_engine();
        let mut rng = StdRng::seed_from_u64(42);

        let picked = ExploreSession::default()
            .apply(SessionAction::Pick { row: 0 }, &engine, &mut rng)
            .apply(SessionAction::Shuffle, &engine, &mut rng);
        let session = picked.apply(SessionAction::Submit { title: None }, &engine, &mut rng);

        assert_eq!(session.selected(), Some(0));
        assert_eq!(session.explore()[0], 1);
        assert_eq!(session.explore().len(), 2);
    }

    #[test]
    fn test_submit_without_title_or_selection_samples() {
        let engine = create_test_engine();
        let mut rng = StdRng::seed_from_u64(42);

        let session = ExploreSession::default()
            .apply(SessionAction::Submit { title: None }, &engine, &mut rng);
        assert_eq!(session.selected(), None);
        assert_eq!(session.explore().len(), 3);
    }

    #[test]
    fn test_shuffle_keeps_selection() {
        let engine = create_test_engine();
        let mut rng = StdRng::seed_from_u64(42);

        let session = ExploreSession::default()
            .apply(SessionAction::Pick { row: 2 }, &engine, &mut rng)
            .apply(SessionAction::Shuffle, &engine, &mut rng);
        assert_eq!(session.selected(), Some(2));
        assert_eq!(session.explore().len(), 3);
    }
}
