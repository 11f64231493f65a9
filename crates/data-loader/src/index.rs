//! MovieTable loading and query helpers.
//!
//! Loading is parse + normalize + index: the parser yields cleaned movies
//! in file order, and the table builds its title and genre lookups while
//! inserting them.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::io::Read;
use std::path::Path;
use tracing::{info, instrument};

impl MovieTable {
    /// Load and normalize the catalog CSV at `path`.
    ///
    /// Incomplete rows are dropped; malformed genre literals and numeric
    /// fields abort the load.
    #[instrument]
    pub fn load_from_csv(path: &Path) -> Result<Self> {
        info!("Loading movie catalog from {:?}", path);

        let (movies, report) = parser::parse_movies(path)?;
        let table = Self::with_report(movies, report);

        info!(
            "Loaded {} movies ({} rows read, {} incomplete rows dropped, {} genres)",
            report.rows_kept,
            report.rows_read,
            report.rows_dropped,
            table.genre_index.len()
        );
        Ok(table)
    }

    /// Same as [`MovieTable::load_from_csv`] for an in-memory or streamed source
    pub fn from_reader<R: Read>(reader: R, label: &str) -> Result<Self> {
        let (movies, report) = parser::parse_movies_from_reader(reader, label)?;
        Ok(Self::with_report(movies, report))
    }

    fn with_report(movies: Vec<Movie>, report: LoadReport) -> Self {
        let mut table = Self::from_movies(movies);
        table.report = report;
        table
    }

    /// Case-insensitive substring search over titles.
    ///
    /// Exact (normalized) matches come first, then substring matches by
    /// popularity, highest first. Ties keep row order.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let needle = normalize_title(query);
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(usize, bool)> = self
            .movies
            .iter()
            .enumerate()
            .filter(|(_, movie)| movie.title_normalized.contains(&needle))
            .map(|(row, movie)| (row, movie.title_normalized == needle))
            .collect();

        matches.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| {
                    self.movies[b.0]
                        .popularity
                        .total_cmp(&self.movies[a.0].popularity)
                })
                .then_with(|| a.0.cmp(&b.0))
        });

        matches.into_iter().map(|(row, _)| row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId, title: &str, genres: Vec<GenreId>, popularity: f64) -> Movie {
        let mut movie = Movie::new(id, title, genres);
        movie.popularity = popularity;
        movie
    }

    fn create_test_table() -> MovieTable {
        MovieTable::from_movies(vec![
            movie(1, "Star Wars", vec![12, 28, 878], 80.0),
            movie(2, "Star Trek", vec![878, 12], 40.0),
            movie(3, "The Star", vec![16], 95.0),
            movie(4, "star wars", vec![35], 5.0),
            movie(5, "Heat", vec![28, 80, 18], 30.0),
        ])
    }

    #[test]
    fn test_find_by_title_is_case_and_space_insensitive() {
        let table = create_test_table();

        assert_eq!(table.find_by_title("Heat"), Some(4));
        assert_eq!(table.find_by_title("  HEAT "), Some(4));
        assert_eq!(table.find_by_title("Cold"), None);
    }

    #[test]
    fn test_duplicate_titles_resolve_to_first_row() {
        let table = create_test_table();

        assert_eq!(table.find_by_title("STAR WARS"), Some(0));
        assert_eq!(table.find_by_title("star wars"), Some(0));
    }

    #[test]
    fn test_genre_index() {
        let table = create_test_table();

        assert_eq!(table.rows_with_genre(878), &[0, 1]);
        assert_eq!(table.rows_with_genre(28), &[0, 4]);
        assert!(table.rows_with_genre(99).is_empty());

        let counts = table.genre_counts();
        assert_eq!(counts.first(), Some(&(12, 2)));
        assert!(counts.contains(&(878, 2)));
        assert!(counts.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_search_orders_exact_then_popularity() {
        let table = create_test_table();

        let rows = table.search("star wars");
        assert_eq!(rows, vec![0, 3]);

        let rows = table.search("STAR");
        // no exact match; by popularity: The Star, Star Wars, Star Trek, star wars
        assert_eq!(rows, vec![2, 0, 1, 3]);

        assert!(table.search("   ").is_empty());
    }

    #[test]
    fn test_from_reader_keeps_report() {
        let text = "id,title,original_title,original_language,overview,popularity,poster_path,backdrop_path,release_date,vote_average,vote_count,genre_ids\n\
                    1,A,A,en,x,1.0,/a.jpg,/a_bg.jpg,2000-01-01,7.0,10,[18]\n\
                    2,B,B,en,,1.0,/b.jpg,/b_bg.jpg,2000-01-01,7.0,10,[18]";

        let table = MovieTable::from_reader(text.as_bytes(), "inline.csv").unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.report().rows_read, 2);
        assert_eq!(table.report().rows_dropped, 1);
    }
}
