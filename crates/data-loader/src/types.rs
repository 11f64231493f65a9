//! Core domain types for the movie catalog.
//!
//! `Movie` is one cleaned row of the catalog. `MovieTable` owns every row in
//! its original order plus the lookups built on top of it. Row indices
//! (`usize` positions into the table) are the currency the rest of the
//! workspace uses: feature rows and similarity rows are aligned by them.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Catalog identifier of a movie (TMDB id)
pub type MovieId = u32;

/// Numeric genre identifier (TMDB genre id, e.g. 28 = Action)
pub type GenreId = u32;

/// Base URL the presentation layer prefixes onto poster and backdrop paths
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

// =============================================================================
// Raw input
// =============================================================================

/// Cell values read as missing, besides the empty cell. Matched exactly,
/// as the common dataframe readers do (`"NaN"` is missing, `" NaN"` is not).
pub const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a raw cell counts as a missing value
pub fn is_missing(value: &str) -> bool {
    value.is_empty() || MISSING_MARKERS.contains(&value)
}

fn missing_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !is_missing(v)))
}

/// One CSV record before normalization.
///
/// Every field is optional: an empty cell or a missing marker such as `NaN`
/// deserializes to `None`, which is how a "missing" value is detected.
/// Columns not listed here are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovieRecord {
    #[serde(default, deserialize_with = "missing_as_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub original_title: Option<String>,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub original_language: Option<String>,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub popularity: Option<String>,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub vote_average: Option<String>,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub vote_count: Option<String>,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub genre_ids: Option<String>,
}

// =============================================================================
// Movie
// =============================================================================

/// A cleaned catalog row.
///
/// `genres_combined` and `title_normalized` are derived when the movie is
/// built and are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub original_title: String,
    pub original_language: String,
    pub overview: String,
    pub popularity: f64,
    /// Path fragment, joined with an image base URL for display
    pub poster_path: String,
    pub backdrop_path: String,
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: u32,
    pub genre_ids: Vec<GenreId>,
    pub(crate) genres_combined: String,
    pub(crate) title_normalized: String,
}

impl Movie {
    /// Build a movie with only the fields the recommender cares about.
    ///
    /// The remaining descriptive fields start empty/zero and can be filled in
    /// through the public fields.
    pub fn new(id: MovieId, title: impl Into<String>, genre_ids: Vec<GenreId>) -> Self {
        let title = title.into();
        Self {
            id,
            original_title: title.clone(),
            original_language: String::new(),
            overview: String::new(),
            popularity: 0.0,
            poster_path: String::new(),
            backdrop_path: String::new(),
            release_date: String::new(),
            vote_average: 0.0,
            vote_count: 0,
            genres_combined: combine_genres(&genre_ids),
            title_normalized: normalize_title(&title),
            genre_ids,
            title,
        }
    }

    /// Space-joined genre ids, the bag of tokens fed to the vectorizer
    pub fn genres_combined(&self) -> &str {
        &self.genres_combined
    }

    /// Lowercased, trimmed title used as the lookup key
    pub fn title_normalized(&self) -> &str {
        &self.title_normalized
    }

    pub fn has_genre(&self, genre: GenreId) -> bool {
        self.genre_ids.contains(&genre)
    }

    /// Year from a `YYYY-MM-DD` release date
    ///
    /// Example: "2010-07-15" -> Some(2010)
    ///          "unknown" -> None
    pub fn release_year(&self) -> Option<u16> {
        self.release_date.get(..4)?.parse().ok()
    }

    /// Full poster URL for display. The path is not validated.
    pub fn poster_url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.poster_path)
    }
}

/// Normalize a title for case- and whitespace-insensitive lookup
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Join genre ids with single spaces; an empty list gives an empty string
pub fn combine_genres(genre_ids: &[GenreId]) -> String {
    genre_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Load report
// =============================================================================

/// Counts collected while normalizing a catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    /// Rows dropped because a required field was missing
    pub rows_dropped: usize,
}

// =============================================================================
// MovieTable - the cleaned catalog
// =============================================================================

/// The cleaned catalog, in original row order, with its lookups.
///
/// Built once per load and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct MovieTable {
    pub(crate) movies: Vec<Movie>,
    /// normalized title -> first row carrying it
    pub(crate) title_index: HashMap<String, usize>,
    /// genre id -> rows tagged with it, ascending
    pub(crate) genre_index: BTreeMap<GenreId, Vec<usize>>,
    pub(crate) report: LoadReport,
}

impl MovieTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from already-cleaned movies, keeping their order
    pub fn from_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        let mut table = Self::new();
        for movie in movies {
            table.insert_movie(movie);
        }
        table.report.rows_read = table.len();
        table.report.rows_kept = table.len();
        table
    }

    /// Append a movie and update the lookups.
    ///
    /// The title index keeps the first row for a normalized title, so later
    /// duplicates never shadow earlier ones.
    pub fn insert_movie(&mut self, movie: Movie) {
        let row = self.movies.len();

        self.title_index
            .entry(movie.title_normalized.clone())
            .or_insert(row);

        for &genre in &movie.genre_ids {
            let rows = self.genre_index.entry(genre).or_default();
            // a genre listed twice on one movie still indexes the row once
            if rows.last() != Some(&row) {
                rows.push(row);
            }
        }

        self.movies.push(movie);
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Get a movie by row index
    pub fn get(&self, row: usize) -> Option<&Movie> {
        self.movies.get(row)
    }

    /// All movies in row order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Resolve a title (any case, surrounding whitespace) to its row.
    ///
    /// When several rows share the normalized title, the first one by row
    /// order wins.
    pub fn find_by_title(&self, title: &str) -> Option<usize> {
        self.title_index.get(&normalize_title(title)).copied()
    }

    /// Rows tagged with a genre, ascending. Empty for unknown genres.
    pub fn rows_with_genre(&self, genre: GenreId) -> &[usize] {
        self.genre_index
            .get(&genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every genre id present in the catalog with the number of movies
    /// tagged with it, ordered by genre id
    pub fn genre_counts(&self) -> Vec<(GenreId, usize)> {
        self.genre_index
            .iter()
            .map(|(&genre, rows)| (genre, rows.len()))
            .collect()
    }

    /// The vectorizer input column, aligned with row order
    pub fn genres_combined(&self) -> Vec<&str> {
        self.movies.iter().map(|m| m.genres_combined()).collect()
    }

    /// Counts from the load that produced this table
    pub fn report(&self) -> LoadReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_missing() {
        for marker in ["", "NaN", "nan", "NA", "N/A", "null", "NULL", "None", "<NA>", "#N/A"] {
            assert!(is_missing(marker), "{:?}", marker);
        }
        for value in ["0", "Nana", " NaN", "none", "Inception"] {
            assert!(!is_missing(value), "{:?}", value);
        }
    }

    #[test]
    fn test_derived_fields() {
        let movie = Movie::new(27205, "  Inception ", vec![28, 878, 12]);
        assert_eq!(movie.genres_combined(), "28 878 12");
        assert_eq!(movie.title_normalized(), "inception");
    }

    #[test]
    fn test_empty_genres_combine_to_empty_string() {
        let movie = Movie::new(1, "Untagged", vec![]);
        assert_eq!(movie.genres_combined(), "");
    }

    #[test]
    fn test_release_year() {
        let mut movie = Movie::new(1, "Dated", vec![18]);
        movie.release_date = "2010-07-15".to_string();
        assert_eq!(movie.release_year(), Some(2010));

        movie.release_date = "n/a".to_string();
        assert_eq!(movie.release_year(), None);
    }

    #[test]
    fn test_poster_url() {
        let mut movie = Movie::new(1, "Poster", vec![18]);
        movie.poster_path = "/abc.jpg".to_string();
        assert_eq!(
            movie.poster_url(DEFAULT_IMAGE_BASE_URL),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_genre_index_dedupes_repeated_genre() {
        let table = MovieTable::from_movies(vec![Movie::new(1, "Twice", vec![35, 35])]);
        assert_eq!(table.rows_with_genre(35), &[0]);
    }
}
