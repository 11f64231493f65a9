//! Parser for the movie catalog CSV.
//!
//! Expected header (extra columns are ignored, order does not matter):
//! `id,title,original_title,original_language,overview,popularity,
//! poster_path,backdrop_path,release_date,vote_average,vote_count,genre_ids`
//!
//! `genre_ids` holds a serialized list literal such as `[28, 12, 878]`.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Columns every record must provide. A record with any of them empty is
/// dropped; a header without one of them is an error.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "id",
    "title",
    "original_title",
    "original_language",
    "overview",
    "popularity",
    "poster_path",
    "backdrop_path",
    "release_date",
    "vote_average",
    "vote_count",
    "genre_ids",
];

/// Parse the catalog file at `path`
pub fn parse_movies(path: &Path) -> Result<(Vec<Movie>, LoadReport)> {
    let file = File::open(path).map_err(|_| DataLoadError::FileNotFound {
        path: path.display().to_string(),
    })?;
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_movies_from_reader(file, &label)
}

/// Parse catalog CSV from any reader.
///
/// `file` is only used to label errors.
pub fn parse_movies_from_reader<R: Read>(reader: R, file: &str) -> Result<(Vec<Movie>, LoadReport)> {
    let csv_error = |source: csv::Error| DataLoadError::Csv {
        file: file.to_string(),
        source,
    };

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(DataLoadError::MissingColumn {
                file: file.to_string(),
                column: column.to_string(),
            });
        }
    }
    let headers = trimmed_headers(&headers);

    let mut movies = Vec::new();
    let mut report = LoadReport::default();
    let mut record = StringRecord::new();

    while reader.read_record(&mut record).map_err(csv_error)? {
        report.rows_read += 1;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(report.rows_read + 1);

        let raw: RawMovieRecord = record.deserialize(Some(&headers)).map_err(csv_error)?;

        match normalize_record(raw, file, line)? {
            Some(movie) => movies.push(movie),
            None => {
                debug!("Dropping incomplete row at line {} in {}", line, file);
                report.rows_dropped += 1;
            }
        }
    }

    report.rows_kept = movies.len();
    Ok((movies, report))
}

fn trimmed_headers(headers: &StringRecord) -> StringRecord {
    headers.iter().map(str::trim).collect()
}

/// Turn a raw record into a `Movie`.
///
/// Returns `Ok(None)` when a required field is missing: the row is dropped,
/// not reported as an error. Fields that are present but malformed are
/// errors.
pub fn normalize_record(raw: RawMovieRecord, file: &str, line: usize) -> Result<Option<Movie>> {
    let RawMovieRecord {
        id: Some(id),
        title: Some(title),
        original_title: Some(original_title),
        original_language: Some(original_language),
        overview: Some(overview),
        popularity: Some(popularity),
        poster_path: Some(poster_path),
        backdrop_path: Some(backdrop_path),
        release_date: Some(release_date),
        vote_average: Some(vote_average),
        vote_count: Some(vote_count),
        genre_ids: Some(genre_ids),
    } = raw
    else {
        return Ok(None);
    };

    let genre_ids = parse_genre_literal(&genre_ids).map_err(|reason| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason,
    })?;

    let movie = Movie {
        id: parse_integer(&id, "id", line)?,
        genres_combined: combine_genres(&genre_ids),
        title_normalized: normalize_title(&title),
        title,
        original_title,
        original_language,
        overview,
        popularity: parse_float(&popularity, "popularity", line)?,
        poster_path,
        backdrop_path,
        release_date,
        vote_average: parse_float(&vote_average, "vote_average", line)?,
        vote_count: parse_integer(&vote_count, "vote_count", line)?,
        genre_ids,
    };

    Ok(Some(movie))
}

/// Parse a serialized genre list into genre ids.
///
/// Accepts a list `[...]` or tuple `(...)` of decimal integers, with any
/// whitespace and an optional trailing comma. A one-element tuple needs its
/// trailing comma, `(28)` is not a sequence.
///
/// Example: "[28, 12, 878]" -> Ok(vec![28, 12, 878])
///          "[]"            -> Ok(vec![])
///          "Action"        -> Err(..)
pub fn parse_genre_literal(text: &str) -> std::result::Result<Vec<GenreId>, String> {
    let trimmed = text.trim();

    let (inner, is_tuple) = if let Some(rest) = trimmed.strip_prefix('[') {
        let inner = rest
            .strip_suffix(']')
            .ok_or_else(|| format!("unterminated list literal: {:?}", text))?;
        (inner, false)
    } else if let Some(rest) = trimmed.strip_prefix('(') {
        let inner = rest
            .strip_suffix(')')
            .ok_or_else(|| format!("unterminated tuple literal: {:?}", text))?;
        (inner, true)
    } else {
        return Err(format!("expected a list literal like [28, 12], got {:?}", text));
    };

    let inner = inner.trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }

    let mut parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    let trailing_comma = parts.last() == Some(&"");
    if trailing_comma {
        parts.pop();
    }
    if is_tuple && parts.len() == 1 && !trailing_comma {
        return Err(format!("not a sequence literal: {:?}", text));
    }

    parts
        .into_iter()
        .map(|part| {
            part.parse::<GenreId>()
                .map_err(|e| format!("invalid genre id {:?} in {:?}: {}", part, text, e))
        })
        .collect()
}

/// Parse an integer column, also accepting integral floats such as `"152.0"`
/// that appear when a numeric column passed through a float type upstream.
fn parse_integer<T>(value: &str, field: &str, line: usize) -> Result<T>
where
    T: std::str::FromStr + TryFrom<u64>,
{
    let value = value.trim();
    if let Ok(parsed) = value.parse::<T>() {
        return Ok(parsed);
    }

    let invalid = || DataLoadError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        line,
    };

    let float: f64 = value.parse().map_err(|_| invalid())?;
    if float.fract() != 0.0 || float < 0.0 || float > u64::MAX as f64 {
        return Err(invalid());
    }
    T::try_from(float as u64).map_err(|_| invalid())
}

fn parse_float(value: &str, field: &str, line: usize) -> Result<f64> {
    value.trim().parse().map_err(|_| DataLoadError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,title,original_title,original_language,overview,popularity,poster_path,backdrop_path,release_date,vote_average,vote_count,genre_ids";

    fn csv_with(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn test_parse_genre_literal() {
        assert_eq!(parse_genre_literal("[28, 12, 878]"), Ok(vec![28, 12, 878]));
        assert_eq!(parse_genre_literal("  [ 18 ]  "), Ok(vec![18]));
        assert_eq!(parse_genre_literal("[]"), Ok(vec![]));
        assert_eq!(parse_genre_literal("[35,]"), Ok(vec![35]));
        assert_eq!(parse_genre_literal("(16, 10751)"), Ok(vec![16, 10751]));
        assert_eq!(parse_genre_literal("(16,)"), Ok(vec![16]));
    }

    #[test]
    fn test_parse_genre_literal_rejects_malformed() {
        assert!(parse_genre_literal("28, 12").is_err());
        assert!(parse_genre_literal("[28, 12").is_err());
        assert!(parse_genre_literal("['Action']").is_err());
        assert!(parse_genre_literal("[28,,12]").is_err());
        assert!(parse_genre_literal("[,]").is_err());
        assert!(parse_genre_literal("(28)").is_err());
        assert!(parse_genre_literal("[-5]").is_err());
    }

    #[test]
    fn test_parse_rows() {
        let text = csv_with(&[
            r#"27205,Inception,Inception,en,A thief who steals secrets.,83.9,/inception.jpg,/inception_bg.jpg,2010-07-15,8.4,35000,"[28, 878, 12]""#,
            r#"13,Forrest Gump,Forrest Gump,en,Life is a box of chocolates.,60.1,/gump.jpg,/gump_bg.jpg,1994-06-23,8.5,26000,"[35 , 18]""#,
        ]);

        let (movies, report) = parse_movies_from_reader(text.as_bytes(), "movies.csv").unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(report.rows_read, 2);
        assert_eq!(report.rows_kept, 2);
        assert_eq!(report.rows_dropped, 0);

        assert_eq!(movies[0].id, 27205);
        assert_eq!(movies[0].genre_ids, vec![28, 878, 12]);
        assert_eq!(movies[0].genres_combined(), "28 878 12");
        assert_eq!(movies[0].vote_count, 35000);
        assert_eq!(movies[1].title_normalized(), "forrest gump");
        assert_eq!(movies[1].genre_ids, vec![35, 18]);
    }

    #[test]
    fn test_incomplete_rows_are_dropped() {
        let text = csv_with(&[
            "1,Complete,Complete,en,Fine.,1.0,/a.jpg,/a_bg.jpg,2000-01-01,7.0,10,[18]",
            "2,No Backdrop,No Backdrop,en,Missing.,1.0,/b.jpg,,2000-01-01,7.0,10,[18]",
            "3,No Genres Field,No Genres Field,en,Missing.,1.0,/c.jpg,/c_bg.jpg,2000-01-01,7.0,10,",
        ]);

        let (movies, report) = parse_movies_from_reader(text.as_bytes(), "movies.csv").unwrap();

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, 1);
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_dropped, 2);
    }

    #[test]
    fn test_missing_markers_drop_the_row() {
        let text = csv_with(&[
            "1,Nan Popularity,Nan Popularity,en,Ok.,NaN,/a.jpg,/a_bg.jpg,2000-01-01,7.0,10,[18]",
            "2,Na Overview,Na Overview,en,NA,1.0,/b.jpg,/b_bg.jpg,2000-01-01,7.0,10,[18]",
            "3,Null Date,Null Date,en,Ok.,1.0,/c.jpg,/c_bg.jpg,null,7.0,10,[18]",
            "4,Kept,Kept,en, NA,1.0,/d.jpg,/d_bg.jpg,2000-01-01,7.0,10,[18]",
        ]);

        let (movies, report) = parse_movies_from_reader(text.as_bytes(), "movies.csv").unwrap();

        assert_eq!(report.rows_read, 4);
        assert_eq!(report.rows_dropped, 3);
        assert_eq!(movies.len(), 1);
        // only exact markers count as missing
        assert_eq!(movies[0].overview, " NA");
        assert!(movies.iter().all(|m| !m.popularity.is_nan()));
    }

    #[test]
    fn test_empty_genre_list_is_kept() {
        let text = csv_with(&["4,Untagged,Untagged,en,None.,1.0,/d.jpg,/d_bg.jpg,2000-01-01,7.0,10,[]"]);

        let (movies, _) = parse_movies_from_reader(text.as_bytes(), "movies.csv").unwrap();

        assert_eq!(movies.len(), 1);
        assert!(movies[0].genre_ids.is_empty());
        assert_eq!(movies[0].genres_combined(), "");
    }

    #[test]
    fn test_malformed_genre_literal_is_fatal() {
        let text = csv_with(&[
            "1,Fine,Fine,en,Ok.,1.0,/a.jpg,/a_bg.jpg,2000-01-01,7.0,10,[18]",
            "2,Broken,Broken,en,Bad.,1.0,/b.jpg,/b_bg.jpg,2000-01-01,7.0,10,Drama",
        ]);

        let err = parse_movies_from_reader(text.as_bytes(), "movies.csv").unwrap_err();

        match err {
            DataLoadError::ParseError { file, line, .. } => {
                assert_eq!(file, "movies.csv");
                assert_eq!(line, 3);
            }
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_integral_float_counts_are_accepted() {
        let text = csv_with(&["7.0,Float Id,Float Id,en,Ok.,1.0,/a.jpg,/a_bg.jpg,2000-01-01,7.0,152.0,[18]"]);

        let (movies, _) = parse_movies_from_reader(text.as_bytes(), "movies.csv").unwrap();

        assert_eq!(movies[0].id, 7);
        assert_eq!(movies[0].vote_count, 152);
    }

    #[test]
    fn test_non_numeric_popularity_is_invalid() {
        let text = csv_with(&["1,Odd,Odd,en,Ok.,very,/a.jpg,/a_bg.jpg,2000-01-01,7.0,10,[18]"]);

        let err = parse_movies_from_reader(text.as_bytes(), "movies.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { ref field, .. } if field == "popularity"));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let text = "id,title\n1,Only Title";

        let err = parse_movies_from_reader(text.as_bytes(), "movies.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn { .. }));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let text = "adult,genre_ids,id,title,original_title,original_language,overview,popularity,poster_path,backdrop_path,release_date,vote_average,vote_count,video\n\
                    False,[99],5,Doc,Doc,en,Real.,2.5,/p.jpg,/b.jpg,2001-02-03,6.1,40,False";

        let (movies, _) = parse_movies_from_reader(text.as_bytes(), "movies.csv").unwrap();

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].genre_ids, vec![99]);
        assert_eq!(movies[0].vote_average, 6.1);
    }
}
