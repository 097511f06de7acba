//! Parsers for the TMDB CSV files and the title-keyed merge.
//!
//! The source files are ordinary CSV with headers; the structured columns
//! embed JSON lists inside quoted cells, which the `csv` reader unescapes
//! for us. Extra columns in either file are ignored.
//!
//! Failure policy:
//! - Missing file or missing required column: fatal ([`DataLoadError`]).
//! - A row that fails to deserialize: logged and skipped.
//! - A merged record with any null required field or an empty title:
//!   dropped, not defaulted.

use crate::error::{DataLoadError, Result};
use crate::types::{CreditsRow, MergedMovie, MovieRow};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Columns the movies CSV must carry for the build to proceed.
const REQUIRED_MOVIE_COLUMNS: &[&str] = &[
    "id",
    "title",
    "overview",
    "genres",
    "keywords",
    "release_date",
    "vote_average",
];

/// Columns the credits CSV must carry.
const REQUIRED_CREDITS_COLUMNS: &[&str] = &["movie_id", "title", "cast", "crew"];

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    csv::Reader::from_path(path).map_err(|source| DataLoadError::CsvError {
        file: path.display().to_string(),
        source,
    })
}

fn check_columns(
    reader: &mut csv::Reader<std::fs::File>,
    path: &Path,
    required: &[&str],
) -> Result<()> {
    let headers = reader
        .headers()
        .map_err(|source| DataLoadError::CsvError {
            file: path.display().to_string(),
            source,
        })?
        .clone();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataLoadError::MissingColumn {
                file: path.display().to_string(),
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}

/// Parse the movies CSV into typed rows.
pub fn parse_movies(path: &Path) -> Result<Vec<MovieRow>> {
    let mut reader = open_reader(path)?;
    check_columns(&mut reader, path, REQUIRED_MOVIE_COLUMNS)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (idx, record) in reader.deserialize::<MovieRow>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(err) => {
                skipped += 1;
                warn!(line = idx + 2, error = %err, "skipping malformed movies row");
            }
        }
    }
    info!(
        rows = rows.len(),
        skipped,
        file = %path.display(),
        "parsed movies file"
    );
    Ok(rows)
}

/// Parse the credits CSV into typed rows.
pub fn parse_credits(path: &Path) -> Result<Vec<CreditsRow>> {
    let mut reader = open_reader(path)?;
    check_columns(&mut reader, path, REQUIRED_CREDITS_COLUMNS)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (idx, record) in reader.deserialize::<CreditsRow>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(err) => {
                skipped += 1;
                warn!(line = idx + 2, error = %err, "skipping malformed credits row");
            }
        }
    }
    info!(
        rows = rows.len(),
        skipped,
        file = %path.display(),
        "parsed credits file"
    );
    Ok(rows)
}

/// Inner-join movies and credits on title, then filter.
///
/// The output order follows the movies file, which becomes the catalog row
/// order downstream; a title that appears several times in either table
/// joins cross-product style, after which exact duplicates are dropped.
/// Records with an empty title or any null required field are removed
/// entirely.
pub fn merge_records(movies: &[MovieRow], credits: &[CreditsRow]) -> Vec<MergedMovie> {
    let mut credits_by_title: HashMap<&str, Vec<&CreditsRow>> = HashMap::new();
    for row in credits {
        credits_by_title.entry(row.title.as_str()).or_default().push(row);
    }

    let mut merged = Vec::new();
    let mut seen: HashSet<MergedMovie> = HashSet::new();
    let mut dropped_null = 0usize;
    let mut dropped_dup = 0usize;

    for movie in movies {
        if movie.title.is_empty() {
            dropped_null += 1;
            continue;
        }
        let Some(matches) = credits_by_title.get(movie.title.as_str()) else {
            continue; // inner join: no credits row, no record
        };
        for credit in matches {
            let (Some(overview), Some(genres), Some(keywords), Some(cast), Some(crew)) = (
                movie.overview.as_ref(),
                movie.genres.as_ref(),
                movie.keywords.as_ref(),
                credit.cast.as_ref(),
                credit.crew.as_ref(),
            ) else {
                dropped_null += 1;
                continue;
            };
            let record = MergedMovie {
                id: movie.id,
                title: movie.title.clone(),
                overview: overview.clone(),
                genres: genres.clone(),
                keywords: keywords.clone(),
                cast: cast.clone(),
                crew: crew.clone(),
            };
            if seen.insert(record.clone()) {
                merged.push(record);
            } else {
                dropped_dup += 1;
            }
        }
    }

    debug!(
        merged = merged.len(),
        dropped_null, dropped_dup, "merged movies and credits on title"
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn movie_row(id: u32, title: &str) -> MovieRow {
        MovieRow {
            id,
            title: title.to_string(),
            overview: Some("an overview".to_string()),
            genres: Some("[]".to_string()),
            keywords: Some("[]".to_string()),
            release_date: Some("2009-12-10".to_string()),
            vote_average: Some(7.2),
        }
    }

    fn credits_row(id: u32, title: &str) -> CreditsRow {
        CreditsRow {
            movie_id: id,
            title: title.to_string(),
            cast: Some("[]".to_string()),
            crew: Some("[]".to_string()),
        }
    }

    #[test]
    fn test_merge_is_inner_join_in_movies_order() {
        let movies = vec![movie_row(1, "Avatar"), movie_row(2, "Orphan"), movie_row(3, "Spectre")];
        let credits = vec![credits_row(3, "Spectre"), credits_row(1, "Avatar")];

        let merged = merge_records(&movies, &credits);

        // "Orphan" has no credits row and is dropped; order follows movies
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "Avatar");
        assert_eq!(merged[1].title, "Spectre");
    }

    #[test]
    fn test_merge_drops_null_required_fields() {
        let mut movie = movie_row(1, "Avatar");
        movie.overview = None;
        let movies = vec![movie, movie_row(2, "Spectre")];
        let credits = vec![credits_row(1, "Avatar"), credits_row(2, "Spectre")];

        let merged = merge_records(&movies, &credits);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "Spectre");
    }

    #[test]
    fn test_merge_drops_empty_titles_and_exact_duplicates() {
        let movies = vec![movie_row(1, ""), movie_row(2, "Avatar"), movie_row(2, "Avatar")];
        let credits = vec![credits_row(2, "Avatar")];

        let merged = merge_records(&movies, &credits);

        // The two identical Avatar rows collapse to one; the empty title goes
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "Avatar");
    }

    #[test]
    fn test_merge_keeps_distinct_records_sharing_a_title() {
        // Same title, different ids: both survive (they are not exact dupes)
        let movies = vec![movie_row(10, "Batman"), movie_row(11, "Batman")];
        let credits = vec![credits_row(10, "Batman")];

        let merged = merge_records(&movies, &credits);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, 10);
        assert_eq!(merged[1].id, 11);
    }

    #[test]
    fn test_parse_movies_reads_quoted_json_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "budget,genres,id,keywords,overview,release_date,title,vote_average"
        )
        .unwrap();
        writeln!(
            file,
            r#"1000,"[{{""id"": 28, ""name"": ""Action""}}]",19995,"[]","In the 22nd century...",2009-12-10,Avatar,7.2"#
        )
        .unwrap();
        drop(file);

        let rows = parse_movies(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 19995);
        assert_eq!(rows[0].title, "Avatar");
        assert_eq!(
            rows[0].genres.as_deref(),
            Some(r#"[{"id": 28, "name": "Action"}]"#)
        );
        assert_eq!(rows[0].vote_average, Some(7.2));
    }

    #[test]
    fn test_parse_movies_empty_cell_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "genres,id,keywords,overview,release_date,title,vote_average"
        )
        .unwrap();
        writeln!(file, "[],1,[],,2001-01-01,No Overview,").unwrap();
        drop(file);

        let rows = parse_movies(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].overview.is_none());
        assert!(rows[0].vote_average.is_none());
    }

    #[test]
    fn test_parse_movies_missing_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "id,title,overview").unwrap();
        writeln!(file, "1,Avatar,whatever").unwrap();
        drop(file);

        let err = parse_movies(&path).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn { .. }));
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_credits(Path::new("/nonexistent/credits.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
