//! Feature builder: raw merged records to normalized tag strings.
//!
//! Each movie's heterogeneous metadata (overview text, genre and keyword
//! lists, cast, director) is reduced to a single bag-of-words "tag string".
//! The structured columns are JSON lists of objects embedded as strings;
//! they are decoded with typed serde structs, and any column that fails to
//! decode degrades to an empty list rather than failing the record.

use data_loader::{MergedMovie, MovieId, NamedEntity, CrewEntry};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// How many cast members contribute tags, in source (billing) order.
const CAST_LIMIT: usize = 3;

/// One catalog entry: the reduced representation persisted in the artifact.
///
/// The catalog is an ordered sequence of these records; the row index is the
/// identity used by the similarity matrix and must never change without a
/// full rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    /// Normalized, space-joined, lowercase bag of words
    pub tags: String,
}

/// Normalize free text: lowercase, keep only `[a-z0-9]` and whitespace,
/// collapse whitespace runs, trim.
pub fn clean_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            out.push(ch.to_ascii_lowercase());
            pending_space = false;
        } else if ch.is_whitespace() {
            pending_space = true;
        }
        // every other character is stripped
    }
    out
}

/// Decode a `[{.., "name": ..}, ..]` column into its names.
/// Unparseable input degrades to an empty list.
fn parse_names(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<NamedEntity>>(raw) {
        Ok(entries) => entries.into_iter().map(|e| e.name).collect(),
        Err(_) => Vec::new(),
    }
}

/// Decode the cast column, keeping at most the first [`CAST_LIMIT`] names.
fn parse_cast(raw: &str) -> Vec<String> {
    let mut names = parse_names(raw);
    names.truncate(CAST_LIMIT);
    names
}

/// Decode the crew column and extract the first entry whose job is
/// "Director". Zero or one result.
fn parse_director(raw: &str) -> Option<String> {
    match serde_json::from_str::<Vec<CrewEntry>>(raw) {
        Ok(entries) => entries
            .into_iter()
            .find(|e| e.job == "Director")
            .map(|e| e.name),
        Err(_) => None,
    }
}

/// Assemble the tag string for one merged record.
///
/// Order: overview tokens, genre names, keyword names, cast names, director.
/// Every part is normalized with [`clean_text`]; empty parts vanish.
pub fn build_tags(record: &MergedMovie) -> String {
    let mut parts: Vec<String> = Vec::new();

    let overview = clean_text(&record.overview);
    if !overview.is_empty() {
        parts.push(overview);
    }
    for name in parse_names(&record.genres) {
        push_clean(&mut parts, &name);
    }
    for name in parse_names(&record.keywords) {
        push_clean(&mut parts, &name);
    }
    for name in parse_cast(&record.cast) {
        push_clean(&mut parts, &name);
    }
    if let Some(director) = parse_director(&record.crew) {
        push_clean(&mut parts, &director);
    }

    parts.join(" ")
}

fn push_clean(parts: &mut Vec<String>, raw: &str) {
    let cleaned = clean_text(raw);
    if !cleaned.is_empty() {
        parts.push(cleaned);
    }
}

/// Reduce all merged records to catalog entries, preserving input order.
pub fn build_catalog(records: &[MergedMovie]) -> Vec<MovieRecord> {
    let catalog: Vec<MovieRecord> = records
        .par_iter()
        .map(|record| MovieRecord {
            id: record.id,
            title: record.title.clone(),
            tags: build_tags(record),
        })
        .collect();
    info!(movies = catalog.len(), "built tag catalog");
    catalog
}
