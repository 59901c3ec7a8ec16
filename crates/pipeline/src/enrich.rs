//! Metadata enrichment for ranked candidates.
//!
//! Attaches the display fields from the metadata table: cleaned genre names,
//! the top three cast names, the overview and the TMDB id.
//!
//! Anything in the genre or cast column that is not a
//! string holding a list of name records becomes an empty string; a bad
//! field never fails the request.

use crate::literal::{self, Literal};
use data_loader::{Artifacts, TmdbId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sources::Candidate;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

/// Separator used when joining names
pub const NAME_SEPARATOR: &str = ", ";

/// Number of cast names kept on a recommendation
pub const TOP_CAST: usize = 3;

/// A fully enriched recommendation, as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub similarity: f32,
    #[serde(rename = "tmdbId")]
    pub tmdb_id: Option<TmdbId>,
    pub genres: String,
    pub cast: String,
    pub overview: Option<String>,
}

/// A ranked candidate has no metadata row.
///
/// The artifact build guarantees a row for every title, so this means the
/// artifacts are mismatched; it is not recoverable per request.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("No metadata row for title '{title}'")]
pub struct MetadataMissing {
    pub title: String,
}

/// Joins ranked candidates with the metadata table
#[derive(Clone)]
pub struct MetadataEnricher {
    artifacts: Arc<Artifacts>,
}

impl MetadataEnricher {
    pub fn new(artifacts: Arc<Artifacts>) -> Self {
        Self { artifacts }
    }

    /// Enrich one candidate (exact title match, first row wins)
    pub fn enrich(&self, candidate: Candidate) -> Result<Recommendation, MetadataMissing> {
        let Some(metadata) = self.artifacts.metadata.get(&candidate.title) else {
            return Err(MetadataMissing {
                title: candidate.title,
            });
        };

        Ok(Recommendation {
            genres: parse_name_list(&metadata.genres, "name"),
            cast: top_cast(&parse_name_list(&metadata.cast, "name")),
            tmdb_id: metadata.tmdb_id,
            overview: metadata.overview.clone(),
            similarity: candidate.similarity,
            title: candidate.title,
        })
    }

    /// Enrich every candidate, stopping at the first missing row
    pub fn enrich_all(&self, candidates: Vec<Candidate>) -> Result<Vec<Recommendation>, MetadataMissing> {
        candidates
            .into_iter()
            .map(|candidate| self.enrich(candidate))
            .collect()
    }
}

/// Turn a raw `[{name: ...}, ...]` field into `"A, B, C"`.
///
/// Returns an empty string when the raw value is not a string, does not
/// parse, is not a list, or contains something other than records with a
/// string under `key`. A record without `key` contributes an empty name.
pub fn parse_name_list(raw: &Value, key: &str) -> String {
    let Some(text) = raw.as_str() else {
        return String::new();
    };

    let items = match literal::parse(text) {
        Ok(Literal::List(items)) => items,
        Ok(_) => {
            trace!("Metadata field is not a list");
            return String::new();
        }
        Err(e) => {
            trace!("Unparseable metadata field: {}", e);
            return String::new();
        }
    };

    let mut names = Vec::with_capacity(items.len());
    for item in &items {
        if !matches!(item, Literal::Dict(_)) {
            return String::new();
        }
        match item.get(key) {
            None => names.push(""),
            Some(Literal::Str(name)) => names.push(name.as_str()),
            Some(_) => return String::new(),
        }
    }

    names.join(NAME_SEPARATOR)
}

/// Keep the first three names of a joined cast string.
///
/// This splits the already-joined string on `", "` rather than truncating the
/// record list, so a name that itself contains `", "` is cut in two and
/// counts twice. Existing clients see this output, so it is kept as is.
pub fn top_cast(joined: &str) -> String {
    joined
        .split(NAME_SEPARATOR)
        .take(TOP_CAST)
        .collect::<Vec<_>>()
        .join(NAME_SEPARATOR)
}
