//! Core domain types for the recommendation artifacts.
//!
//! The artifacts are produced offline by the model build and are read-only
//! once loaded. Three pieces are joined together here:
//! - the title index (position -> title, title -> first position)
//! - the feature matrix (position -> feature vector)
//! - the metadata table (title -> display metadata)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

// =============================================================================
// Type Aliases
// =============================================================================

/// Row position in the title index and the feature matrix
pub type ItemPosition = usize;

/// Stable movie identifier used by the metadata table
pub type MovieId = u32;

/// External (TMDB) identifier attached to recommendations
pub type TmdbId = i64;

// =============================================================================
// Title Index
// =============================================================================

/// Ordered sequence of titles. Position is the join key into the feature
/// matrix and the similarity index.
///
/// Duplicate titles are allowed in the sequence, but lookup by title always
/// resolves to the first occurrence.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    titles: Vec<String>,
    first_position: HashMap<String, ItemPosition>,
}

impl TitleIndex {
    /// Build the index from titles in position order
    pub fn new(titles: Vec<String>) -> Self {
        let mut first_position = HashMap::with_capacity(titles.len());
        for (position, title) in titles.iter().enumerate() {
            first_position.entry(title.clone()).or_insert(position);
        }
        Self {
            titles,
            first_position,
        }
    }

    /// Position of the first occurrence of `title`
    pub fn position(&self, title: &str) -> Option<ItemPosition> {
        self.first_position.get(title).copied()
    }

    /// Title stored at `position`
    pub fn title(&self, position: ItemPosition) -> Option<&str> {
        self.titles.get(position).map(String::as_str)
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Case-insensitive substring search over the index.
    ///
    /// Exact (case-insensitive) matches come first, then substring matches,
    /// each group in position order.
    pub fn search(&self, query: &str) -> Vec<(ItemPosition, &str)> {
        let query = query.to_lowercase();
        let mut exact = Vec::new();
        let mut partial = Vec::new();

        for (position, title) in self.titles.iter().enumerate() {
            let lowered = title.to_lowercase();
            if lowered == query {
                exact.push((position, title.as_str()));
            } else if lowered.contains(&query) {
                partial.push((position, title.as_str()));
            }
        }

        exact.extend(partial);
        exact
    }
}

// =============================================================================
// Feature Matrix
// =============================================================================

/// Dense row-major feature matrix, one row per title position
#[derive(Debug, Clone, Default)]
pub struct FeatureMatrix {
    dimension: usize,
    values: Vec<f32>,
}

impl FeatureMatrix {
    /// Build a matrix from rows that all have the same width.
    ///
    /// Callers (the parser) are responsible for checking the widths; a
    /// ragged input is truncated to the first row's width here.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Self {
        let dimension = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut values = Vec::with_capacity(rows.len() * dimension);
        for row in rows {
            values.extend(row.into_iter().take(dimension));
        }
        Self { dimension, values }
    }

    /// Feature vector of the item at `position`
    pub fn row(&self, position: ItemPosition) -> Option<&[f32]> {
        if self.dimension == 0 {
            return None;
        }
        let start = position.checked_mul(self.dimension)?;
        self.values.get(start..start + self.dimension)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.values.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over rows in position order
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks_exact(self.dimension.max(1))
    }
}

// =============================================================================
// Metadata Table
// =============================================================================

/// One row of the metadata table.
///
/// `genres` and `cast` are kept as raw JSON values: the build writes them as
/// strings holding a textual list of `{name: ...}` records, but missing data
/// shows up as `null` or a number. Cleaning happens at enrichment time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieMetadata {
    pub id: MovieId,
    pub title: String,
    #[serde(rename = "tmdbId", default)]
    pub tmdb_id: Option<TmdbId>,
    #[serde(default)]
    pub genres: Value,
    #[serde(default)]
    pub cast: Value,
    #[serde(default)]
    pub overview: Option<String>,
}

/// Metadata rows keyed by exact title, first row wins on duplicates
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    rows: Vec<MovieMetadata>,
    by_title: HashMap<String, usize>,
}

impl MetadataTable {
    pub fn new(rows: Vec<MovieMetadata>) -> Self {
        let mut by_title = HashMap::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            by_title.entry(row.title.clone()).or_insert(idx);
        }
        Self { rows, by_title }
    }

    /// Metadata for `title` (exact match)
    pub fn get(&self, title: &str) -> Option<&MovieMetadata> {
        self.by_title.get(title).map(|&idx| &self.rows[idx])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Artifacts - the loaded model bundle
// =============================================================================

/// Everything the recommender needs, loaded once at startup.
///
/// The feature matrix sits behind an `Arc` so the similarity index can hold
/// the same rows without copying them.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub titles: TitleIndex,
    pub features: Arc<FeatureMatrix>,
    pub metadata: MetadataTable,
}

impl Artifacts {
    pub fn new(titles: TitleIndex, features: FeatureMatrix, metadata: MetadataTable) -> Self {
        Self {
            titles,
            features: Arc::new(features),
            metadata,
        }
    }

    /// Get counts for debugging/validation: (titles, feature rows, metadata rows)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.titles.len(), self.features.len(), self.metadata.len())
    }
}
