//! Loading and validating the artifact bundle.
//!
//! The three files are independent, so they are parsed in parallel and only
//! joined (and cross-checked) once all of them parsed cleanly.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File names of the artifacts inside a models directory
pub const TITLES_FILE: &str = "titles.txt";
pub const FEATURES_FILE: &str = "features.csv";
pub const METADATA_FILE: &str = "metadata.jsonl";

/// Resolved artifact paths for one models directory
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub titles: PathBuf,
    pub features: PathBuf,
    pub metadata: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            titles: dir.join(TITLES_FILE),
            features: dir.join(FEATURES_FILE),
            metadata: dir.join(METADATA_FILE),
        }
    }
}

impl Artifacts {
    /// Load the model artifacts from a directory.
    ///
    /// Steps:
    /// 1. Parse titles, features and metadata in parallel
    /// 2. Build the title and metadata lookups
    /// 3. Validate that the title index and feature matrix line up
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        info!("Loading recommendation artifacts from {:?}", dir);
        Self::load(&ArtifactPaths::in_dir(dir))
    }

    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let ((titles, features), metadata) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_titles(&paths.titles),
                    || parser::parse_features(&paths.features),
                )
            },
            || parser::parse_metadata(&paths.metadata),
        );

        let titles = titles?;
        let features = features?;
        let metadata = metadata?;

        info!(
            "Parsed {} titles, {} feature rows, {} metadata rows",
            titles.len(),
            features.len(),
            metadata.len()
        );

        let artifacts = Artifacts::new(
            TitleIndex::new(titles),
            FeatureMatrix::from_rows(features),
            MetadataTable::new(metadata),
        );

        artifacts.validate()?;

        info!("Artifacts successfully loaded and validated");
        Ok(artifacts)
    }

    /// Validate the bundle.
    ///
    /// Checks that:
    /// - the title index is not empty
    /// - there is exactly one feature row per title position
    ///
    /// Titles without a metadata row are only reported; the build is expected
    /// to guarantee them and enrichment fails loudly if one is ever ranked.
    pub fn validate(&self) -> Result<()> {
        if self.titles.is_empty() {
            return Err(DataLoadError::ValidationError(
                "Title index is empty".to_string(),
            ));
        }

        if self.features.len() != self.titles.len() {
            return Err(DataLoadError::ValidationError(format!(
                "Title index has {} entries but feature matrix has {} rows",
                self.titles.len(),
                self.features.len()
            )));
        }

        let missing = self
            .titles
            .titles()
            .iter()
            .filter(|title| self.metadata.get(title).is_none())
            .count();
        if missing > 0 {
            warn!("{} titles have no metadata row", missing);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_artifacts(dir: &Path, titles: &str, features: &str, metadata: &str) {
        fs::write(dir.join(TITLES_FILE), titles).unwrap();
        fs::write(dir.join(FEATURES_FILE), features).unwrap();
        fs::write(dir.join(METADATA_FILE), metadata).unwrap();
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(
            dir.path(),
            "Toy Story\nJumanji\n",
            "1.0,0.0\n0.0,1.0\n",
            "{\"id\": 1, \"title\": \"Toy Story\", \"tmdbId\": 862}\n{\"id\": 2, \"title\": \"Jumanji\"}\n",
        );

        let artifacts = Artifacts::load_from_dir(dir.path()).unwrap();
        assert_eq!(artifacts.counts(), (2, 2, 2));
        assert_eq!(artifacts.titles.position("Jumanji"), Some(1));
        assert_eq!(artifacts.features.row(1), Some(&[0.0, 1.0][..]));
        assert_eq!(artifacts.metadata.get("Toy Story").unwrap().tmdb_id, Some(862));
    }

    #[test]
    fn test_row_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), "Toy Story\nJumanji\n", "1.0,0.0\n", "");

        let err = Artifacts::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::ValidationError(_)));
    }

    #[test]
    fn test_empty_title_index() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), "", "", "");

        let err = Artifacts::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::ValidationError(_)));
    }

    #[test]
    fn test_missing_metadata_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(TITLES_FILE), "Toy Story\n").unwrap();
        fs::write(dir.path().join(FEATURES_FILE), "1.0\n").unwrap();

        let err = Artifacts::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }

    #[test]
    fn test_missing_metadata_row_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), "Toy Story\nJumanji\n", "1.0\n0.5\n", "");

        let artifacts = Artifacts::load_from_dir(dir.path()).unwrap();
        assert!(artifacts.metadata.get("Jumanji").is_none());
    }

    #[test]
    fn test_nan_feature_row_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(
            dir.path(),
            "M0\nM1\nM2\n",
            "1.0,0.0\n0.5,0.5\nNaN,1.0\n",
            "",
        );

        let err = Artifacts::load_from_dir(dir.path()).unwrap_err();
        match err {
            DataLoadError::ParseError { file, line, .. } => {
                assert_eq!(file, FEATURES_FILE);
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
