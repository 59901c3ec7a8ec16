//! Shared types for candidate generation.

use std::collections::HashSet;

/// A title surfaced as similar to a seed, with its similarity in `[0, 1]`
/// rounded to 4 decimals
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub title: String,
    pub similarity: f32,
}

impl Candidate {
    pub fn new(title: impl Into<String>, similarity: f32) -> Self {
        Self {
            title: title.into(),
            similarity,
        }
    }
}

/// The liked titles of one request.
///
/// Keeps the titles in request order (the order seeds are looked up and
/// merged in) plus a set for O(1) exclusion checks.
#[derive(Debug, Clone, Default)]
pub struct SeedContext {
    pub liked_titles: Vec<String>,
    liked_set: HashSet<String>,
}

impl SeedContext {
    pub fn new<I, S>(liked_titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let liked_titles: Vec<String> = liked_titles.into_iter().map(Into::into).collect();
        let liked_set = liked_titles.iter().cloned().collect();
        Self {
            liked_titles,
            liked_set,
        }
    }

    /// Whether `title` is one of the seeds
    pub fn contains(&self, title: &str) -> bool {
        self.liked_set.contains(title)
    }

    pub fn is_empty(&self) -> bool {
        self.liked_titles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.liked_titles.len()
    }
}
