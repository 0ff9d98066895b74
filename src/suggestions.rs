/// Destinations offered while typing.
pub const POPULAR_DESTINATIONS: [&str; 14] = [
    "Central Park",
    "City Market",
    "Museum District",
    "Old Town",
    "South Gate",
    "Grand Library",
    "Lake View Park",
    "East Garden",
    "University Campus",
    "Shopping Mall",
    "Train Station",
    "Airport",
    "Hospital",
    "City Hall",
];

pub const DEFAULT_MIN_LENGTH: usize = 2;
pub const DEFAULT_LIMIT: usize = 5;

#[derive(Clone, Debug)]
pub struct SuggestionEngine {
    candidates: Vec<String>,
    min_length: usize,
    limit: usize,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LENGTH, DEFAULT_LIMIT)
    }
}

impl SuggestionEngine {
    pub fn new(min_length: usize, limit: usize) -> Self {
        Self::with_candidates(
            POPULAR_DESTINATIONS.iter().map(|c| c.to_string()),
            min_length,
            limit,
        )
    }

    pub fn with_candidates(
        candidates: impl IntoIterator<Item = String>,
        min_length: usize,
        limit: usize,
    ) -> Self {
        Self {
            candidates: candidates.into_iter().collect(),
            min_length,
            limit,
        }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Candidates containing `prefix` case-insensitively, in source order,
    /// capped at the limit. Empty for prefixes shorter than the minimum.
    pub fn query(&self, prefix: &str) -> Vec<String> {
        if prefix.chars().count() < self.min_length {
            return vec![];
        }

        let needle = prefix.to_lowercase();

        self.candidates
            .iter()
            .filter(|candidate| candidate.to_lowercase().contains(&needle))
            .take(self.limit)
            .cloned()
            .collect()
    }
}
