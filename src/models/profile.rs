use serde::{Deserialize, Serialize};

use super::song::DEFAULT_FEATURE_VALUE;

/// Feature average reported when the user has no listening history at all.
///
/// Distinct from [`DEFAULT_FEATURE_VALUE`], which applies when history exists
/// but no corpus song matches the user's artists.
pub const NO_HISTORY_FEATURE_VALUE: f64 = 0.5;

/// Number of artists and genres reported back to clients
pub const REPORT_LIMIT: usize = 5;

/// Numeric and textual summary of a user's taste for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    /// Artist names in first-seen order across the seed tracks
    pub top_artists: Vec<String>,
    /// Genre tags in first-seen order across the seed tracks
    pub top_genres: Vec<String>,
    pub avg_energy: f64,
    pub avg_danceability: f64,
    pub avg_valence: f64,
}

impl PreferenceProfile {
    /// Profile used when the user has listening history but no corpus evidence
    pub fn with_default_features(top_artists: Vec<String>, top_genres: Vec<String>) -> Self {
        Self {
            top_artists,
            top_genres,
            avg_energy: DEFAULT_FEATURE_VALUE,
            avg_danceability: DEFAULT_FEATURE_VALUE,
            avg_valence: DEFAULT_FEATURE_VALUE,
        }
    }

    /// Profile paired with random recommendations when no history exists
    pub fn no_history() -> Self {
        Self {
            top_artists: Vec::new(),
            top_genres: Vec::new(),
            avg_energy: NO_HISTORY_FEATURE_VALUE,
            avg_danceability: NO_HISTORY_FEATURE_VALUE,
            avg_valence: NO_HISTORY_FEATURE_VALUE,
        }
    }

    pub fn has_artist(&self, artist: &str) -> bool {
        self.top_artists.iter().any(|a| a == artist)
    }

    /// Copy of the profile with artist and genre lists capped for reporting
    pub fn reported(&self) -> Self {
        Self {
            top_artists: self.top_artists.iter().take(REPORT_LIMIT).cloned().collect(),
            top_genres: self.top_genres.iter().take(REPORT_LIMIT).cloned().collect(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_triples_are_distinct() {
        let no_history = PreferenceProfile::no_history();
        let no_evidence = PreferenceProfile::with_default_features(vec!["A".to_string()], vec![]);

        assert_eq!(no_history.avg_energy, 0.5);
        assert_eq!(no_history.avg_danceability, 0.5);
        assert_eq!(no_history.avg_valence, 0.5);
        assert!(no_history.top_artists.is_empty());

        assert_eq!(no_evidence.avg_energy, 0.6);
        assert_eq!(no_evidence.avg_danceability, 0.6);
        assert_eq!(no_evidence.avg_valence, 0.6);
    }

    #[test]
    fn test_reported_caps_lists() {
        let artists: Vec<String> = (0..8).map(|i| format!("Artist {}", i)).collect();
        let genres: Vec<String> = (0..3).map(|i| format!("genre-{}", i)).collect();
        let profile = PreferenceProfile::with_default_features(artists, genres);

        let reported = profile.reported();
        assert_eq!(reported.top_artists.len(), REPORT_LIMIT);
        assert_eq!(reported.top_artists[0], "Artist 0");
        assert_eq!(reported.top_genres.len(), 3);
        assert_eq!(reported.avg_energy, profile.avg_energy);
        // Engine-side profile is untouched
        assert_eq!(profile.top_artists.len(), 8);
    }

    #[test]
    fn test_has_artist_is_exact() {
        let profile =
            PreferenceProfile::with_default_features(vec!["Adele".to_string()], Vec::new());
        assert!(profile.has_artist("Adele"));
        assert!(!profile.has_artist("adele"));
    }
}
