use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod profile;
pub mod seed;
pub mod song;

pub use profile::{PreferenceProfile, NO_HISTORY_FEATURE_VALUE, REPORT_LIMIT};
pub use seed::{SeedTrack, TimeWindow};
pub use song::{CandidateSong, FeatureVector, ScoredCandidate, DEFAULT_FEATURE_VALUE};

/// One entry of a recommendation list
///
/// Backfilled entries were sampled at random and carry no score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub song: CandidateSong,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Recommendation {
    pub fn unscored(song: CandidateSong) -> Self {
        Self { song, score: None }
    }

    pub fn id(&self) -> &str {
        &self.song.id
    }
}

impl From<ScoredCandidate> for Recommendation {
    fn from(scored: ScoredCandidate) -> Self {
        Self {
            song: scored.song,
            score: Some(scored.score),
        }
    }
}

/// Output of one recommendation request
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationResult {
    pub recommendations: Vec<Recommendation>,
    pub profile: PreferenceProfile,
    /// History window the profile was derived from; `None` when no history exists
    pub time_range_used: Option<TimeWindow>,
    pub message: Option<String>,
}

impl RecommendationResult {
    /// Number of entries that came out of the scoring pass
    pub fn scored_count(&self) -> usize {
        self.recommendations
            .iter()
            .filter(|r| r.score.is_some())
            .count()
    }
}

/// Response body of the recommendations endpoint
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
    pub user_preferences: PreferenceProfile,
    pub time_range_used: Option<TimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl From<RecommendationResult> for RecommendationResponse {
    fn from(result: RecommendationResult) -> Self {
        Self {
            user_preferences: result.profile.reported(),
            recommendations: result.recommendations,
            time_range_used: result.time_range_used,
            message: result.message,
            generated_at: Utc::now(),
        }
    }
}

// ============================================================================
// Spotify Web API Types
// ============================================================================

/// Page returned by GET /v1/me/top/tracks
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTopTracksPage {
    #[serde(default)]
    pub items: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
}

/// Artist object; simplified artists embedded in tracks carry no genres
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Response of GET /v1/artists?ids=...
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtistsResponse {
    #[serde(default)]
    pub artists: Vec<Option<SpotifyArtist>>,
}

impl From<SpotifyTrack> for SeedTrack {
    fn from(track: SpotifyTrack) -> Self {
        let mut genres = Vec::new();
        for genre in track.artists.iter().flat_map(|a| a.genres.iter()) {
            if !genre.is_empty() && !genres.contains(genre) {
                genres.push(genre.clone());
            }
        }

        SeedTrack {
            id: track.id,
            title: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            genres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: &str) -> CandidateSong {
        CandidateSong::new(id, "Title", "Artist", FeatureVector::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn test_unscored_recommendation_omits_score() {
        let value = serde_json::to_value(Recommendation::unscored(song("s1"))).unwrap();
        assert_eq!(value["id"], "s1");
        assert!(value.get("score").is_none());
    }

    #[test]
    fn test_scored_recommendation_keeps_score() {
        let rec: Recommendation = ScoredCandidate {
            song: song("s2"),
            score: 17.25,
        }
        .into();
        assert_eq!(rec.score, Some(17.25));
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["score"], 17.25);
    }

    #[test]
    fn test_response_reports_capped_profile() {
        let artists: Vec<String> = (0..7).map(|i| format!("A{}", i)).collect();
        let result = RecommendationResult {
            recommendations: vec![Recommendation::unscored(song("s1"))],
            profile: PreferenceProfile::with_default_features(artists, Vec::new()),
            time_range_used: Some(TimeWindow::ShortTerm),
            message: None,
        };

        let response = RecommendationResponse::from(result);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["user_preferences"]["top_artists"].as_array().unwrap().len(), 5);
        assert_eq!(value["time_range_used"], "short_term");
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_spotify_track_to_seed_track() {
        let json = r#"{
            "id": "4iV5W9uYEdYUVa79Axb7Rh",
            "name": "New Rules",
            "artists": [
                {"id": "6M2wZ9GZgrQXHCFfjv46we", "name": "Dua Lipa", "genres": ["dance pop", "pop", ""]},
                {"id": "abc", "name": "Guest", "genres": ["pop", "uk pop"]}
            ]
        }"#;

        let track: SpotifyTrack = serde_json::from_str(json).unwrap();
        let seed = SeedTrack::from(track);
        assert_eq!(seed.title, "New Rules");
        assert_eq!(seed.artists, vec!["Dua Lipa", "Guest"]);
        assert_eq!(seed.genres, vec!["dance pop", "pop", "uk pop"]);
    }

    #[test]
    fn test_top_tracks_page_without_items() {
        let page: SpotifyTopTracksPage = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
    }
}
