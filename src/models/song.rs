use serde::{Deserialize, Serialize};

/// Value used for any audio feature missing from a stored song
pub const DEFAULT_FEATURE_VALUE: f64 = 0.6;

/// Audio character of one song, each value normally in [0, 1]
///
/// Any field may be absent in storage; the accessors substitute
/// [`DEFAULT_FEATURE_VALUE`] so callers never see a hole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(default, alias = "Energy")]
    pub energy: Option<f64>,
    #[serde(default, alias = "Danceability")]
    pub danceability: Option<f64>,
    #[serde(default, alias = "Valence")]
    pub valence: Option<f64>,
}

impl FeatureVector {
    /// Creates a fully populated feature vector
    pub fn new(energy: f64, danceability: f64, valence: f64) -> Self {
        Self {
            energy: Some(energy),
            danceability: Some(danceability),
            valence: Some(valence),
        }
    }

    pub fn energy(&self) -> f64 {
        self.energy.unwrap_or(DEFAULT_FEATURE_VALUE)
    }

    pub fn danceability(&self) -> f64 {
        self.danceability.unwrap_or(DEFAULT_FEATURE_VALUE)
    }

    pub fn valence(&self) -> f64 {
        self.valence.unwrap_or(DEFAULT_FEATURE_VALUE)
    }
}

/// One song from the recommendation corpus
///
/// Aliases accept the capitalised field names of document store exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSong {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "Track")]
    pub title: String,
    #[serde(alias = "Artist")]
    pub artist: String,
    #[serde(default, alias = "Album")]
    pub album: Option<String>,
    #[serde(flatten)]
    pub features: FeatureVector,
}

impl CandidateSong {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        features: FeatureVector,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            features,
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }
}

/// A candidate annotated with its similarity score against a profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub song: CandidateSong,
    pub score: f64,
}
