use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Listening-history window, ordered from most recent to broadest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    /// Roughly the last 4 weeks
    ShortTerm,
    /// Roughly the last 6 months
    #[default]
    MediumTerm,
    /// Several years of history
    LongTerm,
}

impl TimeWindow {
    /// Value of the `time_range` query parameter for this window
    pub fn as_param(&self) -> &'static str {
        match self {
            TimeWindow::ShortTerm => "short_term",
            TimeWindow::MediumTerm => "medium_term",
            TimeWindow::LongTerm => "long_term",
        }
    }

    /// Human-readable description used in logs
    pub fn describe(&self) -> &'static str {
        match self {
            TimeWindow::ShortTerm => "short_term (last 4 weeks)",
            TimeWindow::MediumTerm => "medium_term (last 6 months)",
            TimeWindow::LongTerm => "long_term (all time)",
        }
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_param())
    }
}

/// One track from the user's listening history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedTrack {
    pub id: String,
    pub title: String,
    /// Artist names in credit order
    pub artists: Vec<String>,
    /// Genre tags of the credited artists, possibly empty
    #[serde(default)]
    pub genres: Vec<String>,
}

impl SeedTrack {
    pub fn new(id: impl Into<String>, title: impl Into<String>, artists: &[&str]) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artists: artists.iter().map(|a| a.to_string()).collect(),
            genres: Vec::new(),
        }
    }

    pub fn with_genres(mut self, genres: &[&str]) -> Self {
        self.genres = genres.iter().map(|g| g.to_string()).collect();
        self
    }

    /// First credited artist, if any
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_params() {
        assert_eq!(TimeWindow::ShortTerm.as_param(), "short_term");
        assert_eq!(TimeWindow::MediumTerm.as_param(), "medium_term");
        assert_eq!(TimeWindow::LongTerm.as_param(), "long_term");
    }

    #[test]
    fn test_time_window_serialization() {
        let json = serde_json::to_string(&TimeWindow::LongTerm).unwrap();
        assert_eq!(json, "\"long_term\"");

        let window: TimeWindow = serde_json::from_str("\"short_term\"").unwrap();
        assert_eq!(window, TimeWindow::ShortTerm);
    }

    #[test]
    fn test_default_window_is_medium() {
        assert_eq!(TimeWindow::default(), TimeWindow::MediumTerm);
    }

    #[test]
    fn test_primary_artist() {
        let track = SeedTrack::new("t1", "Stay", &["The Kid LAROI", "Justin Bieber"]);
        assert_eq!(track.primary_artist(), Some("The Kid LAROI"));

        let orphan = SeedTrack::new("t2", "Untitled", &[]);
        assert_eq!(orphan.primary_artist(), None);
    }
}
