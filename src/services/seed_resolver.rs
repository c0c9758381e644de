use crate::{
    error::AppResult,
    models::{SeedTrack, TimeWindow},
    services::providers::ListeningHistory,
};

/// Windows tried in order until one yields tracks
pub const WINDOW_FALLBACK: [TimeWindow; 3] = [
    TimeWindow::ShortTerm,
    TimeWindow::MediumTerm,
    TimeWindow::LongTerm,
];

/// Outcome of resolving a user's seed tracks
#[derive(Debug, Clone, PartialEq)]
pub enum SeedResolution {
    /// Non-empty tracks and the window that produced them
    Found {
        window: TimeWindow,
        tracks: Vec<SeedTrack>,
    },
    /// Every window was empty or failed
    NoHistory,
}

/// Returns the first non-empty window of top tracks
///
/// Per-window failures are logged and treated as empty; only authentication
/// errors stop the fallback and propagate.
pub async fn resolve_seeds(history: &dyn ListeningHistory) -> AppResult<SeedResolution> {
    for window in WINDOW_FALLBACK {
        match history.fetch_top_tracks(window).await {
            Ok(tracks) if !tracks.is_empty() => {
                tracing::info!(
                    window = window.describe(),
                    tracks = tracks.len(),
                    provider = history.name(),
                    "Resolved seed tracks"
                );
                return Ok(SeedResolution::Found { window, tracks });
            }
            Ok(_) => {
                tracing::info!(window = %window, "No top tracks for window");
            }
            Err(e) if e.is_authentication() => return Err(e),
            Err(e) => {
                tracing::warn!(window = %window, error = %e, "Top tracks lookup failed, trying next window");
            }
        }
    }

    tracing::warn!("No listening history across all windows");
    Ok(SeedResolution::NoHistory)
}
