/// Listening-history provider abstraction
///
/// The recommendation engine reads a user's top tracks through [`ListeningHistory`].
/// A [`HistoryConnector`] turns a per-request access token into an accessor, so the
/// HTTP layer can swap Spotify for a fake in tests.
use crate::{
    error::AppResult,
    models::{SeedTrack, TimeWindow},
};

pub mod cached;
pub mod spotify;

pub use cached::CachedHistory;
pub use spotify::{SpotifyConnector, SpotifyHistory};

/// Authenticated access to one user's listening history
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ListeningHistory: Send + Sync {
    /// Fetch the user's top tracks for one window
    ///
    /// Must return [`AppError::Authentication`](crate::error::AppError::Authentication)
    /// when the credentials are rejected; any other error is treated by callers as
    /// "no data for this window".
    async fn fetch_top_tracks(&self, window: TimeWindow) -> AppResult<Vec<SeedTrack>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Builds a [`ListeningHistory`] bound to a user's access token
pub trait HistoryConnector: Send + Sync {
    fn connect(&self, access_token: &str) -> Box<dyn ListeningHistory>;
}
