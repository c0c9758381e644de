/// Spotify Web API listening-history provider
///
/// API Flow:
/// 1. Top tracks: /v1/me/top/tracks?time_range=<window> → tracks with simplified artists
/// 2. Genres: /v1/artists?ids=<up to 50 ids> → full artist objects carrying genre tags
///
/// The access token is obtained by the caller; this provider never refreshes it.
use crate::{
    db::Cache,
    error::{AppError, AppResult},
    models::{SeedTrack, SpotifyArtistsResponse, SpotifyTopTracksPage, SpotifyTrack, TimeWindow},
    services::providers::{CachedHistory, HistoryConnector, ListeningHistory},
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

const TOP_TRACKS_LIMIT: u32 = 20;
const ARTIST_BATCH_SIZE: usize = 50;

/// Top-track reader bound to one user's access token
#[derive(Clone)]
pub struct SpotifyHistory {
    http_client: HttpClient,
    api_url: String,
    access_token: String,
}

impl SpotifyHistory {
    pub fn new(http_client: HttpClient, api_url: String, access_token: String) -> Self {
        Self {
            http_client,
            api_url,
            access_token,
        }
    }

    /// Maps a non-success Spotify status to an application error
    fn status_error(status: StatusCode, body: &str) -> AppError {
        if status == StatusCode::UNAUTHORIZED {
            AppError::Authentication("Spotify rejected the access token".to_string())
        } else {
            AppError::ExternalApi(format!("Spotify API returned status {}: {}", status, body))
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url.trim_end_matches('/'), path);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, &body));
        }

        Ok(response.json().await?)
    }

    /// Fills in artist genres, which top-track responses leave out
    async fn attach_genres(&self, tracks: &mut [SpotifyTrack]) -> AppResult<()> {
        let mut artist_ids: Vec<String> = Vec::new();
        for id in tracks
            .iter()
            .flat_map(|t| t.artists.iter())
            .filter_map(|a| a.id.clone())
        {
            if !artist_ids.contains(&id) {
                artist_ids.push(id);
            }
        }

        let mut genres_by_artist: HashMap<String, Vec<String>> = HashMap::new();
        for batch in artist_ids.chunks(ARTIST_BATCH_SIZE) {
            let response: SpotifyArtistsResponse = self
                .get_json("/v1/artists", &[("ids", batch.join(","))])
                .await?;

            for artist in response.artists.into_iter().flatten() {
                if let Some(id) = artist.id {
                    genres_by_artist.insert(id, artist.genres);
                }
            }
        }

        for artist in tracks.iter_mut().flat_map(|t| t.artists.iter_mut()) {
            if let Some(genres) = artist.id.as_ref().and_then(|id| genres_by_artist.get(id)) {
                artist.genres = genres.clone();
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl ListeningHistory for SpotifyHistory {
    async fn fetch_top_tracks(&self, window: TimeWindow) -> AppResult<Vec<SeedTrack>> {
        let page: SpotifyTopTracksPage = self
            .get_json(
                "/v1/me/top/tracks",
                &[
                    ("limit", TOP_TRACKS_LIMIT.to_string()),
                    ("time_range", window.as_param().to_string()),
                ],
            )
            .await?;

        let mut tracks = page.items;
        if !tracks.is_empty() {
            if let Err(e) = self.attach_genres(&mut tracks).await {
                tracing::warn!(error = %e, "Artist genre lookup failed, continuing without genres");
            }
        }

        tracing::info!(
            window = %window,
            tracks = tracks.len(),
            provider = "spotify",
            "Top tracks fetched"
        );

        Ok(tracks.into_iter().map(SeedTrack::from).collect())
    }

    fn name(&self) -> &'static str {
        "spotify"
    }
}

/// Creates [`SpotifyHistory`] accessors, optionally wrapped in a Redis cache
#[derive(Clone)]
pub struct SpotifyConnector {
    http_client: HttpClient,
    api_url: String,
    cache: Option<(Cache, u64)>,
}

impl SpotifyConnector {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            cache: None,
        }
    }

    /// Cache each window's top tracks for `ttl` seconds
    pub fn with_cache(mut self, cache: Cache, ttl: u64) -> Self {
        self.cache = Some((cache, ttl));
        self
    }
}

impl HistoryConnector for SpotifyConnector {
    fn connect(&self, access_token: &str) -> Box<dyn ListeningHistory> {
        let history = SpotifyHistory::new(
            self.http_client.clone(),
            self.api_url.clone(),
            access_token.to_string(),
        );

        match &self.cache {
            Some((cache, ttl)) => Box::new(CachedHistory::new(
                Box::new(history),
                cache.clone(),
                access_token,
                *ttl,
            )),
            None => Box::new(history),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(api_url: &str) -> SpotifyHistory {
        SpotifyHistory::new(
            HttpClient::new(),
            api_url.to_string(),
            "test_token".to_string(),
        )
    }

    #[test]
    fn test_status_error_unauthorized_is_authentication() {
        let err = SpotifyHistory::status_error(StatusCode::UNAUTHORIZED, "");
        assert!(err.is_authentication());
    }

    #[test]
    fn test_status_error_other_is_external_api() {
        let err = SpotifyHistory::status_error(StatusCode::TOO_MANY_REQUESTS, "slow down");
        match err {
            AppError::ExternalApi(msg) => assert!(msg.contains("429")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_api_is_not_authentication_error() {
        // Port 9 (discard) is closed on test hosts, so the connection is refused
        let provider = history("http://127.0.0.1:9");
        let err = provider
            .fetch_top_tracks(TimeWindow::ShortTerm)
            .await
            .unwrap_err();
        assert!(!err.is_authentication());
        assert!(matches!(err, AppError::HttpClient(_)));
    }

    #[test]
    fn test_connector_without_cache_returns_spotify() {
        let connector = SpotifyConnector::new("https://api.spotify.com".to_string());
        let history = connector.connect("token");
        assert_eq!(history.name(), "spotify");
    }

    #[test]
    fn test_top_tracks_page_deserialization() {
        let json = r#"{
            "items": [
                {
                    "id": "0VjIjW4GlUZAMYd2vXMi3b",
                    "name": "Blinding Lights",
                    "artists": [{"id": "1Xyo4u8uXC1ZmMpatF05PJ", "name": "The Weeknd"}],
                    "popularity": 90
                }
            ],
            "total": 1,
            "limit": 20
        }"#;

        let page: SpotifyTopTracksPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].artists[0].name, "The Weeknd");
        assert!(page.items[0].artists[0].genres.is_empty());
    }

    #[test]
    fn test_artists_response_skips_null_entries() {
        let json = r#"{
            "artists": [
                {"id": "a1", "name": "Adele", "genres": ["british soul", "pop"]},
                null
            ]
        }"#;

        let response: SpotifyArtistsResponse = serde_json::from_str(json).unwrap();
        let artists: Vec<_> = response.artists.into_iter().flatten().collect();
        assert_eq!(artists.len(), 1);
        assert_eq!(artists[0].genres, vec!["british soul", "pop"]);
    }
}
