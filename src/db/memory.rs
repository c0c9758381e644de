use futures::stream::{self, BoxStream, StreamExt};
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::path::Path;

use crate::{
    db::CorpusStore,
    error::{AppError, AppResult},
    models::CandidateSong,
};

/// Vector-backed corpus, loaded from a JSON snapshot or built directly in tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpusStore {
    songs: Vec<CandidateSong>,
}

impl InMemoryCorpusStore {
    pub fn new(songs: Vec<CandidateSong>) -> Self {
        Self { songs }
    }

    /// Loads a JSON array of songs from disk
    pub async fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to read corpus {}: {}", path.display(), e))
        })?;

        let songs = Self::parse_json(&raw)?;

        tracing::info!(
            path = %path.display(),
            songs = songs.len(),
            "Loaded corpus snapshot"
        );

        Ok(Self::new(songs))
    }

    fn parse_json(raw: &str) -> AppResult<Vec<CandidateSong>> {
        serde_json::from_str(raw)
            .map_err(|e| AppError::StoreUnavailable(format!("Invalid corpus snapshot: {}", e)))
    }

    pub fn songs(&self) -> &[CandidateSong] {
        &self.songs
    }
}

#[async_trait::async_trait]
impl CorpusStore for InMemoryCorpusStore {
    async fn find_by_artists(
        &self,
        artists: &[String],
        limit: usize,
    ) -> AppResult<Vec<CandidateSong>> {
        let wanted: HashSet<&str> = artists.iter().map(String::as_str).collect();

        Ok(self
            .songs
            .iter()
            .filter(|song| wanted.contains(song.artist.as_str()))
            .take(limit)
            .cloned()
            .collect())
    }

    fn scan_all(&self) -> BoxStream<'_, AppResult<CandidateSong>> {
        stream::iter(self.songs.iter().cloned().map(Ok)).boxed()
    }

    async fn sample_random(
        &self,
        n: usize,
        exclude_ids: &[String],
    ) -> AppResult<Vec<CandidateSong>> {
        let excluded: HashSet<&str> = exclude_ids.iter().map(String::as_str).collect();
        let pool: Vec<&CandidateSong> = self
            .songs
            .iter()
            .filter(|song| !excluded.contains(song.id.as_str()))
            .collect();

        let mut rng = rand::thread_rng();
        Ok(pool
            .choose_multiple(&mut rng, n)
            .map(|song| (*song).clone())
            .collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.songs.len() as u64)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
