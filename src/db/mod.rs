/// Song corpus storage
///
/// The recommendation engine only sees the [`CorpusStore`] trait; the store is
/// injected at startup so tests can run against the in-memory implementation.
use futures::stream::BoxStream;

use crate::{error::AppResult, models::CandidateSong};

pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::InMemoryCorpusStore;
pub use postgres::{create_pool, run_migrations, PgCorpusStore};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};

/// Read access to the corpus of candidate songs
#[async_trait::async_trait]
pub trait CorpusStore: Send + Sync {
    /// Songs whose artist is one of `artists`, at most `limit` of them
    async fn find_by_artists(
        &self,
        artists: &[String],
        limit: usize,
    ) -> AppResult<Vec<CandidateSong>>;

    /// Lazily yields every song in storage order
    fn scan_all(&self) -> BoxStream<'_, AppResult<CandidateSong>>;

    /// Up to `n` songs drawn uniformly at random, skipping `exclude_ids`
    async fn sample_random(
        &self,
        n: usize,
        exclude_ids: &[String],
    ) -> AppResult<Vec<CandidateSong>>;

    /// Total number of songs in the corpus
    async fn count(&self) -> AppResult<u64>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}
