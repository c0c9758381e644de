use crate::{
    cached,
    db::{Cache, CacheKey},
    error::AppResult,
    models::{SeedTrack, TimeWindow},
    services::providers::ListeningHistory,
};

/// Read-through Redis cache in front of another history provider
///
/// Only successful lookups are cached. A cache hit is served without contacting
/// the provider, so a token that expires or is revoked keeps getting its cached
/// top tracks until the entry's TTL runs out. Keep the TTL well below the
/// provider's token lifetime.
pub struct CachedHistory {
    inner: Box<dyn ListeningHistory>,
    cache: Cache,
    access_token: String,
    ttl: u64,
}

impl CachedHistory {
    pub fn new(
        inner: Box<dyn ListeningHistory>,
        cache: Cache,
        access_token: &str,
        ttl: u64,
    ) -> Self {
        Self {
            inner,
            cache,
            access_token: access_token.to_string(),
            ttl,
        }
    }
}

#[async_trait::async_trait]
impl ListeningHistory for CachedHistory {
    async fn fetch_top_tracks(&self, window: TimeWindow) -> AppResult<Vec<SeedTrack>> {
        let key = CacheKey::top_tracks(&self.access_token, window);
        cached!(self.cache, key, self.ttl, self.inner.fetch_top_tracks(window))
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
