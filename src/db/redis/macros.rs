/// Read-through caching around an async computation.
///
/// Returns the cached value for `$key` when present. On a miss, or when the
/// cache cannot be read, awaits `$block`, queues the value for writing with
/// `$ttl` seconds to live and returns it. Errors from `$block` propagate and
/// are never cached.
///
/// The cache must provide `get_from_cache` and `set_in_background`.
///
/// ```rust,ignore
/// let tracks = cached!(cache, key, 600, async move { fetch_tracks().await })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %$key, "Cache hit");
                Ok(cached)
            }
            lookup => {
                if let Err(e) = lookup {
                    tracing::warn!(key = %$key, error = %e, "Cache read failed, bypassing cache");
                }
                match $block.await {
                    Ok(value) => {
                        $cache.set_in_background(&$key, &value, $ttl);
                        Ok(value)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }};
}
