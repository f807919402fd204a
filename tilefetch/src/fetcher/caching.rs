//! HTTP tile fetcher with an in-memory cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use image::DynamicImage;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use super::{TileFetcher, DEFAULT_USER_AGENT};
use crate::cache::{CacheKey, CacheLocation, CacheStats, MemoryTileStore, TileStore};
use crate::config::{ConfigError, FetcherConfig};
use crate::coord::TileCoord;
use crate::error::FetchResult;
use crate::provider::{HttpClient, ReqwestClient, TileProvider};

/// Downloads tiles from a [`TileProvider`] and caches their encoded bytes.
///
/// Caching is enabled by passing a [`CacheLocation`]; without one every
/// fetch goes to the network. The cache is memory-only and lives as long as
/// the fetcher (or as long as the shared store passed to
/// [`with_store`](CachingFetcher::with_store)).
///
/// # Example
///
/// ```no_run
/// use tilefetch::cache::CacheLocation;
/// use tilefetch::coord::TileCoord;
/// use tilefetch::fetcher::{CachingFetcher, TileFetcher};
/// use tilefetch::provider::{presets, ReqwestClient};
///
/// let provider = presets::opentopomap();
/// let location = CacheLocation::user_cache(&provider);
/// let fetcher = CachingFetcher::new(provider, ReqwestClient::new().unwrap(), location);
///
/// let tile = TileCoord::from_lat_lon(46.55, 7.98, 12).unwrap();
/// let first = fetcher.fetch(tile).unwrap(); // downloads
/// let again = fetcher.fetch(tile).unwrap(); // served from memory
/// assert_eq!(first.width(), again.width());
/// ```
pub struct CachingFetcher<C: HttpClient> {
    provider: TileProvider,
    http_client: C,
    cache: Option<CacheLocation>,
    store: Arc<dyn TileStore>,
    user_agent: RwLock<String>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<C: HttpClient> CachingFetcher<C> {
    /// Creates a fetcher with its own empty in-memory store.
    ///
    /// # Arguments
    ///
    /// * `provider` - Where tiles are downloaded from
    /// * `http_client` - Client performing the GET requests
    /// * `cache` - Location naming the cache; `None` disables caching
    pub fn new(provider: TileProvider, http_client: C, cache: Option<CacheLocation>) -> Self {
        Self::with_store(provider, http_client, cache, Arc::new(MemoryTileStore::new()))
    }

    /// Creates a fetcher backed by an existing store.
    ///
    /// Fetchers sharing a store share cached tiles as long as their cache
    /// locations match.
    pub fn with_store(
        provider: TileProvider,
        http_client: C,
        cache: Option<CacheLocation>,
        store: Arc<dyn TileStore>,
    ) -> Self {
        Self {
            provider,
            http_client,
            cache,
            store,
            user_agent: RwLock::new(DEFAULT_USER_AGENT.to_string()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn provider(&self) -> &TileProvider {
        &self.provider
    }

    pub fn cache_location(&self) -> Option<&CacheLocation> {
        self.cache.as_ref()
    }

    /// The User-Agent the next download will send.
    pub fn user_agent(&self) -> String {
        self.user_agent.read().clone()
    }

    /// Cache key for a tile, or `None` when caching is disabled.
    pub fn cache_key(&self, tile: TileCoord) -> Option<CacheKey> {
        self.cache
            .as_ref()
            .map(|location| CacheKey::new(location, tile))
    }

    /// Cache statistics, or `None` when caching is disabled.
    ///
    /// `entries` and `size_bytes` come from the store. `hits` and `misses`
    /// count this fetcher's lookups: a hit is a cached tile that decoded, so
    /// a corrupt entry that forced a download counts as a miss.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|_| CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            ..self.store.stats()
        })
    }

    /// Decodes a cached tile. Undecodable bytes count as a miss.
    fn load_cached(&self, key: &CacheKey) -> Option<DynamicImage> {
        let image = self.store.get(key).and_then(|data| {
            image::load_from_memory(&data)
                .map_err(|e| {
                    warn!(key = %key, error = %e, "Cached tile is corrupt, downloading again");
                })
                .ok()
        });

        let counter = if image.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        image
    }

    fn download(&self, url: &str) -> FetchResult<Vec<u8>> {
        let agent = self.user_agent();
        debug!(url = %url, "Downloading tile");
        self.http_client.get(url, &agent)
    }

    fn store_cached(&self, key: CacheKey, data: Vec<u8>) {
        if let Err(e) = self.store.set(key.clone(), data) {
            warn!(key = %key, error = %e, "Failed to store map tile");
        }
    }
}

impl CachingFetcher<ReqwestClient> {
    /// Builds a network fetcher from configuration.
    ///
    /// Resolves the provider, applies the timeout and User-Agent and enables
    /// the cache when configured.
    pub fn from_config(config: &FetcherConfig) -> Result<Self, ConfigError> {
        let provider = config.resolve_provider()?;
        let client = ReqwestClient::with_timeout(config.timeout)?;
        let cache = config.cache_location(&provider);

        let fetcher = Self::new(provider, client, cache);
        fetcher.set_user_agent(&config.user_agent);
        Ok(fetcher)
    }
}

impl<C: HttpClient> TileFetcher for CachingFetcher<C> {
    fn set_user_agent(&self, agent: &str) {
        *self.user_agent.write() = agent.to_string();
    }

    fn fetch(&self, tile: TileCoord) -> FetchResult<DynamicImage> {
        let key = self.cache_key(tile);

        if let Some(ref key) = key {
            if let Some(image) = self.load_cached(key) {
                trace!(tile = %tile, key = %key, "Tile served from memory cache");
                return Ok(image);
            }
        }

        let url = self.provider.tile_url(tile);
        let data = self.download(&url)?;

        // Undecodable downloads are never cached
        let image = image::load_from_memory(&data)?;

        if let Some(key) = key {
            self.store_cached(key, data);
        }

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;
    use std::thread;

    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    use crate::cache::StoreError;
    use crate::error::FetchError;
    use crate::provider::{MockHttpClient, MockResponse};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 100, 50]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Jpeg).unwrap();
        buf.into_inner()
    }

    fn abc_provider() -> TileProvider {
        TileProvider::new(
            "test",
            "https://{s}.tile.example.org/{z}/{x}/{y}.png",
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        )
    }

    fn cached_fetcher(mock: &Arc<MockHttpClient>) -> CachingFetcher<Arc<MockHttpClient>> {
        CachingFetcher::new(
            abc_provider(),
            Arc::clone(mock),
            Some(CacheLocation::new("/tmp/cache")),
        )
    }

    /// Store whose writes always fail.
    struct FailingStore;

    impl TileStore for FailingStore {
        fn get(&self, _key: &CacheKey) -> Option<Vec<u8>> {
            None
        }

        fn set(&self, key: CacheKey, _value: Vec<u8>) -> Result<(), StoreError> {
            Err(StoreError::Rejected {
                key: key.to_string(),
                reason: "read-only".to_string(),
            })
        }

        fn stats(&self) -> CacheStats {
            CacheStats::default()
        }
    }

    #[test]
    fn test_fetch_decodes_png() {
        let mock = Arc::new(MockHttpClient::ok(png_bytes(4, 3)));
        let fetcher = cached_fetcher(&mock);

        let image = fetcher.fetch(TileCoord::new(3, 1, 2)).unwrap();
        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 3);
    }

    #[test]
    fn test_fetch_decodes_jpeg() {
        let mock = Arc::new(MockHttpClient::ok(jpeg_bytes(8, 8)));
        let fetcher = cached_fetcher(&mock);

        let image = fetcher.fetch(TileCoord::new(3, 1, 2)).unwrap();
        assert_eq!((image.width(), image.height()), (8, 8));
    }

    #[test]
    fn test_second_fetch_is_cache_hit() {
        let mock = Arc::new(MockHttpClient::ok(png_bytes(2, 2)));
        let fetcher = cached_fetcher(&mock);
        let tile = TileCoord::new(3, 1, 2);

        fetcher.fetch(tile).unwrap();
        let cached = fetcher.fetch(tile).unwrap();

        assert_eq!(mock.request_count(), 1);
        assert_eq!(cached.width(), 2);

        let stats = fetcher.cache_stats().unwrap();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_distinct_tiles_are_downloaded_separately() {
        let mock = Arc::new(MockHttpClient::ok(png_bytes(2, 2)));
        let fetcher = cached_fetcher(&mock);

        fetcher.fetch(TileCoord::new(3, 1, 2)).unwrap();
        fetcher.fetch(TileCoord::new(3, 2, 1)).unwrap();
        fetcher.fetch(TileCoord::new(4, 1, 2)).unwrap();

        assert_eq!(mock.request_count(), 3);
        assert_eq!(fetcher.cache_stats().unwrap().entries, 3);
    }

    #[test]
    fn test_without_cache_location_every_fetch_downloads() {
        let mock = Arc::new(MockHttpClient::ok(png_bytes(2, 2)));
        let fetcher = CachingFetcher::new(abc_provider(), Arc::clone(&mock), None);
        let tile = TileCoord::new(3, 1, 2);

        fetcher.fetch(tile).unwrap();
        fetcher.fetch(tile).unwrap();

        assert_eq!(mock.request_count(), 2);
        assert!(fetcher.cache_key(tile).is_none());
        assert!(fetcher.cache_stats().is_none());
    }

    #[test]
    fn test_cache_key_uses_location() {
        let mock = Arc::new(MockHttpClient::ok(Vec::new()));
        let fetcher = cached_fetcher(&mock);

        let key = fetcher.cache_key(TileCoord::new(3, 1, 2)).unwrap();
        assert_eq!(key.as_str(), "/tmp/cache/3/1/2");
    }

    #[test]
    fn test_request_uses_sharded_url() {
        let mock = Arc::new(MockHttpClient::ok(png_bytes(1, 1)));
        let fetcher = cached_fetcher(&mock);

        fetcher.fetch(TileCoord::new(7, 4, 5)).unwrap();
        fetcher.fetch(TileCoord::new(7, 4, 6)).unwrap();

        let urls: Vec<String> = mock.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://a.tile.example.org/7/4/5.png",
                "https://b.tile.example.org/7/4/6.png",
            ]
        );
    }

    #[test]
    fn test_not_found_is_download_error_and_not_cached() {
        let mock = Arc::new(MockHttpClient::new(MockResponse::Status(
            "404 Not Found".to_string(),
        )));
        let fetcher = cached_fetcher(&mock);
        let tile = TileCoord::new(3, 1, 2);

        let err = fetcher.fetch(tile).unwrap_err();
        match &err {
            FetchError::Download { url, status } => {
                assert_eq!(url, "https://a.tile.example.org/3/1/2.png");
                assert!(status.contains("404"));
            }
            other => panic!("Expected Download error, got {:?}", other),
        }
        assert!(err.to_string().contains("https://a.tile.example.org/3/1/2.png"));
        assert_eq!(fetcher.cache_stats().unwrap().entries, 0);

        // Nothing was cached, so the next attempt goes to the network again
        mock.set_response(MockResponse::Body(png_bytes(2, 2)));
        let image = fetcher.fetch(tile).unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(mock.request_count(), 2);
        assert_eq!(fetcher.cache_stats().unwrap().entries, 1);
    }

    #[test]
    fn test_transport_error_is_surfaced() {
        let mock = Arc::new(MockHttpClient::new(MockResponse::Transport(
            "connection refused".to_string(),
        )));
        let fetcher = cached_fetcher(&mock);

        let result = fetcher.fetch(TileCoord::new(3, 1, 2));
        assert!(matches!(
            result,
            Err(FetchError::Transport { ref reason, .. }) if reason == "connection refused"
        ));
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_undecodable_download_is_not_cached() {
        let mock = Arc::new(MockHttpClient::ok(b"<html>rate limited</html>".to_vec()));
        let fetcher = cached_fetcher(&mock);

        let result = fetcher.fetch(TileCoord::new(3, 1, 2));
        assert!(matches!(result, Err(FetchError::Decode { .. })));
        assert_eq!(fetcher.cache_stats().unwrap().entries, 0);
    }

    #[test]
    fn test_corrupt_cache_entry_falls_back_to_network() {
        let store = Arc::new(MemoryTileStore::new());
        let mock = Arc::new(MockHttpClient::ok(png_bytes(2, 2)));
        let location = CacheLocation::new("/tmp/cache");
        let tile = TileCoord::new(3, 1, 2);
        let key = CacheKey::new(&location, tile);

        store.set(key.clone(), vec![0xde, 0xad, 0xbe, 0xef]).unwrap();

        let fetcher =
            CachingFetcher::with_store(abc_provider(), Arc::clone(&mock), Some(location), store.clone());

        let image = fetcher.fetch(tile).unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(mock.request_count(), 1);

        // The good download replaced the corrupt bytes
        assert_eq!(store.get(&key), Some(png_bytes(2, 2)));

        let stats = fetcher.cache_stats().unwrap();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);

        // The replacement decodes, so the next lookup is a hit
        fetcher.fetch(tile).unwrap();
        let stats = fetcher.cache_stats().unwrap();
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_store_failure_is_not_surfaced() {
        let mock = Arc::new(MockHttpClient::ok(png_bytes(2, 2)));
        let fetcher = CachingFetcher::with_store(
            abc_provider(),
            Arc::clone(&mock),
            Some(CacheLocation::new("/tmp/cache")),
            Arc::new(FailingStore),
        );

        assert!(fetcher.fetch(TileCoord::new(3, 1, 2)).is_ok());
        assert!(fetcher.fetch(TileCoord::new(3, 1, 2)).is_ok());
        assert_eq!(mock.request_count(), 2);
    }

    #[test]
    fn test_shared_store_between_fetchers() {
        let store: Arc<dyn TileStore> = Arc::new(MemoryTileStore::new());
        let mock = Arc::new(MockHttpClient::ok(png_bytes(2, 2)));
        let location = CacheLocation::new("/tmp/cache");
        let tile = TileCoord::new(3, 1, 2);

        let first = CachingFetcher::with_store(
            abc_provider(),
            Arc::clone(&mock),
            Some(location.clone()),
            Arc::clone(&store),
        );
        let second =
            CachingFetcher::with_store(abc_provider(), Arc::clone(&mock), Some(location), store);

        first.fetch(tile).unwrap();
        second.fetch(tile).unwrap();

        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_default_user_agent() {
        let mock = Arc::new(MockHttpClient::ok(png_bytes(1, 1)));
        let fetcher = cached_fetcher(&mock);

        fetcher.fetch(TileCoord::new(0, 0, 0)).unwrap();
        assert_eq!(mock.requests()[0].user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_set_user_agent_applies_to_next_request() {
        let mock = Arc::new(MockHttpClient::ok(png_bytes(1, 1)));
        let fetcher = cached_fetcher(&mock);

        fetcher.set_user_agent("X");
        assert_eq!(fetcher.user_agent(), "X");

        fetcher.fetch(TileCoord::new(0, 0, 0)).unwrap();
        fetcher.set_user_agent("Y");
        fetcher.fetch(TileCoord::new(1, 0, 0)).unwrap();

        let agents: Vec<String> = mock.requests().into_iter().map(|r| r.user_agent).collect();
        assert_eq!(agents, vec!["X", "Y"]);
    }

    #[test]
    fn test_set_user_agent_keeps_cached_tiles() {
        let mock = Arc::new(MockHttpClient::ok(png_bytes(1, 1)));
        let fetcher = cached_fetcher(&mock);
        let tile = TileCoord::new(3, 1, 2);

        fetcher.fetch(tile).unwrap();
        fetcher.set_user_agent("other/2.0");
        fetcher.fetch(tile).unwrap();

        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_concurrent_fetches() {
        let mock = Arc::new(MockHttpClient::ok(png_bytes(2, 2)));
        let fetcher = Arc::new(cached_fetcher(&mock));

        let handles: Vec<_> = (0..4)
            .map(|x| {
                let fetcher = Arc::clone(&fetcher);
                thread::spawn(move || {
                    for y in 0..4 {
                        fetcher.fetch(TileCoord::new(4, x, y)).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(mock.request_count(), 16);
        assert_eq!(fetcher.cache_stats().unwrap().entries, 16);
    }

    fn local_config() -> FetcherConfig {
        let mut config = FetcherConfig::default();
        config.user_agent = "custom/1.0".to_string();
        config.provider.name = "local".to_string();
        config.provider.url_template = Some("http://{s}.tiles.local/{z}/{x}/{y}.png".to_string());
        config.provider.shards = vec!["a".to_string(), "b".to_string()];
        config.cache.path = Some(std::path::PathBuf::from("/tmp/cache"));
        config
    }

    #[test]
    fn test_from_config_applies_settings() {
        let fetcher = CachingFetcher::from_config(&local_config()).unwrap();

        assert_eq!(fetcher.user_agent(), "custom/1.0");
        assert_eq!(fetcher.provider().name(), "local");
        assert_eq!(
            fetcher.provider().tile_url(TileCoord::new(3, 1, 2)),
            "http://b.tiles.local/3/1/2.png"
        );
        assert_eq!(
            fetcher.cache_location(),
            Some(&CacheLocation::new("/tmp/cache"))
        );

        let key = fetcher.cache_key(TileCoord::new(3, 1, 2)).unwrap();
        assert_eq!(key.as_str(), "/tmp/cache/3/1/2");
        assert_eq!(fetcher.cache_stats(), Some(CacheStats::default()));
    }

    #[test]
    fn test_from_config_with_cache_disabled() {
        let mut config = local_config();
        config.cache.enabled = false;

        let fetcher = CachingFetcher::from_config(&config).unwrap();

        assert!(fetcher.cache_location().is_none());
        assert!(fetcher.cache_key(TileCoord::new(3, 1, 2)).is_none());
        assert!(fetcher.cache_stats().is_none());
    }

    #[test]
    fn test_from_config_rejects_unknown_preset() {
        let mut config = FetcherConfig::default();
        config.provider.name = "no-such-provider".to_string();

        assert!(CachingFetcher::from_config(&config).is_err());
    }

    #[test]
    fn test_usable_as_trait_object() {
        let mock = Arc::new(MockHttpClient::ok(png_bytes(1, 1)));
        let fetcher: Box<dyn TileFetcher> = Box::new(cached_fetcher(&mock));

        fetcher.set_user_agent("boxed");
        fetcher.fetch(TileCoord::new(0, 0, 0)).unwrap();

        assert_eq!(mock.requests()[0].user_agent, "boxed");
    }
}
