//! Shared test doubles for the lookup pipeline
//!
//! Each integration test binary pulls in only what it needs.
#![allow(dead_code)]

pub mod mmdb;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use geolocator::cache::{CacheEntry, EdgeCache};
use geolocator::config::StaticConfig;
use geolocator::errors::{GeoError, Result};
use geolocator::runtime::lifetime::startup::build_locator;
use geolocator::services::geoip::{DatabaseOpener, GeoDatabase, RawRecord};
use geolocator::services::GeoLocator;
use geolocator::storage::ObjectStore;
use geolocator::utils::IpAddress;

pub const FAKE_MMDB: &[u8] = b"fake-mmdb-bytes";

/// Object store that serves one fixed object and counts reads
pub struct MockStore {
    data: Option<Bytes>,
    pub gets: AtomicUsize,
}

impl MockStore {
    pub fn with_database() -> Self {
        Self {
            data: Some(Bytes::from_static(FAKE_MMDB)),
            gets: AtomicUsize::new(0),
        }
    }

    pub fn with_bytes(data: Bytes) -> Self {
        Self {
            data: Some(data),
            gets: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            data: None,
            gets: AtomicUsize::new(0),
        }
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn get(&self, _path: &str) -> Result<Option<Bytes>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// HashMap-backed edge cache that can be switched into a failing state
#[derive(Default)]
pub struct MockCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    pub failing: AtomicBool,
}

impl MockCache {
    pub fn failing() -> Self {
        let cache = Self::default();
        cache.failing.store(true, Ordering::SeqCst);
        cache
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().await.get(key).cloned()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(GeoError::cache_unavailable("mock cache is down"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EdgeCache for MockCache {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        self.check()?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, entry: CacheEntry) -> Result<()> {
        self.check()?;
        self.entries.write().await.insert(entry.key.clone(), entry);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// In-memory database keyed by IP text
pub struct FakeDatabase {
    records: HashMap<String, RawRecord>,
    broken: Vec<String>,
    lookups: Arc<AtomicUsize>,
}

impl GeoDatabase for FakeDatabase {
    fn lookup(&self, ip: &IpAddress) -> Result<Option<RawRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.broken.iter().any(|b| b == ip.as_str()) {
            return Err(GeoError::lookup("unexpected end of search tree"));
        }
        Ok(self.records.get(ip.as_str()).cloned())
    }

    fn database_type(&self) -> &str {
        "Fake-City"
    }
}

/// Builds [`FakeDatabase`] instances and counts opens and lookups
pub struct FakeOpener {
    records: HashMap<String, RawRecord>,
    broken: Vec<String>,
    pub opens: AtomicUsize,
    pub lookups: Arc<AtomicUsize>,
}

impl FakeOpener {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            broken: Vec::new(),
            opens: AtomicUsize::new(0),
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_record(mut self, ip: &str, record: RawRecord) -> Self {
        self.records.insert(ip.to_string(), record);
        self
    }

    pub fn with_broken(mut self, ip: &str) -> Self {
        self.broken.push(ip.to_string());
        self
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl DatabaseOpener for FakeOpener {
    fn open(&self, data: Bytes) -> Result<Box<dyn GeoDatabase>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if data.as_ref() != FAKE_MMDB {
            return Err(GeoError::reader_init("unexpected database bytes"));
        }
        Ok(Box::new(FakeDatabase {
            records: self.records.clone(),
            broken: self.broken.clone(),
            lookups: Arc::clone(&self.lookups),
        }))
    }
}

/// Record resembling the GeoLite2 entry for 1.1.1.1
pub fn australia_record() -> RawRecord {
    serde_json::from_value(serde_json::json!({
        "continent": {"code": "OC", "names": {"en": "Oceania", "zh-CN": "大洋洲"}},
        "country": {"iso_code": "AU", "names": {"en": "Australia", "zh-CN": "澳大利亚"}},
        "location": {
            "accuracy_radius": 1000,
            "latitude": -33.494,
            "longitude": 143.2104,
            "time_zone": "Australia/Sydney"
        }
    }))
    .expect("valid record")
}

/// Record resembling the GeoLite2 entry for 8.8.8.8
pub fn us_record() -> RawRecord {
    serde_json::from_value(serde_json::json!({
        "continent": {"code": "NA", "names": {"en": "North America", "zh-CN": "北美洲"}},
        "country": {"iso_code": "US", "names": {"en": "United States", "zh-CN": "美国"}},
        "location": {"accuracy_radius": 1000, "latitude": 37.751, "longitude": -97.822}
    }))
    .expect("valid record")
}

pub struct Pipeline {
    pub locator: Arc<GeoLocator>,
    pub store: Arc<MockStore>,
    pub cache: Arc<MockCache>,
    pub opener: Arc<FakeOpener>,
}

/// Wire the real pipeline around the given doubles
pub fn pipeline(store: MockStore, cache: MockCache, opener: FakeOpener) -> Pipeline {
    let store = Arc::new(store);
    let cache = Arc::new(cache);
    let opener = Arc::new(opener);

    let locator = build_locator(
        &StaticConfig::default(),
        cache.clone(),
        store.clone(),
        opener.clone(),
    );

    Pipeline {
        locator,
        store,
        cache,
        opener,
    }
}

/// Default pipeline covering 1.1.1.1 and 8.8.8.8
pub fn default_pipeline() -> Pipeline {
    pipeline(
        MockStore::with_database(),
        MockCache::default(),
        FakeOpener::new()
            .with_record("1.1.1.1", australia_record())
            .with_record("8.8.8.8", us_record()),
    )
}
