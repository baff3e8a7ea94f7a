#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use commodity_cache::{
    clock::FixedClock,
    orchestrator::RefreshOrchestrator,
    record::{DATA_SOURCE, SeriesRecord},
    store::{DEFAULT_COLLECTION, DocumentStore, SeriesStore, StoreError, memory::MemoryStore},
};
use commodity_ingestor::{
    models::{
        commodity::CommodityKey, data_point::DataPoint, interval::SeriesInterval,
        raw_series::RawSeries,
    },
    providers::{ApiKey, ProviderError, SeriesProvider, UpstreamStatusSnafu},
};
use serde_json::Value;

/// Wall clock every test pipeline runs at.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

pub fn api_key() -> ApiKey {
    ApiKey::new("test-key")
}

/// `n` monthly points, newest first, ending at 2025-05-01.
pub fn points(n: usize) -> Vec<DataPoint> {
    (0..n)
        .map(|i| {
            let months = 2025 * 12 + 4 - i as i64;
            let (year, month) = (months / 12, months % 12 + 1);
            DataPoint::new(format!("{year:04}-{month:02}-01"), format!("{}.00", 100 + i))
        })
        .collect()
}

pub fn raw_series(key: CommodityKey, n: usize) -> RawSeries {
    RawSeries {
        key,
        name: format!("{key} monthly price"),
        unit: Some("dollars per unit".into()),
        interval: SeriesInterval::Monthly,
        points: points(n),
    }
}

/// A stored record fetched `age` before [`now`].
pub fn record_aged(name: &str, age: chrono::Duration, n: usize) -> SeriesRecord {
    let points = points(n);
    SeriesRecord {
        name: name.into(),
        unit: None,
        interval_kind: SeriesInterval::Monthly,
        data_source: DATA_SOURCE.into(),
        fetched_at: now() - age,
        point_count: points.len(),
        points,
    }
}

/// Provider answering from a script and counting every call.
#[derive(Default)]
pub struct ScriptedProvider {
    points: usize,
    failing: HashSet<CommodityKey>,
    panicking: HashSet<CommodityKey>,
    delays: HashMap<CommodityKey, Duration>,
    calls: Mutex<Vec<CommodityKey>>,
}

impl ScriptedProvider {
    pub fn new(points: usize) -> Self {
        Self {
            points,
            ..Default::default()
        }
    }

    /// `key` answers with HTTP 503.
    pub fn failing_for(mut self, key: CommodityKey) -> Self {
        self.failing.insert(key);
        self
    }

    /// `key` panics inside the provider.
    pub fn panicking_for(mut self, key: CommodityKey) -> Self {
        self.panicking.insert(key);
        self
    }

    /// `key` answers only after `delay`.
    pub fn delayed(mut self, key: CommodityKey, delay: Duration) -> Self {
        self.delays.insert(key, delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, key: CommodityKey) -> usize {
        self.calls.lock().unwrap().iter().filter(|k| **k == key).count()
    }
}

#[async_trait]
impl SeriesProvider for ScriptedProvider {
    async fn fetch_series(
        &self,
        key: CommodityKey,
        _api_key: &ApiKey,
    ) -> Result<RawSeries, ProviderError> {
        self.calls.lock().unwrap().push(key);

        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }
        if self.panicking.contains(&key) {
            panic!("scripted provider panic for {key}");
        }
        if self.failing.contains(&key) {
            return UpstreamStatusSnafu {
                status: 503u16,
                body: "service unavailable",
            }
            .fail();
        }
        Ok(raw_series(key, self.points))
    }
}

/// Memory store with switchable read/write faults and a write counter.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// Successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn raw(&self, path: &str) -> Option<Value> {
        self.inner.get(path).await.unwrap()
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(format!("read of {path} refused")));
        }
        self.inner.get(path).await
    }

    async fn set(&self, path: &str, document: Value) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(format!("write of {path} refused")));
        }
        self.inner.set(path, document).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A pipeline over a [`FlakyStore`] and a [`ScriptedProvider`], clock fixed at [`now`].
pub struct Harness {
    pub backend: Arc<FlakyStore>,
    pub provider: Arc<ScriptedProvider>,
    pub orchestrator: Arc<RefreshOrchestrator>,
}

impl Harness {
    pub fn new(provider: ScriptedProvider) -> Self {
        let backend = Arc::new(FlakyStore::new());
        let provider = Arc::new(provider);
        let store = SeriesStore::new(backend.clone(), DEFAULT_COLLECTION);
        let orchestrator = RefreshOrchestrator::new(
            store,
            provider.clone(),
            Arc::new(FixedClock(now())),
        );
        Self {
            backend,
            provider,
            orchestrator: Arc::new(orchestrator),
        }
    }

    pub fn store(&self) -> &SeriesStore {
        self.orchestrator.store()
    }

    /// Stores `record` for `key` without going through the pipeline.
    pub async fn seed(&self, key: CommodityKey, record: &SeriesRecord) {
        self.store().write(key, record).await.unwrap();
    }
}
