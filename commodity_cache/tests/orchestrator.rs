mod common;

use chrono::Duration;
use commodity_cache::{
    orchestrator::{PipelineError, ResultEnvelope},
    store::StoreError,
};
use commodity_ingestor::{models::commodity::CommodityKey, providers::ProviderError};
use serde_json::json;

use common::{Harness, ScriptedProvider, api_key, now, record_aged};

#[tokio::test]
async fn empty_store_fetches_trims_and_persists() {
    let h = Harness::new(ScriptedProvider::new(61));

    let envelope = h
        .orchestrator
        .resolve(CommodityKey::Wti, &api_key())
        .await
        .unwrap();

    let ResultEnvelope::FreshFetch { key, record } = &envelope else {
        panic!("expected a fresh fetch, got {envelope:?}");
    };
    assert_eq!(*key, CommodityKey::Wti);
    assert_eq!(record.point_count, 60);
    assert_eq!(record.points.len(), 60);
    assert_eq!(record.points[0].date, "2025-05-01");
    // the 61st (oldest) point is dropped
    assert_eq!(record.points[59].date, "2020-06-01");
    assert_eq!(record.fetched_at, now());
    assert_eq!(record.data_source, "Alpha Vantage");

    assert_eq!(h.provider.calls(), 1);
    assert_eq!(h.backend.writes(), 1);
    let stored = h.store().read(CommodityKey::Wti).await.unwrap();
    assert_eq!(stored.as_ref(), Some(record));
}

#[tokio::test]
async fn fresh_record_is_served_without_fetching() {
    let h = Harness::new(ScriptedProvider::new(12));
    let cached = record_aged("Brent", Duration::days(3), 12);
    h.seed(CommodityKey::Brent, &cached).await;
    let writes_before = h.backend.writes();

    let envelope = h
        .orchestrator
        .resolve(CommodityKey::Brent, &api_key())
        .await
        .unwrap();

    assert_eq!(
        envelope,
        ResultEnvelope::CacheHit {
            key: CommodityKey::Brent,
            record: cached,
        }
    );
    assert_eq!(h.provider.calls(), 0);
    assert_eq!(h.backend.writes(), writes_before);
}

#[tokio::test]
async fn threshold_boundary_decides_between_hit_and_refetch() {
    let h = Harness::new(ScriptedProvider::new(5));

    let almost = record_aged("Copper", Duration::days(7) - Duration::seconds(1), 5);
    h.seed(CommodityKey::Copper, &almost).await;
    let envelope = h
        .orchestrator
        .resolve(CommodityKey::Copper, &api_key())
        .await
        .unwrap();
    assert!(envelope.is_cache_hit());

    let expired = record_aged("Copper", Duration::days(7), 5);
    h.seed(CommodityKey::Copper, &expired).await;
    let envelope = h
        .orchestrator
        .resolve(CommodityKey::Copper, &api_key())
        .await
        .unwrap();
    assert!(matches!(envelope, ResultEnvelope::FreshFetch { .. }));
    assert_eq!(h.provider.calls_for(CommodityKey::Copper), 1);
}

#[tokio::test]
async fn stale_record_is_replaced_wholesale() {
    let h = Harness::new(ScriptedProvider::new(3));
    h.seed(CommodityKey::Corn, &record_aged("Old corn", Duration::days(30), 40))
        .await;

    let envelope = h
        .orchestrator
        .resolve(CommodityKey::Corn, &api_key())
        .await
        .unwrap();

    let record = envelope.record().unwrap();
    assert!(matches!(envelope, ResultEnvelope::FreshFetch { .. }));
    assert_eq!(record.name, "CORN monthly price");
    assert_eq!(record.point_count, 3);

    let stored = h.store().read(CommodityKey::Corn).await.unwrap().unwrap();
    assert_eq!(&stored, record);
}

#[tokio::test]
async fn fresh_but_empty_record_is_refetched() {
    let h = Harness::new(ScriptedProvider::new(4));
    h.seed(CommodityKey::Sugar, &record_aged("Sugar", Duration::hours(1), 0))
        .await;

    let envelope = h
        .orchestrator
        .resolve(CommodityKey::Sugar, &api_key())
        .await
        .unwrap();

    assert!(matches!(envelope, ResultEnvelope::FreshFetch { .. }));
    assert_eq!(h.provider.calls(), 1);
}

#[tokio::test]
async fn read_failure_aborts_before_any_fetch() {
    let h = Harness::new(ScriptedProvider::new(10));
    h.backend.fail_reads(true);

    let err = h
        .orchestrator
        .resolve(CommodityKey::Wheat, &api_key())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Store(StoreError::Backend(_))));
    assert_eq!(h.provider.calls(), 0);
    assert_eq!(h.backend.writes(), 0);
}

#[tokio::test]
async fn undecodable_document_is_an_error_not_a_miss() {
    let h = Harness::new(ScriptedProvider::new(10));
    let path = h.store().document_path(CommodityKey::Coffee);
    commodity_cache::store::DocumentStore::set(&*h.backend, &path, json!({ "unexpected": true }))
        .await
        .unwrap();

    let err = h
        .orchestrator
        .resolve(CommodityKey::Coffee, &api_key())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Store(StoreError::Decode { .. })));
    assert_eq!(h.provider.calls(), 0);
}

#[tokio::test]
async fn document_with_wrong_point_count_is_not_served() {
    let h = Harness::new(ScriptedProvider::new(10));
    let mut doc = serde_json::to_value(record_aged("Wheat", Duration::days(1), 3)).unwrap();
    doc["pointCount"] = json!(60);
    let path = h.store().document_path(CommodityKey::Wheat);
    commodity_cache::store::DocumentStore::set(&*h.backend, &path, doc)
        .await
        .unwrap();

    let err = h
        .orchestrator
        .resolve(CommodityKey::Wheat, &api_key())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Store(StoreError::Decode { .. })));
    assert_eq!(h.provider.calls(), 0);
}

#[tokio::test]
async fn fetch_failure_never_falls_back_to_the_stale_record() {
    let h = Harness::new(ScriptedProvider::new(10).failing_for(CommodityKey::Cotton));
    let stale = record_aged("Cotton", Duration::days(10), 10);
    h.seed(CommodityKey::Cotton, &stale).await;
    let writes_before = h.backend.writes();

    let err = h
        .orchestrator
        .resolve(CommodityKey::Cotton, &api_key())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Provider(ProviderError::UpstreamStatus { status: 503, .. })
    ));
    assert_eq!(h.backend.writes(), writes_before);
    let stored = h.store().read(CommodityKey::Cotton).await.unwrap();
    assert_eq!(stored, Some(stale));
}

#[tokio::test]
async fn write_failure_means_no_fresh_fetch_is_reported() {
    let h = Harness::new(ScriptedProvider::new(10));
    h.backend.fail_writes(true);

    let err = h
        .orchestrator
        .resolve(CommodityKey::Aluminum, &api_key())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Store(StoreError::Backend(_))));
    assert_eq!(h.provider.calls(), 1);

    h.backend.fail_writes(false);
    let stored = h.store().read(CommodityKey::Aluminum).await.unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn zero_retention_limit_is_rejected_before_writing() {
    let mut h = Harness::new(ScriptedProvider::new(10));
    let orchestrator = std::sync::Arc::try_unwrap(h.orchestrator)
        .ok()
        .unwrap()
        .with_retention_limit(0);
    h.orchestrator = std::sync::Arc::new(orchestrator);

    let err = h
        .orchestrator
        .resolve(CommodityKey::NaturalGas, &api_key())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Retention(_)));
    assert_eq!(h.backend.writes(), 0);
}

#[tokio::test]
async fn same_key_resolved_twice_fetches_once() {
    let h = Harness::new(ScriptedProvider::new(6));

    let first = h
        .orchestrator
        .resolve(CommodityKey::AllCommodities, &api_key())
        .await
        .unwrap();
    let second = h
        .orchestrator
        .resolve(CommodityKey::AllCommodities, &api_key())
        .await
        .unwrap();

    assert!(matches!(first, ResultEnvelope::FreshFetch { .. }));
    assert!(second.is_cache_hit());
    assert_eq!(first.record(), second.record());
    assert_eq!(h.provider.calls(), 1);
}
