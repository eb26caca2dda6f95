//! Behavioural tests for the in-memory visit store.
//!
//! These exercise the `VisitStore` contract (create, get, list, set_status)
//! without a database.

use std::sync::Arc;

use assert_matches::assert_matches;
use gatepass_core::error::CoreError;
use gatepass_core::registration::VisitorDetails;
use gatepass_core::status::{TransitionPolicy, VisitStatus};
use gatepass_db::{MemoryVisitStore, StoreError, VisitStore};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn details(name: &str) -> VisitorDetails {
    VisitorDetails {
        name: name.to_string(),
        phone: "13800138000".to_string(),
        company: "ABC公司".to_string(),
        host_name: "李四".to_string(),
        host_company: "XYZ公司".to_string(),
        host_phone: "13900139000".to_string(),
    }
}

// ---------------------------------------------------------------------------
// create / get
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_assigns_unique_ids_and_pending_status() {
    let store = MemoryVisitStore::default();

    let a = store.create(details("张三")).await.unwrap();
    let b = store.create(details("王五")).await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(a.status, VisitStatus::Pending);
    assert_eq!(b.status, VisitStatus::Pending);
}

#[tokio::test]
async fn get_returns_submitted_fields_unchanged() {
    let store = MemoryVisitStore::default();
    let created = store.create(details("张三")).await.unwrap();

    let fetched = store.get(created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "张三");
    assert_eq!(fetched.company, "ABC公司");
    assert_eq!(fetched.host_name, "李四");
    assert_eq!(fetched.host_company, "XYZ公司");
    assert_eq!(fetched.host_phone, "13900139000");
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let store = MemoryVisitStore::default();
    assert_matches!(
        store.get(999_999).await,
        Err(StoreError::Core(CoreError::NotFound { id: 999_999, .. }))
    );
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_is_newest_first() {
    let store = MemoryVisitStore::default();
    for name in ["first", "second", "third"] {
        store.create(details(name)).await.unwrap();
    }

    let names: Vec<_> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.name)
        .collect();

    assert_eq!(names, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn list_reflects_status_changes() {
    let store = MemoryVisitStore::default();
    let v = store.create(details("张三")).await.unwrap();

    store.set_status(v.id, "denied").await.unwrap();

    let listed = store.list().await.unwrap();
    assert_eq!(listed[0].status, VisitStatus::Denied);
}

// ---------------------------------------------------------------------------
// set_status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn set_status_applies_decisions() {
    let store = MemoryVisitStore::default();
    let v = store.create(details("张三")).await.unwrap();

    let updated = store.set_status(v.id, "approved").await.unwrap();
    assert_eq!(updated.status, VisitStatus::Approved);
    assert_eq!(store.get(v.id).await.unwrap().status, VisitStatus::Approved);
}

#[tokio::test]
async fn invalid_status_leaves_record_unchanged() {
    let store = MemoryVisitStore::default();
    let v = store.create(details("张三")).await.unwrap();
    store.set_status(v.id, "approved").await.unwrap();

    for bad in ["maybe", "pending", "APPROVED", ""] {
        assert_matches!(
            store.set_status(v.id, bad).await,
            Err(StoreError::Core(CoreError::InvalidStatus(_)))
        );
    }

    assert_eq!(store.get(v.id).await.unwrap().status, VisitStatus::Approved);
}

#[tokio::test]
async fn set_status_on_unknown_id_is_not_found() {
    let store = MemoryVisitStore::default();
    assert_matches!(
        store.set_status(42, "approved").await,
        Err(StoreError::Core(CoreError::NotFound { .. }))
    );
}

#[tokio::test]
async fn permissive_policy_allows_flipping_decisions() {
    let store = MemoryVisitStore::new(TransitionPolicy::Permissive);
    let v = store.create(details("张三")).await.unwrap();

    store.set_status(v.id, "approved").await.unwrap();
    store.set_status(v.id, "denied").await.unwrap();
    store.set_status(v.id, "approved").await.unwrap();

    assert_eq!(store.get(v.id).await.unwrap().status, VisitStatus::Approved);
}

#[tokio::test]
async fn strict_policy_keeps_first_decision() {
    let store = MemoryVisitStore::new(TransitionPolicy::Strict);
    let v = store.create(details("张三")).await.unwrap();

    store.set_status(v.id, "denied").await.unwrap();
    assert_matches!(
        store.set_status(v.id, "approved").await,
        Err(StoreError::Core(CoreError::Conflict(_)))
    );
    assert_eq!(store.get(v.id).await.unwrap().status, VisitStatus::Denied);
}

#[tokio::test]
async fn first_decision_write_only_applies_to_pending_records() {
    let store = MemoryVisitStore::new(TransitionPolicy::Strict);
    let v = store.create(details("张三")).await.unwrap();

    let decided = store
        .write_first_decision(v.id, VisitStatus::Approved)
        .await
        .unwrap();
    assert_eq!(decided.map(|d| d.status), Some(VisitStatus::Approved));

    let again = store
        .write_first_decision(v.id, VisitStatus::Denied)
        .await
        .unwrap();
    assert!(again.is_none());
    assert_eq!(store.get(v.id).await.unwrap().status, VisitStatus::Approved);

    assert!(store
        .write_first_decision(999_999, VisitStatus::Denied)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn strict_policy_applies_exactly_one_concurrent_decision() {
    let store = Arc::new(MemoryVisitStore::new(TransitionPolicy::Strict));
    let id = store.create(details("张三")).await.unwrap().id;

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = Arc::clone(&store);
            let decision = if i % 2 == 0 { "approved" } else { "denied" };
            tokio::spawn(async move { store.set_status(id, decision).await })
        })
        .collect();

    let mut applied = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(visitor) => applied.push(visitor.status),
            Err(err) => assert_matches!(err, StoreError::Core(CoreError::Conflict(_))),
        }
    }

    assert_eq!(applied.len(), 1);
    assert_eq!(store.get(id).await.unwrap().status, applied[0]);
}

#[tokio::test]
async fn visitor_serializes_to_public_shape() {
    let store = MemoryVisitStore::default();
    let v = store.create(details("张三")).await.unwrap();

    let json = serde_json::to_value(&v).unwrap();
    let obj = json.as_object().unwrap();

    for key in [
        "id",
        "name",
        "phone",
        "company",
        "host_name",
        "host_company",
        "host_phone",
        "visit_time",
        "status",
    ] {
        assert!(obj.contains_key(key), "missing key {key}");
    }
    assert_eq!(obj.len(), 9);
    assert_eq!(json["status"], "pending");
    assert!(json["visit_time"].as_str().unwrap().contains('T'));
}
