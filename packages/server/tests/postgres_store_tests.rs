//! OTP record storage against a real Postgres.
//!
//! Needs Docker for the testcontainers Postgres. Run with:
//! `cargo test --test postgres_store_tests -- --ignored`

mod common;

use chrono::{Duration, Utc};
use hostelhq_core::domains::auth::models::NewOtpVerification;
use hostelhq_core::kernel::BaseOtpStore;
use test_context::test_context;
use uuid::Uuid;

use crate::common::TestHarness;

/// A phone number no other test uses, in canonical local form
fn unique_phone() -> String {
    let n = Uuid::new_v4().as_u128() % 100_000_000;
    format!("05{:08}", n)
}

fn pending(phone: &str, age: Duration) -> NewOtpVerification {
    let created_at = Utc::now() - age;
    NewOtpVerification {
        phone_number: phone.to_string(),
        otp: None,
        created_at,
        expires_at: created_at + Duration::minutes(10),
        length: 6,
        is_dev: false,
    }
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn reissue_replaces_the_pending_record(ctx: &mut TestHarness) {
    let store = ctx.otp_store();
    let phone = unique_phone();

    let first = store
        .replace_pending(pending(&phone, Duration::minutes(2)))
        .await
        .unwrap();
    let second = store
        .replace_pending(pending(&phone, Duration::zero()))
        .await
        .unwrap();

    assert_ne!(first.id, second.id);

    let phones = vec![phone.clone()];
    let records = store.list(Some(&phones)).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, second.id);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn concurrent_issuance_leaves_one_pending_record(ctx: &mut TestHarness) {
    let store = std::sync::Arc::new(ctx.otp_store());
    let phone = unique_phone();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let record = pending(&phone, Duration::zero());
            tokio::spawn(async move { store.replace_pending(record).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let phones = vec![phone.clone()];
    let records = store.list(Some(&phones)).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn verified_record_is_kept_and_new_code_can_be_issued(ctx: &mut TestHarness) {
    let store = ctx.otp_store();
    let phone = unique_phone();

    let issued = store
        .replace_pending(pending(&phone, Duration::minutes(1)))
        .await
        .unwrap();
    let verified = store.mark_verified(issued.id).await.unwrap().unwrap();
    assert!(verified.verified);
    assert!(verified.verified_at.is_some());

    // Marking twice does nothing
    assert!(store.mark_verified(issued.id).await.unwrap().is_none());
    assert!(store.find_latest_pending(&phone).await.unwrap().is_none());

    store
        .replace_pending(pending(&phone, Duration::zero()))
        .await
        .unwrap();

    let phones = vec![phone.clone()];
    assert_eq!(store.list(Some(&phones)).await.unwrap().len(), 2);
    assert!(store.find_latest_pending(&phone).await.unwrap().is_some());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn deletes_by_id_and_expiry(ctx: &mut TestHarness) {
    let store = ctx.otp_store();
    let stale_phone = unique_phone();
    let live_phone = unique_phone();
    let other_phone = unique_phone();

    let stale = store
        .replace_pending(pending(&stale_phone, Duration::minutes(30)))
        .await
        .unwrap();
    let live = store
        .replace_pending(pending(&live_phone, Duration::minutes(1)))
        .await
        .unwrap();
    let other = store
        .replace_pending(pending(&other_phone, Duration::minutes(1)))
        .await
        .unwrap();

    assert!(store.delete_expired(Utc::now()).await.unwrap() >= 1);
    assert!(store.find_latest_pending(&stale_phone).await.unwrap().is_none());
    assert!(!store.delete(stale.id).await.unwrap());

    assert_eq!(
        store
            .delete_many(&[live.id, other.id, Uuid::new_v4()])
            .await
            .unwrap(),
        2
    );
    assert!(store.find_latest_pending(&live_phone).await.unwrap().is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn health_check_succeeds(ctx: &mut TestHarness) {
    ctx.otp_store().health_check().await.unwrap();
}
