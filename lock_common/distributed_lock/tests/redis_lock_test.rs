//! Runs against a live server: `REDIS_URL=redis://127.0.0.1:6379/ cargo test --features redis-integration`
#![cfg(feature = "redis-integration")]

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use distributed_lock::{AcquireOutcome, AtomicOperations, Lock, LockRedisClient, ReleaseOutcome};

async fn redis_store() -> Arc<LockRedisClient> {
    Arc::new(LockRedisClient::from_env().await.expect("REDIS_URL must point at a running redis"))
}

fn unique(name: &str) -> String {
    format!("{}-{}", name, Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test]
async fn test_scripts_round_trip() {
    let store = redis_store().await;
    let key = format!("lock:{}", unique("script"));
    let expire_at = Utc::now().timestamp_millis() + 5_000;

    assert_eq!(store.acquire(&key, expire_at).await.unwrap(), AcquireOutcome::Acquired);
    assert_eq!(store.acquire(&key, expire_at).await.unwrap(), AcquireOutcome::Conflict);
    assert_eq!(store.release(&key).await.unwrap(), ReleaseOutcome::Released);
    assert_eq!(store.release(&key).await.unwrap(), ReleaseOutcome::NoOp);
}

#[tokio::test]
async fn test_past_expiry_leaves_no_key() {
    let store = redis_store().await;
    let key = format!("lock:{}", unique("past"));
    let expire_at = Utc::now().timestamp_millis() - 1_000;

    store.acquire(&key, expire_at).await.unwrap();
    assert_eq!(store.release(&key).await.unwrap(), ReleaseOutcome::NoOp);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_one_winner_across_clients() {
    let first = Lock::new(redis_store().await, unique("race"), Duration::from_secs(5));
    let second = Lock::new(redis_store().await, first.key().trim_start_matches("lock:"), Duration::from_secs(5));

    let (a, b) = tokio::join!(first.try_lock(), second.try_lock());
    assert_ne!(a, b);
    assert!(first.try_unlock().await);
}

#[tokio::test]
async fn test_passive_expiry() {
    let lock = Lock::new(redis_store().await, unique("ttl"), Duration::from_millis(100));
    assert!(lock.try_lock().await);
    assert!(!lock.try_lock().await);

    tokio::time::sleep(Duration::from_millis(450)).await;
    assert!(lock.try_lock().await);
    assert!(lock.try_unlock().await);
}

#[tokio::test]
async fn test_blocking_acquire_release() {
    let store = redis_store().await;
    let lock = Lock::new(store.clone(), unique("blocking"), Duration::from_secs(2));
    lock.acquire().await.unwrap();

    let other = lock.clone();
    let err = Lock::new(store, other.key().trim_start_matches("lock:"), Duration::from_millis(300))
        .acquire()
        .await
        .unwrap_err();
    assert!(err.is_timeout());

    lock.release().await.unwrap();
    assert!(other.try_lock().await);
    assert!(other.try_unlock().await);
}
