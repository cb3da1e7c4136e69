/// Cached object loader behaviour under concurrent invocations
#[path = "common/mod.rs"]
mod common;

use awskit_core::services::{LoadOutcome, StorageService};
use common::mock_aws::MockS3;
use std::sync::Arc;

#[tokio::test]
async fn test_cached_value_survives_remote_changes() {
    let s3 = MockS3::new();
    s3.put_object("motd.txt", b"first");
    let storage = StorageService::new(s3.clone(), "assets");

    assert_eq!(storage.load("motd.txt").await, "first");

    // no invalidation: the first value stays for the life of the loader
    s3.put_object("motd.txt", b"second");
    s3.delete_object("motd.txt");
    assert_eq!(storage.load("motd.txt").await, "first");
    assert_eq!(s3.get_count(), 1);
}

#[tokio::test]
async fn test_object_created_after_miss_is_picked_up() {
    let s3 = MockS3::new();
    let storage = StorageService::new(s3.clone(), "assets");

    assert_eq!(storage.fetch("late.txt").await, LoadOutcome::NotFound);

    s3.put_object("late.txt", b"arrived");
    assert_eq!(storage.load("late.txt").await, "arrived");
    assert!(storage.is_cached("late.txt"));
}

#[tokio::test]
async fn test_concurrent_invocations_share_the_cache() {
    let s3 = MockS3::new();
    for i in 0..8 {
        s3.put_object(&format!("doc-{}.txt", i), format!("content {}", i).as_bytes());
    }
    let storage = Arc::new(StorageService::new(s3.clone(), "assets"));

    let tasks: Vec<_> = (0..64)
        .map(|i| {
            let storage = storage.clone();
            tokio::spawn(async move {
                let name = format!("doc-{}.txt", i % 8);
                (i % 8, storage.load(&name).await)
            })
        })
        .collect();

    for task in tasks {
        let (n, content) = task.await.unwrap();
        assert_eq!(content, format!("content {}", n));
    }

    assert_eq!(storage.cached_len(), 8);
    // duplicate fetches are tolerated, but never more than one per invocation
    assert!(s3.get_count() >= 8 && s3.get_count() <= 64);

    let before = s3.get_count();
    for i in 0..8 {
        storage.load(&format!("doc-{}.txt", i)).await;
    }
    assert_eq!(s3.get_count(), before);
}
