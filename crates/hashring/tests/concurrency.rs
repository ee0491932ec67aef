//! Readers and writers sharing one ring across threads.

use std::sync::Arc;

use crossbeam::thread;
use hashring::{Error, HashRing};

#[test]
fn test_concurrent_readers_see_consistent_ring() {
    let ring = HashRing::new(50).unwrap();
    ring.add(["a", "b", "c", "d"]);
    let expected: Vec<_> = (0..1000).map(|i| ring.mget(format!("k{i}"), 3).unwrap()).collect();

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|_| {
                for (i, want) in expected.iter().enumerate() {
                    assert_eq!(&ring.mget(format!("k{i}"), 3).unwrap(), want);
                }
            });
        }
    })
    .unwrap();
}

#[test]
fn test_readers_during_membership_churn() {
    let ring = Arc::new(HashRing::new(20).unwrap());
    ring.add(["stable-1", "stable-2"]);

    thread::scope(|s| {
        let writer = Arc::clone(&ring);
        s.spawn(move |_| {
            for round in 0..200 {
                let node = format!("churn-{}", round % 3);
                writer.add([node.as_str()]);
                writer.remove([node.as_str()]).unwrap();
            }
        });

        for _ in 0..3 {
            let reader = Arc::clone(&ring);
            s.spawn(move |_| {
                for i in 0..2000 {
                    let replicas = reader.mget(format!("key-{i}"), 2).unwrap();
                    // Writes are atomic per batch: a reader sees whole nodes only.
                    assert_eq!(replicas.len(), 2);
                    assert_eq!(reader.token_count() % 20, 0);
                }
            });
        }
    })
    .unwrap();

    assert_eq!(ring.nodes(), ["stable-1", "stable-2"]);
}

#[test]
fn test_concurrent_removals_fail_exactly_once() {
    let ring = HashRing::new(10).unwrap();
    ring.add(["a", "b", "c"]);

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|_| ring.remove(["c"]))).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, Error::NodeNotFound(n) if n == "c")));
}
