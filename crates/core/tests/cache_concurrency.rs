//! Cross-thread exercises for the bounded cache.

use std::sync::Arc;
use std::thread;

use marquee_core::BoundedCache;

#[test]
fn test_concurrent_readers_and_writers_keep_limits() {
    let cache: Arc<BoundedCache<String, Vec<u8>>> = Arc::new(BoundedCache::new(64, 10_000));

    let mut handles = Vec::new();
    for t in 0..8u64 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..500u64 {
                let key = format!("key-{}", (t * 31 + i) % 100);
                cache.set_with_cost(key.clone(), vec![0u8; 16], 16);
                let _ = cache.get(key.as_str());
                if i % 17 == 0 {
                    cache.remove(key.as_str());
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 64);
    assert!(cache.total_cost() <= 10_000);
}

#[test]
fn test_concurrent_clear_is_safe() {
    let cache: Arc<BoundedCache<String, u64>> = Arc::new(BoundedCache::new(32, 1_000));

    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 0..2_000u64 {
                cache.set(format!("key-{}", i % 50), i);
            }
        })
    };
    let clearer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for _ in 0..100 {
                cache.clear();
                thread::yield_now();
            }
        })
    };

    writer.join().unwrap();
    clearer.join().unwrap();

    assert!(cache.len() <= 32);
}
