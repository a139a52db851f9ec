//! Model-checks the cursor-claiming discipline (spec §8 invariant 5:
//! "every output slot is written by exactly one worker") under `loom`'s
//! exhaustive interleaving search. Run with `RUSTFLAGS="--cfg loom"
//! cargo test --test loom_cursor --release`, matching how `halo`'s own
//! lock-free structures are model-checked.

#![cfg(loom)]

use loom::model;
use loom::sync::atomic::{AtomicUsize, Ordering};
use loom::sync::Arc;
use loom::thread;

const THETA: usize = 6;
const BATCH: usize = 2;

fn claim(cursor: &AtomicUsize, theta: usize, batch: usize) -> Option<std::ops::Range<usize>> {
    let offset = cursor.fetch_add(batch, Ordering::Relaxed);
    if offset >= theta {
        return None;
    }
    Some(offset..theta.min(offset + batch))
}

#[test]
fn two_workers_never_claim_overlapping_slots() {
    model(|| {
        let cursor = Arc::new(AtomicUsize::new(0));
        let hits = Arc::new(loom::sync::Mutex::new(vec![0u8; THETA]));

        let run_worker = |cursor: Arc<AtomicUsize>, hits: Arc<loom::sync::Mutex<Vec<u8>>>| {
            while let Some(range) = claim(&cursor, THETA, BATCH) {
                let mut hits = hits.lock().unwrap();
                for i in range {
                    hits[i] += 1;
                }
            }
        };

        let c1 = cursor.clone();
        let h1 = hits.clone();
        let t1 = thread::spawn(move || run_worker(c1, h1));
        run_worker(cursor, hits.clone());
        t1.join().unwrap();

        let hits = hits.lock().unwrap();
        assert!(hits.iter().all(|&h| h == 1), "every slot must be claimed exactly once: {hits:?}");
    });
}
