use std::ops::Range;
use std::sync::atomic::{AtomicI64, Ordering};

/// Shared cursor over the task space `[0, tasks)`. Workers race on
/// [`claim`](BatchCursor::claim); each call hands out a contiguous range
/// no other call will ever see.
pub struct BatchCursor {
    next: AtomicI64,
    batch_size: i64,
    tasks: i64,
}

impl BatchCursor {
    pub fn new(tasks: i64, batch_size: i64) -> Self {
        assert!(batch_size >= 1, "batch size must be at least 1");
        BatchCursor {
            next: AtomicI64::new(0),
            batch_size,
            tasks,
        }
    }

    /// Claims the next batch, or `None` once the task space is exhausted.
    /// The end is clamped to `tasks`, so the last batch may be short.
    pub fn claim(&self) -> Option<Range<i64>> {
        let start = self.next.fetch_add(self.batch_size, Ordering::Relaxed);
        if start >= self.tasks {
            return None;
        }
        Some(start..(start + self.batch_size).min(self.tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::BatchCursor;
    use std::sync::Mutex;

    #[test]
    fn claims_cover_task_space_exactly_once() {
        let cursor = BatchCursor::new(10, 2);
        let mut batches = Vec::new();
        while let Some(batch) = cursor.claim() {
            batches.push(batch);
        }
        assert_eq!(batches, vec![0..2, 2..4, 4..6, 6..8, 8..10]);
        assert!(cursor.claim().is_none());
    }

    #[test]
    fn last_batch_is_clamped_to_tasks() {
        let cursor = BatchCursor::new(10, 4);
        assert_eq!(cursor.claim(), Some(0..4));
        assert_eq!(cursor.claim(), Some(4..8));
        assert_eq!(cursor.claim(), Some(8..10));
        assert_eq!(cursor.claim(), None);
    }

    #[test]
    fn single_task_single_batch() {
        let cursor = BatchCursor::new(1, 256);
        assert_eq!(cursor.claim(), Some(0..1));
        assert_eq!(cursor.claim(), None);
    }

    #[test]
    fn concurrent_claims_partition_without_overlap_or_gap() {
        let tasks = 10_000;
        let cursor = BatchCursor::new(tasks, 7);
        let claimed = Mutex::new(Vec::new());

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    while let Some(batch) = cursor.claim() {
                        claimed.lock().unwrap().push(batch);
                    }
                });
            }
        });

        let mut seen = vec![0u32; tasks as usize];
        for batch in claimed.into_inner().unwrap() {
            for pk in batch {
                seen[pk as usize] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }
}
