//! Priority-ordered job queue.
//!
//! Jobs are kept in a total order of `(priority, creation sequence)`. The
//! whole pending list is re-sorted on every insert, so a HIGH job submitted
//! late overtakes MEDIUM/LOW jobs that are already waiting. There is no aging:
//! a steady stream of HIGH jobs starves LOW ones.

use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::types::{BatchId, IngestionId, Priority};

/// Creation stamp of a batch: wall-clock time for display plus a
/// process-wide monotonic sequence used for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationStamp {
    pub at: DateTime<Utc>,
    pub seq: u64,
}

/// A pending unit of scheduling: one batch waiting to be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub ingestion_id: IngestionId,
    pub batch_id: BatchId,
    pub priority: Priority,
    pub created: CreationStamp,
}

impl Job {
    /// Queue comparator: priority rank first, then creation order.
    ///
    /// Ties are broken on the sequence rather than the wall clock so that a
    /// clock adjustment cannot reorder jobs.
    pub fn queue_order(&self, other: &Job) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then(self.created.seq.cmp(&other.created.seq))
    }
}

#[derive(Debug, Default)]
struct QueueInner {
    jobs: VecDeque<Job>,
}

/// Thread-safe handle to the pending job list. Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct PriorityJobQueue {
    inner: Arc<Mutex<QueueInner>>,
    sequence: Arc<AtomicU64>,
}

impl PriorityJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the next creation stamp. Stamps taken in sequence compare in that
    /// sequence.
    pub fn stamp(&self) -> CreationStamp {
        CreationStamp {
            at: Utc::now(),
            seq: self.sequence.fetch_add(1, AtomicOrdering::SeqCst),
        }
    }

    /// Insert one job; the ordering holds as soon as this returns.
    pub fn enqueue(&self, job: Job) {
        self.enqueue_all(std::iter::once(job));
    }

    /// Insert several jobs under one lock and re-sort once.
    pub fn enqueue_all<I>(&self, jobs: I)
    where
        I: IntoIterator<Item = Job>,
    {
        let mut q = self.lock();
        q.jobs.extend(jobs);
        q.jobs.make_contiguous().sort_by(Job::queue_order);
    }

    /// Remove and return the most urgent job. Never blocks.
    pub fn pop_front(&self) -> Option<Job> {
        self.lock().jobs.pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().jobs.is_empty()
    }

    /// Pending job count per priority. Every level is present, possibly zero.
    pub fn pending_by_priority(&self) -> BTreeMap<Priority, usize> {
        let mut counts: BTreeMap<Priority, usize> =
            Priority::ALL.iter().map(|p| (*p, 0)).collect();
        for job in self.lock().jobs.iter() {
            *counts.entry(job.priority).or_default() += 1;
        }
        counts
    }

    /// Copy of the pending jobs in service order.
    pub fn snapshot(&self) -> Vec<Job> {
        self.lock().jobs.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn job(queue: &PriorityJobQueue, priority: Priority) -> Job {
        Job {
            ingestion_id: Uuid::new_v4(),
            batch_id: Uuid::new_v4(),
            priority,
            created: queue.stamp(),
        }
    }

    #[test]
    fn empty_pop_returns_none() {
        let q = PriorityJobQueue::new();
        assert!(q.pop_front().is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn serves_by_priority_regardless_of_arrival() {
        let q = PriorityJobQueue::new();
        let low = job(&q, Priority::Low);
        let high = job(&q, Priority::High);
        let medium = job(&q, Priority::Medium);
        q.enqueue(low.clone());
        q.enqueue(high.clone());
        q.enqueue(medium.clone());

        assert_eq!(q.pop_front().unwrap(), high);
        assert_eq!(q.pop_front().unwrap(), medium);
        assert_eq!(q.pop_front().unwrap(), low);
        assert!(q.pop_front().is_none());
    }

    #[test]
    fn equal_priority_is_fifo_by_creation() {
        let q = PriorityJobQueue::new();
        let first = job(&q, Priority::Medium);
        let second = job(&q, Priority::Medium);
        let third = job(&q, Priority::Medium);
        // Enqueue out of creation order.
        q.enqueue_all(vec![third.clone(), first.clone(), second.clone()]);

        assert_eq!(q.pop_front().unwrap(), first);
        assert_eq!(q.pop_front().unwrap(), second);
        assert_eq!(q.pop_front().unwrap(), third);
    }

    #[test]
    fn late_high_overtakes_waiting_jobs() {
        let q = PriorityJobQueue::new();
        let m1 = job(&q, Priority::Medium);
        let l1 = job(&q, Priority::Low);
        q.enqueue_all(vec![m1.clone(), l1.clone()]);
        assert_eq!(q.pop_front().unwrap(), m1);

        let h = job(&q, Priority::High);
        q.enqueue(h.clone());
        assert_eq!(q.pop_front().unwrap(), h);
        assert_eq!(q.pop_front().unwrap(), l1);
    }

    #[test]
    fn sequence_wins_over_wall_clock() {
        let q = PriorityJobQueue::new();
        let mut earlier = job(&q, Priority::Low);
        let later = job(&q, Priority::Low);
        // Simulate the clock stepping backwards between the two stamps.
        earlier.created.at = later.created.at + chrono::Duration::seconds(60);
        q.enqueue_all(vec![later.clone(), earlier.clone()]);
        assert_eq!(q.pop_front().unwrap(), earlier);
        assert_eq!(q.pop_front().unwrap(), later);
    }

    #[test]
    fn pending_by_priority_counts() {
        let q = PriorityJobQueue::new();
        q.enqueue(job(&q, Priority::High));
        q.enqueue(job(&q, Priority::Low));
        q.enqueue(job(&q, Priority::Low));

        let counts = q.pending_by_priority();
        assert_eq!(counts[&Priority::High], 1);
        assert_eq!(counts[&Priority::Medium], 0);
        assert_eq!(counts[&Priority::Low], 2);
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn snapshot_is_in_service_order() {
        let q = PriorityJobQueue::new();
        let low = job(&q, Priority::Low);
        let high = job(&q, Priority::High);
        q.enqueue_all(vec![low.clone(), high.clone()]);
        assert_eq!(q.snapshot(), vec![high, low]);
        assert_eq!(q.len(), 2, "snapshot must not drain");
    }
}
