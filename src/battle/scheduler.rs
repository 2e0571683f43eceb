//! Delayed continuations on a logical millisecond clock.
//!
//! Each continuation carries the epoch it was scheduled in. The engine bumps
//! its epoch whenever a battle is stopped, settled or replaced, which turns
//! every continuation from the old epoch into a no-op when it comes due.

use crate::combat::UnitRef;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Pick the next living unit in the turn order.
    ProcessNextTurn,
    /// Let an autonomous unit act.
    ResolveUnit(UnitRef),
    /// Start the next encounter of a chain.
    ChainRestart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Continuation {
    pub due_ms: u64,
    pub epoch: u64,
    pub step: Step,
    seq: u64,
}

impl Ord for Continuation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due_ms
            .cmp(&other.due_ms)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Continuation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-queue ordered by due time, then by scheduling order.
#[derive(Debug, Default)]
pub struct ContinuationQueue {
    heap: BinaryHeap<Reverse<Continuation>>,
    next_seq: u64,
}

impl ContinuationQueue {
    pub fn schedule(&mut self, due_ms: u64, epoch: u64, step: Step) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Continuation {
            due_ms,
            epoch,
            step,
            seq,
        }));
    }

    pub fn next_due(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(c)| c.due_ms)
    }

    /// Removes the earliest continuation if it is due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Continuation> {
        if self.next_due()? > now_ms {
            return None;
        }
        self.heap.pop().map(|Reverse(c)| c)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of pending continuations scheduled in `epoch`.
    pub fn pending_in_epoch(&self, epoch: u64) -> usize {
        self.heap.iter().filter(|Reverse(c)| c.epoch == epoch).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_due_order() {
        let mut queue = ContinuationQueue::default();
        queue.schedule(300, 1, Step::ChainRestart);
        queue.schedule(100, 1, Step::ProcessNextTurn);
        queue.schedule(200, 1, Step::ResolveUnit(UnitRef::Player));

        assert!(queue.pop_due(50).is_none());
        assert_eq!(queue.pop_due(1000).map(|c| c.due_ms), Some(100));
        assert_eq!(queue.pop_due(1000).map(|c| c.due_ms), Some(200));
        assert_eq!(queue.pop_due(1000).map(|c| c.step), Some(Step::ChainRestart));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_same_due_time_keeps_schedule_order() {
        let mut queue = ContinuationQueue::default();
        queue.schedule(100, 1, Step::ResolveUnit(UnitRef::Enemy(0)));
        queue.schedule(100, 1, Step::ResolveUnit(UnitRef::Enemy(1)));
        assert_eq!(
            queue.pop_due(100).map(|c| c.step),
            Some(Step::ResolveUnit(UnitRef::Enemy(0)))
        );
        assert_eq!(
            queue.pop_due(100).map(|c| c.step),
            Some(Step::ResolveUnit(UnitRef::Enemy(1)))
        );
    }

    #[test]
    fn test_pending_in_epoch() {
        let mut queue = ContinuationQueue::default();
        queue.schedule(100, 1, Step::ProcessNextTurn);
        queue.schedule(100, 2, Step::ProcessNextTurn);
        assert_eq!(queue.pending_in_epoch(1), 1);
        assert_eq!(queue.pending_in_epoch(3), 0);
        assert_eq!(queue.len(), 2);
    }
}
