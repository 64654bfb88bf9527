//! Deferred tasks on the widget's millisecond clock.
//!
//! The scheduler never looks at a wall clock: the owner hands it `now` and
//! pops whatever has come due. Tasks with the same due time pop in the order
//! they were scheduled.

use std::collections::{BTreeMap, HashMap};

use crate::timing::Millis;

/// Handle to a scheduled task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
pub struct Scheduler<T> {
    queue: BTreeMap<(Millis, u64), T>,
    due_by_id: HashMap<u64, Millis>,
    next_seq: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            queue: BTreeMap::new(),
            due_by_id: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, due: Millis, task: T) -> TaskId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), task);
        self.due_by_id.insert(seq, due);
        TaskId(seq)
    }

    /// Removes a pending task. Returns `None` if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let due = self.due_by_id.remove(&id.0)?;
        self.queue.remove(&(due, id.0))
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.due_by_id.contains_key(&id.0)
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Pops the earliest task due at or before `now`.
    ///
    /// One at a time, so the caller can schedule or cancel between tasks.
    pub fn pop_due(&mut self, now: Millis) -> Option<(TaskId, Millis, T)> {
        let (&(due, seq), _) = self.queue.iter().next()?;
        if due > now {
            return None;
        }
        let task = self.queue.remove(&(due, seq))?;
        self.due_by_id.remove(&seq);
        Some((TaskId(seq), due, task))
    }

    /// Drops every pending task and returns how many there were.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.queue.len();
        self.queue.clear();
        self.due_by_id.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(30, "c");
        s.schedule(10, "a");
        s.schedule(20, "b");
        assert_eq!(s.next_due(), Some(10));
        assert!(s.pop_due(5).is_none());

        let popped: Vec<_> = std::iter::from_fn(|| s.pop_due(100).map(|(_, _, t)| t)).collect();
        assert_eq!(popped, vec!["a", "b", "c"]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_ties_pop_in_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule(10, 1);
        s.schedule(10, 2);
        s.schedule(10, 3);
        let popped: Vec<_> = std::iter::from_fn(|| s.pop_due(10).map(|(_, _, t)| t)).collect();
        assert_eq!(popped, vec![1, 2, 3]);
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new();
        let a = s.schedule(10, "a");
        let b = s.schedule(20, "b");
        assert_eq!(s.cancel(a), Some("a"));
        assert_eq!(s.cancel(a), None);
        assert!(!s.is_pending(a));
        assert!(s.is_pending(b));
        assert_eq!(s.pop_due(50), Some((b, 20, "b")));
        assert_eq!(s.cancel(b), None);
    }

    #[test]
    fn test_cancel_all() {
        let mut s = Scheduler::new();
        let a = s.schedule(10, ());
        s.schedule(20, ());
        assert_eq!(s.cancel_all(), 2);
        assert!(!s.is_pending(a));
        assert!(s.pop_due(u64::MAX).is_none());
        assert_eq!(s.next_due(), None);
    }
}
