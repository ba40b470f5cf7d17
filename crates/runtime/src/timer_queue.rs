use foundation::time::Time;

/// Deterministic timer queue for deferred, single-threaded callbacks.
///
/// Key properties:
/// - Total ordering on `(due, id)`.
/// - Timers due at the same instant fire in insertion order.
/// - Timers cannot be withdrawn once scheduled.
///
/// Vec-backed: a page holds a handful of pending timers at most.

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Key {
    due: Time,
    id: TimerId,
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
struct Item<T> {
    key: Key,
    payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    items: Vec<Item<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            items: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn schedule(&mut self, due: Time, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.items.push(Item {
            key: Key { due, id },
            payload,
        });
        id
    }

    /// Due time of the earliest live timer.
    pub fn next_due(&self) -> Option<Time> {
        self.best_index().map(|idx| self.items[idx].key.due)
    }

    /// Pops the earliest timer if it is due at or before `now`.
    pub fn pop_due(&mut self, now: Time) -> Option<(TimerId, Time, T)> {
        let idx = self.best_index()?;
        if self.items[idx].key.due > now {
            return None;
        }
        let item = self.items.swap_remove(idx);
        Some((item.key.id, item.key.due, item.payload))
    }

    fn best_index(&self) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .min_by_key(|(_, item)| item.key)
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::TimerQueue;
    use foundation::time::Time;

    #[test]
    fn same_due_is_insertion_order() {
        let mut q = TimerQueue::new();
        q.schedule(Time(10), "a");
        q.schedule(Time(10), "b");
        q.schedule(Time(10), "c");

        let (_, _, a) = q.pop_due(Time(10)).unwrap();
        let (_, _, b) = q.pop_due(Time(10)).unwrap();
        let (_, _, c) = q.pop_due(Time(10)).unwrap();
        assert_eq!((a, b, c), ("a", "b", "c"));
    }

    #[test]
    fn earlier_due_fires_first() {
        let mut q = TimerQueue::new();
        q.schedule(Time(500), "late");
        q.schedule(Time(100), "early");
        assert_eq!(q.next_due(), Some(Time(100)));
        let (_, due, v) = q.pop_due(Time(1_000)).unwrap();
        assert_eq!((due, v), (Time(100), "early"));
    }

    #[test]
    fn not_yet_due_stays_queued() {
        let mut q = TimerQueue::new();
        q.schedule(Time(500), "mount");
        assert!(q.pop_due(Time(499)).is_none());
        assert_eq!(q.len(), 1);
        assert!(q.pop_due(Time(500)).is_some());
        assert!(q.is_empty());
    }

    #[test]
    fn order_survives_interleaved_pops() {
        let mut q = TimerQueue::new();
        q.schedule(Time(30), "c");
        q.schedule(Time(10), "a");
        q.schedule(Time(20), "b");
        q.schedule(Time(10), "a2");

        let mut seen = Vec::new();
        while let Some((_, _, v)) = q.pop_due(Time(30)) {
            seen.push(v);
        }
        assert_eq!(seen, vec!["a", "a2", "b", "c"]);
    }
}
