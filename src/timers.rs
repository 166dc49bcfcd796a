//! Deadline timers driven by host timestamps
//!
//! Nothing here sleeps. The owner passes the current time (ms) to
//! [`Timers::fire_due`] from its frame callback and gets back the timers
//! that came due, in deadline order. Dropping or clearing the table cancels
//! everything it holds.

/// Handle for cancelling a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<K> {
    id: TimerId,
    kind: K,
    due_at: f64,
    /// Period for repeating timers
    period: Option<f64>,
}

/// Pending timers tagged with a caller-defined kind
#[derive(Debug, Clone)]
pub struct Timers<K> {
    next_id: u64,
    pending: Vec<Timer<K>>,
}

impl<K> Default for Timers<K> {
    fn default() -> Self {
        Self {
            next_id: 1,
            pending: Vec::new(),
        }
    }
}

impl<K: Copy> Timers<K> {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Fire once, `delay_ms` after `now`
    pub fn schedule(&mut self, kind: K, now: f64, delay_ms: f64) -> TimerId {
        let id = self.allocate_id();
        self.pending.push(Timer {
            id,
            kind,
            due_at: now + delay_ms,
            period: None,
        });
        id
    }

    /// Fire every `period_ms`, first at `now + period_ms`
    pub fn schedule_repeating(&mut self, kind: K, now: f64, period_ms: f64) -> TimerId {
        assert!(period_ms > 0.0, "repeating timer needs a positive period");
        let id = self.allocate_id();
        self.pending.push(Timer {
            id,
            kind,
            due_at: now + period_ms,
            period: Some(period_ms),
        });
        id
    }

    /// Returns true if the timer was still pending
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Cancel everything; returns how many timers were pending
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Collect every firing due at or before `now`, oldest deadline first.
    ///
    /// A repeating timer fires once per whole period that has elapsed, so a
    /// long gap between frames catches up instead of dropping seconds.
    pub fn fire_due(&mut self, now: f64) -> Vec<(TimerId, K)> {
        let mut fired: Vec<(f64, TimerId, K)> = Vec::new();

        self.pending.retain_mut(|timer| {
            while timer.due_at <= now {
                fired.push((timer.due_at, timer.id, timer.kind));
                match timer.period {
                    Some(period) => timer.due_at += period,
                    None => return false,
                }
            }
            true
        });

        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.0.cmp(&b.1.0)));
        fired.into_iter().map(|(_, id, kind)| (id, kind)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Tag {
        A,
        B,
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = Timers::new();
        let id = timers.schedule(Tag::A, 0.0, 50.0);

        assert!(timers.fire_due(49.9).is_empty());
        assert_eq!(timers.fire_due(50.0), vec![(id, Tag::A)]);
        assert!(timers.fire_due(500.0).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_repeating_catches_up_in_order() {
        let mut timers = Timers::new();
        let tick = timers.schedule_repeating(Tag::A, 0.0, 1000.0);
        let once = timers.schedule(Tag::B, 0.0, 1500.0);

        let fired = timers.fire_due(3200.0);
        assert_eq!(
            fired,
            vec![(tick, Tag::A), (once, Tag::B), (tick, Tag::A), (tick, Tag::A)]
        );
        assert!(timers.is_pending(tick));
        assert!(!timers.is_pending(once));
    }

    #[test]
    fn test_cancel() {
        let mut timers = Timers::new();
        let a = timers.schedule(Tag::A, 0.0, 10.0);
        let b = timers.schedule_repeating(Tag::B, 0.0, 10.0);

        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        assert_eq!(timers.fire_due(25.0), vec![(b, Tag::B), (b, Tag::B)]);

        assert_eq!(timers.cancel_all(), 1);
        assert!(timers.fire_due(1_000.0).is_empty());
    }
}
