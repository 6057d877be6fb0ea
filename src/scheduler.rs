use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

/// Opaque handle for a scheduled callback. Handles are never reused within a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Single-threaded timer queue on a virtual clock.
///
/// Time is a `Duration` since the session started and only moves when the owner calls
/// [`Scheduler::advance_to`]. When several timers are due, the earliest deadline fires first;
/// ties fire in scheduling order.
#[derive(Debug)]
pub struct Scheduler<E> {
    now: Duration,
    next_id: u64,
    queue: BinaryHeap<Reverse<(Duration, u64)>>,
    events: HashMap<u64, E>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BinaryHeap::new(),
            events: HashMap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        let due = self.now.saturating_add(delay);
        self.queue.push(Reverse((due, id)));
        self.events.insert(id, event);
        TimerHandle(id)
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        // The heap entry stays behind and is skipped when it surfaces.
        self.events.remove(&handle.0).is_some()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.events.contains_key(&handle.0)
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.events.clear();
    }

    /// Moves the clock to `now` and returns every event that became due, in firing order.
    /// A `now` earlier than the current clock leaves time where it is.
    pub fn advance_to(&mut self, now: Duration) -> Vec<E> {
        if now > self.now {
            self.now = now;
        }

        let mut due = Vec::new();
        while let Some(&Reverse((at, id))) = self.queue.peek() {
            if at > self.now {
                break;
            }
            self.queue.pop();
            if let Some(event) = self.events.remove(&id) {
                due.push(event);
            }
        }
        due
    }

    /// Deadline of the earliest live timer, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue
            .iter()
            .filter(|Reverse((_, id))| self.events.contains_key(id))
            .map(|Reverse((at, _))| *at)
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_then_insertion_order() {
        let mut s = Scheduler::new();
        s.schedule(Duration::from_millis(20), "late");
        s.schedule(Duration::from_millis(10), "a");
        s.schedule(Duration::from_millis(10), "b");

        assert!(s.advance_to(Duration::from_millis(5)).is_empty());
        assert_eq!(s.advance_to(Duration::from_millis(10)), vec!["a", "b"]);
        assert_eq!(s.advance_to(Duration::from_secs(1)), vec!["late"]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut s = Scheduler::new();
        let h = s.schedule(Duration::from_millis(10), 1);
        s.schedule(Duration::from_millis(10), 2);
        assert!(s.cancel(h));
        assert!(!s.cancel(h));
        assert!(!s.is_pending(h));
        assert_eq!(s.advance_to(Duration::from_millis(10)), vec![2]);
    }

    #[test]
    fn clock_does_not_run_backwards() {
        let mut s = Scheduler::new();
        s.advance_to(Duration::from_secs(2));
        s.advance_to(Duration::from_secs(1));
        assert_eq!(s.now(), Duration::from_secs(2));

        s.schedule(Duration::from_millis(500), ());
        assert_eq!(s.next_deadline(), Some(Duration::from_millis(2500)));
    }
}
