//! Epoch-stamped timer queue driven by frame elapsed time.
//!
//! Timers advance only when the frame loop calls [`Timers::advance`]; there
//! is no background thread. A timer fires at most once per advance, so a long
//! stall does not produce a burst of catch-up callbacks.
//!
//! Delivery is two-step: [`Timers::advance`] reports what came due and the
//! consumer [`claim`](Timers::claim)s each one right before handling it. A
//! timer cancelled between the two (say, by the handler of an earlier timer
//! in the same batch) fails the claim and must not be delivered.

use slotmap::SlotMap;

use crate::epoch::Epoch;

slotmap::new_key_type! {
    /// Handle to an armed timer.
    pub struct TimerId;
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Repeat {
    Once,
    Every(f32),
}

#[derive(Debug, Clone)]
struct Timer {
    repeat: Repeat,
    remaining_ms: f32,
    epoch: Epoch,
    seq: u64,
    /// One-shot that came due and waits for its claim.
    spent: bool,
}

/// A timer that came due during [`Timers::advance`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TimerFired {
    pub id: TimerId,
    pub epoch: Epoch,
}

#[derive(Debug, Default)]
pub struct Timers {
    timers: SlotMap<TimerId, Timer>,
    next_seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a repeating timer. Periods below 1 ms are raised to 1 ms.
    pub fn set_interval(&mut self, period_ms: f32, epoch: Epoch) -> TimerId {
        let period = period_ms.max(1.0);
        self.add(Repeat::Every(period), period, epoch)
    }

    /// Arms a one-shot timer. It is removed after firing.
    pub fn set_timeout(&mut self, delay_ms: f32, epoch: Epoch) -> TimerId {
        self.add(Repeat::Once, delay_ms.max(0.0), epoch)
    }

    fn add(&mut self, repeat: Repeat, remaining_ms: f32, epoch: Epoch) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer { repeat, remaining_ms, epoch, seq, spent: false })
    }

    /// Returns `false` if the timer was already claimed (one-shot) or cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn count_for(&self, epoch: Epoch) -> usize {
        self.timers.values().filter(|t| t.epoch == epoch).count()
    }

    /// Cancels every timer not stamped with `keep`. Returns how many were cancelled.
    pub fn sweep(&mut self, keep: Epoch) -> usize {
        let before = self.timers.len();
        self.timers.retain(|_, t| t.epoch == keep);
        before - self.timers.len()
    }

    /// Advances every timer by `elapsed_ms` and returns the ones that came due,
    /// in the order they were armed.
    ///
    /// Due one-shots stay in the queue until claimed; any left unclaimed are
    /// dropped by the next advance.
    pub fn advance(&mut self, elapsed_ms: f32) -> Vec<TimerFired> {
        self.timers.retain(|_, t| !t.spent);

        let elapsed = elapsed_ms.max(0.0);
        let mut due: Vec<(u64, TimerFired)> = Vec::new();

        for (id, timer) in self.timers.iter_mut() {
            timer.remaining_ms -= elapsed;
            if timer.remaining_ms > 0.0 {
                continue;
            }
            due.push((timer.seq, TimerFired { id, epoch: timer.epoch }));
            match timer.repeat {
                Repeat::Once => timer.spent = true,
                Repeat::Every(period) => {
                    timer.remaining_ms += period;
                    if timer.remaining_ms <= 0.0 {
                        timer.remaining_ms = period;
                    }
                }
            }
        }

        due.sort_unstable_by_key(|(seq, _)| *seq);
        due.into_iter().map(|(_, fired)| fired).collect()
    }

    /// Confirms a fired timer is still armed, retiring it if it was a one-shot.
    ///
    /// `false` means it was cancelled after [`advance`](Self::advance) reported it.
    pub fn claim(&mut self, id: TimerId) -> bool {
        let Some(spent) = self.timers.get(id).map(|t| t.spent) else { return false };
        if spent {
            self.timers.remove(id);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E: Epoch = Epoch::new(1);

    fn ids(fired: &[TimerFired]) -> Vec<TimerId> {
        fired.iter().map(|f| f.id).collect()
    }

    #[test]
    fn interval_fires_each_period() {
        let mut timers = Timers::new();
        let id = timers.set_interval(1000.0, E);

        assert!(timers.advance(600.0).is_empty());
        assert_eq!(ids(&timers.advance(400.0)), vec![id]);
        assert!(timers.advance(999.0).is_empty());
        assert_eq!(ids(&timers.advance(1.0)), vec![id]);
        assert!(timers.contains(id));
    }

    #[test]
    fn long_stall_fires_once_without_catch_up() {
        let mut timers = Timers::new();
        let id = timers.set_interval(1000.0, E);

        assert_eq!(ids(&timers.advance(5000.0)), vec![id]);
        assert!(timers.advance(500.0).is_empty());
        assert_eq!(ids(&timers.advance(500.0)), vec![id]);
    }

    #[test]
    fn timeout_fires_once_then_disappears() {
        let mut timers = Timers::new();
        let id = timers.set_timeout(500.0, E);

        assert_eq!(ids(&timers.advance(500.0)), vec![id]);
        assert!(timers.claim(id));
        assert!(!timers.contains(id));
        assert!(!timers.claim(id));
        assert!(timers.advance(1000.0).is_empty());
        assert!(!timers.cancel(id));
    }

    #[test]
    fn unclaimed_timeouts_are_dropped_by_the_next_advance() {
        let mut timers = Timers::new();
        let id = timers.set_timeout(10.0, E);

        assert_eq!(ids(&timers.advance(10.0)), vec![id]);
        assert!(timers.advance(0.0).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn cancelling_a_due_timer_fails_its_claim() {
        let mut timers = Timers::new();
        let a = timers.set_timeout(10.0, E);
        let b = timers.set_timeout(10.0, E);
        let every = timers.set_interval(10.0, E);

        assert_eq!(ids(&timers.advance(20.0)), vec![a, b, every]);
        assert!(timers.claim(a));
        assert!(timers.cancel(b));
        assert!(timers.cancel(every));
        assert!(!timers.claim(b));
        assert!(!timers.claim(every));
        assert!(timers.is_empty());
    }

    #[test]
    fn due_timers_come_back_in_arming_order() {
        let mut timers = Timers::new();
        let a = timers.set_timeout(10.0, E);
        let b = timers.set_interval(5.0, E);
        let c = timers.set_timeout(1.0, E);
        assert_eq!(ids(&timers.advance(20.0)), vec![a, b, c]);
    }

    #[test]
    fn cancel_and_sweep() {
        let mut timers = Timers::new();
        let a = timers.set_interval(100.0, E);
        timers.set_interval(100.0, E.next());
        timers.set_timeout(100.0, E.next());

        assert!(timers.cancel(a));
        assert_eq!(timers.count_for(E.next()), 2);
        assert_eq!(timers.sweep(E), 2);
        assert!(timers.is_empty());
    }

    #[test]
    fn fired_timers_carry_their_epoch() {
        let mut timers = Timers::new();
        timers.set_timeout(0.0, E);
        let fired = timers.advance(0.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].epoch, E);
    }
}
