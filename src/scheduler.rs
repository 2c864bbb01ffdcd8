use std::time::{Duration, Instant};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A single revocable, repeating tick deadline.
///
/// There is never more than one outstanding deadline: arming an armed
/// scheduler does nothing, and cancelling guarantees no further ticks until it
/// is armed again.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    period: Duration,
    next_due: Option<Instant>,
}

impl TickScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn every_second() -> Self {
        Self::new(TICK_PERIOD)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn arm(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.period);
        }
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Arm or cancel so the schedule matches the timer's running flag.
    pub fn sync(&mut self, running: bool, now: Instant) {
        if running {
            self.arm(now);
        } else {
            self.cancel();
        }
    }

    /// Number of whole periods that elapsed by `now`. The deadline advances by
    /// exactly that many periods, so late wake-ups don't accumulate drift.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let Some(due) = self.next_due else {
            return 0;
        };
        if now < due {
            return 0;
        }
        let late = now.duration_since(due);
        let extra = (late.as_nanos() / self.period.as_nanos().max(1)) as u32;
        let count = extra.saturating_add(1);
        self.next_due = Some(due + self.period * count);
        count
    }

    /// Time left before the next tick, if armed.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::every_second()
    }
}
