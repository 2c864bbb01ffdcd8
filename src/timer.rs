use chrono::Local;
use std::time::Instant;

use crate::alarm::{Alarm, AlarmPlayer};
use crate::config::TimerConfiguration;
use crate::session::{SessionHistory, SessionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub fn next(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }
}

/// Read-only snapshot of the engine, handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub remaining_secs: u32,
    pub phase: Phase,
    pub is_running: bool,
    pub completed_work_sessions: usize,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was paused; nothing changed.
    Idle,
    Counted { remaining_secs: u32 },
    /// The countdown hit zero and the timer moved on to the next phase,
    /// paused.
    PhaseCompleted { finished: Phase, next: Phase },
}

/// How a new configuration was taken on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    /// The timer was idle; the countdown now reflects the new durations.
    Applied,
    /// The timer was running; the new durations take effect when the next
    /// phase starts.
    Deferred,
}

/// Work/break countdown state machine.
///
/// Time only moves through [`TimerEngine::tick`], which the caller invokes
/// once per elapsed second while [`TimerEngine::is_running`] is true. Every
/// completed phase pauses the timer and triggers the alarm.
#[derive(Debug)]
pub struct TimerEngine<P: AlarmPlayer> {
    config: TimerConfiguration,
    phase: Phase,
    // duration captured when the current phase began
    phase_duration: u32,
    remaining: u32,
    running: bool,
    history: SessionHistory,
    alarm: Alarm<P>,
}

impl<P: AlarmPlayer> TimerEngine<P> {
    pub fn new(config: TimerConfiguration, alarm: Alarm<P>) -> Self {
        let phase_duration = config.work_secs();
        Self {
            config,
            phase: Phase::Work,
            phase_duration,
            remaining: phase_duration,
            running: false,
            history: SessionHistory::new(),
            alarm,
        }
    }

    pub fn config(&self) -> &TimerConfiguration {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_work_sessions(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn active_duration(&self) -> u32 {
        self.phase_duration
    }

    /// Fraction of the current phase already elapsed, in `[0, 1]`.
    pub fn progress_ratio(&self) -> f64 {
        if self.phase_duration == 0 {
            return 0.0;
        }
        let ratio = 1.0 - self.remaining as f64 / self.phase_duration as f64;
        ratio.clamp(0.0, 1.0)
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            remaining_secs: self.remaining,
            phase: self.phase,
            is_running: self.running,
            completed_work_sessions: self.completed_work_sessions(),
        }
    }

    pub fn is_alarm_active(&self) -> bool {
        self.alarm.is_active()
    }

    pub fn alarm(&self) -> &Alarm<P> {
        &self.alarm
    }

    pub fn start(&mut self) {
        self.alarm.silence();
        if self.running {
            return;
        }
        self.running = true;
        tracing::info!(phase = %self.phase, remaining = self.remaining, "timer started");
    }

    pub fn pause(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        tracing::info!(phase = %self.phase, remaining = self.remaining, "timer paused");
    }

    pub fn toggle(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Stop and rewind the current phase to the duration it started with.
    pub fn reset(&mut self) {
        self.alarm.silence();
        self.running = false;
        self.remaining = self.phase_duration;
        tracing::info!(phase = %self.phase, remaining = self.remaining, "timer reset");
    }

    /// Abandon a break and start working right away. Does nothing during work.
    pub fn skip_break(&mut self) {
        if self.phase != Phase::Break {
            return;
        }
        self.alarm.silence();
        self.begin_phase(Phase::Work);
        self.running = true;
        tracing::info!(remaining = self.remaining, "break skipped");
    }

    pub fn set_configuration(&mut self, config: TimerConfiguration) -> ConfigChange {
        self.config = config;
        if self.running {
            tracing::info!(?config, "configuration deferred until next phase");
            return ConfigChange::Deferred;
        }
        self.begin_phase(self.phase);
        tracing::info!(?config, remaining = self.remaining, "configuration applied");
        ConfigChange::Applied
    }

    /// Advance the countdown by one second. `now` stamps the alarm if the
    /// phase ends on this tick.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            tracing::trace!(remaining = self.remaining, "tick");
            return TickOutcome::Counted {
                remaining_secs: self.remaining,
            };
        }
        self.complete_phase(now)
    }

    /// Let the alarm loop or auto-stop.
    pub fn poll_alarm(&mut self, now: Instant) {
        self.alarm.poll(now);
    }

    fn complete_phase(&mut self, now: Instant) -> TickOutcome {
        let finished = self.phase;
        if finished == Phase::Work {
            self.history.push(SessionRecord::new(Local::now()));
        }
        let next = finished.next();
        self.begin_phase(next);
        self.running = false;
        tracing::info!(
            %finished,
            %next,
            completed = self.history.len(),
            "phase completed"
        );
        self.alarm.trigger(now);
        TickOutcome::PhaseCompleted { finished, next }
    }

    fn begin_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.phase_duration = match phase {
            Phase::Work => self.config.work_secs(),
            Phase::Break => self.config.break_secs(),
        };
        self.remaining = self.phase_duration;
    }
}
