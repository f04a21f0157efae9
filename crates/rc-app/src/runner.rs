//! Cooperative driver for a running session.
//!
//! Table ticks, history clears and frames live on one [`Timeline`]. Every
//! popped task checks the session's run flag first, so stopping turns
//! anything still queued into a no-op.

use std::thread;
use std::time::{Duration, Instant};

use rc_sim::{Phase, RunFlag, Task, TickOutcome, Timeline};
use tracing::{debug, info};

use crate::draw::DrawList;
use crate::error::AppResult;
use crate::session::Session;
use crate::signals::Signal;
use crate::table::DataRow;

/// Longest single sleep in [`Runner::run_realtime`], so a stop request is
/// noticed promptly.
const MAX_SLEEP: Duration = Duration::from_millis(50);

/// Receives what a front end would display.
pub trait SessionObserver {
    fn on_row(&mut self, _row: &DataRow) {}

    fn on_skipped(&mut self, _phase: Phase) {}

    fn on_history_cleared(&mut self) {}

    fn on_signal(&mut self, _signal: &Signal) {}

    fn on_frame(&mut self, _draw: &DrawList) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}

#[derive(Debug)]
pub struct Runner {
    session: Session,
    timeline: Timeline,
}

impl Runner {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            timeline: Timeline::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn now(&self) -> Duration {
        self.timeline.now()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timeline.next_deadline()
    }

    pub fn pending_tasks(&self) -> usize {
        self.timeline.len()
    }

    /// Start the session and queue an immediate row and frame.
    pub fn start(&mut self, now: Duration) -> AppResult<()> {
        self.session.start()?;
        self.timeline.cancel_all();
        self.timeline.advance_clock(now);
        self.timeline.schedule_at(now, Task::TableTick);
        self.timeline.schedule_at(now, Task::Frame);
        Ok(())
    }

    pub fn stop(&mut self) {
        self.session.stop();
        self.timeline.cancel_all();
    }

    /// Run every task due at or before `now`, in time order.
    ///
    /// Returns how many tasks did work.
    pub fn advance_to(&mut self, now: Duration, observer: &mut dyn SessionObserver) -> usize {
        let mut ran = 0;
        while let Some((at, task)) = self.timeline.pop_due(now) {
            if !self.session.is_running() {
                debug!(?task, at_ms = at.as_millis() as u64, "dropping stale task");
                continue;
            }
            self.run_task(task, observer);
            ran += 1;
            for signal in self.session.drain_signals() {
                observer.on_signal(&signal);
            }
        }
        self.timeline.advance_clock(now);
        // Signals raised outside the runner (e.g. proposals) still reach the observer.
        for signal in self.session.drain_signals() {
            observer.on_signal(&signal);
        }
        ran
    }

    fn run_task(&mut self, task: Task, observer: &mut dyn SessionObserver) {
        let options = self.session.options();
        let (table_interval, retry_interval, clear_delay, frame_interval) = (
            options.table_interval(),
            options.retry_interval(),
            options.clear_delay(),
            options.frame_interval(),
        );

        match task {
            Task::TableTick => {
                let Some(outcome) = self.session.table_tick() else {
                    return;
                };
                let next_tick = match &outcome {
                    TickOutcome::Shown { row, .. } => {
                        observer.on_row(row);
                        table_interval
                    }
                    TickOutcome::Skipped { phase, .. } => {
                        observer.on_skipped(*phase);
                        retry_interval
                    }
                };
                if outcome.revolution_complete() {
                    info!(cycles = self.session.cycles(), "revolution complete");
                    self.timeline.schedule_in(clear_delay, Task::ClearHistory);
                }
                self.timeline.schedule_in(next_tick, Task::TableTick);
            }
            Task::ClearHistory => {
                self.session.clear_history();
                observer.on_history_cleared();
            }
            Task::Frame => {
                self.session.frame_tick();
                observer.on_frame(&self.session.draw_list());
                self.timeline.schedule_in(frame_interval, Task::Frame);
            }
        }
    }

    /// Drive the timeline on virtual time until `cycles` revolutions finish,
    /// the session stops, or the clock passes `limit`.
    pub fn run_virtual(
        &mut self,
        observer: &mut dyn SessionObserver,
        cycles: u64,
        limit: Duration,
    ) -> u64 {
        while self.session.is_running() && self.session.cycles() < cycles {
            let Some(deadline) = self.timeline.next_deadline() else {
                break;
            };
            if deadline > limit {
                break;
            }
            self.advance_to(deadline, observer);
        }
        self.session.cycles()
    }

    /// Drive the timeline against the wall clock until `flag` is lowered,
    /// the session stops, or `stop_after_cycles` revolutions finish.
    pub fn run_realtime(
        &mut self,
        flag: &RunFlag,
        observer: &mut dyn SessionObserver,
        stop_after_cycles: Option<u64>,
    ) -> u64 {
        let origin = Instant::now();
        let base = self.timeline.now();
        loop {
            if !flag.is_running() {
                info!("stop requested");
                self.stop();
                break;
            }
            if stop_after_cycles.is_some_and(|n| self.session.cycles() >= n) {
                self.stop();
                break;
            }
            if !self.session.is_running() {
                break;
            }
            let Some(deadline) = self.timeline.next_deadline() else {
                break;
            };
            let now = base + origin.elapsed();
            if deadline > now {
                thread::sleep((deadline - now).min(MAX_SLEEP));
                continue;
            }
            self.advance_to(now, observer);
        }
        // Deliver anything raised while stopping.
        for signal in self.session.drain_signals() {
            observer.on_signal(&signal);
        }
        self.session.cycles()
    }
}
