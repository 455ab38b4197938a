//! Per-frame render loop.
//!
//! ARCHITECTURE
//! ============
//! Two strategies sit behind the [`Scheduler`] trait and one is picked per
//! session by [`Strategy::probe`]:
//!
//! - [`ModernScheduler`] renders on every displayed video frame. It renders
//!   first and re-registers afterwards, so an overrunning render makes the host
//!   skip the frames it missed instead of queueing them.
//! - [`LegacyScheduler`] runs on a fixed-period timer. It arms the next timer
//!   before rendering so render time is absorbed inside the period and the
//!   schedule does not drift. A tick that finds playback paused stops the
//!   chain; the next `playing` notification restarts it.
//!
//! A failed render is logged and counted; the loop always continues.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::ResizeError;
use crate::host::FrameTiming;
use crate::session::Session;

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

/// Which host primitive drives the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Per displayed video frame.
    Modern,
    /// Fixed-period timer.
    Legacy,
}

impl Strategy {
    /// Pick the strategy for this session. Never re-evaluated afterwards.
    #[must_use]
    pub fn probe(timing: &dyn FrameTiming, force_legacy: bool) -> Self {
        if !force_legacy && timing.supports_video_frame_callback() { Self::Modern } else { Self::Legacy }
    }
}

/// Lifecycle of the session's render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    ModernDriven,
    LegacyDriven,
}

/// Tick counters since the scheduler started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Ticks that rendered a frame.
    pub rendered: u64,
    /// Ticks whose scaler call failed.
    pub failed: u64,
    /// Ticks skipped because no valid scale ratio existed.
    pub skipped: u64,
    /// Timer ticks that found playback paused and stopped the chain.
    pub halted: u64,
}

pub trait Scheduler {
    /// Begin driving the scaler. A no-op while a callback is already armed.
    fn start(&self);

    /// Run one tick and arrange the next.
    fn tick(&self);

    /// Playback (re)started.
    fn on_playing(&self);

    fn strategy(&self) -> Strategy;

    fn stats(&self) -> TickStats;

    /// Whether a next tick is currently registered with the host.
    fn is_armed(&self) -> bool;
}

/// State shared by both strategies.
struct Driver {
    session: Rc<Session>,
    timing: Rc<dyn FrameTiming>,
    stats: Cell<TickStats>,
    armed: Cell<bool>,
}

impl Driver {
    fn new(session: Rc<Session>, timing: Rc<dyn FrameTiming>) -> Self {
        Self { session, timing, stats: Cell::new(TickStats::default()), armed: Cell::new(false) }
    }

    fn record(&self, update: impl FnOnce(&mut TickStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    fn render(&self) {
        match self.session.render_frame() {
            Ok(()) => self.record(|s| s.rendered += 1),
            Err(ResizeError::Geometry(e)) => {
                self.record(|s| s.skipped += 1);
                log::debug!("frame skipped: {e}");
            }
            Err(e) => {
                self.record(|s| s.failed += 1);
                log::warn!("render tick failed: {e}");
            }
        }
    }
}

// =============================================================
// Modern: one render per displayed frame
// =============================================================

#[derive(Clone)]
pub struct ModernScheduler {
    driver: Rc<Driver>,
}

impl ModernScheduler {
    #[must_use]
    pub fn new(session: Rc<Session>, timing: Rc<dyn FrameTiming>) -> Self {
        Self { driver: Rc::new(Driver::new(session, timing)) }
    }
}

impl Scheduler for ModernScheduler {
    fn start(&self) {
        if self.driver.armed.get() {
            return;
        }
        self.tick();
    }

    fn tick(&self) {
        self.driver.armed.set(false);
        self.driver.render();

        let next = self.clone();
        match self.driver.timing.request_video_frame(Box::new(move || next.tick())) {
            Ok(()) => self.driver.armed.set(true),
            Err(e) => log::error!("render loop stopped, cannot register frame callback: {e}"),
        }
    }

    // Frame callbacks stay registered across pauses; the host simply stops
    // delivering frames until playback resumes.
    fn on_playing(&self) {}

    fn strategy(&self) -> Strategy {
        Strategy::Modern
    }

    fn stats(&self) -> TickStats {
        self.driver.stats.get()
    }

    fn is_armed(&self) -> bool {
        self.driver.armed.get()
    }
}

// =============================================================
// Legacy: fixed-period timer
// =============================================================

#[derive(Clone)]
pub struct LegacyScheduler {
    driver: Rc<Driver>,
    period_ms: f64,
}

impl LegacyScheduler {
    #[must_use]
    pub fn new(session: Rc<Session>, timing: Rc<dyn FrameTiming>, period_ms: f64) -> Self {
        Self { driver: Rc::new(Driver::new(session, timing)), period_ms }
    }

    #[must_use]
    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }
}

impl Scheduler for LegacyScheduler {
    fn start(&self) {
        if self.driver.armed.get() {
            return;
        }
        self.tick();
    }

    fn tick(&self) {
        self.driver.armed.set(false);
        if self.driver.session.paused() {
            self.driver.record(|s| s.halted += 1);
            log::debug!("playback paused, timer loop halted");
            return;
        }

        let next = self.clone();
        match self.driver.timing.set_timeout(self.period_ms, Box::new(move || next.tick())) {
            Ok(()) => self.driver.armed.set(true),
            Err(e) => log::error!("render loop stopped, cannot arm timer: {e}"),
        }
        self.driver.render();
    }

    fn on_playing(&self) {
        self.start();
    }

    fn strategy(&self) -> Strategy {
        Strategy::Legacy
    }

    fn stats(&self) -> TickStats {
        self.driver.stats.get()
    }

    fn is_armed(&self) -> bool {
        self.driver.armed.get()
    }
}

// =============================================================
// Selected strategy
// =============================================================

/// The one scheduler of a session.
#[derive(Clone)]
pub enum FrameScheduler {
    Modern(ModernScheduler),
    Legacy(LegacyScheduler),
}

impl FrameScheduler {
    #[must_use]
    pub fn new(strategy: Strategy, session: Rc<Session>, timing: Rc<dyn FrameTiming>, period_ms: f64) -> Self {
        match strategy {
            Strategy::Modern => Self::Modern(ModernScheduler::new(session, timing)),
            Strategy::Legacy => Self::Legacy(LegacyScheduler::new(session, timing, period_ms)),
        }
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        match self {
            Self::Modern(_) => SchedulerState::ModernDriven,
            Self::Legacy(_) => SchedulerState::LegacyDriven,
        }
    }

    fn inner(&self) -> &dyn Scheduler {
        match self {
            Self::Modern(s) => s,
            Self::Legacy(s) => s,
        }
    }
}

impl Scheduler for FrameScheduler {
    fn start(&self) {
        self.inner().start();
    }

    fn tick(&self) {
        self.inner().tick();
    }

    fn on_playing(&self) {
        self.inner().on_playing();
    }

    fn strategy(&self) -> Strategy {
        self.inner().strategy()
    }

    fn stats(&self) -> TickStats {
        self.inner().stats()
    }

    fn is_armed(&self) -> bool {
        self.inner().is_armed()
    }
}
