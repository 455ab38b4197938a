//! Top-level wiring of one upscaling session.
//!
//! LIFECYCLE
//! =========
//! `new` binds the scaler (page load). `attach` subscribes to fullscreen
//! changes and starts the source swap. When the swap succeeds the controller
//! subscribes once to `playing`; that single notification captures the natural
//! size, points the scaler at the video, applies the initial geometry, and
//! starts the one scheduler of the session.
//!
//! ERROR HANDLING
//! ==============
//! Nothing propagates to the page. A failed swap or scaler setup ends the
//! session in [`Phase::Failed`] with one error log; resize and tick failures
//! are logged and the session keeps running.

use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::rc::{Rc, Weak};

use crate::bootstrap::{Transport, VideoSourceBootstrapper};
use crate::config::OverlayConfig;
use crate::error::{BootstrapError, ScalerError};
use crate::geometry::{Geometry, LayoutRegime};
use crate::host::{FrameTiming, Overlay, PlayerEvent, PlayerHost, VideoElement, VideoEvent};
use crate::resize::ResizeCoordinator;
use crate::scaler::ScalerBackend;
use crate::scheduler::{FrameScheduler, Scheduler, SchedulerState, Strategy, TickStats};
use crate::session::Session;

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Scaler bound, not attached yet.
    Created,
    /// Video bytes are being retrieved.
    Fetching,
    /// Source swapped, waiting for the first `playing`.
    AwaitingPlayback,
    /// Render loop started.
    Running,
    /// Upscaling will not start for this session.
    Failed,
}

/// Host capabilities for one page.
pub struct HostParts {
    pub player: Rc<dyn PlayerHost>,
    pub video: Rc<dyn VideoElement>,
    pub overlay: Rc<dyn Overlay>,
    pub timing: Rc<dyn FrameTiming>,
    pub transport: Rc<dyn Transport>,
}

pub struct SessionController {
    config: OverlayConfig,
    session: Rc<Session>,
    coordinator: ResizeCoordinator,
    bootstrapper: VideoSourceBootstrapper,
    timing: Rc<dyn FrameTiming>,
    transport: Rc<dyn Transport>,
    phase: Cell<Phase>,
    scheduler: RefCell<Option<FrameScheduler>>,
}

impl SessionController {
    /// Bind the scaler and build the session context.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`ScalerError`] if binding fails.
    pub fn new(parts: HostParts, backend: &dyn ScalerBackend, config: OverlayConfig) -> Result<Rc<Self>, ScalerError> {
        let scaler = backend.bind()?;
        let session = Rc::new(Session::new(parts.player, parts.video, parts.overlay, scaler));
        Ok(Rc::new(Self {
            coordinator: ResizeCoordinator::new(Rc::clone(&session)),
            bootstrapper: VideoSourceBootstrapper::new(&config),
            session,
            config,
            timing: parts.timing,
            transport: parts.transport,
            phase: Cell::new(Phase::Created),
            scheduler: RefCell::new(None),
        }))
    }

    // --- Lifecycle ---

    /// Subscribe to fullscreen changes and start the source swap.
    pub fn attach(self: &Rc<Self>) {
        if self.phase.get() != Phase::Created {
            log::debug!("session already attached");
            return;
        }
        self.subscribe_fullscreen();

        self.phase.set(Phase::Fetching);
        let weak = Rc::downgrade(self);
        let started = self.bootstrapper.start(
            Rc::clone(self.session.video()),
            self.transport.as_ref(),
            Box::new(move |outcome| {
                if let Some(controller) = weak.upgrade() {
                    controller.on_bootstrap_complete(outcome);
                }
            }),
        );
        if let Err(e) = started {
            self.fail(&e);
        }
    }

    fn subscribe_fullscreen(self: &Rc<Self>) {
        for (event, regime) in
            [(PlayerEvent::EnterFullscreen, LayoutRegime::Fullscreen), (PlayerEvent::ExitFullscreen, LayoutRegime::Small)]
        {
            let weak: Weak<Self> = Rc::downgrade(self);
            let subscribed = self.session.player().on(
                event,
                Box::new(move || {
                    if let Some(controller) = weak.upgrade() {
                        controller.on_regime_change(regime);
                    }
                }),
            );
            if let Err(e) = subscribed {
                log::warn!("overlay will not follow {event:?}: {e}");
            }
        }
    }

    fn on_bootstrap_complete(self: &Rc<Self>, outcome: Result<(), BootstrapError>) {
        if let Err(e) = outcome {
            self.fail(&e);
            return;
        }
        self.phase.set(Phase::AwaitingPlayback);
        let weak = Rc::downgrade(self);
        let subscribed = self.session.video().subscribe_once(
            VideoEvent::Playing,
            Box::new(move || {
                if let Some(controller) = weak.upgrade() {
                    controller.initialize_upscaling();
                }
            }),
        );
        if let Err(e) = subscribed {
            self.fail(&e);
        }
    }

    /// Set up scaling on the first `playing` after the swap. Runs at most once.
    pub fn initialize_upscaling(self: &Rc<Self>) {
        if self.phase.get() != Phase::AwaitingPlayback {
            log::debug!("ignoring playing notification in phase {:?}", self.phase.get());
            return;
        }
        log::info!("starting upscaling");

        let natural = self.session.capture_natural_size();
        log::debug!("video natural size {}x{}", natural.width, natural.height);
        if let Err(e) = self.session.scaler().set_input_video() {
            self.fail(&e);
            return;
        }

        let regime = LayoutRegime::from_fullscreen(self.session.player().fullscreen_active());
        self.resize_for(regime);

        let strategy = Strategy::probe(self.timing.as_ref(), self.config.force_legacy);
        if strategy == Strategy::Legacy {
            log::info!("requestVideoFrameCallback not available, falling back to {} fps timer", self.config.legacy_fps);
            self.subscribe_resume();
        }
        let scheduler = FrameScheduler::new(
            strategy,
            Rc::clone(&self.session),
            Rc::clone(&self.timing),
            self.config.legacy_period_ms(),
        );
        *self.scheduler.borrow_mut() = Some(scheduler.clone());
        self.phase.set(Phase::Running);
        scheduler.start();
    }

    fn subscribe_resume(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let subscribed = self.session.video().subscribe(
            VideoEvent::Playing,
            Box::new(move || {
                if let Some(controller) = weak.upgrade() {
                    controller.on_playing();
                }
            }),
        );
        if let Err(e) = subscribed {
            log::warn!("timer loop will not resume after pause: {e}");
        }
    }

    fn on_playing(&self) {
        let scheduler = self.scheduler.borrow().clone();
        if let Some(scheduler) = scheduler {
            scheduler.on_playing();
        }
    }

    fn on_regime_change(&self, regime: LayoutRegime) {
        if self.phase.get() != Phase::Running {
            self.session.set_regime(regime);
            log::debug!("{regime:?} before upscaling started, geometry deferred");
            return;
        }
        self.resize_for(regime);
    }

    fn resize_for(&self, regime: LayoutRegime) {
        if let Err(e) = self.coordinator.apply(regime) {
            log::warn!("overlay resize skipped: {e}");
        }
    }

    fn fail(&self, err: &dyn Display) {
        log::error!("upscaling disabled for this session: {err}");
        self.phase.set(Phase::Failed);
    }

    // --- Queries ---

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    #[must_use]
    pub fn session(&self) -> &Rc<Session> {
        &self.session
    }

    #[must_use]
    pub fn geometry(&self) -> Option<Geometry> {
        self.session.geometry()
    }

    #[must_use]
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.borrow().as_ref().map_or(SchedulerState::Idle, FrameScheduler::state)
    }

    #[must_use]
    pub fn tick_stats(&self) -> TickStats {
        self.scheduler.borrow().as_ref().map_or_else(TickStats::default, Scheduler::stats)
    }
}
