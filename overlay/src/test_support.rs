//! In-memory host capabilities for unit tests.
//!
//! Every mock appends to a shared [`CallLog`] so tests can assert on the exact
//! order in which the core touches the host.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Once;

use crate::bootstrap::{BinaryRequest, Payload, Transport, TransportResult};
use crate::config::OverlayConfig;
use crate::controller::{HostParts, SessionController};
use crate::error::{HostError, ScalerError, TransportError};
use crate::geometry::{BoxSize, LayoutRegime, NaturalSize};
use crate::host::{FrameTiming, Handler, OnceHandler, Overlay, PlayerEvent, PlayerHost, VideoElement, VideoEvent};
use crate::scaler::{ResizeOptions, Scaler, ScalerBackend, ScalerHandle};
use crate::session::Session;

pub const ORIGINAL_SRC: &str = "https://stream.example.test/files/episode-01.mp4";
pub const OBJECT_URL: &str = "blob:https://stream.example.test/6f1c";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    PlayerBox(LayoutRegime),
    SetInputVideo,
    Resize(f64),
    SurfaceWidth,
    OuterBox(BoxSize),
    WidthPercent(u32),
    SetSource(String),
    Fetch(String),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn count(log: &CallLog, pred: impl Fn(&Call) -> bool) -> usize {
    log.borrow().iter().filter(|c| pred(c)).count()
}

pub fn resize_count(log: &CallLog) -> usize {
    count(log, |c| matches!(c, Call::Resize(_)))
}

// =============================================================
// Log capture
// =============================================================

thread_local! {
    static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Records every log line into the emitting thread's buffer.
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        RECORDS.with(|records| records.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Install the capturing logger (once per process) and clear this thread's buffer.
///
/// Each test runs on its own thread and the core never leaves it, so records
/// from parallel tests do not mix.
pub fn capture_logs() {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

/// Messages logged on this thread at exactly `level` since the last capture.
pub fn logged(level: log::Level) -> Vec<String> {
    RECORDS.with(|records| {
        records.borrow().iter().filter(|(l, _)| *l == level).map(|(_, msg)| msg.clone()).collect()
    })
}

// =============================================================
// Player
// =============================================================

pub struct MockPlayer {
    log: CallLog,
    pub small: Cell<BoxSize>,
    pub fullscreen_box: Cell<BoxSize>,
    pub fullscreen: Cell<bool>,
    pub paused: Cell<bool>,
    handlers: RefCell<Vec<(PlayerEvent, Handler)>>,
}

impl MockPlayer {
    pub fn new(log: &CallLog, small: BoxSize, fullscreen_box: BoxSize) -> Self {
        Self {
            log: Rc::clone(log),
            small: Cell::new(small),
            fullscreen_box: Cell::new(fullscreen_box),
            fullscreen: Cell::new(false),
            paused: Cell::new(true),
            handlers: RefCell::new(Vec::new()),
        }
    }

    pub fn emit(&self, event: PlayerEvent) {
        if event == PlayerEvent::EnterFullscreen {
            self.fullscreen.set(true);
        } else {
            self.fullscreen.set(false);
        }
        let mut handlers = self.handlers.borrow_mut();
        for (registered, handler) in handlers.iter_mut() {
            if *registered == event {
                handler();
            }
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl PlayerHost for MockPlayer {
    fn player_box(&self, regime: LayoutRegime) -> BoxSize {
        self.log.borrow_mut().push(Call::PlayerBox(regime));
        match regime {
            LayoutRegime::Small => self.small.get(),
            LayoutRegime::Fullscreen => self.fullscreen_box.get(),
        }
    }

    fn fullscreen_active(&self) -> bool {
        self.fullscreen.get()
    }

    fn paused(&self) -> bool {
        self.paused.get()
    }

    fn on(&self, event: PlayerEvent, handler: Handler) -> Result<(), HostError> {
        self.handlers.borrow_mut().push((event, handler));
        Ok(())
    }
}

// =============================================================
// Video
// =============================================================

pub struct MockVideo {
    log: CallLog,
    pub source: RefCell<Option<String>>,
    pub natural: Cell<NaturalSize>,
    once: RefCell<Vec<OnceHandler>>,
    persistent: RefCell<Vec<Handler>>,
}

impl MockVideo {
    pub fn new(log: &CallLog, natural: NaturalSize) -> Self {
        Self {
            log: Rc::clone(log),
            source: RefCell::new(Some(ORIGINAL_SRC.to_string())),
            natural: Cell::new(natural),
            once: RefCell::new(Vec::new()),
            persistent: RefCell::new(Vec::new()),
        }
    }

    /// Dispatch `playing`. Handlers registered during dispatch wait for the next one.
    pub fn emit_playing(&self) {
        let once = std::mem::take(&mut *self.once.borrow_mut());
        let mut persistent = std::mem::take(&mut *self.persistent.borrow_mut());
        for handler in once {
            handler();
        }
        for handler in &mut persistent {
            handler();
        }
        let added = std::mem::take(&mut *self.persistent.borrow_mut());
        persistent.extend(added);
        *self.persistent.borrow_mut() = persistent;
    }

    pub fn once_count(&self) -> usize {
        self.once.borrow().len()
    }

    pub fn persistent_count(&self) -> usize {
        self.persistent.borrow().len()
    }

    pub fn current_source(&self) -> Option<String> {
        self.source.borrow().clone()
    }
}

impl VideoElement for MockVideo {
    fn source(&self) -> Option<String> {
        self.source.borrow().clone()
    }

    fn set_source(&self, url: &str) -> Result<(), HostError> {
        self.log.borrow_mut().push(Call::SetSource(url.to_string()));
        *self.source.borrow_mut() = Some(url.to_string());
        Ok(())
    }

    fn natural_size(&self) -> NaturalSize {
        self.natural.get()
    }

    fn subscribe_once(&self, _event: VideoEvent, handler: OnceHandler) -> Result<(), HostError> {
        self.once.borrow_mut().push(handler);
        Ok(())
    }

    fn subscribe(&self, _event: VideoEvent, handler: Handler) -> Result<(), HostError> {
        self.persistent.borrow_mut().push(handler);
        Ok(())
    }
}

// =============================================================
// Overlay + scaler
// =============================================================

pub struct MockOverlay {
    log: CallLog,
    surface_width: Rc<Cell<u32>>,
    pub outer: Cell<Option<BoxSize>>,
    pub percent: Cell<Option<u32>>,
}

impl MockOverlay {
    pub fn new(log: &CallLog, surface_width: &Rc<Cell<u32>>) -> Self {
        Self {
            log: Rc::clone(log),
            surface_width: Rc::clone(surface_width),
            outer: Cell::new(None),
            percent: Cell::new(None),
        }
    }
}

impl Overlay for MockOverlay {
    fn surface_pixel_width(&self) -> u32 {
        self.log.borrow_mut().push(Call::SurfaceWidth);
        self.surface_width.get()
    }

    fn set_outer_box(&self, player: BoxSize) -> Result<(), HostError> {
        self.log.borrow_mut().push(Call::OuterBox(player));
        self.outer.set(Some(player));
        Ok(())
    }

    fn set_width_percent(&self, percent: u32) -> Result<(), HostError> {
        self.log.borrow_mut().push(Call::WidthPercent(percent));
        self.percent.set(Some(percent));
        Ok(())
    }
}

/// Scales the surface to `natural_width * ratio`, like a real upscaler would.
pub struct MockScaler {
    log: CallLog,
    natural_width: Rc<Cell<u32>>,
    surface_width: Rc<Cell<u32>>,
    fail_next: Rc<Cell<u32>>,
}

impl Scaler for MockScaler {
    fn set_input_video(&mut self) -> Result<(), ScalerError> {
        self.log.borrow_mut().push(Call::SetInputVideo);
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn resize(&mut self, ratio: f64, _options: &ResizeOptions) -> Result<(), ScalerError> {
        self.log.borrow_mut().push(Call::Resize(ratio));
        if self.fail_next.get() > 0 {
            self.fail_next.set(self.fail_next.get() - 1);
            return Err(ScalerError::Failed("webgl context lost".into()));
        }
        self.surface_width.set((f64::from(self.natural_width.get()) * ratio).round() as u32);
        Ok(())
    }
}

pub struct MockBackend {
    log: CallLog,
    natural_width: Rc<Cell<u32>>,
    surface_width: Rc<Cell<u32>>,
    pub fail_next: Rc<Cell<u32>>,
    pub refuse_bind: bool,
}

impl ScalerBackend for MockBackend {
    fn bind(&self) -> Result<ScalerHandle, ScalerError> {
        if self.refuse_bind {
            return Err(ScalerError::Bind("webgl unavailable".into()));
        }
        Ok(ScalerHandle::new(Box::new(MockScaler {
            log: Rc::clone(&self.log),
            natural_width: Rc::clone(&self.natural_width),
            surface_width: Rc::clone(&self.surface_width),
            fail_next: Rc::clone(&self.fail_next),
        })))
    }
}

// =============================================================
// Timing
// =============================================================

pub struct MockTiming {
    pub modern: Cell<bool>,
    pub refuse: Cell<bool>,
    frames: RefCell<VecDeque<OnceHandler>>,
    timers: RefCell<VecDeque<(f64, OnceHandler)>>,
}

impl MockTiming {
    pub fn new(modern: bool) -> Self {
        Self {
            modern: Cell::new(modern),
            refuse: Cell::new(false),
            frames: RefCell::new(VecDeque::new()),
            timers: RefCell::new(VecDeque::new()),
        }
    }

    /// Deliver one displayed frame. Returns false if no callback was waiting.
    pub fn deliver_frame(&self) -> bool {
        let next = self.frames.borrow_mut().pop_front();
        match next {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Fire the oldest armed timer, returning its delay.
    pub fn fire_timer(&self) -> Option<f64> {
        let next = self.timers.borrow_mut().pop_front();
        next.map(|(delay, callback)| {
            callback();
            delay
        })
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }
}

impl FrameTiming for MockTiming {
    fn supports_video_frame_callback(&self) -> bool {
        self.modern.get()
    }

    fn request_video_frame(&self, callback: OnceHandler) -> Result<(), HostError> {
        if self.refuse.get() {
            return Err(HostError("requestVideoFrameCallback refused".into()));
        }
        self.frames.borrow_mut().push_back(callback);
        Ok(())
    }

    fn set_timeout(&self, delay_ms: f64, callback: OnceHandler) -> Result<(), HostError> {
        if self.refuse.get() {
            return Err(HostError("setTimeout refused".into()));
        }
        self.timers.borrow_mut().push_back((delay_ms, callback));
        Ok(())
    }
}

// =============================================================
// Transport
// =============================================================

pub struct MockPayload {
    pub url: String,
    pub len: u64,
}

impl Payload for MockPayload {
    fn object_url(&self) -> Result<String, HostError> {
        Ok(self.url.clone())
    }

    fn byte_len(&self) -> Option<u64> {
        Some(self.len)
    }
}

type Completion = Box<dyn FnOnce(TransportResult)>;

pub struct MockTransport {
    log: CallLog,
    pub requests: RefCell<Vec<BinaryRequest>>,
    pending: RefCell<Option<Completion>>,
    pub refuse: Cell<bool>,
}

impl MockTransport {
    pub fn new(log: &CallLog) -> Self {
        Self { log: Rc::clone(log), requests: RefCell::new(Vec::new()), pending: RefCell::new(None), refuse: Cell::new(false) }
    }

    pub fn complete(&self, result: TransportResult) -> bool {
        let pending = self.pending.borrow_mut().take();
        match pending {
            Some(on_complete) => {
                on_complete(result);
                true
            }
            None => false,
        }
    }

    pub fn succeed(&self) -> bool {
        self.complete(Ok(Box::new(MockPayload { url: OBJECT_URL.to_string(), len: 48_000_000 })))
    }

    pub fn fail(&self, err: TransportError) -> bool {
        self.complete(Err(err))
    }
}

impl Transport for MockTransport {
    fn get_binary(&self, request: BinaryRequest, on_complete: Completion) -> Result<(), TransportError> {
        if self.refuse.get() {
            return Err(TransportError::Failed("GM_xmlhttpRequest not granted".into()));
        }
        self.log.borrow_mut().push(Call::Fetch(request.url.clone()));
        self.requests.borrow_mut().push(request);
        *self.pending.borrow_mut() = Some(on_complete);
        Ok(())
    }
}

// =============================================================
// Harness
// =============================================================

/// A full set of mocks for one page.
pub struct Harness {
    pub log: CallLog,
    pub player: Rc<MockPlayer>,
    pub video: Rc<MockVideo>,
    pub overlay: Rc<MockOverlay>,
    pub timing: Rc<MockTiming>,
    pub transport: Rc<MockTransport>,
    pub backend: MockBackend,
    pub surface_width: Rc<Cell<u32>>,
}

impl Harness {
    /// Natural 1280×720 video in a 640×360 windowed / 1920×1080 fullscreen player.
    pub fn new() -> Self {
        Self::with(NaturalSize::new(1280, 720), BoxSize::new(640.0, 360.0), BoxSize::new(1920.0, 1080.0))
    }

    pub fn with(natural: NaturalSize, small: BoxSize, fullscreen: BoxSize) -> Self {
        let log = new_log();
        let surface_width = Rc::new(Cell::new(300));
        let natural_width = Rc::new(Cell::new(natural.width));
        Self {
            player: Rc::new(MockPlayer::new(&log, small, fullscreen)),
            video: Rc::new(MockVideo::new(&log, natural)),
            overlay: Rc::new(MockOverlay::new(&log, &surface_width)),
            timing: Rc::new(MockTiming::new(true)),
            transport: Rc::new(MockTransport::new(&log)),
            backend: MockBackend {
                log: Rc::clone(&log),
                natural_width,
                surface_width: Rc::clone(&surface_width),
                fail_next: Rc::new(Cell::new(0)),
                refuse_bind: false,
            },
            surface_width,
            log,
        }
    }

    pub fn parts(&self) -> HostParts {
        HostParts {
            player: Rc::clone(&self.player) as Rc<dyn PlayerHost>,
            video: Rc::clone(&self.video) as Rc<dyn VideoElement>,
            overlay: Rc::clone(&self.overlay) as Rc<dyn Overlay>,
            timing: Rc::clone(&self.timing) as Rc<dyn FrameTiming>,
            transport: Rc::clone(&self.transport) as Rc<dyn Transport>,
        }
    }

    /// A bare session, natural size not yet captured.
    pub fn session(&self) -> Rc<Session> {
        let scaler = match self.backend.bind() {
            Ok(scaler) => scaler,
            Err(e) => panic!("mock bind failed: {e}"),
        };
        Rc::new(Session::new(
            Rc::clone(&self.player) as Rc<dyn PlayerHost>,
            Rc::clone(&self.video) as Rc<dyn VideoElement>,
            Rc::clone(&self.overlay) as Rc<dyn Overlay>,
            scaler,
        ))
    }

    /// A session with the natural size already captured.
    pub fn ready_session(&self) -> Rc<Session> {
        let session = self.session();
        session.capture_natural_size();
        session
    }

    pub fn controller(&self, config: OverlayConfig) -> Rc<SessionController> {
        match SessionController::new(self.parts(), &self.backend, config) {
            Ok(controller) => controller,
            Err(e) => panic!("controller construction failed: {e}"),
        }
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }
}
