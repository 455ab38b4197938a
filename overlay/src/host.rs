//! Capability traits for everything the core reads from or writes to the page.
//!
//! The host is single-threaded: handlers registered here run on the page's
//! event loop, never concurrently with each other or with a scheduler tick.

use crate::error::HostError;
use crate::geometry::{BoxSize, LayoutRegime, NaturalSize};

/// Repeating event handler.
pub type Handler = Box<dyn FnMut()>;

/// Handler that runs at most once.
pub type OnceHandler = Box<dyn FnOnce()>;

/// Notifications emitted by the host player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    EnterFullscreen,
    ExitFullscreen,
}

/// Notifications emitted by the video element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoEvent {
    /// Playback started or resumed.
    Playing,
}

/// The host video player.
pub trait PlayerHost {
    /// Current displayed box of the player for the given regime.
    ///
    /// Must be a fresh read on every call. An implementation may return the
    /// same element's box for both regimes when the player stretches that
    /// element over the screen in fullscreen.
    fn player_box(&self, regime: LayoutRegime) -> BoxSize;

    /// Whether the player currently reports fullscreen.
    fn fullscreen_active(&self) -> bool;

    /// Whether playback is paused.
    fn paused(&self) -> bool;

    /// Register a handler for a player notification for the rest of the page lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the player refuses the subscription.
    fn on(&self, event: PlayerEvent, handler: Handler) -> Result<(), HostError>;
}

/// The live video element inside the player.
pub trait VideoElement {
    /// Current source location, if any.
    fn source(&self) -> Option<String>;

    /// Replace the source location.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the element rejects the assignment.
    fn set_source(&self, url: &str) -> Result<(), HostError>;

    /// Intrinsic pixel size of the currently loaded media.
    fn natural_size(&self) -> NaturalSize;

    /// Register a handler that runs on the next `event` and is then removed.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the element refuses the subscription.
    fn subscribe_once(&self, event: VideoEvent, handler: OnceHandler) -> Result<(), HostError>;

    /// Register a handler that runs on every `event`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the element refuses the subscription.
    fn subscribe(&self, event: VideoEvent, handler: Handler) -> Result<(), HostError>;
}

/// The overlay container stacked on top of the player.
pub trait Overlay {
    /// Pixel width of the render surface, as last set by the scaler.
    fn surface_pixel_width(&self) -> u32;

    /// Size the outer wrapper to the player box.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the style cannot be written.
    fn set_outer_box(&self, player: BoxSize) -> Result<(), HostError>;

    /// Set the centered container width relative to the player.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the style cannot be written.
    fn set_width_percent(&self, percent: u32) -> Result<(), HostError>;
}

/// Scheduling primitives offered by the page.
pub trait FrameTiming {
    /// Whether the host can call back on each displayed video frame.
    fn supports_video_frame_callback(&self) -> bool;

    /// Run `callback` once, when the next video frame is displayed.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the registration is refused.
    fn request_video_frame(&self, callback: OnceHandler) -> Result<(), HostError>;

    /// Run `callback` once after `delay_ms` milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the timer cannot be armed.
    fn set_timeout(&self, delay_ms: f64, callback: OnceHandler) -> Result<(), HostError>;
}
