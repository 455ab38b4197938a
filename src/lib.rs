//! # stream-upscale
//!
//! WebAssembly entry point that overlays a real-time Anime4K upscale on a Plyr
//! video player. The session logic lives in the [`overlay`] crate; this crate
//! implements its capability traits against the live page with `web-sys` and
//! `wasm-bindgen`, builds the overlay elements, and installs logging.
//!
//! The userscript loads the generated module after the Anime4K script and calls
//! `start()`, optionally with a JSON options string (see
//! [`overlay::config::OverlayConfig`]). Setup is deferred to the window `load`
//! event because the player is created late.
//!
//! All browser code is gated behind the `browser` feature; the pure helpers in
//! [`dom`], [`player`] and [`timing`] also build and test natively.

pub mod dom;
pub mod player;
pub mod timing;

#[cfg(feature = "browser")]
mod app;
#[cfg(feature = "browser")]
mod js;
#[cfg(feature = "browser")]
mod scaler;
#[cfg(feature = "browser")]
mod transport;
#[cfg(feature = "browser")]
mod video;

#[cfg(feature = "browser")]
pub use app::start;
