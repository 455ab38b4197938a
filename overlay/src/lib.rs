//! Host-independent core of the in-page video upscaling overlay.
//!
//! The crate drives an opaque GPU scaler over a host video player: it swaps the
//! player's cross-origin source for a pixel-readable local copy, keeps the
//! overlay geometry aligned with the player box across fullscreen transitions,
//! and calls the scaler once per displayed frame. Everything that touches the
//! browser is reached through the capability traits in [`host`], [`scaler`] and
//! [`bootstrap`], so the whole lifecycle is testable natively. The root crate
//! supplies the `web-sys` implementations.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | [`controller::SessionController`], wiring lifecycle events to the components |
//! | [`session`] | Per-page playback context shared by the components |
//! | [`scheduler`] | Per-frame render loop (video-frame callback or fixed-rate timer) |
//! | [`resize`] | Scale-ratio and overlay-width recomputation on layout changes |
//! | [`bootstrap`] | One-shot swap of the video source for a locally fetched copy |
//! | [`scaler`] | Scaler capability boundary and the shared [`scaler::ScalerHandle`] |
//! | [`host`] | Player, video, overlay and timing capability traits |
//! | [`geometry`] | Pure geometry math and value types |
//! | [`config`] | Runtime options with defaults |
//! | [`error`] | Error types for every boundary |
//! | [`consts`] | Shared numeric constants |

pub mod bootstrap;
pub mod config;
pub mod consts;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod host;
pub mod resize;
pub mod scaler;
pub mod scheduler;
pub mod session;

#[cfg(test)]
mod test_support;
