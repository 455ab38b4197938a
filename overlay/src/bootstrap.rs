//! One-shot swap of the player's cross-origin source for a local copy.
//!
//! Frames of a cross-origin video cannot be read back by WebGL, so the scaler
//! would have nothing to work with. The bootstrapper captures the original
//! source, parks the element on an inert placeholder (interrupting the
//! restricted load), retrieves the bytes through a transport that is exempt
//! from same-origin rules, and points the element at a local object URL.
//!
//! A failed retrieval is terminal: the placeholder stays and nothing retries.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::OverlayConfig;
use crate::error::{BootstrapError, HostError, TransportError};
use crate::host::VideoElement;

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod bootstrap_test;

/// A GET for a binary body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRequest {
    pub url: String,
    pub timeout_ms: Option<u32>,
}

/// A retrieved binary body, held by the host.
pub trait Payload {
    /// Create a same-origin object URL referencing the payload.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the host cannot create the URL.
    fn object_url(&self) -> Result<String, HostError>;

    /// Size in bytes, when known.
    fn byte_len(&self) -> Option<u64>;
}

pub type TransportResult = Result<Box<dyn Payload>, TransportError>;

/// Byte transport exempt from same-origin restrictions.
pub trait Transport {
    /// Start a request. `on_complete` runs exactly once with the payload, an
    /// error, or [`TransportError::TimedOut`].
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the request cannot be issued at all; in
    /// that case `on_complete` never runs.
    fn get_binary(
        &self,
        request: BinaryRequest,
        on_complete: Box<dyn FnOnce(TransportResult)>,
    ) -> Result<(), TransportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Idle,
    InFlight,
    Swapped,
    Failed,
}

pub struct VideoSourceBootstrapper {
    state: Rc<Cell<BootstrapState>>,
    placeholder_src: String,
    timeout_ms: Option<u32>,
}

impl VideoSourceBootstrapper {
    #[must_use]
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            state: Rc::new(Cell::new(BootstrapState::Idle)),
            placeholder_src: config.placeholder_src.clone(),
            timeout_ms: config.fetch_timeout_ms,
        }
    }

    #[must_use]
    pub fn state(&self) -> BootstrapState {
        self.state.get()
    }

    /// Start the swap. `on_done` runs once the transport completes.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::AlreadyStarted`] on any call after the first,
    /// [`BootstrapError::MissingSource`] when the element has no source, and
    /// the host or transport error when the request cannot be issued. In all
    /// these cases `on_done` never runs.
    pub fn start(
        &self,
        video: Rc<dyn VideoElement>,
        transport: &dyn Transport,
        on_done: Box<dyn FnOnce(Result<(), BootstrapError>)>,
    ) -> Result<(), BootstrapError> {
        if self.state.get() != BootstrapState::Idle {
            return Err(BootstrapError::AlreadyStarted);
        }
        self.state.set(BootstrapState::InFlight);
        self.issue(video, transport, on_done).inspect_err(|_| self.state.set(BootstrapState::Failed))
    }

    fn issue(
        &self,
        video: Rc<dyn VideoElement>,
        transport: &dyn Transport,
        on_done: Box<dyn FnOnce(Result<(), BootstrapError>)>,
    ) -> Result<(), BootstrapError> {
        let original = video
            .source()
            .filter(|src| !src.trim().is_empty())
            .ok_or(BootstrapError::MissingSource)?;
        video.set_source(&self.placeholder_src)?;
        log::info!("fetching video from {original}");

        let request = BinaryRequest { url: original, timeout_ms: self.timeout_ms };
        let state = Rc::clone(&self.state);
        transport.get_binary(
            request,
            Box::new(move |result| {
                let outcome = swap_source(video.as_ref(), result);
                state.set(if outcome.is_ok() { BootstrapState::Swapped } else { BootstrapState::Failed });
                on_done(outcome);
            }),
        )?;
        Ok(())
    }
}

fn swap_source(video: &dyn VideoElement, result: TransportResult) -> Result<(), BootstrapError> {
    let payload = result?;
    let url = payload.object_url()?;
    video.set_source(&url)?;
    match payload.byte_len() {
        Some(len) => log::info!("swapped video source ({len} bytes)"),
        None => log::info!("swapped video source"),
    }
    Ok(())
}
