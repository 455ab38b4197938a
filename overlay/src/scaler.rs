//! Boundary to the GPU scaling capability.
//!
//! The scaler itself is opaque. The core only binds it, points it at the video,
//! and calls [`ScalerHandle::resize`], which renders the current frame and may
//! change the render surface's pixel size as a side effect.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ScalerError;

#[cfg(test)]
#[path = "scaler_test.rs"]
mod scaler_test;

/// Extra options for [`Scaler::resize`]. Always empty for now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeOptions {}

/// A scaler bound to the overlay's render surface.
pub trait Scaler {
    /// Use the session video as the scaler's input.
    ///
    /// # Errors
    ///
    /// Returns [`ScalerError::Failed`] if the scaler rejects the video.
    fn set_input_video(&mut self) -> Result<(), ScalerError>;

    /// Scale the current frame by `ratio` and render it.
    ///
    /// # Errors
    ///
    /// Returns [`ScalerError::Failed`] if rendering fails.
    fn resize(&mut self, ratio: f64, options: &ResizeOptions) -> Result<(), ScalerError>;
}

/// Produces a scaler bound to the render surface.
pub trait ScalerBackend {
    /// Bind a scaler to the render surface.
    ///
    /// # Errors
    ///
    /// Returns [`ScalerError::Bind`] if no rendering context is available.
    fn bind(&self) -> Result<ScalerHandle, ScalerError>;
}

/// Shared handle to the bound scaler.
///
/// Cloned into the scheduler and the resize coordinator. A call made while
/// another is still running is rejected with [`ScalerError::Busy`].
#[derive(Clone)]
pub struct ScalerHandle {
    inner: Rc<RefCell<Box<dyn Scaler>>>,
}

impl ScalerHandle {
    #[must_use]
    pub fn new(scaler: Box<dyn Scaler>) -> Self {
        Self { inner: Rc::new(RefCell::new(scaler)) }
    }

    /// # Errors
    ///
    /// Propagates the scaler's error, or [`ScalerError::Busy`] on re-entry.
    pub fn set_input_video(&self) -> Result<(), ScalerError> {
        let mut scaler = self.inner.try_borrow_mut().map_err(|_| ScalerError::Busy)?;
        scaler.set_input_video()
    }

    /// # Errors
    ///
    /// Propagates the scaler's error, or [`ScalerError::Busy`] on re-entry.
    pub fn resize(&self, ratio: f64, options: &ResizeOptions) -> Result<(), ScalerError> {
        let mut scaler = self.inner.try_borrow_mut().map_err(|_| ScalerError::Busy)?;
        scaler.resize(ratio, options)
    }
}
