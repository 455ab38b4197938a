//! Keeps the overlay pixel-aligned with the player across layout changes.
//!
//! ORDERING
//! ========
//! Each apply reads the player box, resizes through the scaler, and only then
//! reads the surface width back. The scaler call is the only thing that changes
//! the surface's pixel size, so reading it earlier would see the old size.

use std::rc::Rc;

use crate::error::{GeometryError, ResizeError};
use crate::geometry::{Geometry, LayoutRegime, scale_ratio, wrapper_width_percent};
use crate::scaler::ResizeOptions;
use crate::session::Session;

#[cfg(test)]
#[path = "resize_test.rs"]
mod resize_test;

pub struct ResizeCoordinator {
    session: Rc<Session>,
}

impl ResizeCoordinator {
    #[must_use]
    pub fn new(session: Rc<Session>) -> Self {
        Self { session }
    }

    /// Recompute geometry for the windowed player.
    ///
    /// # Errors
    ///
    /// See [`ResizeCoordinator::apply`].
    pub fn apply_small(&self) -> Result<Geometry, ResizeError> {
        self.apply(LayoutRegime::Small)
    }

    /// Recompute geometry for the fullscreen player.
    ///
    /// # Errors
    ///
    /// See [`ResizeCoordinator::apply`].
    pub fn apply_fullscreen(&self) -> Result<Geometry, ResizeError> {
        self.apply(LayoutRegime::Fullscreen)
    }

    /// Switch to `regime` and recompute the full geometry from fresh reads.
    ///
    /// Idempotent for an unchanged player box. On error nothing after the
    /// failing step is written and the previous geometry is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::Geometry`] when the natural size is unknown or
    /// the player box is empty, [`ResizeError::Scaler`] when the scaler fails,
    /// and [`ResizeError::Host`] when the overlay style cannot be written.
    pub fn apply(&self, regime: LayoutRegime) -> Result<Geometry, ResizeError> {
        self.session.set_regime(regime);
        let natural = self.session.natural_size()?;

        let player = self.session.player().player_box(regime);
        if player.is_empty() {
            return Err(GeometryError::EmptyPlayerBox.into());
        }
        let ratio = scale_ratio(player.height, natural.height)?;

        self.session.scaler().resize(ratio, &ResizeOptions::default())?;

        let surface_pixel_width = self.session.overlay().surface_pixel_width();
        let wrapper_percent = wrapper_width_percent(surface_pixel_width, player.width)?;
        self.session.overlay().set_outer_box(player)?;
        self.session.overlay().set_width_percent(wrapper_percent)?;

        let geometry = Geometry { regime, player, scale_ratio: ratio, surface_pixel_width, wrapper_percent };
        self.session.replace_geometry(geometry);
        log::debug!(
            "overlay resized: {regime:?} {}x{} ratio={ratio:.4} surface={surface_pixel_width}px width={wrapper_percent}%",
            player.width,
            player.height
        );
        Ok(geometry)
    }
}
