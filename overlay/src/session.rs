//! Per-page playback context.
//!
//! One [`Session`] is built per page load and shared by reference (`Rc`) with
//! the resize coordinator and the frame scheduler. It replaces ambient global
//! state: every component reaches the player, video, overlay and scaler
//! through it.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{GeometryError, ResizeError};
use crate::geometry::{Geometry, LayoutRegime, NaturalSize, scale_ratio};
use crate::host::{Overlay, PlayerHost, VideoElement};
use crate::scaler::{ResizeOptions, ScalerHandle};

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

pub struct Session {
    player: Rc<dyn PlayerHost>,
    video: Rc<dyn VideoElement>,
    overlay: Rc<dyn Overlay>,
    scaler: ScalerHandle,
    natural: Cell<Option<NaturalSize>>,
    regime: Cell<LayoutRegime>,
    geometry: Cell<Option<Geometry>>,
}

impl Session {
    #[must_use]
    pub fn new(
        player: Rc<dyn PlayerHost>,
        video: Rc<dyn VideoElement>,
        overlay: Rc<dyn Overlay>,
        scaler: ScalerHandle,
    ) -> Self {
        let regime = LayoutRegime::from_fullscreen(player.fullscreen_active());
        Self {
            player,
            video,
            overlay,
            scaler,
            natural: Cell::new(None),
            regime: Cell::new(regime),
            geometry: Cell::new(None),
        }
    }

    // --- Capabilities ---

    #[must_use]
    pub fn player(&self) -> &dyn PlayerHost {
        self.player.as_ref()
    }

    #[must_use]
    pub fn video(&self) -> &Rc<dyn VideoElement> {
        &self.video
    }

    #[must_use]
    pub fn overlay(&self) -> &dyn Overlay {
        self.overlay.as_ref()
    }

    #[must_use]
    pub fn scaler(&self) -> &ScalerHandle {
        &self.scaler
    }

    // --- Playback state ---

    #[must_use]
    pub fn paused(&self) -> bool {
        self.player.paused()
    }

    /// Read the video's natural size. Only the first call reads the host;
    /// the size stays fixed for the rest of the session.
    pub fn capture_natural_size(&self) -> NaturalSize {
        if let Some(natural) = self.natural.get() {
            return natural;
        }
        let natural = self.video.natural_size();
        self.natural.set(Some(natural));
        natural
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::NotInitialized`] before the first capture.
    pub fn natural_size(&self) -> Result<NaturalSize, GeometryError> {
        self.natural.get().ok_or(GeometryError::NotInitialized)
    }

    // --- Layout ---

    #[must_use]
    pub fn regime(&self) -> LayoutRegime {
        self.regime.get()
    }

    pub fn set_regime(&self, regime: LayoutRegime) {
        self.regime.set(regime);
    }

    /// The most recent full geometry recompute.
    #[must_use]
    pub fn geometry(&self) -> Option<Geometry> {
        self.geometry.get()
    }

    pub fn replace_geometry(&self, geometry: Geometry) {
        self.geometry.set(Some(geometry));
    }

    /// Scale ratio from a fresh read of the player box for the active regime.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] when the natural size is unknown or either
    /// height is unusable.
    pub fn current_ratio(&self) -> Result<f64, GeometryError> {
        let natural = self.natural_size()?;
        let player = self.player.player_box(self.regime.get());
        scale_ratio(player.height, natural.height)
    }

    /// Render one frame at the current ratio.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::Geometry`] when no valid ratio exists (nothing
    /// is rendered) and [`ResizeError::Scaler`] when the scaler fails.
    pub fn render_frame(&self) -> Result<(), ResizeError> {
        let ratio = self.current_ratio()?;
        self.scaler.resize(ratio, &ResizeOptions::default())?;
        Ok(())
    }
}
