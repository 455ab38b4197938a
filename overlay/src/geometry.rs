use crate::consts::FULL_WIDTH_PERCENT;
use crate::error::GeometryError;

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

/// An on-screen rectangle size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

impl BoxSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative, or not finite.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// A video's intrinsic pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NaturalSize {
    pub width: u32,
    pub height: u32,
}

impl NaturalSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Display mode of the host player. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutRegime {
    #[default]
    Small,
    Fullscreen,
}

impl LayoutRegime {
    #[must_use]
    pub fn from_fullscreen(active: bool) -> Self {
        if active { Self::Fullscreen } else { Self::Small }
    }
}

/// One full geometry recompute. Always replaced as a whole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub regime: LayoutRegime,
    pub player: BoxSize,
    pub scale_ratio: f64,
    pub surface_pixel_width: u32,
    pub wrapper_percent: u32,
}

/// Scale factor that maps the video's natural height onto the player height.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroNaturalHeight`] when the video has no height yet
/// and [`GeometryError::EmptyPlayerBox`] for a zero or non-finite player height.
pub fn scale_ratio(player_height: f64, natural_height: u32) -> Result<f64, GeometryError> {
    if natural_height == 0 {
        return Err(GeometryError::ZeroNaturalHeight);
    }
    if !player_height.is_finite() || player_height <= 0.0 {
        return Err(GeometryError::EmptyPlayerBox);
    }
    Ok(player_height / f64::from(natural_height))
}

/// Width of the centered overlay container relative to the player, in percent.
///
/// Rounds up so the overlay never leaves a sub-pixel gap at its edges.
///
/// # Errors
///
/// Returns [`GeometryError::EmptyPlayerBox`] for a zero or non-finite player width.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn wrapper_width_percent(surface_width: u32, player_width: f64) -> Result<u32, GeometryError> {
    if !player_width.is_finite() || player_width <= 0.0 {
        return Err(GeometryError::EmptyPlayerBox);
    }
    let percent = (FULL_WIDTH_PERCENT * f64::from(surface_width) / player_width).ceil();
    Ok(percent as u32)
}
