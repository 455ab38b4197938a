//! Shared numeric constants for the overlay crate.

// ── Scheduling ──────────────────────────────────────────────────

/// Target rate of the fixed-timer fallback loop. Most anime is mastered at 24 fps.
pub const LEGACY_FPS: f64 = 24.0;

/// Milliseconds per second.
pub const MS_PER_SEC: f64 = 1000.0;

// ── Geometry ────────────────────────────────────────────────────

/// Wrapper width, in percent, that spans the full player width.
pub const FULL_WIDTH_PERCENT: f64 = 100.0;

// ── Bootstrap ───────────────────────────────────────────────────

/// Inert, freely fetchable source shown while the real video is retrieved.
pub const DEFAULT_PLACEHOLDER_SRC: &str = "https://upload.wikimedia.org/wikipedia/commons/transcoded/3/37/Big_Buck_Bunny_with_VTT_acid_test.webm/Big_Buck_Bunny_with_VTT_acid_test.webm.360p.webm";

/// Default console log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
