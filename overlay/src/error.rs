//! Error types for every capability boundary.
//!
//! None of these escape the core: the controller turns each one into a log
//! entry plus a no-op continuation at the event-loop boundary.

/// A call into the scaling capability failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScalerError {
    /// The scaler could not be bound to the render surface.
    #[error("scaler bind failed: {0}")]
    Bind(String),

    /// The scaler rejected or threw during a call.
    #[error("scaler call failed: {0}")]
    Failed(String),

    /// The scaler was invoked while another call was still in progress.
    #[error("scaler is already in use")]
    Busy,
}

/// The binary transport could not deliver the payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request errored (network failure, bad status, refused by the host).
    #[error("transport request failed: {0}")]
    Failed(String),

    /// The request did not complete within its timeout.
    #[error("transport request timed out")]
    TimedOut,
}

/// A host (page) call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("host call failed: {0}")]
pub struct HostError(pub String);

/// The host reported geometry that cannot produce a valid scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// The video's natural size has not been captured yet.
    #[error("video natural size not captured yet")]
    NotInitialized,

    /// The video reports a natural height of zero.
    #[error("video natural height is zero")]
    ZeroNaturalHeight,

    /// The player box has a zero or non-finite dimension (not laid out yet).
    #[error("player box is empty")]
    EmptyPlayerBox,
}

/// A resize or per-frame render could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResizeError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Scaler(#[from] ScalerError),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// The video source swap failed. Terminal for the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootstrapError {
    /// The video element had no source to retrieve.
    #[error("video element has no source")]
    MissingSource,

    /// A retrieval was already started for this session.
    #[error("video source retrieval already started")]
    AlreadyStarted,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Runtime options could not be parsed or are out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The options string is not valid JSON for [`crate::config::OverlayConfig`].
    #[error("config parse failed: {0}")]
    Parse(String),

    /// A field holds a value outside its allowed range.
    #[error("invalid config field {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
