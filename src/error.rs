//! Error types for the formation engine and its surroundings.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by roster mutations.
///
/// Every variant is non-fatal: the roster is left exactly as it was
/// before the rejected call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RosterError {
    /// No unit factory is attached, so no unit can be instantiated.
    #[error("no unit factory configured; cannot add {requested} soldier(s)")]
    FactoryUnavailable {
        /// Number of soldiers the caller asked for.
        requested: usize,
    },
    /// The roster has no room for every soldier requested.
    #[error("roster has room for {available} more soldier(s); cannot add {requested}")]
    CapacityExceeded {
        /// Number of soldiers the caller asked for.
        requested: usize,
        /// Free slots left below `max_soldiers`.
        available: usize,
    },
}

/// Errors raised while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid configuration JSON.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// Path that was being parsed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while loading or stepping a scripted scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The scenario file could not be read or written.
    #[error("scenario I/O failed for {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The scenario file is not valid scenario JSON.
    #[error("failed to parse scenario {path}: {source}")]
    Parse {
        /// Path that was being parsed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The scenario could not be encoded as JSON.
    #[error("failed to encode scenario: {0}")]
    Encode(#[source] serde_json::Error),
    /// The frame rate is zero, negative or not finite.
    #[error("invalid frame rate {0}; must be a positive number")]
    InvalidFrameRate(f32),
    /// An event is scheduled past the end of the scenario.
    #[error("event at frame {frame} is beyond the last frame {frames}")]
    EventOutOfRange {
        /// Frame the event was scheduled for.
        frame: u32,
        /// Number of frames in the scenario.
        frames: u32,
    },
    /// Requested frame is past the end of the scenario.
    #[error("frame {requested} out of bounds (scenario has {frames} frames)")]
    FrameOutOfBounds {
        /// Requested frame.
        requested: u32,
        /// Number of frames in the scenario.
        frames: u32,
    },
}

/// Result type for roster mutations.
pub type RosterResult<T> = Result<T, RosterError>;
