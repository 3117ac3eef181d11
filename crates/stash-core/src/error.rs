use thiserror::Error;

use crate::platform::WindowId;

/// Errors raised by a poll cycle or a move operation.
///
/// Each variant aborts the single operation that hit it. Nothing in the
/// engine retries; the next poll tick or user move starts fresh.
#[derive(Debug, Error)]
pub enum ItemError {
    /// The window server's own menu bar window was not in the window list.
    #[error("could not find the menu bar window")]
    NoMenuBarWindow,

    /// No display contains the current cursor location.
    #[error("no screen contains the cursor")]
    NoScreen,

    /// The item's window disappeared after the last snapshot.
    #[error("window {0} is no longer on screen")]
    NoCurrentWindow(WindowId),

    /// A synthetic event could not be created or posted.
    #[error("event failure: {0}")]
    EventFailure(#[from] EventError),

    /// The item belongs to a system process that ignores synthetic drags.
    #[error("macOS prohibits moving \"{0}\"")]
    MacOSProhibited(String),

    /// The window list itself could not be fetched.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Failure of the window enumeration service.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("window list unavailable")]
    WindowListUnavailable,
}

/// Failure capturing a single window image.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture of window {0} timed out")]
    Timeout(WindowId),

    #[error("window {0} produced no image")]
    NoImage(WindowId),

    #[error("window {id} produced a malformed image: {reason}")]
    Malformed { id: WindowId, reason: String },
}

/// Failure creating or posting a synthetic input event.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("could not create event source")]
    Source,

    #[error("could not create {0} event")]
    Create(&'static str),

    #[error("could not post {0} event")]
    Post(&'static str),
}

/// Failure loading or saving configuration and state files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHome,

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("section state: {0}")]
    State(#[from] serde_json::Error),
}

impl ConfigError {
    /// Returns true if the underlying IO error is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
