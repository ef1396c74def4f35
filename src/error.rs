//! Error types.
//!
//! Only two things ever surface as errors:
//! - a platform subsystem that cannot be brought up at construction time, and
//! - a backend that reports an unrecoverable condition during `update()`.
//!
//! Everything else is absorbed in-band: unknown names resolve to neutral values,
//! out-of-range player indices and absent devices produce a disconnected
//! snapshot, and transient poll failures reuse the last known state.

use std::path::PathBuf;
use thiserror::Error;

/// Error raised by a platform backend while polling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The read failed this frame but the device/subsystem is still usable.
    #[error("transient {source_name} failure: {message}")]
    Transient {
        source_name: &'static str,
        message: String,
    },

    /// The device or subsystem is gone for good.
    #[error("unrecoverable {source_name} failure: {message}")]
    Unrecoverable {
        source_name: &'static str,
        message: String,
    },
}

impl BackendError {
    pub fn transient(source_name: &'static str, message: impl Into<String>) -> Self {
        Self::Transient {
            source_name,
            message: message.into(),
        }
    }

    pub fn unrecoverable(source_name: &'static str, message: impl Into<String>) -> Self {
        Self::Unrecoverable {
            source_name,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Which name table a lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Key,
    Button,
    GamepadAxis,
    MouseAxis,
}

impl std::fmt::Display for NameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NameKind::Key => "key",
            NameKind::Button => "button",
            NameKind::GamepadAxis => "gamepad axis",
            NameKind::MouseAxis => "mouse axis",
        };
        f.write_str(s)
    }
}

/// Crate-level error.
#[derive(Error, Debug)]
pub enum InputError {
    /// A native input subsystem failed to initialize. There is no degraded mode.
    #[error("{subsystem} unavailable: {reason}")]
    PlatformUnavailable {
        subsystem: &'static str,
        reason: String,
    },

    /// A backend signalled an unrecoverable condition during a frame update.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A configuration file could not be parsed.
    #[error("invalid configuration{}: {message}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    Config {
        path: Option<PathBuf>,
        message: String,
    },

    /// A configuration referenced a name outside the fixed name tables.
    #[error("unknown {kind} name {name:?}")]
    UnknownName { kind: NameKind, name: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InputError {
    pub fn platform_unavailable(subsystem: &'static str, reason: impl Into<String>) -> Self {
        Self::PlatformUnavailable {
            subsystem,
            reason: reason.into(),
        }
    }

    pub fn unknown_name(kind: NameKind, name: impl Into<String>) -> Self {
        Self::UnknownName {
            kind,
            name: name.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InputError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_classification() {
        assert!(BackendError::transient("xinput", "busy").is_transient());
        assert!(!BackendError::unrecoverable("xinput", "gone").is_transient());
    }

    #[test]
    fn config_error_mentions_path_when_known() {
        let err = InputError::Config {
            path: Some(PathBuf::from("input.toml")),
            message: "bad".into(),
        };
        assert_eq!(err.to_string(), "invalid configuration in input.toml: bad");

        let err = InputError::Config {
            path: None,
            message: "bad".into(),
        };
        assert_eq!(err.to_string(), "invalid configuration: bad");
    }

    #[test]
    fn unknown_name_message() {
        let err = InputError::unknown_name(NameKind::Key, "hyper");
        assert_eq!(err.to_string(), "unknown key name \"hyper\"");
    }
}
