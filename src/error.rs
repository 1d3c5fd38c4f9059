//! Error types for the zoom rescaling core.
//!
//! Every fallible operation returns [`ZoomResult`]. Allocation failures and
//! handler failures are reported, never retried: deriving a resource is
//! deterministic, so a retry without a state change fails the same way.

/// Errors that can occur while scaling, caching or dispatching.
#[derive(Debug)]
pub enum ZoomError {
    /// A zoom percentage of zero or less was supplied.
    InvalidZoom(i64),

    /// The native layer could not allocate a resource.
    NativeAllocation {
        /// Debug description of the resource key.
        resource: String,
        /// Zoom level the resource was requested at.
        zoom: i32,
    },

    /// A resource handle no longer refers to a live registry entry.
    StaleResource,

    /// An image provider returned no data, not even at 100%.
    MissingImageData {
        /// Key of the image descriptor.
        key: String,
    },

    /// A zoom-change handler failed. Recorded in the dispatch report.
    Handler {
        /// Name of the capability class the handler was registered for.
        class: String,
        /// Failure description.
        message: String,
    },

    /// A capability class name was not defined in the hierarchy.
    UnknownClass(String),

    /// The scaling configuration could not be parsed.
    Config(String),

    /// Reading or writing the configuration file failed.
    Io(std::io::Error),
}

impl std::fmt::Display for ZoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidZoom(zoom) => write!(f, "invalid zoom level {zoom}% (must be > 0)"),
            Self::NativeAllocation { resource, zoom } => {
                write!(f, "native allocation failed for {resource} at {zoom}%")
            }
            Self::StaleResource => f.write_str("resource is no longer held by the registry"),
            Self::MissingImageData { key } => {
                write!(f, "image provider '{key}' returned no data at 100% zoom")
            }
            Self::Handler { class, message } => {
                write!(f, "zoom handler for '{class}' failed: {message}")
            }
            Self::UnknownClass(name) => write!(f, "unknown capability class '{name}'"),
            Self::Config(msg) => write!(f, "config error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ZoomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ZoomError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ZoomError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type ZoomResult<T> = Result<T, ZoomError>;
