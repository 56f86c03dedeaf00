//! Error types shared across the mediatree crates

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Bus/Transport Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to connect to the session bus: {message}")]
    BusConnection { message: String },

    /// Any failure of a bus RPC against one peer: peer gone, call timed
    /// out, malformed reply, or a protocol-level error reply.
    #[error("Remote call to {service} failed: {message}")]
    RemoteCall { service: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Engine Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Retrieval engine has been shut down")]
    EngineStopped,

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn bus_connection(message: impl Into<String>) -> Self {
        Self::BusConnection {
            message: message.into(),
        }
    }

    pub fn remote_call(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteCall {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// A [`Error::RemoteCall`] only ever concerns one peer; the worker
    /// logs it and keeps servicing other requests.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::RemoteCall { .. } | Error::ChannelSend { .. }
        )
    }

    /// Check if this error should abort the calling application
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::BusConnection { .. } | Error::Config { .. })
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::remote_call("org.gnome.UPnP.MediaServer2.Foo", "no reply");
        assert_eq!(
            err.to_string(),
            "Remote call to org.gnome.UPnP.MediaServer2.Foo failed: no reply"
        );

        let err = Error::EngineStopped;
        assert!(err.to_string().contains("shut down"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::remote_call("svc", "timeout").is_recoverable());
        assert!(Error::channel_send("closed").is_recoverable());
        assert!(!Error::bus_connection("no session bus").is_recoverable());
        assert!(!Error::EngineStopped.is_recoverable());
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::bus_connection("no session bus").is_fatal());
        assert!(Error::config("bad toml").is_fatal());
        assert!(!Error::remote_call("svc", "timeout").is_fatal());
    }

    #[test]
    fn test_error_constructors() {
        let _ = Error::bus_connection("test");
        let _ = Error::remote_call("svc", "test");
        let _ = Error::channel_send("test");
        let _ = Error::config("test");
    }
}
