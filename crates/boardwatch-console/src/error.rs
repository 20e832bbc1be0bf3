//! Error types for the console producer binary.
//!
//! [`ConsoleError`] is the top-level error type that `main` propagates.
//! Malformed operator input is not an error; it is logged and skipped.

/// Top-level error for the console producer.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: boardwatch_core::ConfigError,
    },

    /// The HTTP server could not be started.
    #[error("server error: {source}")]
    Server {
        /// The underlying startup error.
        #[from]
        source: boardwatch_server::StartupError,
    },

    /// Reading operator input or writing prompts failed.
    #[error("console I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
