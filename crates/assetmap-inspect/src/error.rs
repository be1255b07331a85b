//! Error types for the inspector binary.
//!
//! [`InspectError`] wraps every failure `main` can propagate with `?`.

use std::path::PathBuf;

use assetmap_wire::WireError;

use crate::config::ConfigError;

/// Top-level error for the inspector.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The event log could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Input {
        /// The log that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The log's framing is broken; no later frame can be located.
    #[error("frame {index}: {source}")]
    Frame {
        /// Zero-based index of the frame that failed.
        index: usize,
        /// The underlying wire error.
        source: WireError,
    },

    /// Writing decoded events to the output failed.
    #[error("output error: {source}")]
    Output {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
