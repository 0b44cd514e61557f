//! Error types for the `dominion-world` crate.
//!
//! Everything here is structural: a malformed map aborts initialization.
//! Gameplay conditions (no path, isolation) are never errors.

use dominion_types::CityId;

/// Errors that can occur while building or loading the map graph.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A city was not found in the graph.
    #[error("city not found: {0}")]
    CityNotFound(CityId),

    /// A duplicate city was inserted.
    #[error("duplicate city id: {0}")]
    DuplicateCity(CityId),

    /// An edge is malformed.
    #[error("invalid edge {from} -- {to}: {reason}")]
    InvalidEdge {
        /// One endpoint.
        from: CityId,
        /// The other endpoint.
        to: CityId,
        /// What is wrong with it.
        reason: String,
    },

    /// Failed to read a map file.
    #[error("failed to read map file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse a map file.
    #[error("failed to parse map JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
