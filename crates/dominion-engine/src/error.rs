//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and the game run.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: dominion_core::config::ConfigError,
    },

    /// Map loading or graph construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: dominion_world::WorldError,
    },

    /// Player setup was inconsistent with the map.
    #[error("setup error: {source}")]
    Setup {
        /// The underlying setup error.
        #[from]
        source: dominion_core::SetupError,
    },

    /// The order script could not be loaded.
    #[error("order source error: {source}")]
    Orders {
        /// The underlying order source error.
        #[from]
        source: dominion_core::decision::OrderSourceError,
    },

    /// The game run failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: dominion_core::runner::RunnerError,
    },

    /// Snapshot output directory could not be prepared.
    #[error("snapshot output error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
