//! Error types for the `dominion-units` crate.
//!
//! Invalid orders and unreachable destinations are handled inside the state
//! machines. The only error is a unit pointing at a city that is not on the
//! map, which means the game state itself is corrupt.

use dominion_types::CityId;

/// Errors that can occur while advancing a unit.
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    /// A unit's location or path step is not a city in the graph.
    #[error("unit references unknown city: {0}")]
    UnknownCity(CityId),

    /// Reserve arithmetic overflowed during a delivery.
    #[error("reserve overflow while delivering {amount} cargo")]
    ReserveOverflow {
        /// Cargo being converted.
        amount: u32,
    },
}
