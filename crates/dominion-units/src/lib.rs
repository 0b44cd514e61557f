//! Troop and transport state machines for the Dominion turn engine.
//!
//! Units are plain records keyed by id. They advance one transition per turn
//! against a borrowed view of the map and report every state change as a
//! [`TurnEvent`](dominion_types::TurnEvent). Roster and garrison bookkeeping
//! stays with the caller.
//!
//! # Modules
//!
//! - [`error`] -- [`UnitError`] for corrupt unit state.
//! - [`transport`] -- [`Transport`] logistics unit.
//! - [`troop`] -- [`Troop`] mobile unit.

pub mod error;
pub mod transport;
pub mod troop;

pub use error::UnitError;
pub use transport::{
    DEFAULT_RESPAWN_TURNS, DEFAULT_TOLL_PERCENT, Transport, TransportContext, TransportRules,
};
pub use troop::{Troop, TroopAction, TroopContext};
