//! Shared type definitions for the Dominion turn engine.
//!
//! This crate is the single source of truth for the shapes exchanged between
//! the engine and its collaborators (map generator, bots, visualizer). Types
//! flow downstream to `TypeScript` via `ts-rs` for the visualizer.
//!
//! # Modules
//!
//! - [`ids`] -- String-keyed identifiers for cities, players, and troops
//! - [`enums`] -- Unit states, commands, reason codes, and the game outcome
//! - [`structs`] -- World definitions, order batches, and state snapshots
//! - [`events`] -- The typed per-turn event log

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    CargoQuantity, DefeatCause, DrawReason, GameOutcome, LossCause, MissionRejection,
    RecruitRejection, RetreatReason, TransportCommand, TransportState, TroopCommand, TroopState,
    VictoryReason,
};
pub use events::TurnEvent;
pub use ids::{CityId, GameId, PlayerId, TroopId};
pub use structs::{
    CitySnapshot, CitySpec, EdgeSnapshot, EdgeSpec, GameSnapshot, PlayerOrders, PlayerSnapshot,
    TransportMission, TransportSnapshot, TroopOrder, TroopSnapshot, WorldDefinition,
};
