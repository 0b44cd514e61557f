//! Game state, turn cycle, and game runner for the Dominion turn engine.
//!
//! This crate owns the arena ([`GameState`]) and the fixed phase sequence
//! that advances it: Orders, Movement, Supply, Combat, Settlement, and
//! Termination.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `dominion-config.yaml` into
//!   strongly-typed structs.
//! - [`state`] -- The arena: players, troops, rules, and the city graph.
//! - [`orders`] -- Phase 0, recruitment and transport mission intake.
//! - [`movement`] -- Phase 1, one transition per troop and transport.
//! - [`supply`] -- Phase 2, isolation, upkeep, and bankruptcy.
//! - [`combat`] -- Phase 3, batched assault resolution.
//! - [`settlement`] -- Phase 4, garrison or raid withdrawal.
//! - [`outcome`] -- Phase 5, the termination check.
//! - [`snapshot`] -- Serializable read-only views of the state.
//! - [`turn`] -- The phase sequence for a single turn.
//! - [`decision`] -- [`OrderSource`] trait and built-in sources.
//! - [`runner`] -- The game loop.
//!
//! [`OrderSource`]: decision::OrderSource

pub mod combat;
pub mod config;
pub mod decision;
pub mod movement;
pub mod orders;
pub mod outcome;
pub mod runner;
pub mod settlement;
pub mod snapshot;
pub mod state;
pub mod supply;
pub mod turn;

pub use state::{GameState, Player, PlayerSetup, Rules, SetupError};
pub use turn::{TurnError, TurnReport, run_turn};
