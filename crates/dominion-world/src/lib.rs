//! Map graph, routing, and supply trees for the Dominion turn engine.
//!
//! This crate models the physical board: cities as nodes carrying population,
//! ownership, and garrisons, joined by undirected edges whose weight is the
//! maximum troop strength that may cross in one step.
//!
//! # Modules
//!
//! - [`city`] -- [`City`] runtime state (population, owner, base, garrison).
//! - [`demo_world`] -- Built-in two-player skirmish map.
//! - [`error`] -- Error types for graph construction and loading.
//! - [`graph`] -- [`CityGraph`] with canonical neighbor order and BFS routing.
//! - [`loader`] -- Building a graph from a [`WorldDefinition`] or map file.
//! - [`supply`] -- Prim's supply tree and upkeep.
//!
//! [`City`]: city::City
//! [`CityGraph`]: graph::CityGraph
//! [`WorldDefinition`]: dominion_types::WorldDefinition

pub mod city;
pub mod demo_world;
pub mod error;
pub mod graph;
pub mod loader;
pub mod supply;

// Re-export primary types at crate root.
pub use city::City;
pub use demo_world::{demo_definition, demo_world};
pub use error::WorldError;
pub use graph::{CityGraph, Edge, EdgeKey};
pub use loader::{build_graph, load_world, parse_world};
pub use supply::{DEFAULT_UPKEEP_DIVISOR, SupplyTree, supply_tree};
