//! Core wire structs: world definitions, order batches, and state snapshots.
//!
//! These are the shapes exchanged with the engine's collaborators. The map
//! generator supplies a [`WorldDefinition`], bots supply [`PlayerOrders`]
//! once per turn, and the visualizer and bots read a [`GameSnapshot`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CargoQuantity, GameOutcome, TransportState, TroopCommand, TroopState};
use crate::ids::{CityId, GameId, PlayerId, TroopId};

// ---------------------------------------------------------------------------
// World definition
// ---------------------------------------------------------------------------

/// A city as supplied by the map generator.
///
/// Layout metadata (coordinates, colours) is ignored by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySpec {
    /// City identifier.
    pub id: CityId,
    /// Starting population.
    #[serde(alias = "populacao")]
    pub population: u32,
}

/// An undirected edge as supplied by the map generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// One endpoint.
    #[serde(alias = "de")]
    pub from: CityId,
    /// The other endpoint.
    #[serde(alias = "para")]
    pub to: CityId,
    /// Traversal capacity (maximum troop strength per step).
    #[serde(alias = "peso")]
    pub weight: u32,
}

/// A finished map: the only input the engine needs from the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldDefinition {
    /// All cities, in insertion order.
    #[serde(default, alias = "cidades")]
    pub cities: Vec<CitySpec>,
    /// All edges, in insertion order (which fixes neighbor enumeration).
    #[serde(default, alias = "arestas")]
    pub edges: Vec<EdgeSpec>,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// A request to raise a new troop from the base reserve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TroopOrder {
    /// Identifier for the new troop.
    pub id: TroopId,
    /// Strength to draw from the base reserve.
    pub strength: u32,
    /// Commands executed in order, one per turn.
    #[serde(default)]
    pub commands: Vec<TroopCommand>,
}

/// A single collect-then-deliver mission for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TransportMission {
    /// Pickup city.
    pub source: CityId,
    /// Delivery city; delivering to the own base converts cargo to reserve.
    pub destination: CityId,
    /// How much to pick up.
    #[serde(default)]
    pub quantity: CargoQuantity,
}

/// Everything one player submits for one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerOrders {
    /// New troops to raise this turn.
    #[serde(default)]
    pub new_troops: Vec<TroopOrder>,
    /// At most one transport mission.
    #[serde(default)]
    pub transport: Option<TransportMission>,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A city as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CitySnapshot {
    /// City identifier.
    pub id: CityId,
    /// Current owner, if any.
    pub owner: Option<PlayerId>,
    /// Current population.
    pub population: u32,
    /// The player whose base this is, if any.
    pub base_of: Option<PlayerId>,
    /// Garrisoned troops, in garrison order.
    pub garrison: Vec<TroopId>,
}

/// An edge as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EdgeSnapshot {
    /// Lower endpoint of the sorted pair.
    pub a: CityId,
    /// Upper endpoint of the sorted pair.
    pub b: CityId,
    /// Traversal capacity.
    pub weight: u32,
}

/// A player as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerSnapshot {
    /// Player identifier.
    pub id: PlayerId,
    /// Base city.
    pub base: CityId,
    /// Liquid strength pool at the base.
    #[ts(as = "String")]
    pub reserve: Decimal,
    /// Cities currently owned.
    pub cities: Vec<CityId>,
    /// Whether the player has been eliminated.
    pub defeated: bool,
}

/// A troop as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TroopSnapshot {
    /// Troop identifier.
    pub id: TroopId,
    /// Owning player.
    pub owner: PlayerId,
    /// Current strength.
    pub strength: u32,
    /// Current city.
    pub location: CityId,
    /// Lifecycle state.
    pub state: TroopState,
    /// Commands still queued.
    pub pending_commands: Vec<TroopCommand>,
}

/// A transport as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TransportSnapshot {
    /// Owning player.
    pub owner: PlayerId,
    /// Current city.
    pub location: CityId,
    /// Population being carried.
    pub cargo: u32,
    /// Lifecycle state.
    pub state: TransportState,
    /// Turns until respawn while destroyed.
    pub respawn_in: u32,
    /// Remaining route, next hop first.
    pub path: Vec<CityId>,
    /// Number of mission steps still queued.
    pub queued_commands: usize,
}

/// Read-only view of the whole game, produced once per turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameSnapshot {
    /// Match identifier.
    pub game_id: GameId,
    /// Last completed turn (0 before the first turn).
    pub turn: u64,
    /// Turn limit.
    pub max_turns: u64,
    /// All cities, ordered by id.
    pub cities: Vec<CitySnapshot>,
    /// All edges, ordered by sorted endpoint pair.
    pub edges: Vec<EdgeSnapshot>,
    /// All players, in registration order.
    pub players: Vec<PlayerSnapshot>,
    /// Active (non-garrisoned) troops, by player then roster order.
    pub troops: Vec<TroopSnapshot>,
    /// One transport per player, in registration order.
    pub transports: Vec<TransportSnapshot>,
    /// Current termination status.
    pub outcome: GameOutcome,
}
