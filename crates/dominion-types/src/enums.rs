//! Enumeration types for the Dominion turn engine.
//!
//! Unit state tags, the command vocabulary consumed from order batches, and
//! the reason codes carried by turn events and the game outcome.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{CityId, PlayerId};

// ---------------------------------------------------------------------------
// Unit states
// ---------------------------------------------------------------------------

/// Lifecycle state of a troop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TroopState {
    /// Holding position; pops the next queued command each turn.
    Idle,
    /// Following a validated path toward a friendly city.
    Moving,
    /// Committed to an assault resolved later this turn.
    Attacking,
    /// Following a path back to the owner's base.
    Retreating,
    /// Unable to reach the base; waits in place for a route to open.
    Stranded,
    /// Won an assault this turn; settled after combat.
    Victorious,
    /// Parked inside a city as passive defense.
    Garrisoned,
}

/// Lifecycle state of a player's transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TransportState {
    /// Waiting at its location for a mission.
    Idle,
    /// En route to the pickup city.
    Collecting,
    /// En route to the delivery city with cargo.
    Transporting,
    /// Heading back to the base after an aborted mission.
    Returning,
    /// Lost to an enemy city; respawns at the base after a countdown.
    Destroyed,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A single queued troop command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TroopCommand {
    /// Travel to a friendly city along the shortest path.
    Move {
        /// Destination city.
        target: CityId,
    },
    /// Assault an adjacent city.
    Attack {
        /// City to assault; must neighbor the troop's location.
        target: CityId,
    },
    /// Garrison in the current city.
    Hold,
    /// Withdraw to the owner's base.
    Retreat,
}

/// How much population a transport should pick up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CargoQuantity {
    /// Everything available at the pickup city.
    #[default]
    Max,
    /// At most this many.
    Exact(u32),
}

impl CargoQuantity {
    /// Amount actually collected when `available` population is present.
    pub fn take_from(self, available: u32) -> u32 {
        match self {
            Self::Max => available,
            Self::Exact(requested) => requested.min(available),
        }
    }
}

/// A single queued transport command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TransportCommand {
    /// Pick up population at a city.
    Collect {
        /// Pickup city.
        source: CityId,
        /// Requested amount.
        quantity: CargoQuantity,
    },
    /// Drop the cargo at a city (or convert it to reserve at the base).
    Deliver {
        /// Delivery city.
        destination: CityId,
    },
}

// ---------------------------------------------------------------------------
// Reason codes
// ---------------------------------------------------------------------------

/// Why a troop began withdrawing to its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RetreatReason {
    /// The next step led into a neutral or enemy city.
    HostileCity,
    /// The troop was too strong for the next edge.
    CapacityExceeded,
    /// Ordered by the player.
    Voluntary,
    /// Won an assault without a follow-up hold order.
    RaidCompleted,
    /// Failed to take a neutral city.
    AssaultRepelled,
}

/// Why a troop was removed from play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LossCause {
    /// Consumed into another troop's assault.
    MergedIntoAssault,
    /// Led an assault that the defenders held.
    AssaultFailed,
    /// Garrison defender overwhelmed by an assault.
    DefenseOverrun,
    /// Garrison of a city cut off from the owner's supply tree.
    Isolated,
    /// Owner was defeated.
    OwnerDefeated,
}

/// Why a new-troop request was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RecruitRejection {
    /// The base reserve cannot cover the requested strength.
    Unaffordable {
        /// Strength requested.
        requested: u32,
    },
    /// Another troop already uses the requested id.
    DuplicateId,
    /// Troops must have positive strength.
    ZeroStrength,
}

/// Why a transport mission was not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum MissionRejection {
    /// The transport is already on a mission.
    TransportBusy,
    /// The transport is waiting to respawn.
    TransportDestroyed,
    /// Pickup or delivery city is not on the map.
    UnknownCity,
}

/// Why a player was eliminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DefeatCause {
    /// Upkeep drove the base reserve to zero or below.
    Bankruptcy,
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// How a winner was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum VictoryReason {
    /// Every other player was defeated.
    Elimination,
    /// Most owned cities when the turn limit was reached.
    CityCount,
}

/// Why the game ended without a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DrawReason {
    /// No player survived.
    AllEliminated,
    /// Several players share the highest city count at the turn limit.
    TiedCityCount,
    /// Nobody owns any city at the turn limit.
    NoCitiesOwned,
}

/// Result of the termination check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GameOutcome {
    /// The game continues.
    InProgress,
    /// A single player won.
    Winner {
        /// The winning player.
        player: PlayerId,
        /// How the win was decided.
        reason: VictoryReason,
    },
    /// The game ended in a draw.
    Draw {
        /// Why nobody won.
        reason: DrawReason,
    },
}

impl GameOutcome {
    /// Whether the game has ended.
    pub const fn is_over(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}
