//! Typed turn events.
//!
//! Every state change the engine makes during a turn is recorded as a
//! [`TurnEvent`], in the order it happened. The list is returned with the
//! turn report and is the authoritative log; `tracing` output is for
//! operators only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    DefeatCause, GameOutcome, LossCause, MissionRejection, RecruitRejection, RetreatReason,
};
use crate::ids::{CityId, PlayerId, TroopId};

/// A single entry in a turn's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "event", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TurnEvent {
    // --- Order intake ---
    /// A new troop was raised at the base.
    TroopRecruited {
        /// Owning player.
        player: PlayerId,
        /// New troop.
        troop: TroopId,
        /// Strength drawn from the reserve.
        strength: u32,
    },
    /// A new-troop request was dropped without side effects.
    RecruitRejected {
        /// Requesting player.
        player: PlayerId,
        /// Requested troop id.
        troop: TroopId,
        /// Why it was dropped.
        reason: RecruitRejection,
    },
    /// A transport mission was queued.
    MissionAccepted {
        /// Owning player.
        player: PlayerId,
        /// Pickup city.
        source: CityId,
        /// Delivery city.
        destination: CityId,
    },
    /// A transport mission was refused at intake.
    MissionRejected {
        /// Requesting player.
        player: PlayerId,
        /// Why it was refused.
        reason: MissionRejection,
    },

    // --- Troops ---
    /// A troop advanced one step.
    TroopMoved {
        /// The troop.
        troop: TroopId,
        /// City left.
        from: CityId,
        /// City entered.
        to: CityId,
    },
    /// A troop reached the end of its path.
    TroopArrived {
        /// The troop.
        troop: TroopId,
        /// Final city.
        city: CityId,
    },
    /// A move order could not be routed and was requeued.
    MoveDeferred {
        /// The troop.
        troop: TroopId,
        /// Unreachable destination.
        target: CityId,
    },
    /// A troop committed to an assault.
    AttackOrdered {
        /// The troop.
        troop: TroopId,
        /// Target city.
        target: CityId,
    },
    /// An attack order was invalid and discarded.
    AttackDropped {
        /// The troop.
        troop: TroopId,
        /// Requested target.
        target: CityId,
    },
    /// A hold order could not be honoured and was discarded.
    HoldDropped {
        /// The troop.
        troop: TroopId,
        /// City the troop stood in.
        city: CityId,
    },
    /// A troop joined a city's garrison.
    TroopGarrisoned {
        /// The troop.
        troop: TroopId,
        /// Garrisoned city.
        city: CityId,
    },
    /// A troop began withdrawing to its base.
    RetreatStarted {
        /// The troop.
        troop: TroopId,
        /// Why.
        reason: RetreatReason,
    },
    /// A stranded troop found a usable way home again.
    RetreatResumed {
        /// The troop.
        troop: TroopId,
    },
    /// A troop could not find a usable way home.
    TroopStranded {
        /// The troop.
        troop: TroopId,
        /// Where it is stuck.
        city: CityId,
    },
    /// A troop was removed from play.
    TroopLost {
        /// The troop.
        troop: TroopId,
        /// Owning player.
        player: PlayerId,
        /// Why.
        cause: LossCause,
    },

    // --- Transport ---
    /// A transport set out for its pickup city.
    TransportDispatched {
        /// Owning player.
        player: PlayerId,
        /// Pickup city.
        source: CityId,
    },
    /// A queued mission had no route to its pickup city.
    MissionDiscarded {
        /// Owning player.
        player: PlayerId,
        /// Unreachable pickup city.
        source: CityId,
    },
    /// A transport advanced one step.
    TransportMoved {
        /// Owning player.
        player: PlayerId,
        /// City left.
        from: CityId,
        /// City entered.
        to: CityId,
    },
    /// A transport crossing a neutral city paid a cargo toll.
    CargoTolled {
        /// Owning player.
        player: PlayerId,
        /// Neutral city that kept the toll.
        city: CityId,
        /// Population lost to the city.
        lost: u32,
    },
    /// A transport ran into an enemy city and was destroyed.
    TransportDestroyed {
        /// Owning player.
        player: PlayerId,
        /// Enemy city that seized the cargo.
        city: CityId,
        /// Population lost to the city.
        cargo_lost: u32,
    },
    /// A destroyed transport is back at its base.
    TransportRespawned {
        /// Owning player.
        player: PlayerId,
    },
    /// Population was loaded at the pickup city.
    CargoCollected {
        /// Owning player.
        player: PlayerId,
        /// Pickup city.
        city: CityId,
        /// Population loaded.
        amount: u32,
    },
    /// Cargo was unloaded at the delivery city.
    CargoDelivered {
        /// Owning player.
        player: PlayerId,
        /// Delivery city.
        city: CityId,
        /// Population unloaded.
        amount: u32,
        /// Whether the cargo became base reserve.
        to_reserve: bool,
    },
    /// A transport abandoned its mission and is heading home.
    TransportReturning {
        /// Owning player.
        player: PlayerId,
    },
    /// A transport finished its trip and is idle again.
    TransportIdle {
        /// Owning player.
        player: PlayerId,
        /// Where it stopped.
        city: CityId,
    },

    // --- Supply ---
    /// Upkeep for the supply tree was charged.
    UpkeepCharged {
        /// Player.
        player: PlayerId,
        /// Total supply-tree weight.
        tree_weight: u64,
        /// Amount charged.
        #[ts(as = "String")]
        upkeep: Decimal,
        /// Reserve after the charge.
        #[ts(as = "String")]
        reserve: Decimal,
    },
    /// An owned city fell outside the supply tree and went neutral.
    CityIsolated {
        /// Former owner.
        player: PlayerId,
        /// The city.
        city: CityId,
    },
    /// A player was eliminated.
    PlayerDefeated {
        /// The player.
        player: PlayerId,
        /// Why.
        cause: DefeatCause,
    },

    // --- Combat ---
    /// One batched assault on a city was resolved.
    AssaultResolved {
        /// Target city.
        city: CityId,
        /// Troop that absorbed the merged assault.
        leader: TroopId,
        /// All participating troops, leader first.
        attackers: Vec<TroopId>,
        /// Sum of attacker strengths.
        total_strength: u32,
        /// Strength after the base-assault penalty.
        effective_strength: u32,
        /// Defense the assault had to beat.
        defense: u32,
        /// Whether the attackers won.
        captured: bool,
    },
    /// A city changed hands.
    CityCaptured {
        /// The city.
        city: CityId,
        /// New owner.
        player: PlayerId,
        /// Former owner, if any.
        previous_owner: Option<PlayerId>,
    },
    /// Combat and settlement were skipped this turn.
    CombatSkipped,

    // --- Termination ---
    /// The game reached a final outcome.
    GameEnded {
        /// The outcome.
        outcome: GameOutcome,
    },
}
