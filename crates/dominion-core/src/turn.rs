//! Turn cycle: the phase sequence that advances a game by one turn.
//!
//! Each turn runs through these phases, in this fixed order:
//!
//! 0. **Orders** -- recruit troops and queue transport missions from the
//!    turn's order batches.
//!
//! 1. **Movement** -- every surviving player's troops (roster order), then
//!    its transport, advance one transition.
//!
//! 2. **Supply** -- supply trees, isolation, upkeep, bankruptcy.
//!
//! 3. **Combat** -- batched assaults on every targeted city.
//!
//! 4. **Settlement** -- victorious troops garrison or withdraw.
//!
//! 5. **Termination** -- evaluate the outcome.
//!
//! The turn is computed on a working copy of the state and committed only if
//! every phase succeeds, so a failed turn leaves the game untouched.

use std::collections::BTreeMap;

use dominion_types::{GameOutcome, PlayerId, PlayerOrders, TurnEvent};
use dominion_units::UnitError;
use tracing::{debug, info};

use crate::state::GameState;
use crate::{combat, movement, orders, outcome, settlement, supply};

/// Errors that can occur during turn execution.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// The outcome was already decided before this turn.
    #[error("game is over: {outcome:?}")]
    GameOver {
        /// The final outcome.
        outcome: GameOutcome,
    },

    /// A unit referenced state that does not exist.
    #[error("unit error: {source}")]
    Unit {
        /// The underlying unit error.
        #[from]
        source: UnitError,
    },
}

/// Summary of a single turn's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// The turn number that was executed.
    pub turn: u64,
    /// Every state change, in the order it happened.
    pub events: Vec<TurnEvent>,
    /// Players defeated during this turn's supply phase.
    pub defeated: Vec<PlayerId>,
    /// Whether combat and settlement were skipped.
    pub combat_skipped: bool,
    /// Outcome after this turn.
    pub outcome: GameOutcome,
}

/// Execute one complete turn.
///
/// `orders` maps player ids to their batch for this turn; players without
/// an entry simply issue nothing.
///
/// # Errors
///
/// Returns [`TurnError::GameOver`] if the game has already ended, or
/// [`TurnError::Unit`] if the arena is inconsistent. In both cases `state`
/// is left exactly as it was.
pub fn run_turn(
    state: &mut GameState,
    orders: &BTreeMap<PlayerId, PlayerOrders>,
) -> Result<TurnReport, TurnError> {
    if state.outcome.is_over() {
        return Err(TurnError::GameOver {
            outcome: state.outcome.clone(),
        });
    }

    let mut work = state.clone();
    work.turn = work.turn.saturating_add(1);
    let turn = work.turn;
    let mut events = Vec::new();
    info!(turn, "Turn started");

    // --- Phase 0: Orders ---
    orders::apply_orders(&mut work, orders, &mut events);

    // --- Phase 1: Movement ---
    movement::phase_movement(&mut work, &mut events)?;

    // --- Phase 2: Supply ---
    let defeated = supply::phase_supply(&mut work, &mut events);

    // --- Phases 3 & 4: Combat and settlement ---
    let combat_skipped = work.rules.freeze_combat_on_defeat && !defeated.is_empty();
    if combat_skipped {
        debug!(turn, defeated = defeated.len(), "Combat frozen by defeat this turn");
        events.push(TurnEvent::CombatSkipped);
    } else {
        combat::phase_combat(&mut work, &mut events);
        settlement::phase_settlement(&mut work, &mut events);
    }

    // --- Phase 5: Termination ---
    let outcome = outcome::evaluate(&work);
    work.outcome = outcome.clone();
    if outcome.is_over() {
        info!(turn, ?outcome, "Game ended");
        events.push(TurnEvent::GameEnded {
            outcome: outcome.clone(),
        });
    }

    info!(
        turn,
        events = events.len(),
        defeated = defeated.len(),
        troops = work.troops.len(),
        "Turn complete"
    );

    *state = work;

    Ok(TurnReport {
        turn,
        events,
        defeated,
        combat_skipped,
        outcome,
    })
}
