//! Phase 1: unit movement and command processing.
//!
//! Every surviving player in registration order advances each active troop
//! in roster order, then its transport. Troops read the map; transports may
//! move population in and out of cities and add to the owner's reserve.

use dominion_types::TurnEvent;
use dominion_units::{TransportContext, TroopAction, TroopContext, UnitError};

use crate::state::GameState;

/// Advance every unit of every surviving player by one turn.
///
/// # Errors
///
/// Returns [`UnitError`] if a unit references a city missing from the map.
pub fn phase_movement(state: &mut GameState, events: &mut Vec<TurnEvent>) -> Result<(), UnitError> {
    for idx in 0..state.players.len() {
        let Some(player) = state.players.get(idx) else {
            continue;
        };
        if player.defeated {
            continue;
        }
        let base = player.base.clone();
        let roster = player.roster.clone();

        for troop_id in &roster {
            let Some(troop) = state.troops.get_mut(troop_id) else {
                continue;
            };
            let ctx = TroopContext {
                graph: &state.graph,
                base: &base,
            };
            let action = troop.advance(&ctx, events)?;
            if let TroopAction::Garrison(city) = action {
                state.station_troop(idx, troop_id, &city);
            }
        }

        let rules = state.rules.transport;
        let Some(player) = state.players.get_mut(idx) else {
            continue;
        };
        let mut ctx = TransportContext {
            graph: &mut state.graph,
            base: &player.base,
            reserve: &mut player.reserve,
            rules,
        };
        player.transport.advance(&mut ctx, events)?;
    }
    Ok(())
}
