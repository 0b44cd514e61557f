//! Phase 4: post-combat settlement.
//!
//! Every troop left `victorious` either garrisons the city it took (when its
//! next queued command is `HOLD`) or turns the win into a raid and withdraws
//! to its base, leaving the city unguarded.

use dominion_types::{TroopState, TurnEvent};
use dominion_units::{TroopAction, TroopContext};

use crate::state::GameState;

/// Settle every victorious troop of every surviving player.
pub fn phase_settlement(state: &mut GameState, events: &mut Vec<TurnEvent>) {
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
            if troop.state != TroopState::Victorious {
                continue;
            }
            let ctx = TroopContext {
                graph: &state.graph,
                base: &base,
            };
            let action = troop.settle_victory(&ctx, events);
            if let TroopAction::Garrison(city) = action {
                state.station_troop(idx, troop_id, &city);
            }
        }
    }
}
