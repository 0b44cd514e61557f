//! Phase 2: supply lines, upkeep, and bankruptcy.
//!
//! For each surviving player the supply tree is grown from the base over the
//! player's territory. Owned cities the tree does not reach revert to
//! neutral and their garrisons are lost. Upkeep for the tree is charged to
//! the reserve; a reserve at or below zero defeats the player.

use dominion_types::{DefeatCause, LossCause, PlayerId, TurnEvent};
use dominion_world::supply_tree;
use tracing::{info, warn};

use crate::state::GameState;

/// Run the supply phase for every surviving player.
///
/// Returns the players defeated this phase, in registration order.
pub fn phase_supply(state: &mut GameState, events: &mut Vec<TurnEvent>) -> Vec<PlayerId> {
    let mut defeated = Vec::new();

    for idx in 0..state.players.len() {
        let Some(player) = state.players.get(idx) else {
            continue;
        };
        if player.defeated {
            continue;
        }
        let player_id = player.id.clone();
        let base = player.base.clone();

        let owned = state.graph.cities_owned_by(&player_id);
        let tree = supply_tree(&state.graph, &base, &owned);

        let isolated: Vec<_> = tree.isolated(&owned).cloned().collect();
        for city_id in isolated {
            let lost = state
                .graph
                .city_mut(&city_id)
                .map(dominion_world::City::neutralize)
                .unwrap_or_default();
            warn!(player = %player_id, city = %city_id, garrison_lost = lost.len(), "City cut off from supply");
            for troop_id in &lost {
                state.remove_troop(troop_id, LossCause::Isolated, events);
            }
            events.push(TurnEvent::CityIsolated {
                player: player_id.clone(),
                city: city_id,
            });
        }

        let upkeep = tree.upkeep(state.rules.upkeep_divisor);
        let Some(player) = state.players.get_mut(idx) else {
            continue;
        };
        player.reserve = player.reserve.saturating_sub(upkeep);
        events.push(TurnEvent::UpkeepCharged {
            player: player_id.clone(),
            tree_weight: tree.weight,
            upkeep,
            reserve: player.reserve,
        });

        if player.reserve.is_sign_negative() || player.reserve.is_zero() {
            defeat_player(state, idx, DefeatCause::Bankruptcy, events);
            defeated.push(player_id);
        }
    }

    defeated
}

/// Eliminate a player: territory reverts to neutral, every troop is lost,
/// and the transport is abandoned with its cargo.
pub fn defeat_player(
    state: &mut GameState,
    idx: usize,
    cause: DefeatCause,
    events: &mut Vec<TurnEvent>,
) {
    let Some(player) = state.players.get(idx) else {
        return;
    };
    let player_id = player.id.clone();
    let roster = player.roster.clone();

    let owned = state.graph.cities_owned_by(&player_id);
    for city_id in &owned {
        let lost = state
            .graph
            .city_mut(city_id)
            .map(dominion_world::City::neutralize)
            .unwrap_or_default();
        for troop_id in &lost {
            state.remove_troop(troop_id, LossCause::OwnerDefeated, events);
        }
    }
    for troop_id in &roster {
        state.remove_troop(troop_id, LossCause::OwnerDefeated, events);
    }

    let Some(player) = state.players.get_mut(idx) else {
        return;
    };
    let cargo_lost = player.transport.abandon();
    player.roster.clear();
    player.defeated = true;

    info!(
        player = %player_id,
        ?cause,
        cities_lost = owned.len(),
        troops_lost = roster.len(),
        cargo_lost,
        "Player defeated"
    );
    events.push(TurnEvent::PlayerDefeated {
        player: player_id,
        cause,
    });
}
