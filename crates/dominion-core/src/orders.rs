//! Order intake: turning per-player order batches into troops and missions.
//!
//! Runs at the start of every turn, before any unit moves. Each request is
//! either applied in full or dropped with a rejection event; nothing is ever
//! partially applied.

use std::collections::BTreeMap;

use dominion_types::{
    MissionRejection, PlayerId, PlayerOrders, RecruitRejection, TransportMission, TransportState,
    TroopOrder, TurnEvent,
};
use dominion_units::Troop;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::state::GameState;

/// Apply every player's orders in registration order.
///
/// Orders addressed to unknown or defeated players are ignored.
pub fn apply_orders(
    state: &mut GameState,
    orders: &BTreeMap<PlayerId, PlayerOrders>,
    events: &mut Vec<TurnEvent>,
) {
    for player_id in orders.keys() {
        match state.player(player_id) {
            None => warn!(player = %player_id, "Orders for unknown player ignored"),
            Some(p) if p.defeated => warn!(player = %player_id, "Orders for defeated player ignored"),
            Some(_) => {}
        }
    }

    for idx in 0..state.players.len() {
        let Some(player) = state.players.get(idx) else {
            continue;
        };
        if player.defeated {
            continue;
        }
        let Some(batch) = orders.get(&player.id) else {
            continue;
        };

        for order in &batch.new_troops {
            recruit(state, idx, order, events);
        }
        if let Some(mission) = &batch.transport {
            assign_mission(state, idx, mission, events);
        }
    }
}

/// Raise a troop at the player's base if the reserve covers it.
fn recruit(state: &mut GameState, idx: usize, order: &TroopOrder, events: &mut Vec<TurnEvent>) {
    let id_taken = state.troops.contains_key(&order.id);
    let Some(player) = state.players.get_mut(idx) else {
        return;
    };
    let cost = Decimal::from(order.strength);

    let rejection = if order.strength == 0 {
        Some(RecruitRejection::ZeroStrength)
    } else if id_taken {
        Some(RecruitRejection::DuplicateId)
    } else if player.reserve < cost {
        Some(RecruitRejection::Unaffordable {
            requested: order.strength,
        })
    } else {
        None
    };

    if let Some(reason) = rejection {
        warn!(
            player = %player.id,
            troop = %order.id,
            strength = order.strength,
            reserve = %player.reserve,
            ?reason,
            "Troop request dropped"
        );
        events.push(TurnEvent::RecruitRejected {
            player: player.id.clone(),
            troop: order.id.clone(),
            reason,
        });
        return;
    }

    player.reserve = player.reserve.saturating_sub(cost);
    player.roster.push(order.id.clone());
    let troop = Troop::new(
        order.id.clone(),
        player.id.clone(),
        order.strength,
        player.base.clone(),
        order.commands.iter().cloned(),
    );
    debug!(player = %player.id, troop = %order.id, strength = order.strength, "Troop recruited");
    events.push(TurnEvent::TroopRecruited {
        player: player.id.clone(),
        troop: order.id.clone(),
        strength: order.strength,
    });
    state.troops.insert(order.id.clone(), troop);
}

/// Queue a transport mission if the transport is free and both cities exist.
fn assign_mission(
    state: &mut GameState,
    idx: usize,
    mission: &TransportMission,
    events: &mut Vec<TurnEvent>,
) {
    let cities_known =
        state.graph.contains_city(&mission.source) && state.graph.contains_city(&mission.destination);
    let Some(player) = state.players.get_mut(idx) else {
        return;
    };

    let rejection = if player.transport.state == TransportState::Destroyed {
        Some(MissionRejection::TransportDestroyed)
    } else if !player.transport.accepts_mission() {
        Some(MissionRejection::TransportBusy)
    } else if !cities_known {
        Some(MissionRejection::UnknownCity)
    } else {
        None
    };

    if let Some(reason) = rejection {
        warn!(player = %player.id, ?reason, "Transport mission refused");
        events.push(TurnEvent::MissionRejected {
            player: player.id.clone(),
            reason,
        });
        return;
    }

    player
        .transport
        .assign(mission.source.clone(), mission.destination.clone(), mission.quantity);
    events.push(TurnEvent::MissionAccepted {
        player: player.id.clone(),
        source: mission.source.clone(),
        destination: mission.destination.clone(),
    });
}
