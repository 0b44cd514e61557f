//! Read-only, serializable views of the game state.
//!
//! A [`GameSnapshot`] is what collaborators (bots, the visualizer, the
//! snapshot writer) see. It is rebuilt from the arena on demand and shares
//! nothing with it.

use dominion_types::{
    CitySnapshot, EdgeSnapshot, GameSnapshot, PlayerSnapshot, TransportSnapshot, TroopSnapshot,
};

use crate::state::GameState;

/// Build a snapshot of the current state.
///
/// Cities, edges, and troops are listed in id order; players in
/// registration order.
pub fn snapshot(state: &GameState) -> GameSnapshot {
    let cities = state
        .graph
        .cities()
        .map(|c| CitySnapshot {
            id: c.id.clone(),
            owner: c.owner.clone(),
            population: c.population,
            base_of: c.base_of.clone(),
            garrison: c.garrison.clone(),
        })
        .collect();

    let edges = state
        .graph
        .edges()
        .map(|e| EdgeSnapshot {
            a: e.key.a.clone(),
            b: e.key.b.clone(),
            weight: e.weight,
        })
        .collect();

    let players = state
        .players
        .iter()
        .map(|p| PlayerSnapshot {
            id: p.id.clone(),
            base: p.base.clone(),
            reserve: p.reserve,
            cities: state.graph.cities_owned_by(&p.id).into_iter().collect(),
            defeated: p.defeated,
        })
        .collect();

    let troops = state
        .troops
        .values()
        .map(|t| TroopSnapshot {
            id: t.id.clone(),
            owner: t.owner.clone(),
            strength: t.strength,
            location: t.location.clone(),
            state: t.state,
            pending_commands: t.commands.iter().cloned().collect(),
        })
        .collect();

    let transports = state
        .players
        .iter()
        .map(|p| TransportSnapshot {
            owner: p.id.clone(),
            location: p.transport.location.clone(),
            cargo: p.transport.cargo,
            state: p.transport.state,
            respawn_in: p.transport.respawn_in,
            path: p.transport.path.iter().cloned().collect(),
            queued_commands: p.transport.commands.len(),
        })
        .collect();

    GameSnapshot {
        game_id: state.game_id,
        turn: state.turn,
        max_turns: state.max_turns,
        cities,
        edges,
        players,
        troops,
        transports,
        outcome: state.outcome.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use dominion_types::{CityId, GameOutcome, PlayerId, TransportState};
    use dominion_world::demo_world;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::state::{PlayerSetup, Rules};

    fn make_state() -> Option<GameState> {
        let setup = [PlayerSetup::new("j0", "base_j0"), PlayerSetup::new("j1", "base_j1")];
        GameState::new(demo_world().ok()?, &setup, Rules::default(), 20).ok()
    }

    #[test]
    fn snapshot_reflects_setup() {
        let Some(state) = make_state() else { return };
        let snap = snapshot(&state);

        assert_eq!(snap.game_id, state.game_id);
        assert_eq!(snap.turn, 0);
        assert_eq!(snap.max_turns, 20);
        assert_eq!(snap.cities.len(), 9);
        assert_eq!(snap.edges.len(), 10);
        assert_eq!(snap.players.len(), 2);
        assert_eq!(snap.players[0].reserve, dec!(100));
        assert_eq!(snap.players[1].cities, vec![CityId::new("base_j1")]);
        assert_eq!(snap.transports[0].state, TransportState::Idle);
        assert_eq!(snap.outcome, GameOutcome::InProgress);
        assert!(snap.troops.is_empty());
        let base = snap.cities.iter().find(|c| c.id == CityId::new("base_j0"));
        assert_eq!(base.and_then(|c| c.base_of.clone()), Some(PlayerId::new("j0")));
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let Some(state) = make_state() else { return };
        let json = serde_json::to_value(snapshot(&state)).ok();
        let reserve = json
            .as_ref()
            .and_then(|v| v.pointer("/players/0/reserve"))
            .and_then(|v| v.as_str().map(str::to_owned));
        assert_eq!(reserve.as_deref(), Some("100"));
        let status = json
            .as_ref()
            .and_then(|v| v.pointer("/outcome/status"))
            .and_then(|v| v.as_str().map(str::to_owned));
        assert_eq!(status.as_deref(), Some("in_progress"));
    }
}
