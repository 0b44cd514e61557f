//! Phase 5: the termination check.
//!
//! [`evaluate`] is a pure function of the game state, so it can be asked at
//! any time and repeated without changing anything.

use dominion_types::{DrawReason, GameOutcome, VictoryReason};

use crate::state::GameState;

/// Decide whether the game is over.
///
/// - No survivors: draw.
/// - One survivor: that player wins by elimination.
/// - Turn limit reached: the survivor owning the most cities wins; a shared
///   lead, or nobody owning anything, is a draw.
pub fn evaluate(state: &GameState) -> GameOutcome {
    let alive: Vec<_> = state.alive_players().collect();

    match alive.as_slice() {
        [] => {
            return GameOutcome::Draw {
                reason: DrawReason::AllEliminated,
            };
        }
        [winner] => {
            return GameOutcome::Winner {
                player: winner.id.clone(),
                reason: VictoryReason::Elimination,
            };
        }
        _ => {}
    }

    if state.turn < state.max_turns {
        return GameOutcome::InProgress;
    }

    let counts: Vec<_> = alive
        .iter()
        .map(|p| (p, state.graph.cities_owned_by(&p.id).len()))
        .collect();
    let best = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
    if best == 0 {
        return GameOutcome::Draw {
            reason: DrawReason::NoCitiesOwned,
        };
    }

    let mut leaders = counts.iter().filter(|(_, n)| *n == best);
    match (leaders.next(), leaders.next()) {
        (Some((winner, _)), None) => GameOutcome::Winner {
            player: winner.id.clone(),
            reason: VictoryReason::CityCount,
        },
        _ => GameOutcome::Draw {
            reason: DrawReason::TiedCityCount,
        },
    }
}
