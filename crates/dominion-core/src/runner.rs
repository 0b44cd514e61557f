//! Game loop runner.
//!
//! [`run_game`] drives [`run_turn`] until the outcome is decided: it shows
//! the order source a snapshot, collects the batch, runs the turn, and hands
//! the report to a [`TurnCallback`]. The turn limit guarantees the loop
//! ends.
//!
//! [`run_turn`]: crate::turn::run_turn

use tracing::{info, warn};

use dominion_types::GameOutcome;

use crate::decision::{OrderSource, OrderSourceError};
use crate::snapshot::snapshot;
use crate::state::GameState;
use crate::turn::{self, TurnError, TurnReport};

/// Errors that can occur during a game run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A turn execution failed.
    #[error("turn error: {source}")]
    Turn {
        /// The underlying turn error.
        #[from]
        source: TurnError,
    },

    /// The order source could not produce orders.
    #[error("order source error: {source}")]
    Orders {
        /// The underlying order source error.
        #[from]
        source: OrderSourceError,
    },
}

/// Result of a game run.
#[derive(Debug)]
pub struct GameResult {
    /// How the game ended.
    pub outcome: GameOutcome,
    /// The last turn report, if any turn ran.
    pub final_report: Option<TurnReport>,
    /// Number of turns executed by this run.
    pub total_turns: u64,
}

/// Callback invoked after each turn completes.
///
/// Implementations can write snapshots, stream events to a viewer, and so
/// on.
pub trait TurnCallback {
    /// Called after a turn completes successfully.
    fn on_turn(&mut self, report: &TurnReport, state: &GameState);
}

/// A no-op turn callback.
pub struct NoOpCallback;

impl TurnCallback for NoOpCallback {
    fn on_turn(&mut self, _report: &TurnReport, _state: &GameState) {}
}

/// Run the game until it is over.
///
/// A game that is already decided returns immediately with zero turns.
///
/// # Errors
///
/// Returns [`RunnerError`] if the order source fails or a turn cannot be
/// executed. Turns completed before the failure stay applied to `state`.
pub fn run_game(
    state: &mut GameState,
    source: &mut dyn OrderSource,
    callback: &mut dyn TurnCallback,
) -> Result<GameResult, RunnerError> {
    let mut last_report: Option<TurnReport> = None;
    let mut total_turns: u64 = 0;

    info!(
        game_id = %state.game_id,
        players = state.players.len(),
        cities = state.graph.city_count(),
        max_turns = state.max_turns,
        "Game starting"
    );

    while !state.outcome.is_over() {
        let next_turn = state.turn.saturating_add(1);
        let view = snapshot(state);
        let orders = source.collect_orders(next_turn, &view)?;

        let report = turn::run_turn(state, &orders)?;
        total_turns = total_turns.saturating_add(1);

        callback.on_turn(&report, state);
        last_report = Some(report);
    }

    Ok(GameResult {
        outcome: state.outcome.clone(),
        final_report: last_report,
        total_turns,
    })
}

/// Log the end of a game run.
pub fn log_game_end(result: &GameResult) {
    info!(
        outcome = ?result.outcome,
        total_turns = result.total_turns,
        final_turn = result.final_report.as_ref().map(|r| r.turn),
        "Game ended"
    );

    if let Some(ref report) = result.final_report {
        info!(
            turn = report.turn,
            events = report.events.len(),
            defeated = report.defeated.len(),
            "Final turn report"
        );
    } else {
        warn!("Game ended with no turns executed");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use dominion_types::{
        CityId, DrawReason, GameSnapshot, PlayerId, PlayerOrders, TroopCommand, TroopId,
        TroopOrder, VictoryReason,
    };
    use dominion_world::demo_world;

    use super::*;
    use crate::decision::{IdleOrderSource, ScriptedOrderSource};
    use crate::state::{PlayerSetup, Rules};

    fn make_state(max_turns: u64) -> Option<GameState> {
        let setup = [PlayerSetup::new("j0", "base_j0"), PlayerSetup::new("j1", "base_j1")];
        GameState::new(demo_world().ok()?, &setup, Rules::default(), max_turns).ok()
    }

    struct CountCallback {
        count: u64,
    }

    impl TurnCallback for CountCallback {
        fn on_turn(&mut self, _report: &TurnReport, _state: &GameState) {
            self.count = self.count.saturating_add(1);
        }
    }

    #[test]
    fn idle_game_runs_to_the_turn_limit() {
        let Some(mut state) = make_state(5) else { return };
        let mut cb = CountCallback { count: 0 };
        let result = run_game(&mut state, &mut IdleOrderSource::new(), &mut cb);
        assert!(result.is_ok());
        let Ok(result) = result else { return };

        assert_eq!(result.total_turns, 5);
        assert_eq!(cb.count, 5);
        assert_eq!(state.turn, 5);
        assert_eq!(result.outcome, GameOutcome::Draw {
            reason: DrawReason::TiedCityCount,
        });
        assert_eq!(result.final_report.map(|r| r.turn), Some(5));
    }

    #[test]
    fn decided_game_runs_no_turns() {
        let Some(mut state) = make_state(5) else { return };
        state.outcome = GameOutcome::Draw {
            reason: DrawReason::AllEliminated,
        };
        let result = run_game(&mut state, &mut IdleOrderSource::new(), &mut NoOpCallback);
        assert!(result.is_ok_and(|r| r.total_turns == 0 && r.final_report.is_none()));
        assert_eq!(state.turn, 0);
    }

    #[test]
    fn scripted_capture_wins_on_city_count() {
        let Some(mut state) = make_state(3) else { return };
        let mut turn1 = BTreeMap::new();
        turn1.insert(PlayerId::new("j0"), PlayerOrders {
            new_troops: vec![TroopOrder {
                id: TroopId::new("t1"),
                strength: 60,
                commands: vec![
                    TroopCommand::Attack {
                        target: CityId::new("west_farms"),
                    },
                    TroopCommand::Hold,
                ],
            }],
            transport: None,
        });
        let mut script = BTreeMap::new();
        script.insert(1, turn1);
        let mut source = ScriptedOrderSource::new(crate::decision::OrderScript(script));

        let result = run_game(&mut state, &mut source, &mut NoOpCallback);
        assert!(result.is_ok());
        let Ok(result) = result else { return };
        assert_eq!(result.total_turns, 3);
        assert_eq!(result.outcome, GameOutcome::Winner {
            player: PlayerId::new("j0"),
            reason: VictoryReason::CityCount,
        });
        let farms = state.graph.city(&CityId::new("west_farms"));
        assert_eq!(farms.map(|c| c.garrison.clone()), Some(vec![TroopId::new("t1")]));
    }

    #[test]
    fn order_source_failure_stops_the_run() {
        struct Broken;
        impl OrderSource for Broken {
            fn collect_orders(
                &mut self,
                _turn: u64,
                _snapshot: &GameSnapshot,
            ) -> Result<BTreeMap<PlayerId, PlayerOrders>, OrderSourceError> {
                Err(OrderSourceError::Internal {
                    message: String::from("offline"),
                })
            }
        }

        let Some(mut state) = make_state(5) else { return };
        let result = run_game(&mut state, &mut Broken, &mut NoOpCallback);
        assert!(matches!(result, Err(RunnerError::Orders { .. })));
        assert_eq!(state.turn, 0);
    }
}
