//! Game engine binary for Dominion.
//!
//! Wires configuration, the map, the players, and an order source together
//! and runs a match until it is decided.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `dominion-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Load the map file, or build the demo map
//! 4. Register players and set up the game state
//! 5. Pick the order source (scripted or idle)
//! 6. Run the game loop, writing snapshots if configured
//! 7. Log the result

mod error;
mod snapshot_callback;

use std::path::Path;

use dominion_core::config::GameConfig;
use dominion_core::decision::{IdleOrderSource, OrderSource, ScriptedOrderSource};
use dominion_core::runner::{self, NoOpCallback, TurnCallback};
use dominion_core::GameState;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::snapshot_callback::SnapshotCallback;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the game itself fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        game_name = config.game.name,
        max_turns = config.game.max_turns,
        players = config.players.len(),
        "dominion-engine starting"
    );

    // 3. Load the map.
    let graph = match &config.game.map_path {
        Some(path) => {
            info!(path = %path.display(), "Loading map");
            dominion_world::load_world(path)?
        }
        None => {
            info!("No map configured, using the demo map");
            dominion_world::demo_world()?
        }
    };

    // 4. Set up the game.
    let mut state = GameState::new(
        graph,
        &config.players,
        config.rules.to_rules(),
        config.game.max_turns,
    )
    .map_err(EngineError::from)?;
    info!(game_id = %state.game_id, "Game state initialized");

    // 5. Pick the order source.
    let mut source = order_source(&config)?;

    // 6. Run the game.
    let mut callback: Box<dyn TurnCallback> = match &config.logging.snapshot_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Writing turn snapshots");
            Box::new(SnapshotCallback::create(dir).map_err(EngineError::from)?)
        }
        None => Box::new(NoOpCallback),
    };
    let result = runner::run_game(&mut state, source.as_mut(), callback.as_mut())
        .map_err(EngineError::from)?;

    // 7. Log results.
    runner::log_game_end(&result);
    info!(
        outcome = ?result.outcome,
        total_turns = result.total_turns,
        "dominion-engine shutdown complete"
    );

    Ok(())
}

/// Load the game configuration from `dominion-config.yaml`.
///
/// Looks for the config file relative to the current working directory.
/// Environment overrides apply in both cases.
fn load_config() -> Result<GameConfig, EngineError> {
    let config_path = Path::new("dominion-config.yaml");
    if config_path.exists() {
        Ok(GameConfig::from_file(config_path)?)
    } else {
        Ok(GameConfig::parse("")?)
    }
}

/// Replay the configured order script, or issue nothing at all.
fn order_source(config: &GameConfig) -> Result<Box<dyn OrderSource>, EngineError> {
    match &config.game.orders_path {
        Some(path) => {
            let source = ScriptedOrderSource::from_file(path)?;
            info!(
                path = %path.display(),
                scripted_turns = source.remaining_turns(),
                "Scripted order source loaded"
            );
            Ok(Box::new(source))
        }
        None => {
            info!("No order script configured, players stay idle");
            Ok(Box::new(IdleOrderSource::new()))
        }
    }
}
