//! Order source trait and its built-in implementations.
//!
//! Before each turn the runner shows every player the current
//! [`GameSnapshot`] and collects an order batch in response. The
//! [`OrderSource`] trait abstracts where those batches come from -- a bot,
//! a command parser fed by humans, a replay script, or a test stub.
//!
//! Two implementations ship with the engine:
//!
//! - [`IdleOrderSource`] never issues anything, so troops hold position.
//! - [`ScriptedOrderSource`] replays a fixed per-turn script.

use std::collections::BTreeMap;
use std::path::Path;

use dominion_types::{GameSnapshot, PlayerId, PlayerOrders};
use serde::Deserialize;
use tracing::debug;

/// Errors that can occur while collecting orders.
#[derive(Debug, thiserror::Error)]
pub enum OrderSourceError {
    /// Failed to read an order script from disk.
    #[error("failed to read order script: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The order script is not valid JSON for the expected shape.
    #[error("failed to parse order script: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// An internal error in the order source.
    #[error("order source error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

/// A source of per-turn player orders.
///
/// The runner calls [`collect_orders`] once per turn, before the turn runs.
///
/// [`collect_orders`]: OrderSource::collect_orders
pub trait OrderSource {
    /// Collect the order batches for `turn`.
    ///
    /// Players missing from the returned map issue nothing this turn.
    ///
    /// # Errors
    ///
    /// Returns [`OrderSourceError`] if orders cannot be produced at all.
    /// A single player's bad orders should instead be returned as-is and
    /// left for the engine to reject.
    fn collect_orders(
        &mut self,
        turn: u64,
        snapshot: &GameSnapshot,
    ) -> Result<BTreeMap<PlayerId, PlayerOrders>, OrderSourceError>;
}

/// An order source that never issues anything.
#[derive(Debug, Clone, Default)]
pub struct IdleOrderSource;

impl IdleOrderSource {
    /// Create a new idle order source.
    pub const fn new() -> Self {
        Self
    }
}

impl OrderSource for IdleOrderSource {
    fn collect_orders(
        &mut self,
        _turn: u64,
        _snapshot: &GameSnapshot,
    ) -> Result<BTreeMap<PlayerId, PlayerOrders>, OrderSourceError> {
        Ok(BTreeMap::new())
    }
}

/// A per-turn order script: turn number to player batches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct OrderScript(pub BTreeMap<u64, BTreeMap<PlayerId, PlayerOrders>>);

/// An order source that replays an [`OrderScript`].
///
/// Turns absent from the script issue nothing. Each turn's entry is handed
/// out once.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOrderSource {
    script: OrderScript,
}

impl ScriptedOrderSource {
    /// Wrap an already-built script.
    pub const fn new(script: OrderScript) -> Self {
        Self { script }
    }

    /// Parse a script from JSON of the form
    /// `{ "<turn>": { "<player>": { "new_troops": [...], "transport": ... } } }`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderSourceError::Json`] if the text does not match.
    pub fn parse(json: &str) -> Result<Self, OrderSourceError> {
        let script: OrderScript = serde_json::from_str(json)?;
        Ok(Self::new(script))
    }

    /// Load a script from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`OrderSourceError::Io`] if the file cannot be read, or
    /// [`OrderSourceError::Json`] if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self, OrderSourceError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Number of turns that still have scripted orders.
    pub fn remaining_turns(&self) -> usize {
        self.script.0.len()
    }
}

impl OrderSource for ScriptedOrderSource {
    fn collect_orders(
        &mut self,
        turn: u64,
        _snapshot: &GameSnapshot,
    ) -> Result<BTreeMap<PlayerId, PlayerOrders>, OrderSourceError> {
        let orders = self.script.0.remove(&turn).unwrap_or_default();
        debug!(turn, players = orders.len(), "Scripted orders issued");
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use dominion_types::{CargoQuantity, CityId, GameId, GameOutcome, TroopCommand, TroopId};

    use super::*;

    fn empty_snapshot() -> GameSnapshot {
        GameSnapshot {
            game_id: GameId::new(),
            turn: 0,
            max_turns: 10,
            cities: Vec::new(),
            edges: Vec::new(),
            players: Vec::new(),
            troops: Vec::new(),
            transports: Vec::new(),
            outcome: GameOutcome::InProgress,
        }
    }

    const SCRIPT: &str = r#"{
        "1": {
            "j0": {
                "new_troops": [
                    { "id": "t1", "strength": 40, "commands": [
                        { "type": "attack", "target": "west_farms" },
                        { "type": "hold" }
                    ] }
                ],
                "transport": { "source": "west_farms", "destination": "base_j0", "quantity": "max" }
            }
        },
        "3": { "j1": { "new_troops": [] } }
    }"#;

    #[test]
    fn idle_source_issues_nothing() {
        let mut source = IdleOrderSource::new();
        let orders = source.collect_orders(1, &empty_snapshot());
        assert!(orders.is_ok_and(|o| o.is_empty()));
    }

    #[test]
    fn script_parses_and_replays_by_turn() {
        let source = ScriptedOrderSource::parse(SCRIPT);
        assert!(source.is_ok(), "{source:?}");
        let Ok(mut source) = source else { return };
        assert_eq!(source.remaining_turns(), 2);

        let turn1 = source.collect_orders(1, &empty_snapshot()).unwrap_or_default();
        let j0 = turn1.get(&PlayerId::new("j0"));
        assert_eq!(j0.map(|o| o.new_troops.len()), Some(1));
        let troop = j0.and_then(|o| o.new_troops.first());
        assert_eq!(troop.map(|t| t.id.clone()), Some(TroopId::new("t1")));
        assert_eq!(troop.map(|t| t.commands.clone()), Some(vec![
            TroopCommand::Attack {
                target: CityId::new("west_farms"),
            },
            TroopCommand::Hold,
        ]));
        let mission = j0.and_then(|o| o.transport.clone());
        assert_eq!(mission.map(|m| m.quantity), Some(CargoQuantity::Max));

        let turn2 = source.collect_orders(2, &empty_snapshot()).unwrap_or_default();
        assert!(turn2.is_empty());

        // Entries are consumed once.
        let again = source.collect_orders(1, &empty_snapshot()).unwrap_or_default();
        assert!(again.is_empty());
        assert_eq!(source.remaining_turns(), 1);
    }

    #[test]
    fn malformed_script_is_reported() {
        let result = ScriptedOrderSource::parse(r#"{ "one": {} }"#);
        assert!(matches!(result, Err(OrderSourceError::Json { .. })));
    }

    #[test]
    fn missing_script_file_is_reported() {
        let result = ScriptedOrderSource::from_file(Path::new("/definitely/not/orders.json"));
        assert!(matches!(result, Err(OrderSourceError::Io { .. })));
    }
}
