//! The game-state arena and game setup.
//!
//! All entities live in central tables keyed by id. Relationships are id
//! lookups, never embedded references:
//!
//! - every troop, active or garrisoned, is in [`GameState::troops`];
//! - a player's [`Player::roster`] lists its active (non-garrisoned) troops;
//! - a city's `garrison` lists the troops parked there.
//!
//! A troop id appears in exactly one of a roster or a garrison. Removing a
//! troop goes through [`GameState::remove_troop`], which clears all three.

use std::collections::{BTreeMap, BTreeSet};

use dominion_types::{CityId, GameId, GameOutcome, LossCause, PlayerId, TroopId, TurnEvent};
use dominion_units::{Transport, TransportRules, Troop};
use dominion_world::{CityGraph, DEFAULT_UPKEEP_DIVISOR};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

/// Errors raised while setting up a game.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// No players were registered.
    #[error("a game needs at least one player")]
    NoPlayers,

    /// Two players share an id.
    #[error("duplicate player id: {0}")]
    DuplicatePlayer(PlayerId),

    /// A player's base is not on the map.
    #[error("base {base} of player {player} is not on the map")]
    UnknownBase {
        /// The player.
        player: PlayerId,
        /// The missing base city.
        base: CityId,
    },

    /// Two players were given the same base.
    #[error("city {base} is already the base of {owner}")]
    SharedBase {
        /// The contested city.
        base: CityId,
        /// The player registered first.
        owner: PlayerId,
    },
}

/// A player as registered at setup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerSetup {
    /// Player id.
    pub id: PlayerId,
    /// Base city id.
    pub base: CityId,
}

impl PlayerSetup {
    /// Create a registration entry.
    pub fn new(id: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(id),
            base: CityId::new(base),
        }
    }
}

/// Rule tunables used during a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    /// Reserve each player starts with.
    pub starting_reserve: Decimal,
    /// Upkeep is supply-tree weight divided by this.
    pub upkeep_divisor: u32,
    /// Transport toll and respawn settings.
    pub transport: TransportRules,
    /// Attack strength against a base is divided by this.
    pub base_assault_divisor: u32,
    /// Skip combat for everyone on a turn in which someone was defeated.
    pub freeze_combat_on_defeat: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_reserve: Decimal::ONE_HUNDRED,
            upkeep_divisor: DEFAULT_UPKEEP_DIVISOR,
            transport: TransportRules::default(),
            base_assault_divisor: 2,
            freeze_combat_on_defeat: false,
        }
    }
}

/// A player's runtime record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Player id.
    pub id: PlayerId,
    /// Base city.
    pub base: CityId,
    /// Strength pool at the base.
    pub reserve: Decimal,
    /// Active (non-garrisoned) troops in roster order.
    pub roster: Vec<TroopId>,
    /// The player's single transport.
    pub transport: Transport,
    /// Whether the player has been eliminated.
    pub defeated: bool,
}

/// Complete mutable state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Identifier stamped on snapshots.
    pub game_id: GameId,
    /// Last completed turn; 0 before the first turn.
    pub turn: u64,
    /// Turn limit.
    pub max_turns: u64,
    /// The map, including city ownership and garrisons.
    pub graph: CityGraph,
    /// Players in registration order.
    pub players: Vec<Player>,
    /// Every troop in play, active or garrisoned.
    pub troops: BTreeMap<TroopId, Troop>,
    /// Rule tunables.
    pub rules: Rules,
    /// Result of the last termination check.
    pub outcome: GameOutcome,
}

impl GameState {
    /// Set up a new game on `graph`.
    ///
    /// Each base is marked as its player's base and owned by that player.
    /// Players start with the configured reserve and an idle transport at
    /// the base.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if there are no players, an id repeats, or a
    /// base is missing or shared.
    pub fn new(
        mut graph: CityGraph,
        setup: &[PlayerSetup],
        rules: Rules,
        max_turns: u64,
    ) -> Result<Self, SetupError> {
        if setup.is_empty() {
            return Err(SetupError::NoPlayers);
        }

        let mut seen = BTreeSet::new();
        let mut players = Vec::with_capacity(setup.len());
        for entry in setup {
            if !seen.insert(entry.id.clone()) {
                return Err(SetupError::DuplicatePlayer(entry.id.clone()));
            }
            let city = graph.city_mut(&entry.base).ok_or_else(|| SetupError::UnknownBase {
                player: entry.id.clone(),
                base: entry.base.clone(),
            })?;
            if let Some(owner) = &city.base_of {
                return Err(SetupError::SharedBase {
                    base: entry.base.clone(),
                    owner: owner.clone(),
                });
            }
            city.base_of = Some(entry.id.clone());
            city.owner = Some(entry.id.clone());

            players.push(Player {
                id: entry.id.clone(),
                base: entry.base.clone(),
                reserve: rules.starting_reserve,
                roster: Vec::new(),
                transport: Transport::new(entry.id.clone(), entry.base.clone()),
                defeated: false,
            });
        }

        let game_id = GameId::new();
        info!(
            game_id = %game_id,
            players = players.len(),
            cities = graph.city_count(),
            max_turns,
            "Game set up"
        );

        Ok(Self {
            game_id,
            turn: 0,
            max_turns,
            graph,
            players,
            troops: BTreeMap::new(),
            rules,
            outcome: GameOutcome::InProgress,
        })
    }

    /// Look up a player by id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *id)
    }

    /// Position of a player in registration order.
    pub fn player_index(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == *id)
    }

    /// Players still in the game, in registration order.
    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.defeated)
    }

    /// Remove a troop from play: the troop table, its owner's roster, and
    /// any garrison it was parked in.
    pub fn remove_troop(
        &mut self,
        id: &TroopId,
        cause: LossCause,
        events: &mut Vec<TurnEvent>,
    ) -> Option<Troop> {
        let troop = self.troops.remove(id)?;
        if let Some(player) = self.players.iter_mut().find(|p| p.id == troop.owner) {
            player.roster.retain(|t| t != id);
        }
        if let Some(city) = self.graph.city_mut(&troop.location) {
            city.unstation(id);
        }
        debug!(troop = %id, player = %troop.owner, ?cause, "Troop lost");
        events.push(TurnEvent::TroopLost {
            troop: id.clone(),
            player: troop.owner.clone(),
            cause,
        });
        Some(troop)
    }

    /// Move an active troop into the garrison of `city`.
    pub fn station_troop(&mut self, player_idx: usize, id: &TroopId, city: &CityId) {
        if let Some(player) = self.players.get_mut(player_idx) {
            player.roster.retain(|t| t != id);
        }
        if let Some(target) = self.graph.city_mut(city) {
            target.station(id.clone());
        }
    }

    /// Sum of strengths of the troops garrisoned in `city`.
    pub fn garrison_strength(&self, city: &CityId) -> u32 {
        self.graph.city(city).map_or(0, |c| {
            c.garrison
                .iter()
                .filter_map(|id| self.troops.get(id))
                .fold(0_u32, |sum, t| sum.saturating_add(t.strength))
        })
    }
}
