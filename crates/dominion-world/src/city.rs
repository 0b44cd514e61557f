//! City node state: population, ownership, and garrison.
//!
//! A [`City`] holds only ids. Garrisoned troops live in the game state's troop
//! table; the city records which of them are parked here and in what order
//! (garrison order decides who absorbs damage first).

use dominion_types::{CityId, PlayerId, TroopId};

/// Mutable runtime state for a city in the map graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    /// City identifier.
    pub id: CityId,
    /// Neutral defense strength and raw recruitable resource.
    pub population: u32,
    /// Current owner, or `None` when neutral.
    pub owner: Option<PlayerId>,
    /// The player whose base this city is.
    pub base_of: Option<PlayerId>,
    /// Garrisoned troops, in arrival order.
    pub garrison: Vec<TroopId>,
}

impl City {
    /// Create a neutral, ungarrisoned city.
    pub const fn new(id: CityId, population: u32) -> Self {
        Self {
            id,
            population,
            owner: None,
            base_of: None,
            garrison: Vec::new(),
        }
    }

    /// Whether the city is owned by `player`.
    pub fn is_owned_by(&self, player: &PlayerId) -> bool {
        self.owner.as_ref() == Some(player)
    }

    /// Whether this is `player`'s base, regardless of who holds it now.
    pub fn is_base_of(&self, player: &PlayerId) -> bool {
        self.base_of.as_ref() == Some(player)
    }

    /// Whether this city is any player's base.
    pub const fn is_base(&self) -> bool {
        self.base_of.is_some()
    }

    /// Whether `player` may treat this city as friendly ground.
    pub fn is_friendly_to(&self, player: &PlayerId) -> bool {
        self.is_owned_by(player) || self.is_base_of(player)
    }

    /// Append a troop to the garrison.
    pub fn station(&mut self, troop: TroopId) {
        if !self.garrison.contains(&troop) {
            self.garrison.push(troop);
        }
    }

    /// Remove a troop from the garrison. Returns whether it was present.
    pub fn unstation(&mut self, troop: &TroopId) -> bool {
        let before = self.garrison.len();
        self.garrison.retain(|t| t != troop);
        self.garrison.len() != before
    }

    /// Revert to neutral and hand back the garrison that was lost with it.
    pub fn neutralize(&mut self) -> Vec<TroopId> {
        self.owner = None;
        std::mem::take(&mut self.garrison)
    }

    /// Remove up to `amount` population, returning how much was taken.
    pub fn take_population(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.population);
        self.population = self.population.saturating_sub(taken);
        taken
    }

    /// Add population (cargo deliveries, tolls, seized cargo).
    pub const fn add_population(&mut self, amount: u32) {
        self.population = self.population.saturating_add(amount);
    }
}
