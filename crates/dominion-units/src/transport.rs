//! The per-player logistics transport and its state machine.
//!
//! A transport shuttles population between cities. A mission is queued as
//! `[COLLECT q FROM x, DELIVER TO y]`; the transport walks to `x`, loads up
//! to `q` population, walks to `y` and unloads. Cargo delivered to the
//! owner's base becomes reserve one for one.
//!
//! Every step checks who holds the city being entered:
//!
//! | Destination | Effect |
//! |---|---|
//! | own (owned, or own base held by nobody) | relocate |
//! | neutral | relocate, pay the toll to the city, return home |
//! | enemy | cargo seized by the city, transport destroyed |
//!
//! A destroyed transport is never gone for good: it reappears idle at the
//! base after the respawn delay.

use std::collections::VecDeque;

use dominion_types::{CargoQuantity, CityId, PlayerId, TransportCommand, TransportState, TurnEvent};
use dominion_world::{City, CityGraph};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::UnitError;

/// Default share of cargo, in percent, kept by a neutral city as toll.
pub const DEFAULT_TOLL_PERCENT: u32 = 10;

/// Default number of turns a destroyed transport stays out of play.
pub const DEFAULT_RESPAWN_TURNS: u32 = 2;

/// Tunables for the transport state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportRules {
    /// Percent of cargo lost when entering a neutral city.
    pub toll_percent: u32,
    /// Turns before a destroyed transport respawns.
    pub respawn_turns: u32,
}

impl Default for TransportRules {
    fn default() -> Self {
        Self {
            toll_percent: DEFAULT_TOLL_PERCENT,
            respawn_turns: DEFAULT_RESPAWN_TURNS,
        }
    }
}

/// Everything a transport may read or change while advancing.
#[derive(Debug)]
pub struct TransportContext<'a> {
    /// The map. Population moves in and out of its cities.
    pub graph: &'a mut CityGraph,
    /// The owning player's base city.
    pub base: &'a CityId,
    /// The owning player's reserve.
    pub reserve: &'a mut Decimal,
    /// Toll and respawn settings.
    pub rules: TransportRules,
}

/// Who holds a city, from the transport owner's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ground {
    Own,
    Neutral,
    Enemy,
}

impl Ground {
    /// Classify `city` by its owner. The player's own base counts as own
    /// ground only while no other player holds it.
    fn of(city: &City, player: &PlayerId) -> Self {
        match &city.owner {
            Some(owner) if owner == player => Self::Own,
            Some(_) => Self::Enemy,
            None if city.is_base_of(player) => Self::Own,
            None => Self::Neutral,
        }
    }
}

/// A player's logistics transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transport {
    /// Owning player.
    pub owner: PlayerId,
    /// City the transport stands in.
    pub location: CityId,
    /// Population carried.
    pub cargo: u32,
    /// Mission commands not yet finished.
    pub commands: VecDeque<TransportCommand>,
    /// Quantity requested by the collect leg in progress.
    pub requested: CargoQuantity,
    /// Remaining steps of the current route, current city excluded.
    pub path: VecDeque<CityId>,
    /// State tag.
    pub state: TransportState,
    /// Turns left before respawning while `destroyed`.
    pub respawn_in: u32,
}

impl Transport {
    /// Create an idle, empty transport at the base.
    pub fn new(owner: PlayerId, base: CityId) -> Self {
        Self {
            owner,
            location: base,
            cargo: 0,
            commands: VecDeque::new(),
            requested: CargoQuantity::default(),
            path: VecDeque::new(),
            state: TransportState::Idle,
            respawn_in: 0,
        }
    }

    /// Whether a new mission may be queued.
    pub fn accepts_mission(&self) -> bool {
        self.state == TransportState::Idle && self.commands.is_empty()
    }

    /// Queue a collect-then-deliver mission.
    pub fn assign(&mut self, source: CityId, destination: CityId, quantity: CargoQuantity) {
        self.commands.push_back(TransportCommand::Collect { source, quantity });
        self.commands.push_back(TransportCommand::Deliver { destination });
    }

    /// Drop the mission and cargo. Used when the owner is defeated.
    ///
    /// Returns the cargo that was lost.
    pub fn abandon(&mut self) -> u32 {
        self.commands.clear();
        self.path.clear();
        self.state = TransportState::Idle;
        std::mem::take(&mut self.cargo)
    }

    /// Advance the transport by one turn.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::UnknownCity`] if the route or location names a
    /// city missing from the graph, or [`UnitError::ReserveOverflow`] if a
    /// delivery to the base cannot be added to the reserve.
    pub fn advance(
        &mut self,
        ctx: &mut TransportContext<'_>,
        events: &mut Vec<TurnEvent>,
    ) -> Result<(), UnitError> {
        match self.state {
            TransportState::Destroyed => {
                self.count_down(ctx.base, events);
                Ok(())
            }
            TransportState::Idle => {
                self.dispatch(ctx, events);
                Ok(())
            }
            TransportState::Collecting
            | TransportState::Transporting
            | TransportState::Returning => self.travel(ctx, events),
        }
    }

    fn count_down(&mut self, base: &CityId, events: &mut Vec<TurnEvent>) {
        self.respawn_in = self.respawn_in.saturating_sub(1);
        if self.respawn_in > 0 {
            return;
        }
        self.location = base.clone();
        self.cargo = 0;
        self.commands.clear();
        self.path.clear();
        self.state = TransportState::Idle;
        debug!(player = %self.owner, "Transport respawned");
        events.push(TurnEvent::TransportRespawned {
            player: self.owner.clone(),
        });
    }

    /// Start the queued mission, if any.
    fn dispatch(&mut self, ctx: &TransportContext<'_>, events: &mut Vec<TurnEvent>) {
        let (source, quantity) = match self.commands.front() {
            Some(TransportCommand::Collect { source, quantity }) => (source.clone(), *quantity),
            Some(TransportCommand::Deliver { .. }) => {
                warn!(player = %self.owner, "Delivery queued without a pickup; clearing mission");
                self.commands.clear();
                return;
            }
            None => return,
        };

        let Some(route) = ctx.graph.shortest_path(&self.location, &source) else {
            warn!(player = %self.owner, source = %source, "No route to pickup city; mission discarded");
            self.commands.clear();
            events.push(TurnEvent::MissionDiscarded {
                player: self.owner.clone(),
                source,
            });
            return;
        };

        self.path = route.into_iter().skip(1).collect();
        self.requested = quantity;
        self.state = TransportState::Collecting;
        events.push(TurnEvent::TransportDispatched {
            player: self.owner.clone(),
            source,
        });
    }

    /// Take one step, or finish the leg when the route is exhausted.
    fn travel(
        &mut self,
        ctx: &mut TransportContext<'_>,
        events: &mut Vec<TurnEvent>,
    ) -> Result<(), UnitError> {
        let Some(next) = self.path.pop_front() else {
            return self.arrive(ctx, events);
        };

        let city = ctx
            .graph
            .city_mut(&next)
            .ok_or_else(|| UnitError::UnknownCity(next.clone()))?;
        let ground = Ground::of(city, &self.owner);

        match ground {
            Ground::Enemy => {
                let cargo_lost = std::mem::take(&mut self.cargo);
                city.add_population(cargo_lost);
                self.commands.clear();
                self.path.clear();
                self.state = TransportState::Destroyed;
                self.respawn_in = ctx.rules.respawn_turns;
                warn!(player = %self.owner, city = %next, cargo_lost, "Transport destroyed in enemy city");
                events.push(TurnEvent::TransportDestroyed {
                    player: self.owner.clone(),
                    city: next,
                    cargo_lost,
                });
                Ok(())
            }
            Ground::Neutral => {
                let lost = self.cargo.saturating_mul(ctx.rules.toll_percent) / 100;
                self.cargo = self.cargo.saturating_sub(lost);
                city.add_population(lost);
                let from = std::mem::replace(&mut self.location, next.clone());
                events.push(TurnEvent::TransportMoved {
                    player: self.owner.clone(),
                    from,
                    to: next.clone(),
                });
                events.push(TurnEvent::CargoTolled {
                    player: self.owner.clone(),
                    city: next,
                    lost,
                });
                self.return_home(ctx.graph, ctx.base, events);
                Ok(())
            }
            Ground::Own => {
                let from = std::mem::replace(&mut self.location, next.clone());
                events.push(TurnEvent::TransportMoved {
                    player: self.owner.clone(),
                    from,
                    to: next,
                });
                if self.path.is_empty() {
                    self.arrive(ctx, events)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Handle the end of a leg at the current location.
    fn arrive(
        &mut self,
        ctx: &mut TransportContext<'_>,
        events: &mut Vec<TurnEvent>,
    ) -> Result<(), UnitError> {
        match self.state {
            TransportState::Collecting => self.collect(ctx, events),
            TransportState::Transporting => self.deliver(ctx, events),
            TransportState::Returning => {
                self.state = TransportState::Idle;
                events.push(TurnEvent::TransportIdle {
                    player: self.owner.clone(),
                    city: self.location.clone(),
                });
                Ok(())
            }
            TransportState::Idle | TransportState::Destroyed => Ok(()),
        }
    }

    fn collect(
        &mut self,
        ctx: &mut TransportContext<'_>,
        events: &mut Vec<TurnEvent>,
    ) -> Result<(), UnitError> {
        let city = ctx
            .graph
            .city_mut(&self.location)
            .ok_or_else(|| UnitError::UnknownCity(self.location.clone()))?;
        let amount = city.take_population(self.requested.take_from(city.population));
        self.cargo = self.cargo.saturating_add(amount);
        events.push(TurnEvent::CargoCollected {
            player: self.owner.clone(),
            city: self.location.clone(),
            amount,
        });

        if matches!(self.commands.front(), Some(TransportCommand::Collect { .. })) {
            self.commands.pop_front();
        }
        let destination = match self.commands.front() {
            Some(TransportCommand::Deliver { destination }) => destination.clone(),
            _ => {
                self.return_home(ctx.graph, ctx.base, events);
                return Ok(());
            }
        };

        match ctx.graph.shortest_path(&self.location, &destination) {
            Some(route) => {
                self.path = route.into_iter().skip(1).collect();
                self.state = TransportState::Transporting;
                if self.path.is_empty() {
                    return self.deliver(ctx, events);
                }
                Ok(())
            }
            None => {
                warn!(player = %self.owner, destination = %destination, "No route to delivery city");
                self.return_home(ctx.graph, ctx.base, events);
                Ok(())
            }
        }
    }

    fn deliver(
        &mut self,
        ctx: &mut TransportContext<'_>,
        events: &mut Vec<TurnEvent>,
    ) -> Result<(), UnitError> {
        let amount = self.cargo;
        let here = ctx
            .graph
            .city(&self.location)
            .ok_or_else(|| UnitError::UnknownCity(self.location.clone()))?;
        let to_reserve =
            self.location == *ctx.base && Ground::of(here, &self.owner) == Ground::Own;
        if to_reserve {
            *ctx.reserve = ctx
                .reserve
                .checked_add(Decimal::from(amount))
                .ok_or(UnitError::ReserveOverflow { amount })?;
        } else {
            ctx.graph
                .city_mut(&self.location)
                .ok_or_else(|| UnitError::UnknownCity(self.location.clone()))?
                .add_population(amount);
        }

        self.cargo = 0;
        self.commands.pop_front();
        self.state = TransportState::Idle;
        debug!(player = %self.owner, city = %self.location, amount, to_reserve, "Cargo delivered");
        events.push(TurnEvent::CargoDelivered {
            player: self.owner.clone(),
            city: self.location.clone(),
            amount,
            to_reserve,
        });
        events.push(TurnEvent::TransportIdle {
            player: self.owner.clone(),
            city: self.location.clone(),
        });
        Ok(())
    }

    /// Abandon the mission and head for the base, keeping any cargo.
    fn return_home(&mut self, graph: &CityGraph, base: &CityId, events: &mut Vec<TurnEvent>) {
        self.commands.clear();
        self.path = graph
            .shortest_path(&self.location, base)
            .map(|route| route.into_iter().skip(1).collect())
            .unwrap_or_default();
        self.state = TransportState::Returning;
        events.push(TurnEvent::TransportReturning {
            player: self.owner.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn id(s: &str) -> CityId {
        CityId::new(s)
    }

    fn j0() -> PlayerId {
        PlayerId::new("j0")
    }

    /// base --10-- farm --10-- depot
    ///   \
    ///    +--10-- wild --10-- far
    /// plus enemy city `fort` next to farm.
    fn make_graph() -> CityGraph {
        let mut g = CityGraph::new();
        for (name, pop) in [
            ("base", 0),
            ("farm", 80),
            ("depot", 5),
            ("wild", 20),
            ("far", 60),
            ("fort", 30),
        ] {
            let _ = g.add_city(id(name), pop);
        }
        for (a, b) in [
            ("base", "farm"),
            ("farm", "depot"),
            ("base", "wild"),
            ("wild", "far"),
            ("farm", "fort"),
        ] {
            let _ = g.add_edge(&id(a), &id(b), 10);
        }
        for name in ["base", "farm", "depot", "far"] {
            if let Some(city) = g.city_mut(&id(name)) {
                city.owner = Some(j0());
            }
        }
        if let Some(city) = g.city_mut(&id("base")) {
            city.base_of = Some(j0());
        }
        if let Some(city) = g.city_mut(&id("fort")) {
            city.owner = Some(PlayerId::new("j1"));
        }
        g
    }

    fn run(t: &mut Transport, g: &mut CityGraph, reserve: &mut Decimal, turns: usize) -> Vec<TurnEvent> {
        let base = id("base");
        let mut events = Vec::new();
        for _ in 0..turns {
            let mut ctx = TransportContext {
                graph: &mut *g,
                base: &base,
                reserve: &mut *reserve,
                rules: TransportRules::default(),
            };
            let _ = t.advance(&mut ctx, &mut events);
        }
        events
    }

    #[test]
    fn collects_and_delivers_to_reserve() {
        let mut g = make_graph();
        let mut reserve = dec!(100);
        let mut t = Transport::new(j0(), id("base"));
        t.assign(id("farm"), id("base"), CargoQuantity::Exact(30));

        run(&mut t, &mut g, &mut reserve, 1);
        assert_eq!(t.state, TransportState::Collecting);

        // Step onto farm and load in the same turn.
        run(&mut t, &mut g, &mut reserve, 1);
        assert_eq!(t.cargo, 30);
        assert_eq!(t.state, TransportState::Transporting);
        assert_eq!(g.city(&id("farm")).map(|c| c.population), Some(50));

        let events = run(&mut t, &mut g, &mut reserve, 1);
        assert_eq!(reserve, dec!(130));
        assert_eq!(t.cargo, 0);
        assert_eq!(t.state, TransportState::Idle);
        assert!(t.commands.is_empty());
        assert!(events.iter().any(|e| matches!(e, TurnEvent::CargoDelivered { to_reserve: true, .. })));
    }

    #[test]
    fn delivery_elsewhere_adds_population() {
        let mut g = make_graph();
        let mut reserve = dec!(100);
        let mut t = Transport::new(j0(), id("base"));
        t.assign(id("farm"), id("depot"), CargoQuantity::Max);
        run(&mut t, &mut g, &mut reserve, 3);
        assert_eq!(g.city(&id("depot")).map(|c| c.population), Some(85));
        assert_eq!(g.city(&id("farm")).map(|c| c.population), Some(0));
        assert_eq!(reserve, dec!(100));
        assert_eq!(t.state, TransportState::Idle);
    }

    #[test]
    fn neutral_city_takes_toll_and_sends_transport_home() {
        let mut g = make_graph();
        let mut reserve = dec!(100);
        let mut t = Transport::new(j0(), id("base"));
        t.cargo = 50;
        t.state = TransportState::Transporting;
        t.path = [id("wild"), id("far")].into_iter().collect();
        t.commands.push_back(TransportCommand::Deliver { destination: id("far") });

        let events = run(&mut t, &mut g, &mut reserve, 1);
        assert_eq!(t.cargo, 45);
        assert_eq!(t.location, id("wild"));
        assert_eq!(g.city(&id("wild")).map(|c| c.population), Some(25));
        assert_eq!(t.state, TransportState::Returning);
        assert!(t.commands.is_empty());
        assert!(events.contains(&TurnEvent::CargoTolled {
            player: j0(),
            city: id("wild"),
            lost: 5,
        }));

        run(&mut t, &mut g, &mut reserve, 2);
        assert_eq!(t.location, id("base"));
        assert_eq!(t.state, TransportState::Idle);
        assert_eq!(t.cargo, 45);
    }

    #[test]
    fn enemy_city_destroys_transport_until_respawn() {
        let mut g = make_graph();
        let mut reserve = dec!(100);
        let mut t = Transport::new(j0(), id("farm"));
        t.cargo = 12;
        t.state = TransportState::Transporting;
        t.path = [id("fort")].into_iter().collect();

        run(&mut t, &mut g, &mut reserve, 1);
        assert_eq!(t.state, TransportState::Destroyed);
        assert_eq!(t.cargo, 0);
        assert_eq!(t.location, id("farm"));
        assert_eq!(t.respawn_in, DEFAULT_RESPAWN_TURNS);
        assert_eq!(g.city(&id("fort")).map(|c| c.population), Some(42));

        run(&mut t, &mut g, &mut reserve, 1);
        assert_eq!(t.state, TransportState::Destroyed);
        let events = run(&mut t, &mut g, &mut reserve, 1);
        assert_eq!(t.state, TransportState::Idle);
        assert_eq!(t.location, id("base"));
        assert_eq!(events, vec![TurnEvent::TransportRespawned { player: j0() }]);
    }

    #[test]
    fn unreachable_pickup_discards_mission() {
        let mut g = make_graph();
        let _ = g.add_city(id("island"), 40);
        let mut reserve = dec!(100);
        let mut t = Transport::new(j0(), id("base"));
        t.assign(id("island"), id("base"), CargoQuantity::Max);
        let events = run(&mut t, &mut g, &mut reserve, 1);
        assert_eq!(t.state, TransportState::Idle);
        assert!(t.accepts_mission());
        assert!(matches!(events.first(), Some(TurnEvent::MissionDiscarded { .. })));
    }

    #[test]
    fn collecting_at_current_city_needs_no_travel() {
        let mut g = make_graph();
        let mut reserve = dec!(0);
        let mut t = Transport::new(j0(), id("base"));
        if let Some(city) = g.city_mut(&id("base")) {
            city.population = 7;
        }
        t.assign(id("base"), id("base"), CargoQuantity::Max);
        run(&mut t, &mut g, &mut reserve, 2);
        assert_eq!(reserve, dec!(7));
        assert_eq!(t.state, TransportState::Idle);
    }

    #[test]
    fn abandon_drops_cargo_and_mission() {
        let mut t = Transport::new(j0(), id("base"));
        t.assign(id("farm"), id("base"), CargoQuantity::Max);
        t.cargo = 9;
        assert_eq!(t.abandon(), 9);
        assert!(t.accepts_mission());
    }

    fn heading_home_with(cargo: u32) -> Transport {
        let mut t = Transport::new(j0(), id("base"));
        t.location = id("farm");
        t.cargo = cargo;
        t.state = TransportState::Transporting;
        t.path = [id("base")].into_iter().collect();
        t.commands.push_back(TransportCommand::Deliver { destination: id("base") });
        t
    }

    #[test]
    fn captured_base_seizes_cargo_and_destroys_transport() {
        let mut g = make_graph();
        if let Some(city) = g.city_mut(&id("base")) {
            city.owner = Some(PlayerId::new("j1"));
        }
        let mut reserve = dec!(100);
        let mut t = heading_home_with(20);

        let events = run(&mut t, &mut g, &mut reserve, 1);
        assert_eq!(t.state, TransportState::Destroyed);
        assert_eq!(t.location, id("farm"));
        assert_eq!(t.cargo, 0);
        assert_eq!(reserve, dec!(100));
        assert_eq!(g.city(&id("base")).map(|c| c.population), Some(20));
        assert!(events.contains(&TurnEvent::TransportDestroyed {
            player: j0(),
            city: id("base"),
            cargo_lost: 20,
        }));
        assert!(!events.iter().any(|e| matches!(e, TurnEvent::CargoDelivered { .. })));
    }

    #[test]
    fn unheld_own_base_still_takes_deliveries() {
        let mut g = make_graph();
        if let Some(city) = g.city_mut(&id("base")) {
            city.owner = None;
        }
        let mut reserve = dec!(100);
        let mut t = heading_home_with(20);

        run(&mut t, &mut g, &mut reserve, 1);
        assert_eq!(t.state, TransportState::Idle);
        assert_eq!(reserve, dec!(120));
    }
}
