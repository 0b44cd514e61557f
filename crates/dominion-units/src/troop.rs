//! Troop records and the per-turn troop state machine.
//!
//! A troop carries its own command queue and the remaining steps of its
//! current route. Each turn [`Troop::advance`] performs at most one
//! transition:
//!
//! - `moving` / `retreating` with steps left: take one step, subject to the
//!   destination check (moving only) and the edge capacity check.
//! - `stranded`: look for a usable way home again.
//! - `idle` with commands: pop and apply the next command.
//!
//! `attacking` and `victorious` troops are left for the combat resolver and
//! post-combat settlement. `garrisoned` troops are passive defenders and are
//! never advanced.
//!
//! The troop never touches the graph or the roster itself. Joining a garrison
//! is reported back as [`TroopAction::Garrison`] so the caller can move the id
//! between its tables in one place.

use std::collections::VecDeque;

use dominion_types::{CityId, PlayerId, RetreatReason, TroopCommand, TroopId, TroopState, TurnEvent};
use dominion_world::CityGraph;
use tracing::{debug, warn};

use crate::error::UnitError;

/// Read-only view of the world a troop needs while advancing.
#[derive(Debug, Clone, Copy)]
pub struct TroopContext<'a> {
    /// The map.
    pub graph: &'a CityGraph,
    /// The owning player's base city.
    pub base: &'a CityId,
}

/// What the caller must do with a troop after it advanced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TroopAction {
    /// Nothing beyond the troop's own state changed.
    Stay,
    /// Move the troop from the active roster into this city's garrison.
    Garrison(CityId),
}

/// A mobile unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Troop {
    /// Unique troop id.
    pub id: TroopId,
    /// Owning player.
    pub owner: PlayerId,
    /// Current strength. Always positive while the troop exists.
    pub strength: u32,
    /// City the troop stands in.
    pub location: CityId,
    /// Orders not yet started.
    pub commands: VecDeque<TroopCommand>,
    /// Remaining steps of the current route, current city excluded.
    pub path: VecDeque<CityId>,
    /// State tag.
    pub state: TroopState,
    /// Assault target while `attacking`.
    pub target: Option<CityId>,
}

impl Troop {
    /// Create an idle troop at `location` with a queue of orders.
    pub fn new(
        id: TroopId,
        owner: PlayerId,
        strength: u32,
        location: CityId,
        commands: impl IntoIterator<Item = TroopCommand>,
    ) -> Self {
        Self {
            id,
            owner,
            strength,
            location,
            commands: commands.into_iter().collect(),
            path: VecDeque::new(),
            state: TroopState::Idle,
            target: None,
        }
    }

    /// Whether the troop is on the active roster (not a garrison member).
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, TroopState::Garrisoned)
    }

    /// Advance the troop by one turn.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::UnknownCity`] if the troop's route or location
    /// names a city that is not in the graph.
    pub fn advance(
        &mut self,
        ctx: &TroopContext<'_>,
        events: &mut Vec<TurnEvent>,
    ) -> Result<TroopAction, UnitError> {
        match self.state {
            TroopState::Moving | TroopState::Retreating => {
                self.step(ctx, events)?;
                Ok(TroopAction::Stay)
            }
            TroopState::Stranded => {
                self.try_resume_retreat(ctx, events);
                Ok(TroopAction::Stay)
            }
            TroopState::Idle => self.next_command(ctx, events),
            TroopState::Attacking | TroopState::Victorious | TroopState::Garrisoned => {
                Ok(TroopAction::Stay)
            }
        }
    }

    /// Take one step along the stored route.
    fn step(&mut self, ctx: &TroopContext<'_>, events: &mut Vec<TurnEvent>) -> Result<(), UnitError> {
        let Some(next) = self.path.front().cloned() else {
            self.finish_route(events);
            return Ok(());
        };

        let destination = ctx
            .graph
            .city(&next)
            .ok_or_else(|| UnitError::UnknownCity(next.clone()))?;
        let moving = self.state == TroopState::Moving;

        if moving && !destination.is_friendly_to(&self.owner) {
            debug!(troop = %self.id, city = %next, "Route blocked by a city we do not hold");
            self.force_retreat(ctx, RetreatReason::HostileCity, events);
            return Ok(());
        }

        let capacity = ctx.graph.edge_between(&self.location, &next).unwrap_or(0);
        if self.strength > capacity {
            if moving {
                debug!(
                    troop = %self.id,
                    strength = self.strength,
                    capacity,
                    "Edge capacity exceeded"
                );
                self.force_retreat(ctx, RetreatReason::CapacityExceeded, events);
            } else {
                self.strand(events);
            }
            return Ok(());
        }

        self.path.pop_front();
        let from = std::mem::replace(&mut self.location, next.clone());
        events.push(TurnEvent::TroopMoved {
            troop: self.id.clone(),
            from,
            to: next,
        });

        if self.path.is_empty() {
            self.finish_route(events);
        }
        Ok(())
    }

    fn finish_route(&mut self, events: &mut Vec<TurnEvent>) {
        self.state = TroopState::Idle;
        events.push(TurnEvent::TroopArrived {
            troop: self.id.clone(),
            city: self.location.clone(),
        });
    }

    /// Pop and apply the next queued command.
    fn next_command(
        &mut self,
        ctx: &TroopContext<'_>,
        events: &mut Vec<TurnEvent>,
    ) -> Result<TroopAction, UnitError> {
        let Some(command) = self.commands.pop_front() else {
            return Ok(TroopAction::Stay);
        };

        match command {
            TroopCommand::Move { target } => {
                match ctx.graph.shortest_path(&self.location, &target) {
                    Some(route) if route.len() > 1 => {
                        self.path = route.into_iter().skip(1).collect();
                        self.state = TroopState::Moving;
                        debug!(troop = %self.id, target = %target, steps = self.path.len(), "Move started");
                    }
                    Some(_) => {
                        debug!(troop = %self.id, city = %target, "Already at move target");
                    }
                    None => {
                        warn!(troop = %self.id, target = %target, "No route to move target; retrying next turn");
                        events.push(TurnEvent::MoveDeferred {
                            troop: self.id.clone(),
                            target: target.clone(),
                        });
                        self.commands.push_front(TroopCommand::Move { target });
                    }
                }
                Ok(TroopAction::Stay)
            }
            TroopCommand::Attack { target } => {
                let adjacent = ctx.graph.are_adjacent(&self.location, &target);
                let own_city = ctx
                    .graph
                    .city(&target)
                    .is_some_and(|city| city.is_owned_by(&self.owner));
                if adjacent && !own_city {
                    self.state = TroopState::Attacking;
                    self.target = Some(target.clone());
                    events.push(TurnEvent::AttackOrdered {
                        troop: self.id.clone(),
                        target,
                    });
                } else {
                    warn!(troop = %self.id, target = %target, adjacent, own_city, "Attack order dropped");
                    events.push(TurnEvent::AttackDropped {
                        troop: self.id.clone(),
                        target,
                    });
                }
                Ok(TroopAction::Stay)
            }
            TroopCommand::Hold => self.hold_here(ctx, events),
            TroopCommand::Retreat => {
                self.force_retreat(ctx, RetreatReason::Voluntary, events);
                Ok(TroopAction::Stay)
            }
        }
    }

    /// Garrison in the current city if the owner holds it.
    fn hold_here(
        &mut self,
        ctx: &TroopContext<'_>,
        events: &mut Vec<TurnEvent>,
    ) -> Result<TroopAction, UnitError> {
        let city = ctx
            .graph
            .city(&self.location)
            .ok_or_else(|| UnitError::UnknownCity(self.location.clone()))?;

        if !city.is_owned_by(&self.owner) {
            warn!(troop = %self.id, city = %self.location, "Hold order dropped outside own territory");
            events.push(TurnEvent::HoldDropped {
                troop: self.id.clone(),
                city: self.location.clone(),
            });
            return Ok(TroopAction::Stay);
        }

        Ok(self.garrison(events))
    }

    /// Turn the troop into a passive defender of its current city.
    pub fn garrison(&mut self, events: &mut Vec<TurnEvent>) -> TroopAction {
        self.state = TroopState::Garrisoned;
        self.path.clear();
        self.target = None;
        events.push(TurnEvent::TroopGarrisoned {
            troop: self.id.clone(),
            city: self.location.clone(),
        });
        TroopAction::Garrison(self.location.clone())
    }

    /// Cancel every plan and head for the base.
    ///
    /// A troop already at its base simply becomes idle. One with no route
    /// home is stranded where it stands.
    pub fn force_retreat(
        &mut self,
        ctx: &TroopContext<'_>,
        reason: RetreatReason,
        events: &mut Vec<TurnEvent>,
    ) {
        self.commands.clear();
        self.path.clear();
        self.target = None;

        let Some(route) = ctx.graph.shortest_path(&self.location, ctx.base) else {
            self.strand(events);
            return;
        };

        events.push(TurnEvent::RetreatStarted {
            troop: self.id.clone(),
            reason,
        });

        self.path = route.into_iter().skip(1).collect();
        if self.path.is_empty() {
            self.finish_route(events);
        } else {
            self.state = TroopState::Retreating;
        }
    }

    fn strand(&mut self, events: &mut Vec<TurnEvent>) {
        warn!(troop = %self.id, city = %self.location, "Troop stranded");
        self.state = TroopState::Stranded;
        self.path.clear();
        events.push(TurnEvent::TroopStranded {
            troop: self.id.clone(),
            city: self.location.clone(),
        });
    }

    /// Leave `stranded` once a route home exists whose every edge can carry
    /// this troop.
    fn try_resume_retreat(&mut self, ctx: &TroopContext<'_>, events: &mut Vec<TurnEvent>) {
        let Some(route) = ctx.graph.shortest_path(&self.location, ctx.base) else {
            return;
        };
        let fits = route.windows(2).all(|hop| match hop {
            [a, b] => ctx.graph.edge_between(a, b).unwrap_or(0) >= self.strength,
            _ => true,
        });
        if !fits {
            return;
        }

        events.push(TurnEvent::RetreatResumed {
            troop: self.id.clone(),
        });
        self.path = route.into_iter().skip(1).collect();
        if self.path.is_empty() {
            self.finish_route(events);
        } else {
            self.state = TroopState::Retreating;
        }
    }

    /// Post-combat handling for a troop that won its assault.
    ///
    /// A queued `HOLD` is consumed and garrisons the troop in the city it
    /// took. Anything else turns the win into a raid and the troop withdraws.
    pub fn settle_victory(
        &mut self,
        ctx: &TroopContext<'_>,
        events: &mut Vec<TurnEvent>,
    ) -> TroopAction {
        if self.commands.front() == Some(&TroopCommand::Hold) {
            self.commands.pop_front();
            return self.garrison(events);
        }
        self.force_retreat(ctx, RetreatReason::RaidCompleted, events);
        TroopAction::Stay
    }

    /// Apply `damage` and return whatever this troop could not absorb.
    pub const fn absorb(&mut self, damage: u32) -> u32 {
        let absorbed = if damage < self.strength { damage } else { self.strength };
        self.strength = self.strength.saturating_sub(absorbed);
        damage.saturating_sub(absorbed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CityId {
        CityId::new(s)
    }

    /// base --30-- a --20-- b, c isolated; base owned by j0, a owned by j0.
    fn make_graph() -> CityGraph {
        let mut g = CityGraph::new();
        for (name, pop) in [("base", 0), ("a", 10), ("b", 50), ("c", 5)] {
            let _ = g.add_city(id(name), pop);
        }
        let _ = g.add_edge(&id("base"), &id("a"), 30);
        let _ = g.add_edge(&id("a"), &id("b"), 20);
        let j0 = PlayerId::new("j0");
        if let Some(city) = g.city_mut(&id("base")) {
            city.base_of = Some(j0.clone());
            city.owner = Some(j0.clone());
        }
        if let Some(city) = g.city_mut(&id("a")) {
            city.owner = Some(j0);
        }
        g
    }

    fn troop(strength: u32, at: &str, commands: Vec<TroopCommand>) -> Troop {
        Troop::new(TroopId::new("t1"), PlayerId::new("j0"), strength, id(at), commands)
    }

    fn advance(t: &mut Troop, g: &CityGraph, events: &mut Vec<TurnEvent>) -> TroopAction {
        let base = id("base");
        let ctx = TroopContext { graph: g, base: &base };
        t.advance(&ctx, events).unwrap_or(TroopAction::Stay)
    }

    #[test]
    fn move_then_step_to_owned_city() {
        let g = make_graph();
        let mut t = troop(25, "base", vec![TroopCommand::Move { target: id("a") }]);
        let mut events = Vec::new();

        advance(&mut t, &g, &mut events);
        assert_eq!(t.state, TroopState::Moving);
        assert_eq!(t.location, id("base"));

        advance(&mut t, &g, &mut events);
        assert_eq!(t.state, TroopState::Idle);
        assert_eq!(t.location, id("a"));
        assert!(events.iter().any(|e| matches!(e, TurnEvent::TroopArrived { .. })));
    }

    #[test]
    fn moving_into_neutral_city_forces_retreat() {
        let g = make_graph();
        let mut t = troop(10, "base", vec![TroopCommand::Move { target: id("b") }]);
        let mut events = Vec::new();
        advance(&mut t, &g, &mut events);
        advance(&mut t, &g, &mut events);
        assert_eq!(t.location, id("a"));
        advance(&mut t, &g, &mut events);
        assert_eq!(t.state, TroopState::Retreating);
        assert!(events.contains(&TurnEvent::RetreatStarted {
            troop: TroopId::new("t1"),
            reason: RetreatReason::HostileCity,
        }));
    }

    #[test]
    fn capacity_exceeded_forces_retreat() {
        let g = make_graph();
        let mut t = troop(31, "base", vec![
            TroopCommand::Move { target: id("a") },
            TroopCommand::Hold,
        ]);
        let mut events = Vec::new();
        advance(&mut t, &g, &mut events);
        advance(&mut t, &g, &mut events);
        // Already at base: the retreat completes on the spot.
        assert_eq!(t.state, TroopState::Idle);
        assert_eq!(t.location, id("base"));
        assert!(t.commands.is_empty());
    }

    #[test]
    fn unreachable_move_is_requeued() {
        let g = make_graph();
        let mut t = troop(5, "base", vec![TroopCommand::Move { target: id("c") }]);
        let mut events = Vec::new();
        advance(&mut t, &g, &mut events);
        assert_eq!(t.state, TroopState::Idle);
        assert_eq!(t.commands.front(), Some(&TroopCommand::Move { target: id("c") }));
        assert!(matches!(events.first(), Some(TurnEvent::MoveDeferred { .. })));
    }

    #[test]
    fn attack_requires_adjacent_foreign_target() {
        let g = make_graph();
        let mut t = troop(5, "base", vec![
            TroopCommand::Attack { target: id("b") },
            TroopCommand::Attack { target: id("a") },
        ]);
        let mut events = Vec::new();
        advance(&mut t, &g, &mut events);
        advance(&mut t, &g, &mut events);
        assert_eq!(t.state, TroopState::Idle);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| matches!(e, TurnEvent::AttackDropped { .. })));

        let mut t = troop(5, "a", vec![TroopCommand::Attack { target: id("b") }]);
        advance(&mut t, &g, &mut events);
        assert_eq!(t.state, TroopState::Attacking);
        assert_eq!(t.target, Some(id("b")));
    }

    #[test]
    fn hold_garrisons_only_in_owned_city() {
        let g = make_graph();
        let mut events = Vec::new();

        let mut t = troop(5, "a", vec![TroopCommand::Hold]);
        assert_eq!(advance(&mut t, &g, &mut events), TroopAction::Garrison(id("a")));
        assert_eq!(t.state, TroopState::Garrisoned);
        assert!(!t.is_active());

        let mut t = troop(5, "b", vec![TroopCommand::Hold]);
        assert_eq!(advance(&mut t, &g, &mut events), TroopAction::Stay);
        assert_eq!(t.state, TroopState::Idle);
    }

    #[test]
    fn idle_troop_without_orders_stays_put() {
        let g = make_graph();
        let mut t = troop(5, "a", Vec::new());
        let mut events = Vec::new();
        assert_eq!(advance(&mut t, &g, &mut events), TroopAction::Stay);
        assert_eq!(t.state, TroopState::Idle);
        assert!(events.is_empty());
    }

    #[test]
    fn heavy_retreat_strands_then_resumes() {
        let mut g = make_graph();
        let base = id("base");
        let ctx = TroopContext { graph: &g, base: &base };
        let mut t = troop(25, "b", Vec::new());
        let mut events = Vec::new();

        t.force_retreat(&ctx, RetreatReason::Voluntary, &mut events);
        assert_eq!(t.state, TroopState::Retreating);
        advance(&mut t, &g, &mut events);
        // b-a carries only 20.
        assert_eq!(t.state, TroopState::Stranded);
        assert_eq!(t.location, id("b"));

        advance(&mut t, &g, &mut events);
        assert_eq!(t.state, TroopState::Stranded);

        t.strength = 20;
        advance(&mut t, &g, &mut events);
        assert_eq!(t.state, TroopState::Retreating);
        advance(&mut t, &g, &mut events);
        advance(&mut t, &g, &mut events);
        assert_eq!(t.state, TroopState::Idle);
        assert_eq!(t.location, id("base"));

        // No route at all.
        let _ = g.add_city(id("island"), 0);
        let ctx = TroopContext { graph: &g, base: &base };
        let mut t = troop(1, "island", Vec::new());
        t.force_retreat(&ctx, RetreatReason::Voluntary, &mut events);
        assert_eq!(t.state, TroopState::Stranded);
    }

    #[test]
    fn victory_with_hold_garrisons_otherwise_raids() {
        let g = make_graph();
        let base = id("base");
        let ctx = TroopContext { graph: &g, base: &base };
        let mut events = Vec::new();

        let mut t = troop(5, "a", vec![TroopCommand::Hold]);
        t.state = TroopState::Victorious;
        assert_eq!(t.settle_victory(&ctx, &mut events), TroopAction::Garrison(id("a")));

        let mut t = troop(5, "a", vec![TroopCommand::Move { target: id("b") }]);
        t.state = TroopState::Victorious;
        assert_eq!(t.settle_victory(&ctx, &mut events), TroopAction::Stay);
        assert_eq!(t.state, TroopState::Retreating);
        assert!(t.commands.is_empty());
    }

    #[test]
    fn absorb_passes_on_excess_damage() {
        let mut t = troop(10, "a", Vec::new());
        assert_eq!(t.absorb(4), 0);
        assert_eq!(t.strength, 6);
        assert_eq!(t.absorb(9), 3);
        assert_eq!(t.strength, 0);
    }

    #[test]
    fn unknown_location_is_an_error() {
        let g = make_graph();
        let base = id("base");
        let ctx = TroopContext { graph: &g, base: &base };
        let mut t = troop(5, "nowhere", vec![TroopCommand::Hold]);
        let mut events = Vec::new();
        assert!(matches!(t.advance(&ctx, &mut events), Err(UnitError::UnknownCity(_))));
    }
}
