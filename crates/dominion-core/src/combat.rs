//! Phase 3: the combat resolver.
//!
//! All troops in `attacking` state are grouped by target city. Each group
//! is resolved as one batched assault: the first attacker enumerated
//! (registration order, then roster order) leads, and every other attacker
//! is merged into it before the fight. Contested cities are resolved in id
//! order.
//!
//! - **Neutral city**: the assault wins iff total strength is at least the
//!   city's population. A failed assault withdraws without losses.
//! - **Owned city**: defense is the garrison's strength, plus the city's
//!   population when it is a base. Strength against a base is divided by
//!   the base-assault divisor. The assault wins iff the effective strength
//!   exceeds the defense; the defenders win ties.

use std::collections::BTreeMap;

use dominion_types::{CityId, LossCause, PlayerId, RetreatReason, TroopId, TroopState, TurnEvent};
use dominion_units::TroopContext;
use tracing::{debug, info};

use crate::state::GameState;

/// Outcome of one batched assault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Assault {
    total: u32,
    effective: u32,
    defense: u32,
    captured: bool,
}

/// Resolve every assault ordered this turn.
pub fn phase_combat(state: &mut GameState, events: &mut Vec<TurnEvent>) {
    for (city, attackers) in collect_assaults(state) {
        resolve(state, &city, &attackers, events);
    }
}

/// Group attacking troops by target, in enumeration order.
///
/// Attackers whose target now belongs to their own player have nothing to
/// fight and stand down.
fn collect_assaults(state: &mut GameState) -> BTreeMap<CityId, Vec<TroopId>> {
    let mut assaults: BTreeMap<CityId, Vec<TroopId>> = BTreeMap::new();

    for player in state.players.iter().filter(|p| !p.defeated) {
        for troop_id in &player.roster {
            let Some(troop) = state.troops.get_mut(troop_id) else {
                continue;
            };
            if troop.state != TroopState::Attacking {
                continue;
            }
            let Some(target) = troop.target.clone() else {
                troop.state = TroopState::Idle;
                continue;
            };
            let own_city = state
                .graph
                .city(&target)
                .is_none_or(|c| c.is_owned_by(&troop.owner));
            if own_city {
                debug!(troop = %troop_id, city = %target, "Assault target already friendly");
                troop.state = TroopState::Idle;
                troop.target = None;
                continue;
            }
            assaults.entry(target).or_default().push(troop_id.clone());
        }
    }

    assaults
}

/// Resolve one batched assault on `city`.
fn resolve(state: &mut GameState, city: &CityId, attackers: &[TroopId], events: &mut Vec<TurnEvent>) {
    let Some((leader_id, followers)) = attackers.split_first() else {
        return;
    };

    let mut total = 0_u32;
    for troop_id in attackers {
        if let Some(troop) = state.troops.get(troop_id) {
            total = total.saturating_add(troop.strength);
        }
    }
    for troop_id in followers {
        state.remove_troop(troop_id, LossCause::MergedIntoAssault, events);
    }

    let Some(target) = state.graph.city(city) else {
        return;
    };
    let previous_owner = target.owner.clone();

    let assault = if previous_owner.is_none() {
        let population = target.population;
        Assault {
            total,
            effective: total,
            defense: population,
            captured: total >= population,
        }
    } else {
        let is_base = target.is_base();
        let mut defense = state.garrison_strength(city);
        if is_base {
            defense = defense.saturating_add(target.population);
        }
        let effective = if is_base {
            total
                .checked_div(state.rules.base_assault_divisor)
                .unwrap_or(total)
        } else {
            total
        };
        Assault {
            total,
            effective,
            defense,
            captured: effective > defense,
        }
    };

    info!(
        city = %city,
        leader = %leader_id,
        attackers = attackers.len(),
        total = assault.total,
        effective = assault.effective,
        defense = assault.defense,
        captured = assault.captured,
        "Assault resolved"
    );
    events.push(TurnEvent::AssaultResolved {
        city: city.clone(),
        leader: leader_id.clone(),
        attackers: attackers.to_vec(),
        total_strength: assault.total,
        effective_strength: assault.effective,
        defense: assault.defense,
        captured: assault.captured,
    });

    match (previous_owner, assault.captured) {
        (None, true) => capture(state, city, leader_id, assault.total, None, events),
        (None, false) => repel(state, leader_id, assault.total, events),
        (Some(owner), true) => {
            let garrison = state
                .graph
                .city_mut(city)
                .map(|c| std::mem::take(&mut c.garrison))
                .unwrap_or_default();
            for defender in &garrison {
                state.remove_troop(defender, LossCause::DefenseOverrun, events);
            }
            let survivor = assault.total.saturating_sub(assault.defense);
            capture(state, city, leader_id, survivor, Some(owner), events);
        }
        (Some(_), false) => {
            state.remove_troop(leader_id, LossCause::AssaultFailed, events);
            wear_down_garrison(state, city, assault.effective, events);
        }
    }
}

/// The leader takes the city and stands in it, victorious.
fn capture(
    state: &mut GameState,
    city: &CityId,
    leader_id: &TroopId,
    strength: u32,
    previous_owner: Option<PlayerId>,
    events: &mut Vec<TurnEvent>,
) {
    let Some(leader) = state.troops.get_mut(leader_id) else {
        return;
    };
    leader.strength = strength;
    leader.location = city.clone();
    leader.path.clear();
    leader.target = None;
    leader.state = TroopState::Victorious;
    let new_owner = leader.owner.clone();

    if let Some(target) = state.graph.city_mut(city) {
        target.owner = Some(new_owner.clone());
    }
    events.push(TurnEvent::CityCaptured {
        city: city.clone(),
        player: new_owner,
        previous_owner,
    });
}

/// A failed neutral assault: the leader keeps the merged strength and falls
/// back to its base.
fn repel(state: &mut GameState, leader_id: &TroopId, strength: u32, events: &mut Vec<TurnEvent>) {
    let Some(owner) = state.troops.get(leader_id).map(|t| t.owner.clone()) else {
        return;
    };
    let Some(base) = state.player(&owner).map(|p| p.base.clone()) else {
        return;
    };
    let Some(leader) = state.troops.get_mut(leader_id) else {
        return;
    };
    leader.strength = strength;
    let ctx = TroopContext {
        graph: &state.graph,
        base: &base,
    };
    leader.force_retreat(&ctx, RetreatReason::AssaultRepelled, events);
}

/// Spread `damage` across the garrison in order, removing every defender
/// whose strength is used up.
fn wear_down_garrison(state: &mut GameState, city: &CityId, damage: u32, events: &mut Vec<TurnEvent>) {
    let garrison = state
        .graph
        .city(city)
        .map(|c| c.garrison.clone())
        .unwrap_or_default();

    let mut remaining = damage;
    for defender_id in &garrison {
        if remaining == 0 {
            break;
        }
        let Some(defender) = state.troops.get_mut(defender_id) else {
            continue;
        };
        remaining = defender.absorb(remaining);
        if defender.strength == 0 {
            state.remove_troop(defender_id, LossCause::DefenseOverrun, events);
        }
    }
}
