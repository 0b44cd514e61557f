//! Supply trees: Prim's minimum spanning tree over a player's territory.
//!
//! Each turn a player's owned cities must stay logistically connected to the
//! base. The supply tree is grown from the base over the subgraph induced by
//! the player's owned cities plus the base; cities the tree never reaches are
//! cut off. The tree weight drives the player's upkeep.
//!
//! The frontier is a min-heap keyed on `(weight, push order)`, so among edges
//! of equal weight the one pushed first is taken first.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use dominion_types::CityId;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::graph::CityGraph;

/// Default scaling constant: upkeep is tree weight divided by this.
pub const DEFAULT_UPKEEP_DIVISOR: u32 = 100;

/// A player's supply tree for one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplyTree {
    /// Sum of the weights of the tree's edges.
    pub weight: u64,
    /// Cities reached from the base, base included.
    pub connected: BTreeSet<CityId>,
}

impl SupplyTree {
    /// Owned cities the tree did not reach.
    pub fn isolated<'a>(&'a self, owned: &'a BTreeSet<CityId>) -> impl Iterator<Item = &'a CityId> {
        owned.difference(&self.connected)
    }

    /// Upkeep for this tree: `weight / divisor`, truncated to the cent.
    ///
    /// A zero divisor charges nothing.
    pub fn upkeep(&self, divisor: u32) -> Decimal {
        Decimal::from(self.weight)
            .checked_div(Decimal::from(divisor))
            .unwrap_or(Decimal::ZERO)
            .round_dp_with_strategy(2, RoundingStrategy::ToZero)
    }
}

/// Grow the supply tree for `owned` cities from `base`.
///
/// Only edges with both endpoints in `owned ∪ {base}` are considered. An
/// unknown base yields an empty tree.
pub fn supply_tree(graph: &CityGraph, base: &CityId, owned: &BTreeSet<CityId>) -> SupplyTree {
    if !graph.contains_city(base) {
        return SupplyTree::default();
    }

    let in_territory = |city: &CityId| city == base || owned.contains(city);

    let mut tree = SupplyTree::default();
    tree.connected.insert(base.clone());

    let mut frontier: BinaryHeap<Reverse<(u32, u64, CityId)>> = BinaryHeap::new();
    let mut pushed: u64 = 0;

    let mut push_frontier = |from: &CityId,
                             connected: &BTreeSet<CityId>,
                             frontier: &mut BinaryHeap<Reverse<(u32, u64, CityId)>>| {
        for to in graph.neighbors(from) {
            if !in_territory(to) || connected.contains(to) {
                continue;
            }
            if let Some(weight) = graph.edge_between(from, to) {
                frontier.push(Reverse((weight, pushed, to.clone())));
                pushed = pushed.saturating_add(1);
            }
        }
    };

    push_frontier(base, &tree.connected, &mut frontier);

    while let Some(Reverse((weight, _, to))) = frontier.pop() {
        if tree.connected.contains(&to) {
            continue;
        }
        tree.weight = tree.weight.saturating_add(u64::from(weight));
        push_frontier(&to, &tree.connected, &mut frontier);
        tree.connected.insert(to);
    }

    tree
}
