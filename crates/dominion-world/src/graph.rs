//! Map graph: cities as nodes, capacity-weighted undirected edges.
//!
//! The [`CityGraph`] is the spatial backbone of a game. It stores every
//! [`City`] and every [`Edge`], answers neighbor and edge lookups, and
//! computes hop-minimal shortest paths.
//!
//! # Neighbor order
//!
//! Neighbor enumeration is pinned to edge insertion order: the adjacency list
//! of a city lists the far endpoint of each incident edge in the order those
//! edges were added. Breadth-first search visits neighbors in that order, so
//! among equally short paths the one discovered through earlier-inserted
//! edges wins. Path results are therefore reproducible for a given map file.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use dominion_types::{CityId, PlayerId};

use crate::city::City;
use crate::error::WorldError;

/// Key of an undirected edge: the endpoint pair in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    /// Lower endpoint.
    pub a: CityId,
    /// Upper endpoint.
    pub b: CityId,
}

impl EdgeKey {
    /// Build the canonical key for an unordered pair.
    pub fn new(x: &CityId, y: &CityId) -> Self {
        if x <= y {
            Self {
                a: x.clone(),
                b: y.clone(),
            }
        } else {
            Self {
                a: y.clone(),
                b: x.clone(),
            }
        }
    }
}

/// An undirected edge with its traversal capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Sorted endpoint pair.
    pub key: EdgeKey,
    /// Maximum troop strength that may cross in one step.
    pub weight: u32,
    /// Insertion sequence number (0-based).
    pub seq: usize,
}

/// The map graph holding all cities and edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityGraph {
    /// All cities indexed by id.
    cities: BTreeMap<CityId, City>,
    /// All edges indexed by sorted endpoint pair.
    edges: BTreeMap<EdgeKey, Edge>,
    /// City -> far endpoints of incident edges, in edge insertion order.
    adjacency: BTreeMap<CityId, Vec<CityId>>,
}

impl CityGraph {
    /// Create an empty graph.
    pub const fn new() -> Self {
        Self {
            cities: BTreeMap::new(),
            edges: BTreeMap::new(),
            adjacency: BTreeMap::new(),
        }
    }

    // -------------------------------------------------------------------
    // City operations
    // -------------------------------------------------------------------

    /// Add a neutral city.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateCity`] if the id is already taken.
    pub fn add_city(&mut self, id: CityId, population: u32) -> Result<(), WorldError> {
        if self.cities.contains_key(&id) {
            return Err(WorldError::DuplicateCity(id));
        }
        self.adjacency.entry(id.clone()).or_default();
        self.cities.insert(id.clone(), City::new(id, population));
        Ok(())
    }

    /// Get an immutable reference to a city.
    pub fn city(&self, id: &CityId) -> Option<&City> {
        self.cities.get(id)
    }

    /// Get a mutable reference to a city.
    pub fn city_mut(&mut self, id: &CityId) -> Option<&mut City> {
        self.cities.get_mut(id)
    }

    /// Whether the city exists.
    pub fn contains_city(&self, id: &CityId) -> bool {
        self.cities.contains_key(id)
    }

    /// Number of cities.
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// Iterate over all cities in id order.
    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.cities.values()
    }

    /// Iterate mutably over all cities in id order.
    pub fn cities_mut(&mut self) -> impl Iterator<Item = &mut City> {
        self.cities.values_mut()
    }

    /// Ids of every city currently owned by `player`, in id order.
    pub fn cities_owned_by(&self, player: &PlayerId) -> BTreeSet<CityId> {
        self.cities
            .values()
            .filter(|c| c.is_owned_by(player))
            .map(|c| c.id.clone())
            .collect()
    }

    // -------------------------------------------------------------------
    // Edge operations
    // -------------------------------------------------------------------

    /// Add an undirected edge.
    ///
    /// Returns `Ok(true)` if the edge was inserted and `Ok(false)` if the
    /// unordered pair already had an edge (the first insertion wins).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CityNotFound`] if either endpoint is missing, or
    /// [`WorldError::InvalidEdge`] for self-loops and zero capacity.
    pub fn add_edge(&mut self, from: &CityId, to: &CityId, weight: u32) -> Result<bool, WorldError> {
        if !self.cities.contains_key(from) {
            return Err(WorldError::CityNotFound(from.clone()));
        }
        if !self.cities.contains_key(to) {
            return Err(WorldError::CityNotFound(to.clone()));
        }
        if from == to {
            return Err(WorldError::InvalidEdge {
                from: from.clone(),
                to: to.clone(),
                reason: "self-loop".to_owned(),
            });
        }
        if weight == 0 {
            return Err(WorldError::InvalidEdge {
                from: from.clone(),
                to: to.clone(),
                reason: "capacity must be positive".to_owned(),
            });
        }

        let key = EdgeKey::new(from, to);
        if self.edges.contains_key(&key) {
            return Ok(false);
        }

        let seq = self.edges.len();
        self.edges.insert(key.clone(), Edge { key, weight, seq });
        self.adjacency.entry(from.clone()).or_default().push(to.clone());
        self.adjacency.entry(to.clone()).or_default().push(from.clone());
        Ok(true)
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over all edges in sorted-pair order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// The edge joining two cities, if any.
    pub fn edge(&self, a: &CityId, b: &CityId) -> Option<&Edge> {
        self.edges.get(&EdgeKey::new(a, b))
    }

    /// Capacity of the edge joining two cities, if any.
    pub fn edge_between(&self, a: &CityId, b: &CityId) -> Option<u32> {
        self.edge(a, b).map(|e| e.weight)
    }

    // -------------------------------------------------------------------
    // Graph queries
    // -------------------------------------------------------------------

    /// Neighbors of a city in edge insertion order. Unknown cities have none.
    pub fn neighbors(&self, city: &CityId) -> &[CityId] {
        self.adjacency.get(city).map_or(&[], Vec::as_slice)
    }

    /// Whether two cities share an edge.
    pub fn are_adjacent(&self, a: &CityId, b: &CityId) -> bool {
        self.edge(a, b).is_some()
    }

    /// Hop-minimal path from `start` to `goal`, both endpoints included.
    ///
    /// Returns `Some(vec![start])` when `start == goal` and `None` when the
    /// cities are in different components or either is unknown.
    pub fn shortest_path(&self, start: &CityId, goal: &CityId) -> Option<Vec<CityId>> {
        if !self.cities.contains_key(start) || !self.cities.contains_key(goal) {
            return None;
        }
        if start == goal {
            return Some(vec![start.clone()]);
        }

        let mut visited: BTreeSet<&CityId> = BTreeSet::new();
        let mut prev: BTreeMap<&CityId, &CityId> = BTreeMap::new();
        let mut queue: VecDeque<&CityId> = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        'search: while let Some(current) = queue.pop_front() {
            for neighbor in self.neighbors(current) {
                if !visited.insert(neighbor) {
                    continue;
                }
                prev.insert(neighbor, current);
                if neighbor == goal {
                    break 'search;
                }
                queue.push_back(neighbor);
            }
        }

        if !prev.contains_key(goal) {
            return None;
        }

        // Reconstruct path.
        let mut path = VecDeque::new();
        let mut current = goal;
        path.push_front(current.clone());
        while let Some(&predecessor) = prev.get(current) {
            path.push_front(predecessor.clone());
            current = predecessor;
        }

        Some(path.into_iter().collect())
    }

    /// Whether every city is reachable from every other.
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.cities.keys().next() else {
            return true;
        };

        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.neighbors(current) {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        visited.len() == self.cities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CityId {
        CityId::new(s)
    }

    /// a - b - d
    /// |       |
    /// c ------+
    ///
    /// plus an isolated city `z`.
    fn make_square() -> CityGraph {
        let mut g = CityGraph::new();
        for (name, pop) in [("a", 10), ("b", 20), ("c", 30), ("d", 40), ("z", 5)] {
            let _ = g.add_city(id(name), pop);
        }
        let _ = g.add_edge(&id("a"), &id("b"), 10);
        let _ = g.add_edge(&id("a"), &id("c"), 20);
        let _ = g.add_edge(&id("b"), &id("d"), 30);
        let _ = g.add_edge(&id("c"), &id("d"), 40);
        g
    }

    #[test]
    fn add_cities_and_edges() {
        let g = make_square();
        assert_eq!(g.city_count(), 5);
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn duplicate_city_rejected() {
        let mut g = CityGraph::new();
        assert!(g.add_city(id("a"), 1).is_ok());
        assert!(matches!(g.add_city(id("a"), 2), Err(WorldError::DuplicateCity(_))));
    }

    #[test]
    fn edge_requires_valid_endpoints() {
        let mut g = CityGraph::new();
        let _ = g.add_city(id("a"), 1);
        assert!(matches!(
            g.add_edge(&id("a"), &id("missing"), 3),
            Err(WorldError::CityNotFound(_))
        ));
    }

    #[test]
    fn self_loops_and_zero_capacity_rejected() {
        let mut g = CityGraph::new();
        let _ = g.add_city(id("a"), 1);
        let _ = g.add_city(id("b"), 1);
        assert!(g.add_edge(&id("a"), &id("a"), 3).is_err());
        assert!(g.add_edge(&id("a"), &id("b"), 0).is_err());
    }

    #[test]
    fn first_edge_insertion_wins() {
        let mut g = make_square();
        assert_eq!(g.add_edge(&id("b"), &id("a"), 99).ok(), Some(false));
        assert_eq!(g.edge_between(&id("a"), &id("b")), Some(10));
        assert_eq!(g.edge_between(&id("b"), &id("a")), Some(10));
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn neighbors_follow_edge_insertion_order() {
        let g = make_square();
        assert_eq!(g.neighbors(&id("a")), &[id("b"), id("c")]);
        assert_eq!(g.neighbors(&id("d")), &[id("b"), id("c")]);
        assert!(g.neighbors(&id("z")).is_empty());
        assert!(g.neighbors(&id("unknown")).is_empty());
    }

    #[test]
    fn shortest_path_to_self() {
        let g = make_square();
        assert_eq!(g.shortest_path(&id("a"), &id("a")), Some(vec![id("a")]));
        assert_eq!(g.shortest_path(&id("z"), &id("z")), Some(vec![id("z")]));
    }

    #[test]
    fn shortest_path_ties_break_by_insertion_order() {
        let g = make_square();
        // a -> d has two 2-hop routes; a-b was inserted before a-c.
        assert_eq!(
            g.shortest_path(&id("a"), &id("d")),
            Some(vec![id("a"), id("b"), id("d")])
        );
        // d -> a: d-b was inserted before d-c.
        assert_eq!(
            g.shortest_path(&id("d"), &id("a")),
            Some(vec![id("d"), id("b"), id("a")])
        );
    }

    #[test]
    fn shortest_path_absent_across_components() {
        let g = make_square();
        assert!(g.shortest_path(&id("a"), &id("z")).is_none());
        assert!(g.shortest_path(&id("a"), &id("unknown")).is_none());
    }

    #[test]
    fn connectivity() {
        let mut g = make_square();
        assert!(!g.is_connected());
        let _ = g.add_edge(&id("d"), &id("z"), 1);
        assert!(g.is_connected());
        assert!(CityGraph::new().is_connected());
    }

    #[test]
    fn owned_cities_listed_in_id_order() {
        let mut g = make_square();
        let j0 = PlayerId::new("j0");
        for name in ["d", "a"] {
            if let Some(c) = g.city_mut(&id(name)) {
                c.owner = Some(j0.clone());
            }
        }
        let owned: Vec<CityId> = g.cities_owned_by(&j0).into_iter().collect();
        assert_eq!(owned, vec![id("a"), id("d")]);
    }
}
