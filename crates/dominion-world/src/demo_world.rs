//! Built-in two-player skirmish map.
//!
//! Used when no map file is configured. Two bases sit at opposite ends of a
//! ring of six neutral cities, with a contested centre reachable from both
//! sides:
//!
//! ```text
//!             west_hills(30) --25-- north_pass(45) --25-- east_hills(30)
//!            /                          |                          \
//!   base_j0 --40                        60                        40-- base_j1
//!            \                          |                          /
//!             west_farms(50) --25-- south_ford(45) --25-- east_farms(50)
//!                                       |
//!                                       80
//!                                       |
//!                                    citadel(120)
//! ```

use dominion_types::{CityId, CitySpec, EdgeSpec, WorldDefinition};

use crate::error::WorldError;
use crate::graph::CityGraph;
use crate::loader;

/// Helper to build a [`CitySpec`].
fn city(id: &str, population: u32) -> CitySpec {
    CitySpec {
        id: CityId::new(id),
        population,
    }
}

/// Helper to build an [`EdgeSpec`].
fn road(from: &str, to: &str, weight: u32) -> EdgeSpec {
    EdgeSpec {
        from: CityId::new(from),
        to: CityId::new(to),
        weight,
    }
}

/// The skirmish map as a world definition.
pub fn demo_definition() -> WorldDefinition {
    WorldDefinition {
        cities: vec![
            city("base_j0", 0),
            city("base_j1", 0),
            city("west_hills", 30),
            city("west_farms", 50),
            city("north_pass", 45),
            city("south_ford", 45),
            city("east_hills", 30),
            city("east_farms", 50),
            city("citadel", 120),
        ],
        edges: vec![
            road("base_j0", "west_hills", 40),
            road("base_j0", "west_farms", 40),
            road("west_hills", "north_pass", 25),
            road("west_farms", "south_ford", 25),
            road("north_pass", "south_ford", 60),
            road("north_pass", "east_hills", 25),
            road("south_ford", "east_farms", 25),
            road("south_ford", "citadel", 80),
            road("base_j1", "east_hills", 40),
            road("base_j1", "east_farms", 40),
        ],
    }
}

/// Build the skirmish map.
///
/// # Errors
///
/// Returns [`WorldError`] if the built-in definition is malformed.
pub fn demo_world() -> Result<CityGraph, WorldError> {
    loader::build_graph(&demo_definition())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_world_is_connected() {
        let graph = demo_world();
        assert!(graph.is_ok());
        let graph = graph.unwrap_or_default();
        assert_eq!(graph.city_count(), 9);
        assert_eq!(graph.edge_count(), 10);
        assert!(graph.is_connected());
    }

    #[test]
    fn bases_are_symmetric() {
        let graph = demo_world().unwrap_or_default();
        let west = graph.shortest_path(&CityId::new("base_j0"), &CityId::new("citadel"));
        let east = graph.shortest_path(&CityId::new("base_j1"), &CityId::new("citadel"));
        assert_eq!(west.map(|p| p.len()), Some(4));
        assert_eq!(east.map(|p| p.len()), Some(4));
    }
}
