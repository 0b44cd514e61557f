//! World loading from a finished map definition.
//!
//! The map generator is an external collaborator; it hands the engine a list
//! of cities and a list of weighted edges. Anything structurally wrong here
//! (duplicate ids, dangling endpoints) is fatal and aborts initialization.

use std::path::Path;

use dominion_types::WorldDefinition;
use tracing::{info, warn};

use crate::error::WorldError;
use crate::graph::CityGraph;

/// Build a [`CityGraph`] from a world definition.
///
/// Cities are added first, then edges in definition order (which fixes the
/// neighbor enumeration order). A repeated unordered pair is skipped with a
/// warning; the first insertion wins.
///
/// # Errors
///
/// Returns [`WorldError::DuplicateCity`], [`WorldError::CityNotFound`] for
/// dangling edge endpoints, or [`WorldError::InvalidEdge`].
pub fn build_graph(definition: &WorldDefinition) -> Result<CityGraph, WorldError> {
    let mut graph = CityGraph::new();

    for spec in &definition.cities {
        graph.add_city(spec.id.clone(), spec.population)?;
    }

    for spec in &definition.edges {
        let inserted = graph.add_edge(&spec.from, &spec.to, spec.weight)?;
        if !inserted {
            warn!(
                from = %spec.from,
                to = %spec.to,
                weight = spec.weight,
                "Duplicate edge ignored; first insertion wins"
            );
        }
    }

    info!(
        cities = graph.city_count(),
        edges = graph.edge_count(),
        connected = graph.is_connected(),
        "World graph built"
    );

    Ok(graph)
}

/// Parse a world definition from JSON text and build its graph.
///
/// # Errors
///
/// Returns [`WorldError::Json`] for malformed JSON, or any
/// [`build_graph`] error.
pub fn parse_world(json: &str) -> Result<CityGraph, WorldError> {
    let definition: WorldDefinition = serde_json::from_str(json)?;
    build_graph(&definition)
}

/// Load a world definition from a JSON file and build its graph.
///
/// # Errors
///
/// Returns [`WorldError::Io`] if the file cannot be read, or any
/// [`parse_world`] error.
pub fn load_world(path: &Path) -> Result<CityGraph, WorldError> {
    let contents = std::fs::read_to_string(path)?;
    parse_world(&contents)
}

#[cfg(test)]
mod tests {
    use dominion_types::{CityId, CitySpec, EdgeSpec};

    use super::*;

    fn city(id: &str, population: u32) -> CitySpec {
        CitySpec {
            id: CityId::new(id),
            population,
        }
    }

    fn edge(from: &str, to: &str, weight: u32) -> EdgeSpec {
        EdgeSpec {
            from: CityId::new(from),
            to: CityId::new(to),
            weight,
        }
    }

    #[test]
    fn builds_graph_from_definition() {
        let def = WorldDefinition {
            cities: vec![city("a", 50), city("b", 0)],
            edges: vec![edge("a", "b", 30)],
        };
        let graph = build_graph(&def);
        assert!(graph.is_ok());
        let graph = graph.unwrap_or_default();
        assert_eq!(graph.city_count(), 2);
        assert_eq!(graph.edge_between(&CityId::new("b"), &CityId::new("a")), Some(30));
        assert_eq!(graph.city(&CityId::new("a")).map(|c| c.population), Some(50));
    }

    #[test]
    fn dangling_edge_is_fatal() {
        let def = WorldDefinition {
            cities: vec![city("a", 50)],
            edges: vec![edge("a", "ghost", 30)],
        };
        assert!(matches!(build_graph(&def), Err(WorldError::CityNotFound(_))));
    }

    #[test]
    fn duplicate_city_is_fatal() {
        let def = WorldDefinition {
            cities: vec![city("a", 50), city("a", 10)],
            edges: Vec::new(),
        };
        assert!(matches!(build_graph(&def), Err(WorldError::DuplicateCity(_))));
    }

    #[test]
    fn repeated_pair_keeps_first_weight() {
        let def = WorldDefinition {
            cities: vec![city("a", 1), city("b", 1)],
            edges: vec![edge("a", "b", 30), edge("b", "a", 5)],
        };
        let graph = build_graph(&def).unwrap_or_default();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_between(&CityId::new("a"), &CityId::new("b")), Some(30));
    }

    #[test]
    fn parses_legacy_map_json() {
        let json = r#"{
            "cidades": [{"id": "base_j0", "populacao": 0}, {"id": "c1", "populacao": 50}],
            "arestas": [{"de": "base_j0", "para": "c1", "peso": 30}]
        }"#;
        let graph = parse_world(json);
        assert!(graph.is_ok());
        assert_eq!(graph.map(|g| g.edge_count()).ok(), Some(1));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(parse_world("{ not json"), Err(WorldError::Json { .. })));
    }

    #[test]
    fn missing_file_is_reported() {
        let result = load_world(Path::new("/definitely/not/a/map.json"));
        assert!(matches!(result, Err(WorldError::Io { .. })));
    }
}
