// imports of other modules from this crate
mod error;
pub use error::{EngineError, Result};

mod geometry;
pub use geometry::{haversine_km, GeoPoint, EARTH_RADIUS_KM};

mod multimap;
pub use multimap::KeyedMultiMap;

mod heap;
pub use heap::{HeapOrder, IndexedBinaryHeap, Scored};

mod graph;
pub use graph::{CostDimension, Edge, EdgeId, Graph, VertexId};

mod locator;
pub use locator::{NearestVertex, SpatialLocator};

mod shortest_path;
pub use shortest_path::{dijkstra, dijkstra_on, shortest_path, CostDigraph, Path, ShortestPaths};

mod mst;
pub use mst::{minimum_spanning_tree, minimum_spanning_tree_from, MinimumSpanningTree};

mod components;
pub use components::ConnectedComponents;

mod records;
pub use records::{Citation, PoliceStation};

pub mod road_network;

mod config_utils;

mod config;
pub use config::{EngineConfig, PathQuery};

mod analysis;
pub use analysis::{Analysis, Connection, LoadReport, Phase, RoadGraph, RoutedPath,
                   SignificantNetwork, StationLoad};

#[cfg(test)]
mod test_utils;


/// Parameters of the nearest-vertex search.
pub trait LocatorConfig {
    fn get_cluster_radius_km(&self) -> f64;
    fn get_cache_size(&self) -> usize;
}

/// Defines the tolerances used when attaching records to the road network.
pub trait AnalysisConfig: LocatorConfig {
    fn get_citation_tolerance_km(&self) -> f64;
    fn get_station_tolerance_km(&self) -> f64;
    fn get_query_tolerance_km(&self) -> f64;
}
