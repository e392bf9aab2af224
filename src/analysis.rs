// The analysis session: attaches citations and police stations to a road network, then answers
// queries about it.  Loading operations and queries are separated by explicit phases, so load
// costs can't be read before every citation has been counted.
use std::cmp::{max, Reverse};
use std::error::Error;
use std::fmt;
use std::time::Instant;

use itertools::Itertools;
use rayon::prelude::*;

use super::components::ConnectedComponents;
use super::config::{EngineConfig, PathQuery};
use super::error::{EngineError, Result};
use super::geometry::{nearest_of, GeoPoint};
use super::graph::{CostDimension, EdgeId, Graph, VertexId};
use super::heap::{IndexedBinaryHeap, Scored};
use super::locator::{NearestVertex, SpatialLocator};
use super::mst::{minimum_spanning_tree, MinimumSpanningTree};
use super::records::{Citation, PoliceStation};
use super::road_network;
use super::shortest_path::{dijkstra_on, path_from, CostDigraph, Path, ShortestPaths};
use super::AnalysisConfig;


/// A road network whose vertices hold citations keyed by their vertex id, and at most one
/// police station each.
pub type RoadGraph = Graph<VertexId, Citation, PoliceStation>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    CostsComputed,
    Queryable,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Phase::Loading => "loading",
            Phase::CostsComputed => "costs computed",
            Phase::Queryable => "queryable",
        };
        write!(f, "{}", name)
    }
}

/// A shortest path between two geocoordinates, with the vertices they resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedPath {
    pub start: NearestVertex,
    pub end: NearestVertex,
    pub path: Path,
}

/// One link of a significant network: the road path between two significant vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub from: VertexId,
    pub to: VertexId,
    pub path: Path,
}

/// The cheapest road network linking the most-cited vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct SignificantNetwork {
    /// The significant vertices, most cited first.
    pub vertices: Vec<VertexId>,
    pub connections: Vec<Connection>,
    pub total_cost: f64,
    /// Significant vertices with no road path to the most-cited one.
    pub unreached: Vec<VertexId>,
}

impl SignificantNetwork {
    /// The distinct road segments used by the network, each with the smaller vertex first.
    pub fn road_segments(&self) -> Vec<(VertexId, VertexId)> {
        self.connections.iter()
            .flat_map(|conn| conn.path.vertices.windows(2)
                      .map(|pair| (pair[0].min(pair[1]), pair[0].max(pair[1])))
                      .collect::<Vec<_>>())
            .unique()
            .collect()
    }
}

/// The citations closest to one police station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationLoad {
    pub station_vertex: VertexId,
    pub station_id: u64,
    pub citation_count: usize,
    /// The number of cited vertices assigned to this station.
    pub vertex_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub citation_count: usize,
    pub station_count: usize,
    pub highest_citation: Option<Citation>,
    pub highest_station: Option<PoliceStation>,
    pub vertex_count: usize,
    pub edge_count: usize,
    pub degraded_attachments: usize,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "citations loaded: {}", self.citation_count)?;
        match &self.highest_citation {
            Some(cc) => writeln!(f, "highest citation: {} {} {} at ({}, {}) in {}", cc.id,
                                 cc.date, cc.infraction, cc.position.lat, cc.position.lon,
                                 cc.locality)?,
            None => writeln!(f, "highest citation: none")?,
        }
        writeln!(f, "police stations loaded: {}", self.station_count)?;
        match &self.highest_station {
            Some(ss) => writeln!(f, "highest station: {} {} at ({}, {})", ss.id, ss.name,
                                 ss.position.lat, ss.position.lon)?,
            None => writeln!(f, "highest station: none")?,
        }
        writeln!(f, "vertices: {}", self.vertex_count)?;
        writeln!(f, "edges: {}", self.edge_count)?;
        write!(f, "attachments outside tolerance: {}", self.degraded_attachments)
    }
}


pub struct Analysis<'a, C: AnalysisConfig> {
    graph: RoadGraph,
    cfg: &'a C,
    phase: Phase,
    // built on the first lookup, and dropped whenever a vertex moves
    locator: Option<SpatialLocator>,
    station_count: usize,
    highest_citation: Option<Citation>,
    highest_station: Option<PoliceStation>,
    degraded_attachments: usize,
}

impl<'a> Analysis<'a, EngineConfig> {
    /// Loads the road network and records named in the config, and prepares them for queries.
    pub fn load(cfg: &'a EngineConfig) -> std::result::Result<Self, Box<dyn Error>> {
        let graph = road_network::load_graph(&cfg.vertices_path, &cfg.edges_path)?;
        let mut analysis = Analysis::new(graph, cfg);

        let citations = Citation::all_from_csv(&cfg.citations_path)?;
        analysis.attach_citations(citations)?;
        if let Some(stations_path) = &cfg.stations_path {
            let stations = PoliceStation::all_from_csv(stations_path)?;
            analysis.attach_stations(stations)?;
        }

        analysis.recompute_load_costs()?;
        analysis.seal()?;
        Ok(analysis)
    }
}

impl<'a, C: AnalysisConfig> Analysis<'a, C> {
    pub fn new(graph: RoadGraph, cfg: &'a C) -> Analysis<'a, C> {
        Analysis {
            graph,
            cfg,
            phase: Phase::Loading,
            locator: None,
            station_count: 0,
            highest_citation: None,
            highest_station: None,
            degraded_attachments: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    fn require(&self, allowed: &[Phase], operation: &'static str) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(EngineError::WrongPhase{operation, phase: self.phase.to_string()})
        }
    }

    fn locate(&mut self, position: &GeoPoint, tolerance_km: f64) -> Result<NearestVertex> {
        let graph = &self.graph;
        let cfg = self.cfg;
        let locator = self.locator.get_or_insert_with(|| SpatialLocator::build(graph, cfg));
        locator.nearest_vertex(position.lat, position.lon, tolerance_km)
    }

    // load-phase operations

    pub fn set_vertex_position(&mut self, vertex: VertexId, position: GeoPoint) -> Result<()> {
        self.require(&[Phase::Loading], "set_vertex_position")?;
        self.graph.set_vertex_position(vertex, position)?;
        self.locator = None;
        Ok(())
    }

    pub fn add_edge(&mut self, vv: VertexId, ww: VertexId, distance: f64) -> Result<EdgeId> {
        self.require(&[Phase::Loading], "add_edge")?;
        self.graph.add_edge(vv, ww, distance)
    }

    pub fn connect(&mut self, vv: VertexId, ww: VertexId) -> Result<EdgeId> {
        self.require(&[Phase::Loading], "connect")?;
        self.graph.connect(vv, ww)
    }

    /// Adds a citation to a vertex's payload, keyed by the vertex id.
    pub fn insert_payload(&mut self, vertex: VertexId, citation: Citation) -> Result<()> {
        self.require(&[Phase::Loading], "insert_payload")?;
        let is_highest = match &self.highest_citation {
            Some(highest) => citation.id > highest.id,
            None => true,
        };
        if is_highest {
            self.highest_citation = Some(citation.clone());
        }
        self.graph.insert_payload(vertex, vertex, citation)
    }

    pub fn set_distinctive_item(&mut self, vertex: VertexId, station: PoliceStation)
                                -> Result<Option<PoliceStation>> {
        self.require(&[Phase::Loading], "set_distinctive_item")?;
        let is_highest = match &self.highest_station {
            Some(highest) => station.id > highest.id,
            None => true,
        };
        if is_highest {
            self.highest_station = Some(station.clone());
        }
        self.station_count += 1;
        let station_id = station.id;
        let replaced = self.graph.set_distinctive_item(vertex, station)?;
        if let Some(old) = &replaced {
            log::warn!("station {} replaced station {} at vertex {}", station_id, old.id,
                       vertex);
        }
        Ok(replaced)
    }

    /// Attaches a citation to the vertex nearest to it.
    pub fn attach_citation(&mut self, citation: Citation) -> Result<NearestVertex> {
        self.require(&[Phase::Loading], "attach_citation")?;
        let nearest = self.locate(&citation.position, self.cfg.get_citation_tolerance_km())?;
        if !nearest.within_tolerance {
            log::debug!("citation {} is {:.3} km from its nearest vertex {}", citation.id,
                        nearest.distance_km, nearest.vertex);
            self.degraded_attachments += 1;
        }
        self.insert_payload(nearest.vertex, citation)?;
        Ok(nearest)
    }

    pub fn attach_citations<I>(&mut self, citations: I) -> Result<usize>
        where I: IntoIterator<Item = Citation>
    {
        let start = Instant::now();
        let degraded_before = self.degraded_attachments;
        let mut num_attached = 0;
        for citation in citations {
            self.attach_citation(citation)?;
            num_attached += 1;
        }
        log::info!("attached {} citations in {:.2}s", num_attached,
                   start.elapsed().as_secs_f64());
        let degraded = self.degraded_attachments - degraded_before;
        if degraded > 0 {
            log::warn!("{} citations had no vertex within {} km", degraded,
                       self.cfg.get_citation_tolerance_km());
        }
        Ok(num_attached)
    }

    /// Makes a police station the distinctive item of the vertex nearest to it.
    pub fn attach_station(&mut self, station: PoliceStation) -> Result<NearestVertex> {
        self.require(&[Phase::Loading], "attach_station")?;
        let nearest = self.locate(&station.position, self.cfg.get_station_tolerance_km())?;
        if !nearest.within_tolerance {
            log::warn!("station {} is {:.3} km from its nearest vertex {}", station.id,
                       nearest.distance_km, nearest.vertex);
            self.degraded_attachments += 1;
        }
        self.set_distinctive_item(nearest.vertex, station)?;
        Ok(nearest)
    }

    pub fn attach_stations<I>(&mut self, stations: I) -> Result<usize>
        where I: IntoIterator<Item = PoliceStation>
    {
        let mut num_attached = 0;
        for station in stations {
            self.attach_station(station)?;
            num_attached += 1;
        }
        log::info!("attached {} police stations", num_attached);
        Ok(num_attached)
    }

    // phase transitions

    /// Computes every edge's load from the payload attached so far.  Once this is called, no
    /// more records can be attached.
    pub fn recompute_load_costs(&mut self) -> Result<()> {
        self.require(&[Phase::Loading, Phase::CostsComputed], "recompute_load_costs")?;
        self.graph.recompute_load_costs();
        self.phase = Phase::CostsComputed;
        log::info!("computed load costs for {} edges", self.graph.edge_count());
        Ok(())
    }

    pub fn seal(&mut self) -> Result<()> {
        self.require(&[Phase::CostsComputed], "seal")?;
        if self.locator.is_none() {
            self.locator = Some(SpatialLocator::build(&self.graph, self.cfg));
        }
        self.phase = Phase::Queryable;
        log::info!("analysis is ready for queries");
        Ok(())
    }

    // queries

    pub fn nearest_vertex(&mut self, position: GeoPoint) -> Result<NearestVertex> {
        self.require(&[Phase::Queryable], "nearest_vertex")?;
        self.locate(&position, self.cfg.get_query_tolerance_km())
    }

    pub fn shortest_path(&mut self, start: GeoPoint, end: GeoPoint, dimension: CostDimension)
                         -> Result<RoutedPath> {
        let mut paths = self.shortest_paths(&[PathQuery{start, end}], dimension)?;
        Ok(paths.remove(0))
    }

    /// Answers several path queries, searching in parallel.
    pub fn shortest_paths(&mut self, queries: &[PathQuery], dimension: CostDimension)
                          -> Result<Vec<RoutedPath>> {
        self.require(&[Phase::Queryable], "shortest_paths")?;
        let tolerance_km = self.cfg.get_query_tolerance_km();
        let mut endpoints = Vec::with_capacity(queries.len());
        for query in queries {
            let start = self.locate(&query.start, tolerance_km)?;
            let end = self.locate(&query.end, tolerance_km)?;
            endpoints.push((start, end));
        }

        let digraph = CostDigraph::from_graph(&self.graph, dimension)?;
        endpoints.par_iter()
            .map(|&(start, end)| -> Result<RoutedPath> {
                let paths = dijkstra_on(&digraph, start.vertex, Some(end.vertex))?;
                Ok(RoutedPath{start, end, path: path_from(&paths, end.vertex)?})
            })
            .collect()
    }

    pub fn minimum_spanning_tree(&self, dimension: CostDimension)
                                 -> Result<MinimumSpanningTree> {
        self.require(&[Phase::Queryable], "minimum_spanning_tree")?;
        minimum_spanning_tree(&self.graph, dimension)
    }

    pub fn connected_components(&self) -> Result<ConnectedComponents> {
        self.require(&[Phase::Queryable], "connected_components")?;
        Ok(ConnectedComponents::new(&self.graph))
    }

    pub fn payload_count_of(&self, vertex: VertexId) -> Result<usize> {
        self.require(&[Phase::Queryable], "payload_count_of")?;
        self.graph.payload_count_of(vertex)
    }

    pub fn degree_of(&self, vertex: VertexId) -> Result<usize> {
        self.require(&[Phase::Queryable], "degree_of")?;
        self.graph.degree_of(vertex)
    }

    /// Up to `count` vertices with the most citations, as (vertex, citation count), most cited
    /// first.  Ties go to the lower vertex id; vertices without citations are never included.
    pub fn most_cited_vertices(&self, count: usize) -> Result<Vec<(VertexId, usize)>> {
        self.require(&[Phase::Queryable], "most_cited_vertices")?;
        let mut ranking = IndexedBinaryHeap::max_heap(max(self.graph.vertex_count(), 1));
        for vertex in 0..self.graph.vertex_count() {
            let num_citations = self.graph.payload_count_of(vertex)?;
            if num_citations > 0 {
                ranking.insert(Scored((num_citations, Reverse(vertex)), vertex))?;
            }
        }
        let mut most_cited = vec![];
        while most_cited.len() < count {
            match ranking.poll() {
                Some(Scored((num_citations, _), vertex)) => most_cited.push((vertex, num_citations)),
                None => break,
            }
        }
        Ok(most_cited)
    }

    /// Connects the `count` most-cited vertices as cheaply as possible over the road network.
    ///
    /// The cheapest road path between every pair of significant vertices is found first; a
    /// minimum spanning tree over those path costs then picks which paths to keep.
    pub fn significant_network(&self, count: usize, dimension: CostDimension)
                               -> Result<SignificantNetwork> {
        self.require(&[Phase::Queryable], "significant_network")?;
        let vertices: Vec<VertexId> = self.most_cited_vertices(count)?
            .into_iter()
            .map(|(vertex, _)| vertex)
            .collect();

        let digraph = CostDigraph::from_graph(&self.graph, dimension)?;
        let searches: Vec<ShortestPaths> = vertices.par_iter()
            .map(|&vertex| dijkstra_on(&digraph, vertex, None))
            .collect::<Result<_>>()?;

        // the complete graph over the significant vertices, with path costs as distances
        let mut closure: Graph<(), (), ()> = Graph::new(vertices.len());
        for (ii, jj) in (0..vertices.len()).tuple_combinations() {
            let cost = searches[ii].cost_to(vertices[jj])?;
            if cost < f64::INFINITY {
                closure.add_edge(ii, jj, cost)?;
            }
        }
        let tree = minimum_spanning_tree(&closure, CostDimension::Distance)?;

        let mut connections = vec![];
        for &edge_id in tree.edges() {
            let (ii, jj) = closure.edges()[edge_id].endpoints();
            connections.push(Connection {
                from: vertices[ii],
                to: vertices[jj],
                path: path_from(&searches[ii], vertices[jj])?,
            });
        }
        let unreached = (0..vertices.len())
            .filter(|ii| !tree.spans(*ii))
            .map(|ii| vertices[ii])
            .collect();

        Ok(SignificantNetwork {
            vertices,
            connections,
            total_cost: tree.total_cost(),
            unreached,
        })
    }

    /// Assigns every cited vertex to the police station nearest to it, and totals the
    /// citations each station is responsible for.  Stations are listed by vertex.
    pub fn station_loads(&self) -> Result<Vec<StationLoad>> {
        self.require(&[Phase::Queryable], "station_loads")?;
        let stations: Vec<(VertexId, &PoliceStation)> = self.graph.distinctive_items().collect();
        let station_positions: Vec<GeoPoint> = stations.iter()
            .map(|(_, station)| station.position)
            .collect();
        let mut loads: Vec<StationLoad> = stations.iter()
            .map(|(vertex, station)| StationLoad {
                station_vertex: *vertex,
                station_id: station.id,
                citation_count: 0,
                vertex_count: 0,
            })
            .collect();

        for (vertex, position) in self.graph.positions() {
            let num_citations = self.graph.payload_count_of(vertex)?;
            if num_citations == 0 {
                continue;
            }
            if let Some((nearest, _)) = nearest_of(&position, &station_positions) {
                loads[nearest].citation_count += num_citations;
                loads[nearest].vertex_count += 1;
            }
        }
        Ok(loads)
    }

    pub fn load_report(&self) -> LoadReport {
        LoadReport {
            citation_count: self.graph.stored_payload_count(),
            station_count: self.station_count,
            highest_citation: self.highest_citation.clone(),
            highest_station: self.highest_station.clone(),
            vertex_count: self.graph.vertex_count(),
            edge_count: self.graph.edge_count(),
            degraded_attachments: self.degraded_attachments,
        }
    }
}


#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::LocatorConfig;

    struct DummyConfig;

    impl LocatorConfig for DummyConfig {
        fn get_cluster_radius_km(&self) -> f64 {
            50.
        }

        fn get_cache_size(&self) -> usize {
            20
        }
    }

    impl AnalysisConfig for DummyConfig {
        fn get_citation_tolerance_km(&self) -> f64 {
            0.5
        }

        fn get_station_tolerance_km(&self) -> f64 {
            0.1
        }

        fn get_query_tolerance_km(&self) -> f64 {
            0.5
        }
    }

    // vertices 0-8 form a 3x3 grid about 1.1 km apart, with vertex 0 at the south-west corner
    // and rows running north.  Vertex 9 lies 20 km north, with no roads.
    fn grid_position(vertex: VertexId) -> GeoPoint {
        if vertex == 9 {
            return GeoPoint::new(4.80, -74.10);
        }
        let row = (vertex / 3) as f64;
        let col = (vertex % 3) as f64;
        GeoPoint::new(4.60 + row * 0.01, -74.10 + col * 0.01)
    }

    fn citation(id: u64, infraction: &str, position: GeoPoint) -> Citation {
        Citation {
            id,
            date: String::from("2018/06/01 12:00:00"),
            detection: String::from("LAPIZ"),
            vehicle_class: String::from("AUTOMOVIL"),
            service_type: String::from("Particular"),
            infraction: String::from(infraction),
            description: String::new(),
            locality: String::from("CHAPINERO"),
            position,
        }
    }

    fn station(id: u64, position: GeoPoint) -> PoliceStation {
        PoliceStation {id, name: format!("ESTACION {}", id), position}
    }

    fn near(vertex: VertexId) -> GeoPoint {
        let pos = grid_position(vertex);
        GeoPoint::new(pos.lat + 0.001, pos.lon)
    }

    fn loaded_grid(cfg: &DummyConfig) -> Analysis<'_, DummyConfig> {
        let mut analysis = Analysis::new(Graph::new(10), cfg);
        for vertex in 0..10 {
            analysis.set_vertex_position(vertex, grid_position(vertex)).unwrap();
        }
        for vertex in 0..9 {
            if vertex % 3 < 2 {
                analysis.connect(vertex, vertex + 1).unwrap();
            }
            if vertex < 6 {
                analysis.connect(vertex, vertex + 3).unwrap();
            }
        }
        let citations = vec![
            citation(10, "C02", near(4)),
            citation(16, "C02", near(4)),
            citation(11, "D04", near(4)),
            citation(12, "C02", near(0)),
            citation(13, "C35", grid_position(0)),
            citation(14, "C02", near(8)),
            // far from every vertex; the closest is 9
            citation(15, "D04", GeoPoint::new(5.5, -74.10)),
        ];
        assert_eq!(analysis.attach_citations(citations).unwrap(), 7);
        analysis.attach_station(station(1, grid_position(0))).unwrap();
        analysis.attach_station(station(2, grid_position(5))).unwrap();
        analysis
    }

    fn sealed_grid(cfg: &DummyConfig) -> Analysis<'_, DummyConfig> {
        let mut analysis = loaded_grid(cfg);
        analysis.recompute_load_costs().unwrap();
        analysis.seal().unwrap();
        analysis
    }

    #[test]
    fn test_phases() {
        let cfg = DummyConfig;
        let mut analysis = loaded_grid(&cfg);
        assert_eq!(analysis.phase(), Phase::Loading);
        let err = analysis.connected_components().unwrap_err();
        assert_eq!(err, EngineError::WrongPhase{operation: "connected_components",
                                                phase: String::from("loading")});
        assert_eq!(format!("{}", err),
                   "connected_components is not allowed while the analysis is loading");
        assert!(analysis.seal().is_err());
        assert!(analysis.nearest_vertex(near(4)).is_err());

        analysis.recompute_load_costs().unwrap();
        assert_eq!(analysis.phase(), Phase::CostsComputed);
        // recomputing again is harmless
        analysis.recompute_load_costs().unwrap();
        assert!(analysis.attach_citation(citation(99, "C02", near(1))).is_err());
        assert!(analysis.connect(0, 4).is_err());
        assert!(analysis.degree_of(0).is_err());

        analysis.seal().unwrap();
        assert_eq!(analysis.phase(), Phase::Queryable);
        assert!(analysis.seal().is_err());
        assert!(analysis.recompute_load_costs().is_err());
        assert!(analysis.set_vertex_position(0, near(0)).is_err());
        assert_eq!(analysis.degree_of(4).unwrap(), 4);
        assert_eq!(analysis.degree_of(9).unwrap(), 0);
    }

    #[test]
    fn test_attachment() {
        let cfg = DummyConfig;
        let mut analysis = loaded_grid(&cfg);
        let found = analysis.attach_citation(citation(20, "C02", near(7))).unwrap();
        assert_eq!(found.vertex, 7);
        assert!(found.within_tolerance);
        let found = analysis.attach_citation(citation(21, "C02", GeoPoint::new(6.0, -74.1)))
            .unwrap();
        assert_eq!(found.vertex, 9);
        assert!(!found.within_tolerance);

        analysis.recompute_load_costs().unwrap();
        analysis.seal().unwrap();
        assert_eq!(analysis.payload_count_of(4).unwrap(), 3);
        assert_eq!(analysis.payload_count_of(0).unwrap(), 2);
        assert_eq!(analysis.payload_count_of(7).unwrap(), 1);
        assert_eq!(analysis.payload_count_of(9).unwrap(), 2);
        let bag = analysis.graph().payload_of(4).unwrap();
        assert_eq!(bag.key_count(), 1);
        assert_eq!(bag.value_count_of(&4), 3);
        let c02_at_4 = bag.values_of(&4).filter(|cc| cc.infraction == "C02").count();
        assert_eq!(c02_at_4, 2);
        assert_eq!(analysis.graph().distinctive_item_of(5).unwrap().map(|ss| ss.id), Some(2));
        assert!(analysis.payload_count_of(10).is_err());
    }

    #[test]
    fn test_load_report() {
        let cfg = DummyConfig;
        let analysis = sealed_grid(&cfg);
        let report = analysis.load_report();
        assert_eq!(report.citation_count, 7);
        assert_eq!(report.station_count, 2);
        assert_eq!(report.highest_citation.as_ref().map(|cc| cc.id), Some(16));
        assert_eq!(report.highest_station.as_ref().map(|ss| ss.id), Some(2));
        assert_eq!(report.vertex_count, 10);
        assert_eq!(report.edge_count, 12);
        assert_eq!(report.degraded_attachments, 1);
        let text = format!("{}", report);
        assert!(text.contains("citations loaded: 7"));
        assert!(text.contains("highest station: 2 ESTACION 2"));
        assert!(text.ends_with("attachments outside tolerance: 1"));
    }

    #[test]
    fn test_shortest_path_by_distance() {
        let cfg = DummyConfig;
        let mut analysis = sealed_grid(&cfg);
        let routed = analysis.shortest_path(near(0), near(8), CostDimension::Distance).unwrap();
        assert_eq!(routed.start.vertex, 0);
        assert_eq!(routed.end.vertex, 8);
        let path = &routed.path;
        assert_eq!(path.vertices.len(), 5);
        assert_eq!(path.vertices[0], 0);
        assert_eq!(path.vertices[4], 8);
        let length: f64 = path.vertices.windows(2)
            .map(|pair| grid_position(pair[0]).haversine_km(&grid_position(pair[1])))
            .sum();
        assert_relative_eq!(path.cost, length, epsilon=1e-9);

        let routed = analysis.shortest_path(near(3), near(3), CostDimension::Distance).unwrap();
        assert_eq!(routed.path.vertices, vec![3]);
        assert_eq!(routed.path.cost, 0.);
    }

    #[test]
    fn test_shortest_path_by_load() {
        let cfg = DummyConfig;
        let mut analysis = sealed_grid(&cfg);
        let routed = analysis.shortest_path(near(0), near(8), CostDimension::Load).unwrap();
        // going around the edge of the grid avoids the busy centre
        assert!(!routed.path.vertices.contains(&4));
        assert_eq!(routed.path.cost, 3.);
    }

    #[test]
    fn test_unreachable_path() {
        let cfg = DummyConfig;
        let mut analysis = sealed_grid(&cfg);
        let routed = analysis.shortest_path(near(0), grid_position(9), CostDimension::Distance)
            .unwrap();
        assert_eq!(routed.end.vertex, 9);
        assert!(routed.path.vertices.is_empty());
        assert_eq!(routed.path.cost, f64::INFINITY);
    }

    #[test]
    fn test_batch_matches_single_queries() {
        let cfg = DummyConfig;
        let mut analysis = sealed_grid(&cfg);
        let queries: Vec<PathQuery> = (0..9)
            .map(|vv| PathQuery{start: near(vv), end: near(8 - vv)})
            .collect();
        let batch = analysis.shortest_paths(&queries, CostDimension::Distance).unwrap();
        assert_eq!(batch.len(), queries.len());
        for (query, routed) in queries.iter().zip(batch.iter()) {
            let single = analysis.shortest_path(query.start, query.end, CostDimension::Distance)
                .unwrap();
            assert_relative_eq!(single.path.cost, routed.path.cost);
            assert_eq!(single.end, routed.end);
        }
    }

    #[test]
    fn test_tree_and_components() {
        let cfg = DummyConfig;
        let analysis = sealed_grid(&cfg);
        let mst = analysis.minimum_spanning_tree(CostDimension::Distance).unwrap();
        assert_eq!(mst.edges().len(), 8);
        assert!(!mst.spans(9));

        let components = analysis.connected_components().unwrap();
        assert_eq!(components.count(), 2);
        assert!(components.connected(0, 8).unwrap());
        assert!(!components.connected(0, 9).unwrap());
        assert_eq!(components.largest(), Some(0));
    }

    #[test]
    fn test_most_cited_vertices() {
        let cfg = DummyConfig;
        let analysis = sealed_grid(&cfg);
        assert_eq!(analysis.most_cited_vertices(2).unwrap(), vec![(4, 3), (0, 2)]);
        assert_eq!(analysis.most_cited_vertices(10).unwrap(),
                   vec![(4, 3), (0, 2), (8, 1), (9, 1)]);
        assert!(analysis.most_cited_vertices(0).unwrap().is_empty());
    }

    #[test]
    fn test_significant_network() {
        let cfg = DummyConfig;
        let analysis = sealed_grid(&cfg);
        let network = analysis.significant_network(3, CostDimension::Distance).unwrap();
        assert_eq!(network.vertices, vec![4, 0, 8]);
        assert!(network.unreached.is_empty());
        // the centre is two roads from each corner, and the corners are four roads apart
        assert_eq!(network.connections.len(), 2);
        for conn in &network.connections {
            assert!(conn.from == 4 || conn.to == 4);
            assert_eq!(conn.path.vertices.len(), 3);
        }
        let cost: f64 = network.connections.iter().map(|conn| conn.path.cost).sum();
        assert_relative_eq!(network.total_cost, cost, epsilon=1e-9);
        assert_eq!(network.road_segments().len(), 4);

        let network = analysis.significant_network(4, CostDimension::Distance).unwrap();
        assert_eq!(network.unreached, vec![9]);
        assert_eq!(network.connections.len(), 2);
    }

    #[test]
    fn test_station_loads() {
        let cfg = DummyConfig;
        let analysis = sealed_grid(&cfg);
        let loads = analysis.station_loads().unwrap();
        assert_eq!(loads, vec![
            StationLoad{station_vertex: 0, station_id: 1, citation_count: 2, vertex_count: 1},
            StationLoad{station_vertex: 5, station_id: 2, citation_count: 5, vertex_count: 3},
        ]);
        let total: usize = loads.iter().map(|load| load.citation_count).sum();
        assert_eq!(total, analysis.load_report().citation_count);
    }

    #[test]
    fn test_nearest_vertex_query() {
        let cfg = DummyConfig;
        let mut analysis = sealed_grid(&cfg);
        let found = analysis.nearest_vertex(near(6)).unwrap();
        assert_eq!(found.vertex, 6);
        assert!(found.within_tolerance);
        assert!(found.distance_km > 0.1 && found.distance_km < 0.12);
    }
}
