use std::path::PathBuf;
use glob::glob;

use road_citation_graph::{Analysis, CostDimension, EngineConfig, Phase, StationLoad};


fn load_config(env_dir: &str) -> EngineConfig {
    let mut path = PathBuf::from("tests/envs");
    path.push(env_dir);
    path.push("config.yaml");
    EngineConfig::from_file(&path).unwrap()
}

#[test]
fn test_load_small_grid() {
    let cfg = load_config("small-grid");
    let analysis = Analysis::load(&cfg).unwrap();
    assert_eq!(analysis.phase(), Phase::Queryable);

    let report = analysis.load_report();
    // the citation without coordinates is skipped
    assert_eq!(report.citation_count, 7);
    assert_eq!(report.highest_citation.map(|cc| cc.id), Some(16));
    assert_eq!(report.station_count, 2);
    assert_eq!(report.highest_station.map(|ss| ss.name),
               Some(String::from("ESTACION DE POLICIA CHAPINERO")));
    assert_eq!(report.vertex_count, 10);
    assert_eq!(report.edge_count, 12);
    // the citation far north of the grid
    assert_eq!(report.degraded_attachments, 1);

    assert_eq!(analysis.payload_count_of(4).unwrap(), 3);
    assert_eq!(analysis.payload_count_of(9).unwrap(), 1);
    assert_eq!(analysis.most_cited_vertices(2).unwrap(), vec![(4, 3), (0, 2)]);
}

#[test]
fn test_configured_queries() {
    let cfg = load_config("small-grid");
    let mut analysis = Analysis::load(&cfg).unwrap();
    assert_eq!(cfg.queries.len(), 2);

    let by_distance = analysis.shortest_paths(&cfg.queries, CostDimension::Distance).unwrap();
    assert_eq!(by_distance[0].start.vertex, 0);
    assert_eq!(by_distance[0].end.vertex, 8);
    assert_eq!(by_distance[0].path.vertices.len(), 5);
    // vertex 9 has no roads
    assert_eq!(by_distance[1].end.vertex, 9);
    assert!(!by_distance[1].path.is_reachable());
    assert_eq!(by_distance[1].path.cost, f64::INFINITY);

    let by_load = analysis.shortest_paths(&cfg.queries, CostDimension::Load).unwrap();
    assert!(!by_load[0].path.vertices.contains(&4));
    assert_eq!(by_load[0].path.cost, 3.);
}

#[test]
fn test_station_loads() {
    let cfg = load_config("small-grid");
    let analysis = Analysis::load(&cfg).unwrap();
    let loads = analysis.station_loads().unwrap();
    assert_eq!(loads, vec![
        StationLoad{station_vertex: 0, station_id: 1, citation_count: 2, vertex_count: 1},
        StationLoad{station_vertex: 5, station_id: 2, citation_count: 5, vertex_count: 3},
    ]);

    let cfg = load_config("no-stations");
    let analysis = Analysis::load(&cfg).unwrap();
    assert!(analysis.station_loads().unwrap().is_empty());
    assert_eq!(analysis.load_report().station_count, 0);
    assert_eq!(analysis.load_report().highest_station, None);
}

#[test]
fn test_significant_network() {
    let cfg = load_config("small-grid");
    let analysis = Analysis::load(&cfg).unwrap();
    let network = analysis.significant_network(cfg.significant_vertex_count,
                                               CostDimension::Distance).unwrap();
    assert_eq!(network.vertices, vec![4, 0, 8]);
    assert_eq!(network.connections.len(), 2);
    assert!(network.unreached.is_empty());
    assert_eq!(network.road_segments().len(), 4);
}

/// Checks properties that hold for any road network.
#[test]
fn test_all_envs() {
    for path in glob("tests/envs/*/config.yaml").expect("Failed to read glob pattern") {
        let path = path.unwrap();
        println!("Testing {:?}", path);
        let cfg = EngineConfig::from_file(&path).unwrap();
        let analysis = Analysis::load(&cfg).unwrap();
        let graph = analysis.graph();

        let components = analysis.connected_components().unwrap();
        let mst = analysis.minimum_spanning_tree(CostDimension::Distance).unwrap();
        let root_component = components.component_of(0).unwrap();
        assert_eq!(mst.edges().len() + 1, components.size_of(root_component).unwrap());
        for vertex in 0..graph.vertex_count() {
            assert_eq!(mst.spans(vertex), components.connected(0, vertex).unwrap());
        }

        // every edge's load is the citation count of its endpoints
        for edge in graph.edges() {
            let (vv, ww) = edge.endpoints();
            let expected = graph.payload_count_of(vv).unwrap() + graph.payload_count_of(ww).unwrap();
            assert_eq!(edge.load, expected);
        }

        let report = analysis.load_report();
        let total: usize = (0..graph.vertex_count())
            .map(|vertex| graph.payload_count_of(vertex).unwrap())
            .sum();
        assert_eq!(report.citation_count, total);
    }
}
