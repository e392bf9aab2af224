use std::path::Path;

use env_logger;
use road_citation_graph::{Analysis, CostDimension, EngineConfig, RoutedPath};


fn print_route(label: &str, routed: &RoutedPath) {
    let path = &routed.path;
    if path.is_reachable() {
        println!("  {}: cost {:.3} over {} vertices: {:?}", label, path.cost,
                 path.vertices.len(), path.vertices);
    } else {
        println!("  {}: no path from vertex {} to vertex {}", label, routed.start.vertex,
                 routed.end.vertex);
    }
}

fn main() {
    env_logger::init();
    let config_path = std::env::args().nth(1).unwrap_or_else(|| String::from("config.yaml"));
    let cfg = match EngineConfig::from_file(Path::new(&config_path)) {
        Err(why) => panic!("couldn't read config {}: {}", config_path, why),
        Ok(cfg) => cfg,
    };
    let mut analysis = match Analysis::load(&cfg) {
        Err(why) => panic!("couldn't load the analysis: {}", why),
        Ok(analysis) => analysis,
    };

    println!("{}", analysis.load_report());

    let components = analysis.connected_components().expect("analysis is sealed");
    let largest = components.largest()
        .and_then(|id| components.size_of(id))
        .unwrap_or(0);
    println!("connected components: {} (largest has {} vertices)", components.count(), largest);

    let mst = analysis.minimum_spanning_tree(CostDimension::Distance)
        .expect("analysis is sealed");
    println!("spanning tree from vertex 0: {} edges, {:.3} km", mst.edges().len(),
             mst.total_cost());

    for (ii, query) in cfg.queries.iter().enumerate() {
        println!("query {}: ({}, {}) to ({}, {})", ii, query.start.lat, query.start.lon,
                 query.end.lat, query.end.lon);
        for (label, dimension) in &[("by distance", CostDimension::Distance),
                                    ("by load", CostDimension::Load)] {
            match analysis.shortest_path(query.start, query.end, *dimension) {
                Ok(routed) => print_route(label, &routed),
                Err(why) => println!("  {}: failed: {}", label, why),
            }
        }
    }

    match analysis.significant_network(cfg.significant_vertex_count, CostDimension::Distance) {
        Ok(network) => {
            println!("network of the {} most cited vertices: {} road segments, {:.3} km",
                     network.vertices.len(), network.road_segments().len(), network.total_cost);
            if !network.unreached.is_empty() {
                println!("  unreachable: {:?}", network.unreached);
            }
        }
        Err(why) => println!("significant network failed: {}", why),
    }

    match analysis.station_loads() {
        Ok(loads) => {
            for load in loads {
                println!("station {} at vertex {}: {} citations over {} vertices",
                         load.station_id, load.station_vertex, load.citation_count,
                         load.vertex_count);
            }
        }
        Err(why) => println!("station loads failed: {}", why),
    }
}
