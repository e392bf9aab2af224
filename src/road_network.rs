// Loads a road network from two files: a headerless CSV of "id,lon,lat" vertex lines, and an
// adjacency list in which each line "v w1 w2 ..." connects v to every listed w.
use std::error::Error;
use std::fs::File;
use std::hash::Hash;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use super::geometry::GeoPoint;
use super::graph::{Graph, VertexId};


pub fn load_graph<K, P, D>(vertices_path: &Path, edges_path: &Path)
                           -> Result<Graph<K, P, D>, Box<dyn Error>>
    where K: Hash + Ord + Clone
{
    let positions = read_vertices(vertices_path)?;
    let mut graph = Graph::new(positions.len());
    for (vertex, position) in positions.into_iter().enumerate() {
        graph.set_vertex_position(vertex, position)?;
    }
    read_edges(edges_path, &mut graph)?;
    log::info!("loaded road network with {} vertices and {} edges", graph.vertex_count(),
               graph.edge_count());
    Ok(graph)
}

/// Reads vertex positions, indexed by vertex id.  Ids must cover 0..n with no gaps.
pub fn read_vertices(vertices_path: &Path) -> Result<Vec<GeoPoint>, Box<dyn Error>> {
    let file = File::open(vertices_path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows: Vec<(VertexId, GeoPoint)> = vec![];
    for result in reader.records() {
        let record = result?;
        if record.len() < 3 {
            return Err(format!("vertex line {:?} needs an id, longitude and latitude",
                               record).into());
        }
        let id: VertexId = record[0].parse()?;
        let lon: f64 = record[1].parse()?;
        let lat: f64 = record[2].parse()?;
        rows.push((id, GeoPoint::new(lat, lon)));
    }

    let mut positions: Vec<Option<GeoPoint>> = vec![None; rows.len()];
    for (id, position) in rows {
        match positions.get_mut(id) {
            Some(slot) if slot.is_none() => *slot = Some(position),
            Some(_) => return Err(format!("vertex {} is listed twice", id).into()),
            None => return Err(format!("vertex id {} is out of range", id).into()),
        }
    }
    // every slot is filled: there are as many distinct in-range ids as slots
    Ok(positions.into_iter().flatten().collect())
}

/// Adds the edges of an adjacency list to the graph, costed by great-circle distance.  Returns
/// the number of edge entries read.
pub fn read_edges<K, P, D>(edges_path: &Path, graph: &mut Graph<K, P, D>)
                           -> Result<usize, Box<dyn Error>>
    where K: Hash + Ord + Clone
{
    let file = File::open(edges_path)?;
    let reader = BufReader::new(file);
    let mut num_entries = 0;
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut ids = line.split_whitespace().map(|ss| ss.parse::<VertexId>());
        let vv = match ids.next() {
            Some(vv) => vv?,
            None => continue,
        };
        for ww in ids {
            let ww = ww?;
            if vv == ww {
                log::warn!("ignoring self loop on vertex {}", vv);
                continue;
            }
            graph.connect(vv, ww)?;
            num_entries += 1;
        }
    }
    Ok(num_entries)
}
