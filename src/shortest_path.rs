use std::hash::Hash;

use super::error::{EngineError, Result};
use super::graph::{CostDimension, Graph, VertexId};
use super::heap::{IndexedBinaryHeap, Scored};


#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub from: VertexId,
    pub to: VertexId,
    pub cost: f64,
}

/// A directed view of an undirected graph, with one arc in each direction per edge, costed by
/// a single cost dimension.
#[derive(Debug, Clone)]
pub struct CostDigraph {
    arcs: Vec<Vec<Arc>>,
    arc_count: usize,
    dimension: CostDimension,
}

impl CostDigraph {
    pub fn from_graph<K, P, D>(graph: &Graph<K, P, D>, dimension: CostDimension)
                               -> Result<CostDigraph>
        where K: Hash + Ord + Clone
    {
        graph.ensure_costs_ready(dimension)?;
        let mut arcs = vec![vec![]; graph.vertex_count()];
        for edge in graph.edges() {
            let (vv, ww) = edge.endpoints();
            let cost = edge.cost(dimension);
            arcs[vv].push(Arc{from: vv, to: ww, cost});
            arcs[ww].push(Arc{from: ww, to: vv, cost});
        }
        Ok(CostDigraph {
            arcs,
            arc_count: graph.edge_count() * 2,
            dimension,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arc_count
    }

    pub fn dimension(&self) -> CostDimension {
        self.dimension
    }

    pub fn arcs_from(&self, vertex: VertexId) -> &[Arc] {
        &self.arcs[vertex]
    }

    fn validate_vertex(&self, vertex: VertexId) -> Result<()> {
        if vertex >= self.arcs.len() {
            return Err(EngineError::VertexOutOfRange{vertex, vertex_count: self.arcs.len()});
        }
        Ok(())
    }
}


/// The result of one Dijkstra run.  Scratch arrays are owned by the result, so several runs
/// may share one graph.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    source: VertexId,
    distance: Vec<f64>,
    previous: Vec<Option<VertexId>>,
}

impl ShortestPaths {
    pub fn source(&self) -> VertexId {
        self.source
    }

    /// Cost of the best path found to `vertex`; infinite if it was not reached.
    pub fn cost_to(&self, vertex: VertexId) -> Result<f64> {
        self.validate_vertex(vertex)?;
        Ok(self.distance[vertex])
    }

    pub fn has_path_to(&self, vertex: VertexId) -> Result<bool> {
        Ok(self.cost_to(vertex)? < f64::INFINITY)
    }

    /// Vertices from the source to `vertex`, both included.  Empty if `vertex` was not reached.
    pub fn path_to(&self, vertex: VertexId) -> Result<Vec<VertexId>> {
        if !self.has_path_to(vertex)? {
            return Ok(vec![]);
        }
        let mut path = vec![vertex];
        let mut at = vertex;
        while let Some(prev) = self.previous[at] {
            path.push(prev);
            at = prev;
        }
        path.reverse();
        Ok(path)
    }

    fn validate_vertex(&self, vertex: VertexId) -> Result<()> {
        if vertex >= self.distance.len() {
            return Err(EngineError::VertexOutOfRange{vertex, vertex_count: self.distance.len()});
        }
        Ok(())
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub cost: f64,
    pub vertices: Vec<VertexId>,
}

impl Path {
    pub fn unreachable() -> Path {
        Path{cost: f64::INFINITY, vertices: vec![]}
    }

    pub fn is_reachable(&self) -> bool {
        !self.vertices.is_empty()
    }
}


/// Dijkstra's algorithm from `source` over the given directed view.  Costs must be
/// non-negative.
///
/// Decrease-key is emulated by inserting a vertex again with its improved distance and skipping
/// stale entries when they are polled.  If `target` is given, the search stops once the target
/// is settled; the costs of other vertices are then only upper bounds.
pub fn dijkstra_on(digraph: &CostDigraph, source: VertexId, target: Option<VertexId>)
                   -> Result<ShortestPaths> {
    digraph.validate_vertex(source)?;
    if let Some(target) = target {
        digraph.validate_vertex(target)?;
    }

    let size = digraph.vertex_count();
    let mut distance = vec![f64::INFINITY; size];
    let mut previous = vec![None; size];
    let mut visited = vec![false; size];
    // every arc is relaxed at most once, so this can't overflow
    let mut visit_next = IndexedBinaryHeap::min_heap(digraph.arc_count() + 1);
    distance[source] = 0.0;
    visit_next.insert(Scored(0.0, source))?;

    while let Some(Scored(node_score, node)) = visit_next.poll() {
        if visited[node] || distance[node] < node_score {
            continue;
        }
        visited[node] = true;
        if target == Some(node) {
            break;
        }
        for arc in digraph.arcs_from(node) {
            if visited[arc.to] {
                continue;
            }
            let next_score = node_score + arc.cost;
            if next_score < distance[arc.to] {
                distance[arc.to] = next_score;
                previous[arc.to] = Some(node);
                visit_next.insert(Scored(next_score, arc.to))?;
            }
        }
    }

    Ok(ShortestPaths{source, distance, previous})
}

pub fn dijkstra<K, P, D>(graph: &Graph<K, P, D>, source: VertexId, target: Option<VertexId>,
                         dimension: CostDimension) -> Result<ShortestPaths>
    where K: Hash + Ord + Clone
{
    graph.validate_vertex(source)?;
    if let Some(target) = target {
        graph.validate_vertex(target)?;
    }
    let digraph = CostDigraph::from_graph(graph, dimension)?;
    dijkstra_on(&digraph, source, target)
}

/// The cheapest path from `start` to `end`, or an unreachable path with infinite cost.
pub fn shortest_path<K, P, D>(graph: &Graph<K, P, D>, start: VertexId, end: VertexId,
                              dimension: CostDimension) -> Result<Path>
    where K: Hash + Ord + Clone
{
    let paths = dijkstra(graph, start, Some(end), dimension)?;
    path_from(&paths, end)
}

pub fn path_from(paths: &ShortestPaths, end: VertexId) -> Result<Path> {
    let vertices = paths.path_to(end)?;
    if vertices.is_empty() {
        return Ok(Path::unreachable());
    }
    Ok(Path{cost: paths.cost_to(end)?, vertices})
}
