// An undirected road graph with a fixed number of vertices.  Each vertex carries a position, a
// bag of payload records and an optional distinctive item; each edge carries two costs.
use std::hash::Hash;

use super::error::{EngineError, Result};
use super::geometry::GeoPoint;
use super::multimap::KeyedMultiMap;


pub type VertexId = usize;
pub type EdgeId = usize;

/// Which of an edge's two costs an algorithm should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostDimension {
    /// Great-circle length of the road segment, in km.
    Distance,
    /// Number of payload records held by the two endpoints.
    Load,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    vv: VertexId,
    ww: VertexId,
    pub distance: f64,
    pub load: usize,
}

impl Edge {
    pub fn either(&self) -> VertexId {
        self.vv
    }

    pub fn other(&self, vertex: VertexId) -> VertexId {
        if vertex == self.vv {
            self.ww
        } else {
            self.vv
        }
    }

    /// The endpoints with the smaller id first.
    pub fn endpoints(&self) -> (VertexId, VertexId) {
        (self.vv, self.ww)
    }

    pub fn cost(&self, dimension: CostDimension) -> f64 {
        match dimension {
            CostDimension::Distance => self.distance,
            CostDimension::Load => self.load as f64,
        }
    }
}

fn edge_key(vv: VertexId, ww: VertexId) -> (VertexId, VertexId) {
    (std::cmp::min(vv, ww), std::cmp::max(vv, ww))
}

#[derive(Debug, Clone)]
struct Vertex<K, P, D> {
    position: Option<GeoPoint>,
    payload: KeyedMultiMap<K, P>,
    distinctive_item: Option<D>,
}

pub struct Graph<K, P, D> {
    vertices: Vec<Vertex<K, P, D>>,
    // ids of the edges incident on each vertex
    adjacency: Vec<Vec<EdgeId>>,
    edges: Vec<Edge>,
    edge_ids: KeyedMultiMap<(VertexId, VertexId), EdgeId>,
    stored_payload_count: usize,
    // whether every edge's load matches the current payload sizes
    load_costs_fresh: bool,
}

impl<K, P, D> Graph<K, P, D> where K: Hash + Ord + Clone {
    pub fn new(vertex_count: usize) -> Graph<K, P, D> {
        let vertices = (0..vertex_count).map(|_| Vertex {
            position: None,
            payload: KeyedMultiMap::new(),
            distinctive_item: None,
        }).collect();
        Graph {
            vertices,
            adjacency: vec![vec![]; vertex_count],
            edges: vec![],
            edge_ids: KeyedMultiMap::with_capacity(vertex_count, true),
            stored_payload_count: 0,
            load_costs_fresh: false,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn validate_vertex(&self, vertex: VertexId) -> Result<()> {
        if vertex >= self.vertices.len() {
            return Err(EngineError::VertexOutOfRange{
                vertex,
                vertex_count: self.vertices.len(),
            });
        }
        Ok(())
    }

    pub fn set_vertex_position(&mut self, vertex: VertexId, position: GeoPoint) -> Result<()> {
        self.validate_vertex(vertex)?;
        self.vertices[vertex].position = Some(position);
        Ok(())
    }

    pub fn position_of(&self, vertex: VertexId) -> Result<Option<GeoPoint>> {
        self.validate_vertex(vertex)?;
        Ok(self.vertices[vertex].position)
    }

    /// Iterates over every vertex that has a position.
    pub fn positions(&self) -> impl Iterator<Item = (VertexId, GeoPoint)> + '_ {
        self.vertices.iter().enumerate()
            .filter_map(|(ii, vertex)| vertex.position.map(|pos| (ii, pos)))
    }

    /// Adds the undirected edge `vv`-`ww`.  If the pair is already connected, the existing
    /// edge's distance is updated instead.
    pub fn add_edge(&mut self, vv: VertexId, ww: VertexId, distance: f64) -> Result<EdgeId> {
        self.validate_vertex(vv)?;
        self.validate_vertex(ww)?;
        if vv == ww {
            return Err(EngineError::SelfLoop(vv));
        }

        let key = edge_key(vv, ww);
        if let Some(&edge_id) = self.edge_ids.get(&key) {
            self.edges[edge_id].distance = distance;
            return Ok(edge_id);
        }

        let edge_id = self.edges.len();
        self.edges.push(Edge{vv: key.0, ww: key.1, distance, load: 0});
        self.adjacency[vv].push(edge_id);
        self.adjacency[ww].push(edge_id);
        self.edge_ids.put(key, edge_id);
        // the new edge's load hasn't been computed
        self.load_costs_fresh = false;
        Ok(edge_id)
    }

    /// Adds an edge whose distance is the great-circle distance between its endpoints.
    pub fn connect(&mut self, vv: VertexId, ww: VertexId) -> Result<EdgeId> {
        let pos_v = self.position_of(vv)?.ok_or(EngineError::MissingPosition(vv))?;
        let pos_w = self.position_of(ww)?.ok_or(EngineError::MissingPosition(ww))?;
        self.add_edge(vv, ww, pos_v.haversine_km(&pos_w))
    }

    pub fn edge_between(&self, vv: VertexId, ww: VertexId) -> Result<Option<&Edge>> {
        self.validate_vertex(vv)?;
        self.validate_vertex(ww)?;
        Ok(self.edge_ids.get(&edge_key(vv, ww)).map(|&edge_id| &self.edges[edge_id]))
    }

    pub fn edge(&self, edge_id: EdgeId) -> Option<&Edge> {
        self.edges.get(edge_id)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_of(&self, vertex: VertexId)
                    -> Result<impl Iterator<Item = (EdgeId, &Edge)> + '_> {
        self.validate_vertex(vertex)?;
        Ok(self.adjacency[vertex].iter().map(move |&edge_id| (edge_id, &self.edges[edge_id])))
    }

    pub fn adjacent_to(&self, vertex: VertexId) -> Result<impl Iterator<Item = VertexId> + '_> {
        Ok(self.edges_of(vertex)?.map(move |(_, edge)| edge.other(vertex)))
    }

    pub fn degree_of(&self, vertex: VertexId) -> Result<usize> {
        self.validate_vertex(vertex)?;
        Ok(self.adjacency[vertex].len())
    }

    /// Adds a record to the vertex's payload bag.  Records are never overwritten.
    pub fn insert_payload(&mut self, vertex: VertexId, key: K, record: P) -> Result<()> {
        self.validate_vertex(vertex)?;
        self.vertices[vertex].payload.put(key, record);
        self.stored_payload_count += 1;
        if self.load_costs_fresh {
            log::debug!("payload added to vertex {} after load costs were computed", vertex);
            self.load_costs_fresh = false;
        }
        Ok(())
    }

    pub fn payload_of(&self, vertex: VertexId) -> Result<&KeyedMultiMap<K, P>> {
        self.validate_vertex(vertex)?;
        Ok(&self.vertices[vertex].payload)
    }

    pub fn payload_count_of(&self, vertex: VertexId) -> Result<usize> {
        Ok(self.payload_of(vertex)?.len())
    }

    pub fn stored_payload_count(&self) -> usize {
        self.stored_payload_count
    }

    /// Sets the vertex's distinctive item, returning the one it replaced.
    pub fn set_distinctive_item(&mut self, vertex: VertexId, item: D) -> Result<Option<D>> {
        self.validate_vertex(vertex)?;
        Ok(self.vertices[vertex].distinctive_item.replace(item))
    }

    pub fn distinctive_item_of(&self, vertex: VertexId) -> Result<Option<&D>> {
        self.validate_vertex(vertex)?;
        Ok(self.vertices[vertex].distinctive_item.as_ref())
    }

    pub fn distinctive_items(&self) -> impl Iterator<Item = (VertexId, &D)> + '_ {
        self.vertices.iter().enumerate()
            .filter_map(|(ii, vertex)| vertex.distinctive_item.as_ref().map(|item| (ii, item)))
    }

    pub fn stored_distinctive_item_count(&self) -> usize {
        self.distinctive_items().count()
    }

    /// Sets each edge's load to the combined payload size of its endpoints.  Call this after
    /// the last payload insertion; inserting more payload marks the loads stale again.
    pub fn recompute_load_costs(&mut self) {
        let vertices = &self.vertices;
        for edge in self.edges.iter_mut() {
            edge.load = vertices[edge.vv].payload.len() + vertices[edge.ww].payload.len();
        }
        self.load_costs_fresh = true;
    }

    pub fn load_costs_fresh(&self) -> bool {
        self.load_costs_fresh
    }

    /// Checks that edge costs of the given dimension can be trusted.
    pub fn ensure_costs_ready(&self, dimension: CostDimension) -> Result<()> {
        match dimension {
            CostDimension::Load if !self.load_costs_fresh => Err(EngineError::StaleLoadCosts),
            _ => Ok(()),
        }
    }

    pub fn edge_cost(&self, edge_id: EdgeId, dimension: CostDimension) -> Result<Option<f64>> {
        self.ensure_costs_ready(dimension)?;
        Ok(self.edges.get(edge_id).map(|edge| edge.cost(dimension)))
    }
}
