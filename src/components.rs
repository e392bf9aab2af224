use std::hash::Hash;

use super::error::{EngineError, Result};
use super::graph::{Graph, VertexId};


/// Labels every vertex with the id of its connected component.  Ids are assigned in order of
/// each component's lowest vertex, starting from 0.
#[derive(Debug, Clone)]
pub struct ConnectedComponents {
    component_ids: Vec<usize>,
    sizes: Vec<usize>,
}

impl ConnectedComponents {
    pub fn new<K, P, D>(graph: &Graph<K, P, D>) -> ConnectedComponents
        where K: Hash + Ord + Clone
    {
        let size = graph.vertex_count();
        let mut component_ids: Vec<Option<usize>> = vec![None; size];
        let mut sizes = vec![];
        let mut to_visit = vec![];

        for start in 0..size {
            if component_ids[start].is_some() {
                continue;
            }
            let id = sizes.len();
            let mut members = 0;
            component_ids[start] = Some(id);
            to_visit.push(start);
            // depth-first with an explicit stack, so long roads can't overflow the call stack
            while let Some(vertex) = to_visit.pop() {
                members += 1;
                for (_, edge) in graph.edges_of(vertex).into_iter().flatten() {
                    let neighbour = edge.other(vertex);
                    if component_ids[neighbour].is_none() {
                        component_ids[neighbour] = Some(id);
                        to_visit.push(neighbour);
                    }
                }
            }
            sizes.push(members);
        }

        let component_ids: Vec<usize> = component_ids.into_iter().flatten().collect();
        log::debug!("found {} connected components", sizes.len());
        ConnectedComponents {component_ids, sizes}
    }

    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    pub fn component_of(&self, vertex: VertexId) -> Result<usize> {
        self.component_ids.get(vertex).cloned().ok_or(EngineError::VertexOutOfRange{
            vertex,
            vertex_count: self.component_ids.len(),
        })
    }

    pub fn connected(&self, vv: VertexId, ww: VertexId) -> Result<bool> {
        Ok(self.component_of(vv)? == self.component_of(ww)?)
    }

    pub fn size_of(&self, component: usize) -> Option<usize> {
        self.sizes.get(component).cloned()
    }

    pub fn members(&self, component: usize) -> Vec<VertexId> {
        self.component_ids.iter().enumerate()
            .filter(|(_, id)| **id == component)
            .map(|(vertex, _)| vertex)
            .collect()
    }

    /// The component with the most vertices.  Ties go to the lower id.
    pub fn largest(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (id, size) in self.sizes.iter().enumerate() {
            match best {
                Some(best_id) if self.sizes[best_id] >= *size => (),
                _ => best = Some(id),
            }
        }
        best
    }
}
