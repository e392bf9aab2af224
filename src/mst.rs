use std::hash::Hash;

use super::error::Result;
use super::graph::{CostDimension, EdgeId, Graph, VertexId};
use super::heap::{IndexedBinaryHeap, Scored};


/// A minimum spanning tree of the connected component containing `root`.
#[derive(Debug, Clone)]
pub struct MinimumSpanningTree {
    root: Option<VertexId>,
    edges: Vec<EdgeId>,
    total_cost: f64,
    in_tree: Vec<bool>,
    dimension: CostDimension,
}

impl MinimumSpanningTree {
    pub fn root(&self) -> Option<VertexId> {
        self.root
    }

    /// Tree edges in the order they were added.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn dimension(&self) -> CostDimension {
        self.dimension
    }

    pub fn spans(&self, vertex: VertexId) -> bool {
        self.in_tree.get(vertex).cloned().unwrap_or(false)
    }

    pub fn spanned_count(&self) -> usize {
        self.in_tree.iter().filter(|marked| **marked).count()
    }
}

/// Lazy Prim from vertex 0.  An empty graph gives an empty tree.
pub fn minimum_spanning_tree<K, P, D>(graph: &Graph<K, P, D>, dimension: CostDimension)
                                      -> Result<MinimumSpanningTree>
    where K: Hash + Ord + Clone
{
    if graph.vertex_count() == 0 {
        return Ok(MinimumSpanningTree {
            root: None,
            edges: vec![],
            total_cost: 0.,
            in_tree: vec![],
            dimension,
        });
    }
    minimum_spanning_tree_from(graph, 0, dimension)
}

pub fn minimum_spanning_tree_from<K, P, D>(graph: &Graph<K, P, D>, root: VertexId,
                                           dimension: CostDimension)
                                           -> Result<MinimumSpanningTree>
    where K: Hash + Ord + Clone
{
    graph.validate_vertex(root)?;
    graph.ensure_costs_ready(dimension)?;

    let mut in_tree = vec![false; graph.vertex_count()];
    let mut tree_edges = vec![];
    let mut total_cost = 0.;
    // an edge is only queued from the first of its endpoints to join the tree
    let mut crossing = IndexedBinaryHeap::min_heap(std::cmp::max(graph.edge_count(), 1));

    visit(graph, root, dimension, &mut in_tree, &mut crossing)?;
    while let Some(Scored(cost, edge_id)) = crossing.poll() {
        let (vv, ww) = graph.edges()[edge_id].endpoints();
        if in_tree[vv] && in_tree[ww] {
            // both ends joined the tree after this edge was queued
            continue;
        }
        tree_edges.push(edge_id);
        total_cost += cost;
        let next = if in_tree[vv] { ww } else { vv };
        visit(graph, next, dimension, &mut in_tree, &mut crossing)?;
    }

    log::debug!("spanning tree from {} has {} edges and cost {}", root, tree_edges.len(),
                total_cost);
    Ok(MinimumSpanningTree {
        root: Some(root),
        edges: tree_edges,
        total_cost,
        in_tree,
        dimension,
    })
}

fn visit<K, P, D>(graph: &Graph<K, P, D>, vertex: VertexId, dimension: CostDimension,
                  in_tree: &mut [bool], crossing: &mut IndexedBinaryHeap<Scored<f64, EdgeId>>)
                  -> Result<()>
    where K: Hash + Ord + Clone
{
    in_tree[vertex] = true;
    for (edge_id, edge) in graph.edges_of(vertex)? {
        if !in_tree[edge.other(vertex)] {
            crossing.insert(Scored(edge.cost(dimension), edge_id))?;
        }
    }
    Ok(())
}
