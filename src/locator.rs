// Maps a geocoordinate to the nearest graph vertex.  Vertices are clustered into groups around
// representative coordinates so that a lookup only scans the group nearest to the query.
use std::collections::VecDeque;
use std::hash::Hash;

use super::error::{EngineError, Result};
use super::geometry::{nearest_of, GeoPoint};
use super::graph::{Graph, VertexId};
use super::multimap::KeyedMultiMap;
use super::LocatorConfig;


/// The outcome of a nearest-vertex lookup.  If no vertex of the searched group was within the
/// tolerance, the closest one is returned with `within_tolerance` set to false.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestVertex {
    pub vertex: VertexId,
    pub distance_km: f64,
    pub within_tolerance: bool,
}

pub struct SpatialLocator {
    positions: Vec<Option<GeoPoint>>,
    representatives: Vec<GeoPoint>,
    // group index -> ids of the vertices in that group
    groups: KeyedMultiMap<usize, VertexId>,
    // recently resolved vertices and their positions, oldest first
    cache: VecDeque<(GeoPoint, VertexId)>,
    cache_size: usize,
}

impl SpatialLocator {
    pub fn build<K, P, D, CC>(graph: &Graph<K, P, D>, cfg: &CC) -> SpatialLocator
        where K: Hash + Ord + Clone, CC: LocatorConfig
    {
        let mut positions = vec![None; graph.vertex_count()];
        for (vertex, pos) in graph.positions() {
            positions[vertex] = Some(pos);
        }
        Self::from_positions(positions, cfg.get_cluster_radius_km(), cfg.get_cache_size())
    }

    pub fn from_positions(positions: Vec<Option<GeoPoint>>, cluster_radius_km: f64,
                          cache_size: usize) -> SpatialLocator {
        let mut representatives: Vec<GeoPoint> = vec![];
        for pos in positions.iter().flatten() {
            match nearest_of(pos, &representatives) {
                Some((_, dist)) if dist <= cluster_radius_km => (),
                // too far from every group, so this vertex starts its own
                _ => representatives.push(*pos),
            }
        }

        // each vertex belongs to the group of its nearest final representative
        let mut groups = KeyedMultiMap::new();
        for (vertex, pos) in positions.iter().enumerate() {
            if let Some(pos) = pos {
                if let Some((group, _)) = nearest_of(pos, &representatives) {
                    groups.put(group, vertex);
                }
            }
        }
        log::info!("clustered {} vertices into {} groups", groups.len(), representatives.len());

        SpatialLocator {
            positions,
            representatives,
            groups,
            cache: VecDeque::with_capacity(cache_size),
            cache_size,
        }
    }

    pub fn group_count(&self) -> usize {
        self.representatives.len()
    }

    pub fn representative_of(&self, group: usize) -> Option<&GeoPoint> {
        self.representatives.get(group)
    }

    /// The group whose representative is closest to `point`.
    pub fn group_of_point(&self, point: &GeoPoint) -> Option<usize> {
        nearest_of(point, &self.representatives).map(|(group, _)| group)
    }

    pub fn members_of(&self, group: usize) -> impl Iterator<Item = VertexId> + '_ {
        self.groups.values_of(&group).cloned()
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    pub fn nearest_vertex(&mut self, lat: f64, lon: f64, tolerance_km: f64)
                          -> Result<NearestVertex> {
        let query = GeoPoint::new(lat, lon);

        let cached = self.cache.iter().find(|(pos, _)| query.haversine_km(pos) <= tolerance_km);
        if let Some(&(pos, vertex)) = cached {
            return Ok(NearestVertex {
                vertex,
                distance_km: query.haversine_km(&pos),
                within_tolerance: true,
            });
        }

        let group = self.group_of_point(&query).ok_or(EngineError::EmptyLocator)?;
        let mut best: Option<(VertexId, GeoPoint, f64)> = None;
        for &vertex in self.groups.values_of(&group) {
            let pos = match self.positions[vertex] {
                Some(pos) => pos,
                None => continue,
            };
            let dist = query.haversine_km(&pos);
            if dist <= tolerance_km {
                best = Some((vertex, pos, dist));
                break;
            }
            match best {
                Some((_, _, best_dist)) if best_dist <= dist => (),
                _ => best = Some((vertex, pos, dist)),
            }
        }

        let (vertex, pos, distance_km) = best.ok_or(EngineError::EmptyLocator)?;
        self.remember(pos, vertex);
        Ok(NearestVertex {
            vertex,
            distance_km,
            within_tolerance: distance_km <= tolerance_km,
        })
    }

    fn remember(&mut self, pos: GeoPoint, vertex: VertexId) {
        if self.cache_size == 0 || self.cache.iter().any(|(_, cached)| *cached == vertex) {
            return;
        }
        if self.cache.len() == self.cache_size {
            self.cache.pop_front();
        }
        self.cache.push_back((pos, vertex));
    }
}
