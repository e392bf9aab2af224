use std::error::Error;
use std::path::{Path, PathBuf};

use yaml_rust::Yaml;
use yaml_rust::YamlLoader;

use super::config_utils;
use super::geometry::GeoPoint;
use super::{AnalysisConfig, LocatorConfig};


pub const DEFAULT_CLUSTER_RADIUS_KM: f64 = 2.0;
pub const DEFAULT_CACHE_SIZE: usize = 20;
pub const DEFAULT_CITATION_TOLERANCE_KM: f64 = 0.5;
pub const DEFAULT_STATION_TOLERANCE_KM: f64 = 0.1;
pub const DEFAULT_QUERY_TOLERANCE_KM: f64 = 0.05;
pub const DEFAULT_SIGNIFICANT_VERTEX_COUNT: usize = 20;

/// A shortest-path query between two geocoordinates.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct PathQuery {
    pub start: GeoPoint,
    pub end: GeoPoint,
}

#[derive(PartialEq, Debug, Clone)]
pub struct EngineConfig {
    pub vertices_path: PathBuf,
    pub edges_path: PathBuf,
    pub citations_path: PathBuf,
    pub stations_path: Option<PathBuf>,
    pub significant_vertex_count: usize,
    pub queries: Vec<PathQuery>,
    cluster_radius_km: f64,
    cache_size: usize,
    citation_tolerance_km: f64,
    station_tolerance_km: f64,
    query_tolerance_km: f64,
}

impl EngineConfig {
    pub fn from_file(config_path: &Path) -> Result<EngineConfig, Box<dyn Error>> {
        let file_contents = std::fs::read_to_string(config_path)?;
        let docs = YamlLoader::load_from_str(&file_contents)?;
        let yaml_cfg = docs.get(0).ok_or("config file is empty")?;
        let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_yaml(yaml_cfg, config_dir)
    }

    /// Relative paths in the config are taken relative to `config_dir`.
    pub fn from_yaml(yaml_cfg: &Yaml, config_dir: &Path) -> Result<EngineConfig, Box<dyn Error>> {
        let cfg = EngineConfig {
            vertices_path: config_utils::get_required_path(yaml_cfg, "vertices_path",
                                                           config_dir)?,
            edges_path: config_utils::get_required_path(yaml_cfg, "edges_path", config_dir)?,
            citations_path: config_utils::get_required_path(yaml_cfg, "citations_path",
                                                            config_dir)?,
            stations_path: config_utils::get_path(yaml_cfg, "stations_path", config_dir)?,
            significant_vertex_count: config_utils::get_usize_or(
                yaml_cfg, "significant_vertex_count", DEFAULT_SIGNIFICANT_VERTEX_COUNT)?,
            queries: parse_queries(&yaml_cfg["queries"])?,
            cluster_radius_km: config_utils::get_f64_or(yaml_cfg, "cluster_radius_km",
                                                        DEFAULT_CLUSTER_RADIUS_KM)?,
            cache_size: config_utils::get_usize_or(yaml_cfg, "cache_size", DEFAULT_CACHE_SIZE)?,
            citation_tolerance_km: config_utils::get_f64_or(
                yaml_cfg, "citation_tolerance_km", DEFAULT_CITATION_TOLERANCE_KM)?,
            station_tolerance_km: config_utils::get_f64_or(
                yaml_cfg, "station_tolerance_km", DEFAULT_STATION_TOLERANCE_KM)?,
            query_tolerance_km: config_utils::get_f64_or(
                yaml_cfg, "query_tolerance_km", DEFAULT_QUERY_TOLERANCE_KM)?,
        };
        if cfg.cluster_radius_km <= 0. {
            return Err("cluster_radius_km must be positive".into());
        }
        Ok(cfg)
    }
}

fn parse_queries(yaml_queries: &Yaml) -> Result<Vec<PathQuery>, Box<dyn Error>> {
    if yaml_queries.is_badvalue() {
        return Ok(vec![]);
    }
    let entries = yaml_queries.as_vec().ok_or("queries must be a list")?;
    let mut queries = vec![];
    for entry in entries {
        let coords: Vec<f64> = match entry.as_vec() {
            Some(coords) => coords.iter().filter_map(config_utils::yaml_as_f64).collect(),
            None => vec![],
        };
        if coords.len() != 4 {
            return Err(format!("query {:?} is not [start_lat, start_lon, end_lat, end_lon]",
                               entry).into());
        }
        queries.push(PathQuery {
            start: GeoPoint::new(coords[0], coords[1]),
            end: GeoPoint::new(coords[2], coords[3]),
        });
    }
    Ok(queries)
}

impl LocatorConfig for EngineConfig {
    fn get_cluster_radius_km(&self) -> f64 {
        self.cluster_radius_km
    }

    fn get_cache_size(&self) -> usize {
        self.cache_size
    }
}

impl AnalysisConfig for EngineConfig {
    fn get_citation_tolerance_km(&self) -> f64 {
        self.citation_tolerance_km
    }

    fn get_station_tolerance_km(&self) -> f64 {
        self.station_tolerance_km
    }

    fn get_query_tolerance_km(&self) -> f64 {
        self.query_tolerance_km
    }
}
