use std::error::Error;
use std::path::Path;
use std::path::PathBuf;

use yaml_rust::Yaml;


pub fn str_to_absolute_path(path_str: &str, default_base_dir: &Path) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        return path;
    } else {
        return [default_base_dir, Path::new(&path)].iter().collect();
    }
}

/// Reads a number that YAML may have parsed as either an integer or a real.
pub fn yaml_as_f64(value: &Yaml) -> Option<f64> {
    match value {
        Yaml::Real(_) => value.as_f64(),
        Yaml::Integer(ii) => Some(*ii as f64),
        _ => None,
    }
}

pub fn get_f64_or(yaml_cfg: &Yaml, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
    if yaml_cfg[key].is_badvalue() {
        return Ok(default);
    }
    yaml_as_f64(&yaml_cfg[key]).ok_or_else(|| format!("{} must be a number", key).into())
}

pub fn get_usize_or(yaml_cfg: &Yaml, key: &str, default: usize) -> Result<usize, Box<dyn Error>> {
    if yaml_cfg[key].is_badvalue() {
        return Ok(default);
    }
    match yaml_cfg[key].as_i64() {
        Some(value) if value >= 0 => Ok(value as usize),
        _ => Err(format!("{} must be a non-negative integer", key).into()),
    }
}

/// Resolves a path setting against the config file's directory, or None if the key is absent.
pub fn get_path(yaml_cfg: &Yaml, key: &str, config_dir: &Path)
                -> Result<Option<PathBuf>, Box<dyn Error>> {
    if yaml_cfg[key].is_badvalue() {
        return Ok(None);
    }
    match yaml_cfg[key].as_str() {
        Some(path_str) => Ok(Some(str_to_absolute_path(path_str, config_dir))),
        None => Err(format!("{} must be a string", key).into()),
    }
}

pub fn get_required_path(yaml_cfg: &Yaml, key: &str, config_dir: &Path)
                         -> Result<PathBuf, Box<dyn Error>> {
    get_path(yaml_cfg, key, config_dir)?.ok_or_else(|| format!("no {} in config", key).into())
}
