//! Configuration file checks: detect keys that are missing from the YAML file
//! (and therefore silently defaulted) and optionally write them back.

use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Return the dotted names of every key present in the default configuration
/// but absent from the file at `path`.
pub fn missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let on_disk: Value = serde_yaml::from_str(&content)?;
    let defaults = serde_yaml::to_value(Config::default())?;

    let mut missing = Vec::new();
    collect_missing("", &defaults, &on_disk, &mut missing);
    Ok(missing)
}

fn collect_missing(prefix: &str, expected: &Value, actual: &Value, out: &mut Vec<String>) {
    let (Some(expected), actual) = (expected.as_mapping(), actual.as_mapping()) else {
        return;
    };

    for (key, exp_val) in expected {
        let Some(name) = key.as_str() else { continue };
        let dotted = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };

        match actual.and_then(|m| m.get(key)) {
            None => out.push(dotted),
            Some(act_val) => collect_missing(&dotted, exp_val, act_val, out),
        }
    }
}

/// Rewrite the file at `path` with every missing key filled from the loaded
/// (defaulted) configuration. Existing values are preserved.
/// Returns the keys that were added.
pub fn fill_missing(path: &Path) -> AppResult<Vec<String>> {
    let missing = missing_keys(path)?;
    if missing.is_empty() {
        return Ok(missing);
    }

    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let mut on_disk: Value = serde_yaml::from_str(&content)?;
    let loaded: Config = serde_yaml::from_str(&content)?;
    let full = serde_yaml::to_value(&loaded)?;

    if !on_disk.is_mapping() {
        on_disk = Value::Mapping(Mapping::new());
    }
    merge_into(&mut on_disk, &full);

    let serialized = serde_yaml::to_string(&on_disk)?;
    fs::write(path, serialized).map_err(|_| AppError::ConfigSave)?;
    Ok(missing)
}

fn merge_into(target: &mut Value, source: &Value) {
    let (Some(target), Some(source)) = (target.as_mapping_mut(), source.as_mapping()) else {
        return;
    };
    for (key, src_val) in source {
        match target.get_mut(key) {
            Some(existing) => merge_into(existing, src_val),
            None => {
                target.insert(key.clone(), src_val.clone());
            }
        }
    }
}
