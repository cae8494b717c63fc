//! Settings, env and parser options merging

use crate::document::Document;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Deep merge `overlay` into `base`
///
/// Nested objects merge key by key. Every other collision, including arrays,
/// nulls and type changes, takes the overlay value wholesale. Keys keep the
/// position of their first appearance.
pub fn deep_merge_into(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, overlay_value) in overlay {
        if let (Some(Value::Object(base_map)), Value::Object(overlay_map)) =
            (base.get_mut(key), overlay_value)
        {
            deep_merge_into(base_map, overlay_map);
            continue;
        }
        base.insert(key.clone(), overlay_value.clone());
    }
}

pub fn merge_settings(documents: &[Arc<Document>]) -> Map<String, Value> {
    let mut settings = Map::new();
    for document in documents {
        deep_merge_into(&mut settings, &document.settings);
    }
    settings
}

/// Env toggles, later document wins per key
pub fn merge_env(documents: &[Arc<Document>]) -> IndexMap<String, bool> {
    let mut env = IndexMap::new();
    for document in documents {
        for (name, enabled) in &document.env {
            env.insert(name.clone(), *enabled);
        }
    }
    env
}

/// Parser options, later document wins per top-level key
pub fn merge_parser_options(documents: &[Arc<Document>]) -> Map<String, Value> {
    let mut options = Map::new();
    for document in documents {
        for (key, value) in &document.parser_options {
            options.insert(key.clone(), value.clone());
        }
    }
    options
}
