//! Recursive merging of free-form rule documents

use serde_json::{Map, Value};

/// Merge `overlay` into `base`.
///
/// Objects merge key by key, recursing into nested objects. Any other value,
/// arrays included, replaces what was there.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Merge layers from lowest to highest precedence into a fresh object.
///
/// Missing layers are skipped.
pub fn merge_layers<'a>(layers: impl IntoIterator<Item = Option<&'a Value>>) -> Value {
    let mut merged = Value::Object(Map::new());
    for layer in layers.into_iter().flatten() {
        deep_merge(&mut merged, layer);
    }
    merged
}
