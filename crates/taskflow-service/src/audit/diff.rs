//! Field-by-field diff between two JSON snapshots.

use serde_json::{Map, Value};

/// Compare two snapshots key by key over the keys of `new`.
///
/// Each changed field maps to `"Added: v"`, `"Removed: v"` or `"old → new"`.
/// Unchanged fields are omitted. Non-object snapshots yield an empty map.
pub fn compute_changes(old: &Value, new: &Value) -> Value {
    let mut changes = Map::new();
    let (Some(old_fields), Some(new_fields)) = (old.as_object(), new.as_object()) else {
        return Value::Object(changes);
    };

    for (field, new_value) in new_fields {
        let old_value = old_fields.get(field).unwrap_or(&Value::Null);
        let entry = match (old_value.is_null(), new_value.is_null()) {
            (true, false) => Some(format!("Added: {}", render(new_value))),
            (false, true) => Some(format!("Removed: {}", render(old_value))),
            (false, false) if old_value != new_value => {
                Some(format!("{} → {}", render(old_value), render(new_value)))
            }
            _ => None,
        };
        if let Some(entry) = entry {
            changes.insert(field.clone(), Value::String(entry));
        }
    }
    Value::Object(changes)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
