//! JSON schema generation for tool parameters.
//!
//! Tool argument types derive `schemars::JsonSchema`; this module flattens
//! the schemars output into the shape the OpenAI function-calling API
//! accepts: no `$ref` indirection, no `definitions` section, and
//! `additionalProperties: false` on every object.

use schemars::{schema_for, JsonSchema};

/// Generate an OpenAI-compatible parameter schema for a type.
pub fn parameters_schema<T: JsonSchema>() -> serde_json::Value {
    let schema = schema_for!(T);
    let mut value = serde_json::to_value(schema).unwrap_or_default();

    close_object_schemas(&mut value);
    inline_refs(&mut value);

    if let serde_json::Value::Object(map) = &mut value {
        map.remove("definitions");
        map.remove("$schema");
        map.remove("title");
    }

    value
}

/// Add `additionalProperties: false` to every object schema.
fn close_object_schemas(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if map.get("type") == Some(&serde_json::Value::String("object".to_string())) {
                map.insert(
                    "additionalProperties".to_string(),
                    serde_json::Value::Bool(false),
                );
            }
            for (_, v) in map.iter_mut() {
                close_object_schemas(v);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                close_object_schemas(item);
            }
        }
        _ => {}
    }
}

/// Replace `$ref` references with the referenced definition, recursively.
///
/// The function-calling endpoint does not follow refs, so nested argument
/// types must be inlined.
fn inline_refs(value: &mut serde_json::Value) {
    let definitions = match value {
        serde_json::Value::Object(map) => map.get("definitions").cloned(),
        _ => None,
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut serde_json::Value, definitions: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(ref_path)) = map.get("$ref").cloned() {
                if let Some(name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(name) {
                        *value = def.clone();
                        inline_refs_recursive(value, definitions);
                        return;
                    }
                }
            }
            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}
