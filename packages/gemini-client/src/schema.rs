//! Response schemas for Gemini structured output.
//!
//! Gemini accepts a restricted OpenAPI subset: upper-case `type` names,
//! `properties`, `required`, `items`, `enum`, `description` and `nullable`.
//! No `$ref`, no `anyOf`, no `additionalProperties`. Schemas are generated
//! from Rust types with `schemars` and then rewritten into that subset.
//!
//! ```rust,ignore
//! #[derive(Deserialize, JsonSchema)]
//! struct Post {
//!     title: String,
//!     read_time: f64,
//! }
//!
//! let schema = Post::gemini_schema();
//! ```

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Types that can be requested as Gemini structured output.
///
/// Blanket-implemented for anything that is `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    fn gemini_schema() -> Value {
        let schema = serde_json::to_value(schema_for!(Self)).unwrap_or_default();
        let definitions = schema.get("definitions").cloned().unwrap_or(Value::Null);
        to_gemini(&schema, &definitions)
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

fn to_gemini(node: &Value, definitions: &Value) -> Value {
    let Value::Object(map) = node else {
        return node.clone();
    };

    if let Some(Value::String(path)) = map.get("$ref") {
        let name = path.trim_start_matches("#/definitions/");
        return match definitions.get(name) {
            Some(def) => to_gemini(def, definitions),
            None => Value::Object(Map::new()),
        };
    }

    // Option<Struct> is emitted as anyOf [ {$ref}, {type: null} ]
    if let Some(Value::Array(variants)) = map.get("anyOf") {
        let concrete = variants.iter().find(|v| !is_null_schema(v));
        let nullable = variants.iter().any(is_null_schema);
        let mut out = concrete
            .map(|v| to_gemini(v, definitions))
            .unwrap_or_else(|| Value::Object(Map::new()));
        if nullable {
            if let Value::Object(out_map) = &mut out {
                out_map.insert("nullable".into(), Value::Bool(true));
            }
        }
        return out;
    }

    let mut out = Map::new();

    match map.get("type") {
        Some(Value::String(t)) => {
            out.insert("type".into(), Value::String(t.to_uppercase()));
        }
        // Option<scalar> is emitted as type: ["string", "null"]
        Some(Value::Array(types)) => {
            if let Some(t) = types.iter().filter_map(Value::as_str).find(|t| *t != "null") {
                out.insert("type".into(), Value::String(t.to_uppercase()));
            }
            if types.iter().any(|t| t.as_str() == Some("null")) {
                out.insert("nullable".into(), Value::Bool(true));
            }
        }
        _ => {}
    }

    if let Some(Value::Object(props)) = map.get("properties") {
        let converted: Map<String, Value> = props
            .iter()
            .map(|(k, v)| (k.clone(), to_gemini(v, definitions)))
            .collect();
        out.insert("properties".into(), Value::Object(converted));
    }

    if let Some(items) = map.get("items") {
        out.insert("items".into(), to_gemini(items, definitions));
    }

    for key in ["required", "enum", "description"] {
        if let Some(v) = map.get(key) {
            out.insert(key.into(), v.clone());
        }
    }

    Value::Object(out)
}

fn is_null_schema(v: &Value) -> bool {
    v.get("type").and_then(Value::as_str) == Some("null")
}
