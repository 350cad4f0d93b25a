//! Response schema for structured generation, derived from the document types.
//!
//! `schemars` walks `AnalysisResult` and the document types it points at, so
//! the schema can never drift from the structs we deserialize into. The raw
//! output is then normalised for the model: subschemas inlined, meta keywords
//! dropped, and every declared property made required at every level.

use schemars::gen::SchemaSettings;
use serde_json::{Map, Value};

use crate::models::AnalysisResult;

/// Keywords that carry no constraint for the model or that tool schemas reject.
const STRIPPED_KEYWORDS: &[&str] = &["$schema", "title", "definitions", "default", "format"];

/// Builds the JSON schema the generation capability must conform to.
pub fn analysis_schema() -> Result<Value, serde_json::Error> {
    let settings = SchemaSettings::draft07().with(|s| {
        s.inline_subschemas = true;
        s.option_nullable = false;
        s.option_add_null_type = false;
    });
    let root = settings
        .into_generator()
        .into_root_schema_for::<AnalysisResult>();

    let mut value = serde_json::to_value(root)?;
    normalise(&mut value);
    Ok(value)
}

fn normalise(schema: &mut Value) {
    let Value::Object(map) = schema else {
        return;
    };

    for keyword in STRIPPED_KEYWORDS {
        map.remove(*keyword);
    }

    if let Some(Value::Object(properties)) = map.get_mut("properties") {
        for sub in properties.values_mut() {
            normalise(sub);
        }
        let required = required_list(properties);
        map.insert("required".to_string(), required);
    }

    if let Some(items) = map.get_mut("items") {
        normalise(items);
    }
}

fn required_list(properties: &Map<String, Value>) -> Value {
    Value::Array(
        properties
            .keys()
            .map(|k| Value::String(k.clone()))
            .collect(),
    )
}
