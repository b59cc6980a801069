use std::collections::BTreeMap;

use serde_json::{Map, Value};
use storage::models::Extraction;

use super::prompts::{ATTRIBUTE_SUFFIX, EXTRACTIONS_KEY};
use crate::error::ExtractorError;

type Result<T> = std::result::Result<T, ExtractorError>;

/// Parses raw model output into extractions.
pub struct Resolver;

impl Resolver {
    pub fn resolve(raw: &str) -> Result<Vec<Extraction>> {
        let payload = Self::strip_fences(raw);
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| ExtractorError::ResolveError(format!("Invalid JSON from model: {}", e)))?;

        let entries = match value {
            Value::Object(mut map) => match map.remove(EXTRACTIONS_KEY) {
                Some(Value::Array(entries)) => entries,
                Some(other) => {
                    return Err(ExtractorError::ResolveError(format!(
                        "'{}' must be an array, got {}",
                        EXTRACTIONS_KEY,
                        type_name(&other)
                    )));
                }
                None => {
                    return Err(ExtractorError::ResolveError(format!(
                        "missing '{}' key",
                        EXTRACTIONS_KEY
                    )));
                }
            },
            Value::Array(entries) => entries,
            other => {
                return Err(ExtractorError::ResolveError(format!(
                    "expected an object or array, got {}",
                    type_name(&other)
                )));
            }
        };

        let mut extractions = Vec::new();
        for (group_index, entry) in entries.into_iter().enumerate() {
            let Value::Object(entry) = entry else {
                return Err(ExtractorError::ResolveError(format!(
                    "extraction {} is not an object",
                    group_index
                )));
            };
            extractions.extend(Self::resolve_entry(&entry, group_index));
        }

        Ok(extractions)
    }

    /// One entry may carry several `<class>: <text>` pairs, each with an
    /// optional `<class>_attributes` object next to it.
    fn resolve_entry(entry: &Map<String, Value>, group_index: usize) -> Vec<Extraction> {
        entry
            .iter()
            .filter(|(key, _)| !key.ends_with(ATTRIBUTE_SUFFIX))
            .filter_map(|(class, value)| {
                let text = render_scalar(value)?;
                let mut extraction = Extraction::new(class.clone(), text);
                extraction.group_index = Some(group_index);

                if let Some(Value::Object(attributes)) =
                    entry.get(&format!("{}{}", class, ATTRIBUTE_SUFFIX))
                {
                    extraction.attributes = render_attributes(attributes);
                }
                Some(extraction)
            })
            .collect()
    }

    fn strip_fences(raw: &str) -> &str {
        let trimmed = raw.trim();
        let Some(rest) = trimmed.strip_prefix("```") else {
            return trimmed;
        };
        let body = rest.split_once('\n').map_or("", |(_, body)| body);
        body.trim_end()
            .strip_suffix("```")
            .unwrap_or(body)
            .trim()
    }
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn render_attributes(attributes: &Map<String, Value>) -> BTreeMap<String, String> {
    attributes
        .iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::Array(items) => items
                    .iter()
                    .map(|item| render_scalar(item).unwrap_or_else(|| item.to_string()))
                    .collect::<Vec<_>>()
                    .join(", "),
                other => render_scalar(other).unwrap_or_else(|| other.to_string()),
            };
            Some((key.clone(), rendered))
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
