//! Best-effort repair of near-conformant model output
//!
//! Rules run in a fixed order and each one is idempotent:
//!
//! 1. stamp the literal version tag on the root
//! 2. fill missing sections (and missing sub-fields of present sections)
//!    from their defaults
//! 3. keep the bounded list non-empty and within its limit
//! 4. reset present score fields that are not numbers or fall outside the
//!    score range to `0`
//!
//! Free text is never invented beyond empty strings, and supplied fields are
//! only dropped by rules 3 (overflow) and 4 (reset). A non-object root is
//! returned untouched so validation can report it.

use serde_json::{json, Map, Value};
use tracing::debug;
use uxlens_schemas::analysis::{
    analysis_schema, priority_placeholder, section_defaults, PRIORITIES_FIELD, PRIORITIES_LIMIT,
    SCHEMA_VERSION, SCORE_RANGE, VERSION_FIELD,
};
use uxlens_schemas::SchemaNode;

/// A root array kept between one and `limit` entries
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedList {
    pub field: String,
    pub limit: usize,
    pub placeholder: Value,
}

/// Document normalizer bound to one schema
#[derive(Debug, Clone)]
pub struct Normalizer<'s> {
    schema: &'s SchemaNode,
    version: (String, String),
    defaults: Vec<(String, Value)>,
    bounded_list: Option<BoundedList>,
    score_range: (f64, f64),
}

impl Normalizer<'static> {
    /// Normalizer for the built-in UX-analysis document
    pub fn ux_analysis() -> Self {
        Normalizer::new(analysis_schema(), VERSION_FIELD, SCHEMA_VERSION)
            .with_defaults(
                section_defaults()
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), value)),
            )
            .with_bounded_list(BoundedList {
                field: PRIORITIES_FIELD.to_string(),
                limit: PRIORITIES_LIMIT,
                placeholder: priority_placeholder(),
            })
            .with_score_range(SCORE_RANGE)
    }
}

impl<'s> Normalizer<'s> {
    /// Create a normalizer that only stamps the version tag
    pub fn new(schema: &'s SchemaNode, version_field: &str, version: &str) -> Self {
        Self {
            schema,
            version: (version_field.to_string(), version.to_string()),
            defaults: Vec::new(),
            bounded_list: None,
            score_range: SCORE_RANGE,
        }
    }

    /// Set the root sections synthesized when absent
    pub fn with_defaults(mut self, defaults: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.defaults = defaults.into_iter().collect();
        self
    }

    /// Set the bounded root list
    pub fn with_bounded_list(mut self, list: BoundedList) -> Self {
        self.bounded_list = Some(list);
        self
    }

    /// Set the inclusive range identifying score fields
    pub fn with_score_range(mut self, range: (f64, f64)) -> Self {
        self.score_range = range;
        self
    }

    /// Apply every rule to `raw`
    pub fn normalize(&self, raw: Value) -> Value {
        let mut document = raw;
        if !document.is_object() {
            debug!("Document root is not an object; skipping normalization");
            return document;
        }

        if let Some(root) = document.as_object_mut() {
            let (field, version) = &self.version;
            root.insert(field.clone(), Value::String(version.clone()));

            for (section, default) in &self.defaults {
                fill_key(root, section, default);
            }

            if let Some(list) = &self.bounded_list {
                bound_list(root, list);
            }
        }

        let mut resets = Vec::new();
        reset_scores(&mut document, self.schema, self.score_range, "root", &mut resets);
        if !resets.is_empty() {
            debug!(fields = ?resets, "Reset out-of-range scores");
        }

        document
    }
}

fn fill_key(map: &mut Map<String, Value>, key: &str, default: &Value) {
    let absent = map
        .get(key)
        .map_or(true, |existing| replaceable(existing, default));
    if absent {
        map.insert(key.to_string(), default.clone());
    } else if let Some(existing) = map.get_mut(key) {
        fill_missing(existing, default);
    }
}

/// Null stands in for "absent" only where the default is an object
fn replaceable(existing: &Value, default: &Value) -> bool {
    existing.is_null() && default.is_object()
}

fn fill_missing(existing: &mut Value, default: &Value) {
    let (Some(target), Some(template)) = (existing.as_object_mut(), default.as_object()) else {
        return;
    };
    for (key, default_child) in template {
        fill_key(target, key, default_child);
    }
}

fn bound_list(root: &mut Map<String, Value>, list: &BoundedList) {
    if root.get(&list.field).map_or(true, Value::is_null) {
        root.insert(list.field.clone(), json!([list.placeholder.clone()]));
        return;
    }

    // Non-array values are left for validation to report
    if let Some(Value::Array(items)) = root.get_mut(&list.field) {
        if items.is_empty() {
            items.push(list.placeholder.clone());
        } else if items.len() > list.limit {
            debug!(field = %list.field, from = items.len(), to = list.limit, "Truncating list");
            items.truncate(list.limit);
        }
    }
}

fn reset_scores(
    value: &mut Value,
    schema: &SchemaNode,
    range: (f64, f64),
    path: &str,
    resets: &mut Vec<String>,
) {
    match schema {
        SchemaNode::Object { properties, .. } => {
            if let Some(map) = value.as_object_mut() {
                for (key, child_schema) in properties {
                    if let Some(child) = map.get_mut(key) {
                        reset_scores(child, child_schema, range, &format!("{}.{}", path, key), resets);
                    }
                }
            }
        }
        SchemaNode::Array {
            items: Some(item_schema),
            ..
        } => {
            if let Some(elements) = value.as_array_mut() {
                for (index, element) in elements.iter_mut().enumerate() {
                    reset_scores(element, item_schema, range, &format!("{}[{}]", path, index), resets);
                }
            }
        }
        SchemaNode::Number {
            minimum: Some(min),
            maximum: Some(max),
            ..
        } if (*min, *max) == range => {
            let in_range = value
                .as_f64()
                .map(|n| n >= range.0 && n <= range.1)
                .unwrap_or(false);
            if !in_range {
                resets.push(path.to_string());
                *value = json!(0);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uxlens_schemas::validate;

    fn normalize(value: Value) -> Value {
        Normalizer::ux_analysis().normalize(value)
    }

    #[test]
    fn test_stamps_version() {
        let doc = normalize(json!({"schema_version": "0.9"}));
        assert_eq!(doc["schema_version"], SCHEMA_VERSION);
    }

    #[test]
    fn test_non_object_root_is_untouched() {
        assert_eq!(normalize(json!([1, 2])), json!([1, 2]));
        assert_eq!(normalize(json!("text")), json!("text"));
    }

    #[test]
    fn test_missing_sections_get_defaults() {
        let doc = normalize(json!({}));
        assert_eq!(doc["marca"]["conforme"], false);
        assert_eq!(doc["acessibilidade"]["problemas"], json!([]));
        assert_eq!(doc["experiencia"]["cta"]["textoPrincipal"], Value::Null);
        assert_eq!(doc["jobToBeDone"]["avaliacao"], "");
        assert_eq!(doc["resumo"], "");
        assert!(doc.get("pontuacaoGeral").is_none());
        assert!(doc.get("achados").is_none());
    }

    #[test]
    fn test_partial_section_is_completed_without_overwriting() {
        let doc = normalize(json!({
            "experiencia": {
                "hierarquia": {"nota": 8},
                "cta": null
            }
        }));
        let experiencia = &doc["experiencia"];
        assert_eq!(experiencia["hierarquia"]["nota"], 8);
        assert_eq!(experiencia["hierarquia"]["observacoes"], "");
        assert_eq!(experiencia["cta"]["clareza"], 0);
        assert_eq!(experiencia["navegacao"]["nota"], 0);
    }

    #[test]
    fn test_null_leaf_is_kept() {
        let doc = normalize(json!({"experiencia": {"cta": {"textoPrincipal": null}}}));
        assert_eq!(doc["experiencia"]["cta"]["textoPrincipal"], Value::Null);
        assert_eq!(doc["experiencia"]["cta"]["destaque"], 0);
    }

    #[test]
    fn test_priorities_placeholder_and_truncation() {
        let empty = normalize(json!({"prioridades": []}));
        assert_eq!(empty["prioridades"], json!([priority_placeholder()]));

        let missing = normalize(json!({}));
        assert_eq!(missing["prioridades"].as_array().unwrap().len(), 1);

        let long = normalize(json!({"prioridades": [
            {"titulo": "a"}, {"titulo": "b"}, {"titulo": "c"}, {"titulo": "d"}
        ]}));
        let titles: Vec<_> = long["prioridades"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["titulo"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_out_of_range_and_non_numeric_scores_reset() {
        let doc = normalize(json!({
            "pontuacaoGeral": 11,
            "experiencia": {"cta": {"clareza": 15, "destaque": "alto"}},
            "acessibilidade": {"contraste": -1, "legibilidade": 9.5}
        }));
        assert_eq!(doc["pontuacaoGeral"], 0);
        assert_eq!(doc["experiencia"]["cta"]["clareza"], 0);
        assert_eq!(doc["experiencia"]["cta"]["destaque"], 0);
        assert_eq!(doc["acessibilidade"]["contraste"], 0);
        assert_eq!(doc["acessibilidade"]["legibilidade"], 9.5);
    }

    #[test]
    fn test_absent_score_is_not_invented() {
        let doc = normalize(json!({"resumo": "ok"}));
        assert!(doc.get("pontuacaoGeral").is_none());
    }

    #[test]
    fn test_idempotent_on_sample() {
        let raw = json!({
            "prioridades": [],
            "experiencia": {"cta": {"clareza": 42}},
            "extra": true
        });
        let once = normalize(raw);
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_defaulted_sections_never_miss_required_fields() {
        let doc = normalize(json!({}));
        let missing: Vec<_> = validate(&doc, analysis_schema())
            .into_iter()
            .filter(|e| e.message.starts_with("missing required property"))
            .map(|e| e.path)
            .collect();
        assert_eq!(missing, vec!["root.pontuacaoGeral", "root.achados"]);
    }

    #[test]
    fn test_custom_schema_normalizer() {
        let schema = SchemaNode::from_json(&json!({
            "type": "object",
            "properties": {"score": {"type": "number", "minimum": 1, "maximum": 5}}
        }))
        .unwrap();
        let normalizer = Normalizer::new(&schema, "v", "2").with_score_range((1.0, 5.0));
        let doc = normalizer.normalize(json!({"score": 9}));
        assert_eq!(doc, json!({"score": 0, "v": "2"}));
    }
}
