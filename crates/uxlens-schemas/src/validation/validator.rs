//! Recursive structural validator
//!
//! One call frame per schema node; all branches push into a shared error
//! list. Unknown schema kinds impose no constraint.
//!
//! Copyright (c) 2025 Uxlens Team
//! Licensed under the Apache-2.0 license

use super::base::ValidationContext;
use super::error::ValidationError;
use crate::node::{Kind, SchemaNode};
use serde_json::{Map, Value};

/// Validate `value` against `schema`, returning every violation found
pub fn validate(value: &Value, schema: &SchemaNode) -> Vec<ValidationError> {
    Validator::new(schema).validate(value)
}

/// Report keys present at the document root but not declared by the schema
///
/// Only applies when the root node declares `additionalProperties: false`.
/// Nested objects are never checked this way.
pub fn unknown_root_properties(value: &Value, schema: &SchemaNode) -> Vec<ValidationError> {
    let closed = matches!(
        schema,
        SchemaNode::Object {
            additional_properties: false,
            ..
        }
    );
    let Some(map) = value.as_object().filter(|_| closed) else {
        return Vec::new();
    };

    let root = ValidationContext::root();
    map.keys()
        .filter(|key| schema.property(key).is_none())
        .map(|key| ValidationError::new(root.child(key).path, format!("unexpected property '{}'", key)))
        .collect()
}

/// Validator bound to one schema tree
#[derive(Debug, Clone, Copy)]
pub struct Validator<'s> {
    schema: &'s SchemaNode,
}

impl<'s> Validator<'s> {
    /// Create a validator for a schema
    pub fn new(schema: &'s SchemaNode) -> Self {
        Self { schema }
    }

    /// Validate a document from the root
    pub fn validate(&self, value: &Value) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        validate_node(value, self.schema, &ValidationContext::root(), &mut errors);
        errors
    }
}

fn validate_node(
    value: &Value,
    schema: &SchemaNode,
    context: &ValidationContext,
    errors: &mut Vec<ValidationError>,
) {
    match schema {
        SchemaNode::Object {
            properties,
            required,
            ..
        } => match value.as_object() {
            Some(map) => validate_object(map, properties, required, context, errors),
            None => errors.push(type_mismatch(context, "object", value)),
        },
        SchemaNode::Array {
            items,
            min_items,
            max_items,
        } => match value.as_array() {
            Some(elements) => {
                validate_array(elements, items.as_deref(), *min_items, *max_items, context, errors)
            }
            None => errors.push(type_mismatch(context, "array", value)),
        },
        SchemaNode::String { allowed } => match value.as_str() {
            Some(text) => {
                if let Some(allowed) = allowed {
                    if !allowed.iter().any(|candidate| candidate == text) {
                        errors.push(ValidationError::new(
                            &context.path,
                            format!("value '{}' is not one of [{}]", text, allowed.join(", ")),
                        ));
                    }
                }
            }
            None => errors.push(type_mismatch(context, "string", value)),
        },
        SchemaNode::Number {
            minimum,
            maximum,
            integer,
        } => {
            let kind = if *integer { Kind::Integer } else { Kind::Number };
            if !kind.matches(value) {
                errors.push(type_mismatch(context, kind.as_str(), value));
                return;
            }
            // Both bounds are checked independently
            if let Some(number) = value.as_f64() {
                if let Some(min) = minimum {
                    if number < *min {
                        errors.push(ValidationError::new(&context.path, format!("must be >= {}", min)));
                    }
                }
                if let Some(max) = maximum {
                    if number > *max {
                        errors.push(ValidationError::new(&context.path, format!("must be <= {}", max)));
                    }
                }
            }
        }
        SchemaNode::Boolean => {
            if !value.is_boolean() {
                errors.push(type_mismatch(context, "boolean", value));
            }
        }
        SchemaNode::Union(kinds) => {
            if !kinds.iter().any(|kind| kind.matches(value)) {
                let accepted: Vec<&str> = kinds.iter().map(Kind::as_str).collect();
                errors.push(ValidationError::new(
                    &context.path,
                    format!("expected one of [{}], found {}", accepted.join(", "), Kind::of(value)),
                ));
            }
        }
        SchemaNode::Any => {}
    }
}

fn validate_object(
    map: &Map<String, Value>,
    properties: &[(String, SchemaNode)],
    required: &[String],
    context: &ValidationContext,
    errors: &mut Vec<ValidationError>,
) {
    for key in required {
        if !map.contains_key(key) {
            errors.push(missing(&context.child(key), key));
        }
    }

    // Present keys in document order; undeclared keys are not checked here
    for (key, child) in map {
        if let Some((_, child_schema)) = properties.iter().find(|(name, _)| name == key) {
            validate_node(child, child_schema, &context.child(key), errors);
        }
    }
}

fn validate_array(
    elements: &[Value],
    items: Option<&SchemaNode>,
    min_items: Option<usize>,
    max_items: Option<usize>,
    context: &ValidationContext,
    errors: &mut Vec<ValidationError>,
) {
    if let Some(min) = min_items {
        if elements.len() < min {
            errors.push(ValidationError::new(
                &context.path,
                format!("must contain at least {} items, found {}", min, elements.len()),
            ));
        }
    }
    if let Some(max) = max_items {
        if elements.len() > max {
            errors.push(ValidationError::new(
                &context.path,
                format!("must contain at most {} items, found {}", max, elements.len()),
            ));
        }
    }

    if let Some(item_schema) = items {
        for (index, element) in elements.iter().enumerate() {
            validate_node(element, item_schema, &context.child_index(index), errors);
        }
    }
}

fn missing(context: &ValidationContext, key: &str) -> ValidationError {
    ValidationError::new(&context.path, format!("missing required property '{}'", key))
}

fn type_mismatch(context: &ValidationContext, expected: &str, value: &Value) -> ValidationError {
    ValidationError::new(&context.path, format!("expected {}, found {}", expected, Kind::of(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> SchemaNode {
        SchemaNode::from_json(&value).unwrap()
    }

    #[test]
    fn test_object_type_mismatch() {
        let s = schema(json!({"type": "object"}));
        let errors = validate(&json!([1, 2]), &s);
        assert_eq!(errors, vec![ValidationError::new("root", "expected object, found array")]);

        let errors = validate(&json!(null), &s);
        assert_eq!(errors[0].message, "expected object, found null");
    }

    #[test]
    fn test_missing_required_reports_child_path() {
        let s = schema(json!({
            "type": "object",
            "required": ["a", "b"],
            "properties": {"a": {"type": "string"}, "b": {"type": "number"}}
        }));
        let errors = validate(&json!({"a": "x"}), &s);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "root.b");
        assert!(errors[0].message.contains("missing required property 'b'"));
    }

    #[test]
    fn test_optional_absent_property_is_skipped() {
        let s = schema(json!({
            "type": "object",
            "properties": {"a": {"type": "string"}}
        }));
        assert!(validate(&json!({}), &s).is_empty());
    }

    #[test]
    fn test_unknown_keys_are_not_reported_recursively() {
        let s = schema(json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "inner": {"type": "object", "additionalProperties": false, "properties": {}}
            }
        }));
        let doc = json!({"inner": {"extra": 1}, "other": true});
        assert!(validate(&doc, &s).is_empty());

        let unknown = unknown_root_properties(&doc, &s);
        assert_eq!(unknown, vec![ValidationError::new("root.other", "unexpected property 'other'")]);
    }

    #[test]
    fn test_array_min_items_reported_once() {
        let s = schema(json!({
            "type": "array",
            "minItems": 3,
            "items": {"type": "string"}
        }));
        let errors = validate(&json!(["a"]), &s);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "root");
        assert!(errors[0].message.contains("at least 3 items"));
    }

    #[test]
    fn test_array_max_items_and_element_errors() {
        let s = schema(json!({
            "type": "array",
            "maxItems": 2,
            "items": {"type": "number"}
        }));
        let errors = validate(&json!([1, "two", 3]), &s);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("at most 2 items"));
        assert_eq!(errors[1].path, "root[1]");
    }

    #[test]
    fn test_string_enum_is_case_sensitive() {
        let s = schema(json!({"type": "string", "enum": ["alta", "baixa"]}));
        assert!(validate(&json!("alta"), &s).is_empty());
        let errors = validate(&json!("Alta"), &s);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'Alta'"));
    }

    #[test]
    fn test_number_bounds_fire_independently() {
        let contradictory = schema(json!({"type": "number", "minimum": 10, "maximum": 0}));
        let errors = validate(&json!(5), &contradictory);
        assert_eq!(errors.len(), 2);

        let bounded = schema(json!({"type": "number", "minimum": 0, "maximum": 10}));
        assert!(validate(&json!(0), &bounded).is_empty());
        assert!(validate(&json!(10), &bounded).is_empty());
        assert_eq!(validate(&json!(10.5), &bounded)[0].message, "must be <= 10");
        assert_eq!(validate(&json!("7"), &bounded)[0].message, "expected number, found string");
    }

    #[test]
    fn test_integer_kind() {
        let s = schema(json!({"type": "integer"}));
        assert!(validate(&json!(4), &s).is_empty());
        assert_eq!(validate(&json!(4.5), &s).len(), 1);
    }

    #[test]
    fn test_boolean_type_check() {
        let s = schema(json!({"type": "boolean"}));
        assert!(validate(&json!(false), &s).is_empty());
        assert_eq!(validate(&json!("false"), &s)[0].message, "expected boolean, found string");
    }

    #[test]
    fn test_union_string_or_null() {
        let s = schema(json!({"type": ["string", "null"]}));
        assert!(validate(&json!("texto"), &s).is_empty());
        assert!(validate(&json!(null), &s).is_empty());

        for rejected in [json!(1), json!(true), json!([]), json!({})] {
            let errors = validate(&rejected, &s);
            assert_eq!(errors.len(), 1, "value {} should be rejected", rejected);
            assert!(errors[0].message.contains("[string, null]"));
        }
    }

    #[test]
    fn test_union_object_excludes_arrays() {
        let s = schema(json!({"type": ["object", "null"]}));
        assert!(validate(&json!({}), &s).is_empty());
        assert_eq!(validate(&json!([]), &s).len(), 1);
    }

    #[test]
    fn test_unknown_kind_is_unconstrained() {
        let s = schema(json!({"type": "timestamp"}));
        assert!(validate(&json!(42), &s).is_empty());
    }

    #[test]
    fn test_errors_follow_traversal_order() {
        let s = schema(json!({
            "type": "object",
            "required": ["a", "list", "z"],
            "properties": {
                "a": {"type": "string"},
                "list": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["n"],
                        "properties": {"n": {"type": "number"}}
                    }
                },
                "z": {"type": "boolean"}
            }
        }));
        let doc = json!({"a": 1, "list": [{"n": "x"}, {}], "z": "no"});
        let paths: Vec<_> = validate(&doc, &s).into_iter().map(|e| e.path).collect();
        assert_eq!(paths, vec!["root.a", "root.list[0].n", "root.list[1].n", "root.z"]);
    }

    #[test]
    fn test_missing_keys_precede_document_order() {
        let s = schema(json!({
            "type": "object",
            "required": ["a", "b", "c"],
            "properties": {
                "a": {"type": "string"},
                "b": {"type": "string"},
                "c": {"type": "string"}
            }
        }));
        let paths: Vec<_> = validate(&json!({"b": 1, "a": 2}), &s)
            .into_iter()
            .map(|e| e.path)
            .collect();
        assert_eq!(paths, vec!["root.c", "root.b", "root.a"]);
    }

    #[test]
    fn test_validator_reuses_schema() {
        let s = schema(json!({"type": "string"}));
        let validator = Validator::new(&s);
        assert!(validator.validate(&json!("ok")).is_empty());
        assert_eq!(validator.validate(&json!(1)).len(), 1);
    }
}
