//! Declarative schema nodes
//!
//! A [`SchemaNode`] describes the expected shape of a JSON value. Nodes are
//! parsed from a JSON-Schema subset once and then shared read-only.
//!
//! Copyright (c) 2025 Uxlens Team
//! Licensed under the Apache-2.0 license

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Errors raised while turning a JSON-Schema document into nodes
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A schema node was not a JSON object
    #[error("schema node at '{path}' must be an object")]
    NotAnObject { path: String },

    /// A `type` entry was neither a string nor a list of strings
    #[error("invalid 'type' at '{path}': {message}")]
    InvalidType { path: String, message: String },

    /// A keyword carried a value of the wrong shape
    #[error("invalid '{keyword}' at '{path}': {message}")]
    InvalidKeyword {
        path: String,
        keyword: String,
        message: String,
    },
}

/// Primitive kinds that may appear in a union
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl Kind {
    /// Parse a JSON-Schema type name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "object" => Some(Kind::Object),
            "array" => Some(Kind::Array),
            "string" => Some(Kind::String),
            "number" => Some(Kind::Number),
            "integer" => Some(Kind::Integer),
            "boolean" => Some(Kind::Boolean),
            "null" => Some(Kind::Null),
            _ => None,
        }
    }

    /// The JSON-Schema name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Integer => "integer",
            Kind::Boolean => "boolean",
            Kind::Null => "null",
        }
    }

    /// Check whether a value belongs to this kind
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Kind::Object => value.is_object(),
            Kind::Array => value.is_array(),
            Kind::String => value.is_string(),
            Kind::Number => value.is_number(),
            Kind::Integer => is_integral(value),
            Kind::Boolean => value.is_boolean(),
            Kind::Null => value.is_null(),
        }
    }

    /// The kind a value actually has, for error messages
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_integral(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
        }
        _ => false,
    }
}

/// A node in the schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// A mapping with named, ordered properties
    Object {
        properties: Vec<(String, SchemaNode)>,
        required: Vec<String>,
        additional_properties: bool,
    },
    /// A sequence whose elements share one schema
    Array {
        items: Option<Box<SchemaNode>>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    /// A string, optionally restricted to an enumeration
    String { allowed: Option<Vec<String>> },
    /// A number with optional inclusive bounds
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
        integer: bool,
    },
    /// A boolean
    Boolean,
    /// Any of several primitive kinds (`"type": ["string", "null"]`)
    Union(Vec<Kind>),
    /// Unknown or unconstrained kind
    Any,
}

impl SchemaNode {
    /// Parse a JSON-Schema document into a node tree
    pub fn from_json(schema: &Value) -> Result<Self, SchemaError> {
        Self::parse_at(schema, "#")
    }

    fn parse_at(schema: &Value, path: &str) -> Result<Self, SchemaError> {
        let object = schema.as_object().ok_or_else(|| SchemaError::NotAnObject {
            path: path.to_string(),
        })?;

        match object.get("type") {
            None => Ok(SchemaNode::Any),
            Some(Value::String(name)) => Self::parse_single(name, object, path),
            Some(Value::Array(names)) => {
                let mut kinds = Vec::with_capacity(names.len());
                for name in names {
                    let name = name.as_str().ok_or_else(|| SchemaError::InvalidType {
                        path: path.to_string(),
                        message: "union entries must be strings".to_string(),
                    })?;
                    // Unknown names in a union are dropped rather than rejected
                    if let Some(kind) = Kind::parse(name) {
                        kinds.push(kind);
                    }
                }
                if kinds.is_empty() {
                    Ok(SchemaNode::Any)
                } else {
                    Ok(SchemaNode::Union(kinds))
                }
            }
            Some(other) => Err(SchemaError::InvalidType {
                path: path.to_string(),
                message: format!("expected string or array, found {}", Kind::of(other)),
            }),
        }
    }

    fn parse_single(name: &str, object: &Map<String, Value>, path: &str) -> Result<Self, SchemaError> {
        match name {
            "object" => {
                let mut properties = Vec::new();
                if let Some(props) = object.get("properties") {
                    let props = props.as_object().ok_or_else(|| SchemaError::InvalidKeyword {
                        path: path.to_string(),
                        keyword: "properties".to_string(),
                        message: "must be an object".to_string(),
                    })?;
                    for (key, child) in props {
                        let child_path = format!("{}/properties/{}", path, key);
                        properties.push((key.clone(), Self::parse_at(child, &child_path)?));
                    }
                }

                let required = match object.get("required") {
                    None => Vec::new(),
                    Some(Value::Array(keys)) => keys
                        .iter()
                        .map(|k| {
                            k.as_str().map(str::to_string).ok_or_else(|| SchemaError::InvalidKeyword {
                                path: path.to_string(),
                                keyword: "required".to_string(),
                                message: "entries must be strings".to_string(),
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                    Some(_) => {
                        return Err(SchemaError::InvalidKeyword {
                            path: path.to_string(),
                            keyword: "required".to_string(),
                            message: "must be an array".to_string(),
                        })
                    }
                };

                // Only the boolean form is modelled; a sub-schema counts as "allowed"
                let additional_properties = !matches!(object.get("additionalProperties"), Some(Value::Bool(false)));

                Ok(SchemaNode::Object {
                    properties,
                    required,
                    additional_properties,
                })
            }
            "array" => {
                let items = match object.get("items") {
                    Some(items) => Some(Box::new(Self::parse_at(items, &format!("{}/items", path))?)),
                    None => None,
                };
                Ok(SchemaNode::Array {
                    items,
                    min_items: read_count(object, "minItems", path)?,
                    max_items: read_count(object, "maxItems", path)?,
                })
            }
            "string" => {
                let allowed = match object.get("enum") {
                    None => None,
                    Some(Value::Array(values)) => Some(
                        values
                            .iter()
                            .filter_map(|v| v.as_str().map(str::to_string))
                            .collect(),
                    ),
                    Some(_) => {
                        return Err(SchemaError::InvalidKeyword {
                            path: path.to_string(),
                            keyword: "enum".to_string(),
                            message: "must be an array".to_string(),
                        })
                    }
                };
                Ok(SchemaNode::String { allowed })
            }
            "number" | "integer" => Ok(SchemaNode::Number {
                minimum: read_bound(object, "minimum", path)?,
                maximum: read_bound(object, "maximum", path)?,
                integer: name == "integer",
            }),
            "boolean" => Ok(SchemaNode::Boolean),
            "null" => Ok(SchemaNode::Union(vec![Kind::Null])),
            _ => Ok(SchemaNode::Any),
        }
    }

    /// Look up a property schema of an object node
    pub fn property(&self, key: &str) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Object { properties, .. } => {
                properties.iter().find(|(name, _)| name == key).map(|(_, node)| node)
            }
            _ => None,
        }
    }
}

fn read_count(object: &Map<String, Value>, keyword: &str, path: &str) -> Result<Option<usize>, SchemaError> {
    match object.get(keyword) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| SchemaError::InvalidKeyword {
                path: path.to_string(),
                keyword: keyword.to_string(),
                message: "must be a non-negative integer".to_string(),
            }),
    }
}

fn read_bound(object: &Map<String, Value>, keyword: &str, path: &str) -> Result<Option<f64>, SchemaError> {
    match object.get(keyword) {
        None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| SchemaError::InvalidKeyword {
            path: path.to_string(),
            keyword: keyword.to_string(),
            message: "must be a number".to_string(),
        }),
    }
}
