//! Built-in UX-analysis document schema
//!
//! The schema is embedded at compile time and parsed once per process. The
//! same JSON is sent to the model provider as the structured-output contract,
//! and its parsed [`SchemaNode`] form drives validation and normalization.
//!
//! Copyright (c) 2025 Uxlens Team
//! Licensed under the Apache-2.0 license

use crate::node::SchemaNode;
use serde_json::{json, Value};
use std::sync::OnceLock;

/// Literal version tag stamped on every analysis document
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Name used when registering the schema with a structured-output provider
pub const SCHEMA_NAME: &str = "ux_analysis";

/// Root key holding the version tag
pub const VERSION_FIELD: &str = "schema_version";

/// Root key of the bounded top-priorities list
pub const PRIORITIES_FIELD: &str = "prioridades";

/// Maximum number of entries kept in the priorities list
pub const PRIORITIES_LIMIT: usize = 3;

/// Inclusive range shared by every score field
pub const SCORE_RANGE: (f64, f64) = (0.0, 10.0);

static SCHEMA_SOURCE: &str = include_str!("../schemas/ux_analysis.schema.json");
static SCHEMA_JSON: OnceLock<Value> = OnceLock::new();
static SCHEMA_NODE: OnceLock<SchemaNode> = OnceLock::new();

/// The raw JSON-Schema document
pub fn analysis_schema_json() -> &'static Value {
    SCHEMA_JSON.get_or_init(|| {
        serde_json::from_str(SCHEMA_SOURCE).expect("embedded analysis schema is valid JSON")
    })
}

/// The parsed schema tree
pub fn analysis_schema() -> &'static SchemaNode {
    SCHEMA_NODE.get_or_init(|| {
        SchemaNode::from_json(analysis_schema_json()).expect("embedded analysis schema is well-formed")
    })
}

/// Default values for root sections the model may omit
///
/// Each entry is the minimal valid value for that section: empty strings,
/// `false`, empty lists and zero scores. Sections absent from this list
/// (`pontuacaoGeral`, `achados`) are never synthesized.
pub fn section_defaults() -> Vec<(&'static str, Value)> {
    let scored_note = || json!({"nota": 0, "observacoes": ""});
    vec![
        ("resumo", json!("")),
        (
            "experiencia",
            json!({
                "hierarquia": scored_note(),
                "cta": {"clareza": 0, "destaque": 0, "textoPrincipal": null},
                "navegacao": scored_note(),
                "consistencia": scored_note()
            }),
        ),
        (
            "acessibilidade",
            json!({"contraste": 0, "legibilidade": 0, "problemas": []}),
        ),
        (
            "marca",
            json!({"aderenciaVoz": 0, "conforme": false, "violacoes": []}),
        ),
        (
            "jobToBeDone",
            json!({"atendido": false, "avaliacao": "", "lacunas": []}),
        ),
    ]
}

/// Placeholder entry used when the priorities list comes back empty
pub fn priority_placeholder() -> Value {
    json!({
        "titulo": "",
        "impacto": "medio",
        "esforco": "medio",
        "justificativa": ""
    })
}
