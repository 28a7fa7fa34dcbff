//! Validation of UX-analysis documents against the built-in schema
//!
//! These tests exercise the validator on realistic documents: a complete
//! review, documents missing required sections, and out-of-range scores.

use serde_json::{json, Value};
use uxlens_schemas::{analysis_schema, unknown_root_properties, validate};

fn complete_document() -> Value {
    serde_json::from_str(include_str!("fixtures/complete_analysis.json")).unwrap()
}

#[test]
fn test_complete_document_is_valid() {
    let doc = complete_document();
    let errors = validate(&doc, analysis_schema());
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    assert!(unknown_root_properties(&doc, analysis_schema()).is_empty());
}

#[test]
fn test_missing_overall_score_is_addressed_exactly() {
    let mut doc = complete_document();
    doc.as_object_mut().unwrap().remove("pontuacaoGeral");

    let errors = validate(&doc, analysis_schema());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "root.pontuacaoGeral");
}

#[test]
fn test_short_findings_list_yields_single_error() {
    let mut doc = complete_document();
    doc["achados"].as_array_mut().unwrap().truncate(1);

    let errors = validate(&doc, analysis_schema());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "root.achados");
    assert!(errors[0].message.contains("at least 3 items"));
}

#[test]
fn test_nested_score_out_of_range() {
    let mut doc = complete_document();
    doc["experiencia"]["cta"]["clareza"] = json!(15);

    let errors = validate(&doc, analysis_schema());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "root.experiencia.cta.clareza");
    assert_eq!(errors[0].message, "must be <= 10");
}

#[test]
fn test_finding_element_accepts_string_or_null_only() {
    let mut doc = complete_document();
    doc["achados"][0]["elemento"] = json!(null);
    assert!(validate(&doc, analysis_schema()).is_empty());

    doc["achados"][0]["elemento"] = json!(3);
    let errors = validate(&doc, analysis_schema());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "root.achados[0].elemento");
}

#[test]
fn test_invalid_severity_enum() {
    let mut doc = complete_document();
    doc["achados"][2]["severidade"] = json!("Alta");

    let errors = validate(&doc, analysis_schema());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "root.achados[2].severidade");
}

#[test]
fn test_unknown_root_key_is_reported_only_by_root_check() {
    let mut doc = complete_document();
    doc["comentarios"] = json!("extra");
    doc["experiencia"]["extra"] = json!(true);

    assert!(validate(&doc, analysis_schema()).is_empty());
    let unknown = unknown_root_properties(&doc, analysis_schema());
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].path, "root.comentarios");
}

#[test]
fn test_all_violations_are_collected() {
    let doc = json!({
        "schema_version": "0.9",
        "achados": [],
        "prioridades": [{"titulo": 1}]
    });
    let errors = validate(&doc, analysis_schema());
    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();

    // Missing sections first, in declared order, then present fields as they appear
    assert_eq!(
        &paths[..6],
        &[
            "root.resumo",
            "root.pontuacaoGeral",
            "root.experiencia",
            "root.acessibilidade",
            "root.marca",
            "root.jobToBeDone",
        ]
    );
    assert_eq!(paths[6], "root.schema_version");
    assert!(paths.contains(&"root.achados"));
    assert!(paths.contains(&"root.prioridades[0].titulo"));
    assert!(paths.contains(&"root.prioridades[0].impacto"));
}
