//! Unit tests for core procflow functionality.
mod common;
use common::*;
use procflow::model::{Complexity, template};
use procflow::prelude::*;

#[test]
fn test_node_type_display() {
    assert_eq!(format!("{}", NodeType::Trigger), "trigger");
    assert_eq!(format!("{}", NodeType::Api), "api");
    assert_eq!(format!("{:<12}|", NodeType::End), "end         |");
}

#[test]
fn test_node_type_serde_names() {
    let json = serde_json::to_string(&NodeType::Notification).unwrap();
    assert_eq!(json, "\"notification\"");
}

#[test]
fn test_structural_error_display() {
    let mut model = create_linear_model();
    model.connections.push(Connection::new("form", "ghost"));

    let err = Validator::validate(&model).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Invalid process graph: MissingEndpoint"));
    assert!(message.contains("ghost"));
    assert_eq!(err.node_id(), Some("ghost"));
}

#[test]
fn test_store_error_display() {
    let err = StoreError::NotFound("lead_capture_model".to_string());
    assert_eq!(err.to_string(), "Process model 'lead_capture_model' not found");

    let err = StoreError::from(TemplateError::UnknownTemplate("payroll".to_string()));
    assert_eq!(err.to_string(), "Unknown template 'payroll'");
}

#[test]
fn test_template_lookup() {
    let support = template("customer_support").unwrap();
    assert_eq!(support.complexity, Complexity::Advanced);
    assert!(support.has_blueprint());
    assert_eq!(support.includes.len(), 4);
    assert!(!template("onboarding").unwrap().has_blueprint());
}

#[test]
fn test_builder_stamps_creation_time() {
    let model = ProcessModel::builder("m", "Stamped")
        .node(Node::new("end", NodeType::End, "End"))
        .build();
    assert!(chrono::DateTime::parse_from_rfc3339(&model.created_at).is_ok());
}

#[test]
fn test_document_conversion_keeps_everything() {
    let model = create_branching_model();
    let document = ModelDocument::from(&model);

    assert_eq!(document.process_type, "content_approval");
    assert_eq!(document.nodes[1].node_type, "condition");
    assert_eq!(document.connections[1].condition.as_deref(), Some("yes"));
    assert_eq!(document.into_process_model("branching").unwrap(), model);
}

#[test]
fn test_execution_step_accessors() {
    let model = create_branching_model();
    let steps: Vec<_> = Resolver::resolve(&model).unwrap().collect();

    assert_eq!(steps[0].depth(), 0);
    assert_eq!(steps[0].incoming_condition(), None);
    assert_eq!(steps[2].node.id, "approve");
    assert_eq!(steps[2].depth(), 1);
    assert_eq!(steps[2].branch_path[0].condition_node, "check");
}
