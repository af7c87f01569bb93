//! Tests for structural validation and lints.
mod common;
use common::*;
use procflow::prelude::*;

fn structural(model: &ProcessModel) -> StructuralError {
    match Validator::validate(model) {
        Err(ValidationError::Structural(err)) => err,
        other => panic!("Expected a structural error, got {:?}", other),
    }
}

#[test]
fn test_linear_model_is_valid() {
    assert!(Validator::validate(&create_linear_model()).is_ok());
}

#[test]
fn test_default_models_are_valid() {
    for model in procflow::model::default_models() {
        assert!(
            Validator::validate(&model).is_ok(),
            "default model '{}' should validate",
            model.id
        );
    }
}

#[test]
fn test_duplicate_node_id() {
    let mut model = create_linear_model();
    model.nodes.push(Node::new("form", NodeType::Action, "Second form"));

    let err = structural(&model);
    assert_eq!(err.kind, StructuralErrorKind::DuplicateId);
    assert_eq!(err.node_id.as_deref(), Some("form"));
}

#[test]
fn test_connection_to_missing_node() {
    let mut model = create_linear_model();
    model.connections.push(Connection::new("form", "ghost"));

    let err = structural(&model);
    assert_eq!(err.kind, StructuralErrorKind::MissingEndpoint);
    assert_eq!(err.node_id.as_deref(), Some("ghost"));
    assert_eq!(err.connection_index, Some(2));
}

#[test]
fn test_multiple_entry_points() {
    let model = ProcessModel::builder("m", "Two triggers")
        .node(Node::new("web", NodeType::Trigger, "Web"))
        .node(Node::new("mail", NodeType::Trigger, "Mail"))
        .node(Node::new("end", NodeType::End, "Done"))
        .connect("web", "end")
        .connect("mail", "end")
        .build();

    let err = structural(&model);
    assert_eq!(err.kind, StructuralErrorKind::MultipleEntryPoints);
    assert_eq!(err.node_id.as_deref(), Some("mail"));
}

#[test]
fn test_no_entry_point_in_closed_loop() {
    let model = ProcessModel::builder("m", "Loop")
        .node(Node::new("a", NodeType::Action, "A"))
        .node(Node::new("b", NodeType::Action, "B"))
        .connect("a", "b")
        .connect("b", "a")
        .build();

    assert_eq!(structural(&model).kind, StructuralErrorKind::NoEntryPoint);
}

#[test]
fn test_duplicate_branch_label_is_ambiguous() {
    let model = ProcessModel::builder("m", "Ambiguous")
        .node(Node::new("start", NodeType::Trigger, "Start"))
        .node(Node::new("check", NodeType::Condition, "Check"))
        .node(Node::new("a", NodeType::Action, "A"))
        .node(Node::new("b", NodeType::Action, "B"))
        .node(Node::new("end", NodeType::End, "End"))
        .connect("start", "check")
        .branch("check", "a", "yes")
        .branch("check", "b", "yes")
        .connect("a", "end")
        .connect("b", "end")
        .build();

    let err = structural(&model);
    assert_eq!(err.kind, StructuralErrorKind::AmbiguousBranch);
    assert_eq!(err.node_id.as_deref(), Some("check"));
    assert_eq!(err.connection_index, Some(2));
}

#[test]
fn test_duplicate_labels_on_plain_node_are_ambiguous() {
    let model = ProcessModel::builder("m", "Mislabeled action")
        .node(Node::new("start", NodeType::Trigger, "Start"))
        .node(Node::new("act", NodeType::Action, "Act"))
        .node(Node::new("a", NodeType::Action, "A"))
        .node(Node::new("b", NodeType::Action, "B"))
        .node(Node::new("end", NodeType::End, "End"))
        .connect("start", "act")
        .branch("act", "a", "yes")
        .branch("act", "b", "yes")
        .connect("a", "end")
        .connect("b", "end")
        .build();

    let err = structural(&model);
    assert_eq!(err.kind, StructuralErrorKind::AmbiguousBranch);
    assert_eq!(err.node_id.as_deref(), Some("act"));
    assert_eq!(err.connection_index, Some(2));
}

#[test]
fn test_unlabeled_branch_is_ambiguous() {
    let mut model = create_branching_model();
    model.connections[2].condition = Some("   ".to_string());

    let err = structural(&model);
    assert_eq!(err.kind, StructuralErrorKind::AmbiguousBranch);
    assert_eq!(err.connection_index, Some(2));
}

#[test]
fn test_condition_needs_two_branches() {
    let mut model = create_branching_model();
    // Drop the "no" branch and its now orphaned target.
    model.connections.retain(|c| c.to != "reject" && c.from != "reject");
    model.nodes.retain(|n| n.id != "reject");

    let err = structural(&model);
    assert_eq!(err.kind, StructuralErrorKind::AmbiguousBranch);
    assert_eq!(err.node_id.as_deref(), Some("check"));
}

#[test]
fn test_branch_label_on_plain_node() {
    let mut model = create_linear_model();
    model.connections[1].condition = Some("yes".to_string());

    let err = structural(&model);
    assert_eq!(err.kind, StructuralErrorKind::UnexpectedBranchLabel);
    assert_eq!(err.node_id.as_deref(), Some("form"));
}

#[test]
fn test_isolated_node_is_unreachable() {
    let mut model = create_linear_model();
    model.nodes.push(Node::new("orphan", NodeType::Action, "Orphan"));

    let err = structural(&model);
    assert_eq!(err.kind, StructuralErrorKind::UnreachableNode);
    assert_eq!(err.node_id.as_deref(), Some("orphan"));
}

#[test]
fn test_node_behind_end_is_unreachable() {
    let mut model = create_linear_model();
    model.nodes.push(Node::new("after", NodeType::Action, "After"));
    model.connections.push(Connection::new("end", "after"));

    assert_eq!(structural(&model).kind, StructuralErrorKind::UnreachableNode);
}

#[test]
fn test_cycle_before_end() {
    let model = ProcessModel::builder("m", "Retry loop")
        .node(Node::new("start", NodeType::Trigger, "Start"))
        .node(Node::new("a", NodeType::Action, "Attempt"))
        .node(Node::new("b", NodeType::Action, "Check"))
        .node(Node::new("end", NodeType::End, "End"))
        .connect("start", "a")
        .connect("a", "b")
        .connect("b", "a")
        .connect("b", "end")
        .build();

    let err = structural(&model);
    assert_eq!(err.kind, StructuralErrorKind::CyclicGraph);
    assert_eq!(err.node_id.as_deref(), Some("a"));
    assert_eq!(err.connection_index, Some(2));
}

#[test]
fn test_cycle_through_condition_branch() {
    let model = ProcessModel::builder("m", "Resubmit")
        .node(Node::new("start", NodeType::Trigger, "Start"))
        .node(Node::new("form", NodeType::Form, "Form"))
        .node(Node::new("check", NodeType::Condition, "Complete?"))
        .node(Node::new("end", NodeType::End, "End"))
        .connect("start", "form")
        .connect("form", "check")
        .branch("check", "form", "incomplete")
        .branch("check", "end", "complete")
        .build();

    assert_eq!(structural(&model).kind, StructuralErrorKind::CyclicGraph);
}

#[test]
fn test_loop_through_end_is_not_a_cycle() {
    let mut model = create_linear_model();
    model.connections.push(Connection::new("end", "form"));

    assert!(Validator::validate(&model).is_ok());
    let lints = Validator::lint(&model);
    assert_eq!(lints.len(), 1);
    assert_eq!(lints[0].kind, LintKind::EndHasOutgoing);
    assert_eq!(lints[0].node_id, "end");
}

#[test]
fn test_dead_end_branch() {
    let mut model = create_branching_model();
    model.connections.retain(|c| !(c.from == "reject" && c.to == "end"));

    let err = structural(&model);
    assert_eq!(err.kind, StructuralErrorKind::DeadEnd);
    assert_eq!(err.node_id.as_deref(), Some("reject"));
}

#[test]
fn test_checks_short_circuit_in_order() {
    // Duplicate id, dangling connection and a cycle all at once.
    let model = ProcessModel::builder("m", "Broken")
        .node(Node::new("start", NodeType::Trigger, "Start"))
        .node(Node::new("start", NodeType::Action, "Again"))
        .node(Node::new("a", NodeType::Action, "A"))
        .connect("start", "a")
        .connect("a", "start")
        .connect("a", "nowhere")
        .build();
    assert_eq!(structural(&model).kind, StructuralErrorKind::DuplicateId);

    let mut model = model;
    model.nodes.remove(1);
    assert_eq!(structural(&model).kind, StructuralErrorKind::MissingEndpoint);
}

#[test]
fn test_unknown_node_type_in_document() {
    let document: ModelDocument = serde_json::from_str(
        r#"{"name": "X", "nodes": [{"id": "s", "type": "subprocess", "label": "S"}]}"#,
    )
    .unwrap();

    let err = document.into_process_model("x").unwrap_err();
    assert_eq!(
        err,
        ValidationError::UnknownNodeType {
            node_id: "s".to_string(),
            type_name: "subprocess".to_string(),
        }
    );
    assert!(err.to_string().contains("subprocess"));
}

#[test]
fn test_lint_entry_not_trigger() {
    let mut model = create_linear_model();
    model.nodes[0].node_type = NodeType::Form;

    assert!(Validator::validate(&model).is_ok());
    let kinds: Vec<_> = Validator::lint(&model).into_iter().map(|l| l.kind).collect();
    assert_eq!(kinds, vec![LintKind::EntryNotTrigger]);
}

#[test]
fn test_lint_misplaced_trigger() {
    let mut model = create_linear_model();
    model.nodes[1].node_type = NodeType::Trigger;

    let lints = Validator::lint(&model);
    assert_eq!(lints.len(), 1);
    assert_eq!(lints[0].kind, LintKind::MisplacedTrigger);
    assert_eq!(lints[0].node_id, "form");
}
