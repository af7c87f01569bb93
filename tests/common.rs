//! Common test utilities for building process models and collections.
use procflow::error::PersistenceError;
use procflow::prelude::*;

/// Creates the smallest useful process.
///
/// Graph: `start (trigger) -> form (form) -> end (end)`
#[allow(dead_code)]
pub fn create_linear_model() -> ProcessModel {
    ProcessModel::builder("linear", "Linear Process")
        .process_type("lead_generation")
        .node(Node::new("start", NodeType::Trigger, "Website Visit"))
        .node(Node::new("form", NodeType::Form, "Contact Form"))
        .node(Node::new("end", NodeType::End, "Done"))
        .connect("start", "form")
        .connect("form", "end")
        .created_at("2024-01-01T00:00:00Z")
        .build()
}

/// Creates a model with one decision point whose branches merge again.
///
/// Graph: `start -> check ? (yes: approve | no: reject) -> end`
#[allow(dead_code)]
pub fn create_branching_model() -> ProcessModel {
    ProcessModel::builder("branching", "Content Approval")
        .process_type("content_approval")
        .node(Node::new("start", NodeType::Trigger, "Submitted"))
        .node(Node::new("check", NodeType::Condition, "Approved?"))
        .node(Node::new("approve", NodeType::Action, "Publish"))
        .node(Node::new("reject", NodeType::Notification, "Notify Author"))
        .node(Node::new("end", NodeType::End, "Done"))
        .connect("start", "check")
        .branch("check", "approve", "yes")
        .branch("check", "reject", "no")
        .connect("approve", "end")
        .connect("reject", "end")
        .created_at("2024-01-01T00:00:00Z")
        .build()
}

/// A collection file in the format the modeler writes.
#[allow(dead_code)]
pub const SAMPLE_COLLECTION_JSON: &str = r#"{
  "lead_capture_model": {
    "name": "Lead Capture Process",
    "description": "Complete lead capture and nurturing workflow",
    "type": "lead_generation",
    "nodes": [
      {"id": "start", "type": "trigger", "label": "Website Visit", "x": 100, "y": 100},
      {"id": "form", "type": "form", "label": "Contact Form", "x": 250, "y": 100},
      {"id": "condition", "type": "condition", "label": "Qualified Lead?", "x": 400, "y": 250},
      {"id": "sales_notify", "type": "notification", "label": "Notify Sales", "x": 550, "y": 200},
      {"id": "nurture", "type": "action", "label": "Add to Nurture", "x": 550, "y": 300},
      {"id": "end", "type": "end", "label": "Process Complete", "x": 700, "y": 250}
    ],
    "connections": [
      {"from": "start", "to": "form"},
      {"from": "form", "to": "condition"},
      {"from": "condition", "to": "sales_notify", "condition": "qualified"},
      {"from": "condition", "to": "nurture", "condition": "not_qualified"},
      {"from": "sales_notify", "to": "end"},
      {"from": "nurture", "to": "end"}
    ],
    "webhooks": ["lead_capture", "crm_integration"],
    "forms": ["contact_form"],
    "created_at": "2024-01-01T00:00:00Z"
  },
  "onboarding_model_20240501_120000": {
    "name": "Customer Onboarding",
    "description": "New customer welcome and setup process",
    "type": "customer_onboarding",
    "nodes": [
      {"id": "signup", "type": "trigger", "label": "Account Created", "x": 100, "y": 100},
      {"id": "provision", "type": "api", "label": "Provision Workspace", "x": 250, "y": 100},
      {"id": "record", "type": "database", "label": "Store Customer", "x": 400, "y": 100},
      {"id": "done", "type": "end", "label": "Complete", "x": 550, "y": 100}
    ],
    "connections": [
      {"from": "signup", "to": "provision"},
      {"from": "provision", "to": "record"},
      {"from": "record", "to": "done"}
    ],
    "webhooks": [],
    "forms": [],
    "created_at": "2024-05-01T12:00:00.123456",
    "template": "onboarding"
  }
}"#;

/// A valid model next to a template instance saved without any graph.
#[allow(dead_code)]
pub const COLLECTION_WITH_EMPTY_TEMPLATE_JSON: &str = r#"{
  "lead_capture_model": {
    "name": "Lead Capture Process",
    "description": "Complete lead capture and nurturing workflow",
    "type": "lead_generation",
    "nodes": [
      {"id": "start", "type": "trigger", "label": "Website Visit", "x": 100, "y": 100},
      {"id": "end", "type": "end", "label": "Process Complete", "x": 250, "y": 100}
    ],
    "connections": [{"from": "start", "to": "end"}],
    "webhooks": [],
    "forms": [],
    "created_at": "2024-01-01T00:00:00Z"
  },
  "sales_pipeline_model_20240501_120000": {
    "name": "Sales Pipeline Management",
    "description": "Opportunity tracking from lead to close",
    "type": "sales_pipeline",
    "nodes": [],
    "connections": [],
    "webhooks": [],
    "forms": [],
    "created_at": "2024-05-01T12:00:00.123456",
    "template": "sales_pipeline"
  }
}"#;

/// Persistence whose saves always fail, for checking that the store stays untouched.
#[allow(dead_code)]
pub struct FailingPersistence;

impl Persistence for FailingPersistence {
    fn load(&self) -> std::result::Result<ModelCollection, PersistenceError> {
        Ok(ModelCollection::new())
    }

    fn save(&self, _models: &ModelCollection) -> std::result::Result<(), PersistenceError> {
        Err(PersistenceError::Io {
            path: "unwritable.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

/// Node ids of an execution order, with the innermost branch label if any.
#[allow(dead_code)]
pub fn visits(model: &ProcessModel) -> Vec<(String, Option<String>)> {
    Resolver::resolve(model)
        .expect("model should resolve")
        .map(|step| {
            (
                step.node.id.clone(),
                step.incoming_condition().map(str::to_string),
            )
        })
        .collect()
}

/// Shorthand for building expected `visits` output.
#[allow(dead_code)]
pub fn visit(id: &str, condition: Option<&str>) -> (String, Option<String>) {
    (id.to_string(), condition.map(str::to_string))
}
