//! Built-in process types, seed models and templates offered by the modeler.
use super::definition::{Connection, Node, NodeType, ProcessModel, timestamp_now};
use crate::error::TemplateError;
use std::fmt;

/// Known process types as `(key, display label)`.
pub const PROCESS_TYPES: [(&str, &str); 8] = [
    ("lead_generation", "Lead Generation"),
    ("customer_onboarding", "Customer Onboarding"),
    ("support_workflow", "Support Workflow"),
    ("sales_pipeline", "Sales Pipeline"),
    ("content_approval", "Content Approval"),
    ("invoice_processing", "Invoice Processing"),
    ("hr_onboarding", "HR Onboarding"),
    ("project_management", "Project Management"),
];

/// Display label of a process type key, if it is one of the known types.
pub fn process_type_label(key: &str) -> Option<&'static str> {
    PROCESS_TYPES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
}

/// Models a fresh store is seeded with.
pub fn default_models() -> Vec<ProcessModel> {
    vec![
        ProcessModel::builder("lead_capture_model", "Lead Capture Process")
            .description("Complete lead capture and nurturing workflow")
            .process_type("lead_generation")
            .nodes([
                Node::new("start", NodeType::Trigger, "Website Visit").at(100, 100),
                Node::new("form", NodeType::Form, "Contact Form").at(250, 100),
                Node::new("webhook", NodeType::Webhook, "Send to CRM").at(400, 100),
                Node::new("email", NodeType::Notification, "Welcome Email").at(550, 100),
                Node::new("condition", NodeType::Condition, "Qualified Lead?").at(400, 250),
                Node::new("sales_notify", NodeType::Notification, "Notify Sales").at(550, 200),
                Node::new("nurture", NodeType::Action, "Add to Nurture").at(550, 300),
                Node::new("end", NodeType::End, "Process Complete").at(700, 250),
            ])
            .connect("start", "form")
            .connect("form", "webhook")
            .connect("webhook", "email")
            .connect("email", "condition")
            .branch("condition", "sales_notify", "qualified")
            .branch("condition", "nurture", "not_qualified")
            .connect("sales_notify", "end")
            .connect("nurture", "end")
            .webhook("lead_capture")
            .webhook("crm_integration")
            .form("contact_form")
            .created_at("2024-01-01T00:00:00Z")
            .build(),
        ProcessModel::builder("support_ticket_model", "Support Ticket Workflow")
            .description("Customer support ticket processing and resolution")
            .process_type("support_workflow")
            .nodes(support_nodes())
            .connections(support_connections())
            .webhook("support_ticket")
            .webhook("agent_notification")
            .form("support_form")
            .created_at("2024-01-01T00:00:00Z")
            .build(),
    ]
}

fn support_nodes() -> Vec<Node> {
    vec![
        Node::new("ticket_created", NodeType::Trigger, "Ticket Created").at(100, 100),
        Node::new("categorize", NodeType::Condition, "Categorize Issue").at(250, 100),
        Node::new("urgent", NodeType::Action, "Urgent Queue").at(400, 50),
        Node::new("normal", NodeType::Action, "Normal Queue").at(400, 150),
        Node::new("auto_response", NodeType::Notification, "Auto Response").at(550, 100),
        Node::new("assign", NodeType::Action, "Assign Agent").at(700, 100),
        Node::new("resolved", NodeType::Condition, "Resolved?").at(850, 100),
        Node::new("close", NodeType::Action, "Close Ticket").at(1000, 50),
        Node::new("escalate", NodeType::Action, "Escalate").at(1000, 150),
        Node::new("end", NodeType::End, "Complete").at(1150, 100),
    ]
}

fn support_connections() -> Vec<Connection> {
    vec![
        Connection::new("ticket_created", "categorize"),
        Connection::when("categorize", "urgent", "high_priority"),
        Connection::when("categorize", "normal", "normal_priority"),
        Connection::new("urgent", "auto_response"),
        Connection::new("normal", "auto_response"),
        Connection::new("auto_response", "assign"),
        Connection::new("assign", "resolved"),
        Connection::when("resolved", "close", "yes"),
        Connection::when("resolved", "escalate", "no"),
        Connection::new("close", "end"),
        Connection::new("escalate", "end"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Complexity::Beginner => write!(f, "Beginner"),
            Complexity::Intermediate => write!(f, "Intermediate"),
            Complexity::Advanced => write!(f, "Advanced"),
        }
    }
}

/// A quick-start description of a common business process.
#[derive(Debug, Clone)]
pub struct Template {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub complexity: Complexity,
    pub estimated_time: &'static str,
    pub includes: &'static [&'static str],
    blueprint: Option<fn() -> (Vec<Node>, Vec<Connection>)>,
}

impl Template {
    pub fn has_blueprint(&self) -> bool {
        self.blueprint.is_some()
    }

    /// Creates a model from this template, keyed `<template>_model_<YYYYmmdd_HHMMSS>`.
    pub fn instantiate(&self) -> Result<ProcessModel, TemplateError> {
        let blueprint = self
            .blueprint
            .ok_or_else(|| TemplateError::NoBlueprint(self.key.to_string()))?;
        let (nodes, connections) = blueprint();
        let id = format!(
            "{}_model_{}",
            self.key,
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );

        Ok(ProcessModel::builder(&id, self.name)
            .description(self.description)
            .process_type(self.key)
            .nodes(nodes)
            .connections(connections)
            .template(self.key)
            .created_at(&timestamp_now())
            .build())
    }
}

/// All built-in templates in display order.
pub fn templates() -> Vec<Template> {
    vec![
        Template {
            key: "lead_generation",
            name: "Lead Generation Workflow",
            description: "Complete lead capture, qualification, and nurturing process",
            complexity: Complexity::Intermediate,
            estimated_time: "30 minutes",
            includes: &["Contact forms", "CRM integration", "Email automation", "Lead scoring"],
            blueprint: Some(lead_generation_blueprint),
        },
        Template {
            key: "customer_support",
            name: "Customer Support Process",
            description: "Ticket creation, routing, escalation, and resolution workflow",
            complexity: Complexity::Advanced,
            estimated_time: "45 minutes",
            includes: &["Ticket forms", "Auto-routing", "SLA tracking", "Customer notifications"],
            blueprint: Some(customer_support_blueprint),
        },
        Template {
            key: "sales_pipeline",
            name: "Sales Pipeline Management",
            description: "Opportunity tracking from lead to close",
            complexity: Complexity::Advanced,
            estimated_time: "60 minutes",
            includes: &[
                "Opportunity forms",
                "Stage progression",
                "Sales notifications",
                "Reporting",
            ],
            blueprint: None,
        },
        Template {
            key: "onboarding",
            name: "Customer Onboarding",
            description: "New customer welcome and setup process",
            complexity: Complexity::Intermediate,
            estimated_time: "40 minutes",
            includes: &["Welcome forms", "Account setup", "Training materials", "Check-ins"],
            blueprint: None,
        },
        Template {
            key: "content_approval",
            name: "Content Approval Workflow",
            description: "Content creation, review, approval, and publishing process",
            complexity: Complexity::Beginner,
            estimated_time: "20 minutes",
            includes: &["Submission forms", "Review process", "Approval routing", "Publishing"],
            blueprint: None,
        },
        Template {
            key: "invoice_processing",
            name: "Invoice Processing",
            description: "Invoice receipt, validation, approval, and payment workflow",
            complexity: Complexity::Intermediate,
            estimated_time: "35 minutes",
            includes: &[
                "Invoice upload",
                "Data extraction",
                "Approval workflow",
                "Payment processing",
            ],
            blueprint: None,
        },
    ]
}

/// Looks up a template by key.
pub fn template(key: &str) -> Result<Template, TemplateError> {
    templates()
        .into_iter()
        .find(|t| t.key == key)
        .ok_or_else(|| TemplateError::UnknownTemplate(key.to_string()))
}

fn customer_support_blueprint() -> (Vec<Node>, Vec<Connection>) {
    (support_nodes(), support_connections())
}

fn lead_generation_blueprint() -> (Vec<Node>, Vec<Connection>) {
    (
        vec![
            Node::new("start", NodeType::Trigger, "Lead Source").at(100, 100),
            Node::new("form", NodeType::Form, "Contact Form").at(250, 100),
            Node::new("qualify", NodeType::Condition, "Qualify Lead").at(400, 100),
            Node::new("crm", NodeType::Webhook, "Add to CRM").at(550, 50),
            Node::new("nurture", NodeType::Action, "Nurture Campaign").at(550, 150),
            Node::new("end", NodeType::End, "Complete").at(700, 100),
        ],
        vec![
            Connection::new("start", "form"),
            Connection::new("form", "qualify"),
            Connection::when("qualify", "crm", "qualified"),
            Connection::when("qualify", "nurture", "not_qualified"),
            Connection::new("crm", "end"),
            Connection::new("nurture", "end"),
        ],
    )
}
