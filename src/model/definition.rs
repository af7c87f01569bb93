use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a process model, unique within a store.
pub type ModelId = String;

/// The closed set of node kinds a process diagram may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Trigger,
    Form,
    Webhook,
    Notification,
    Condition,
    Action,
    Database,
    Api,
    End,
}

impl NodeType {
    pub const ALL: [NodeType; 9] = [
        NodeType::Trigger,
        NodeType::Form,
        NodeType::Webhook,
        NodeType::Notification,
        NodeType::Condition,
        NodeType::Action,
        NodeType::Database,
        NodeType::Api,
        NodeType::End,
    ];

    /// The name used for this type in model documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Trigger => "trigger",
            NodeType::Form => "form",
            NodeType::Webhook => "webhook",
            NodeType::Notification => "notification",
            NodeType::Condition => "condition",
            NodeType::Action => "action",
            NodeType::Database => "database",
            NodeType::Api => "api",
            NodeType::End => "end",
        }
    }

    /// Short human-readable description shown in the modeler.
    pub fn description(&self) -> &'static str {
        match self {
            NodeType::Trigger => "Process trigger/start",
            NodeType::Form => "Form submission",
            NodeType::Webhook => "Webhook call",
            NodeType::Notification => "Send notification",
            NodeType::Condition => "Decision point",
            NodeType::Action => "Action/task",
            NodeType::Database => "Database operation",
            NodeType::Api => "API call",
            NodeType::End => "Process end",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Unrecognized node type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNodeType(pub String);

impl FromStr for NodeType {
    type Err = UnknownNodeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownNodeType(s.to_string()))
    }
}

/// A single step of a process diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub node_type: NodeType,
    pub label: String,
    pub x: i64,
    pub y: i64,
}

impl Node {
    pub fn new(id: &str, node_type: NodeType, label: &str) -> Self {
        Self {
            id: id.to_string(),
            node_type,
            label: label.to_string(),
            x: 0,
            y: 0,
        }
    }

    pub fn at(mut self, x: i64, y: i64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Parses the document form of a node, rejecting unknown type names.
    pub fn parse(
        id: String,
        type_name: &str,
        label: String,
        x: i64,
        y: i64,
    ) -> Result<Self, ValidationError> {
        let node_type = type_name
            .parse::<NodeType>()
            .map_err(|UnknownNodeType(type_name)| ValidationError::UnknownNodeType {
                node_id: id.clone(),
                type_name,
            })?;
        Ok(Self {
            id,
            node_type,
            label,
            x,
            y,
        })
    }
}

/// A directed edge between two nodes, optionally labeled with the branch
/// condition under which it is taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub from: String,
    pub to: String,
    pub condition: Option<String>,
}

impl Connection {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            condition: None,
        }
    }

    pub fn when(from: &str, to: &str, condition: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            condition: Some(condition.to_string()),
        }
    }
}

/// A named workflow graph together with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessModel {
    pub id: ModelId,
    pub name: String,
    pub description: String,
    pub process_type: String,
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    pub webhooks: Vec<String>,
    pub forms: Vec<String>,
    pub created_at: String,
    pub template: Option<String>,
}

impl ProcessModel {
    /// Starts building a model with the given id and display name.
    pub fn builder(id: &str, name: &str) -> ProcessModelBuilder {
        ProcessModelBuilder::new(id, name)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Fluent constructor for [`ProcessModel`]. The model is only checked when it
/// is handed to the validator or the store.
#[derive(Debug, Clone)]
pub struct ProcessModelBuilder {
    model: ProcessModel,
}

impl ProcessModelBuilder {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            model: ProcessModel {
                id: id.to_string(),
                name: name.to_string(),
                description: String::new(),
                process_type: String::new(),
                nodes: Vec::new(),
                connections: Vec::new(),
                webhooks: Vec::new(),
                forms: Vec::new(),
                created_at: String::new(),
                template: None,
            },
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.model.description = description.to_string();
        self
    }

    pub fn process_type(mut self, process_type: &str) -> Self {
        self.model.process_type = process_type.to_string();
        self
    }

    pub fn node(mut self, node: Node) -> Self {
        self.model.nodes.push(node);
        self
    }

    pub fn nodes(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.model.nodes.extend(nodes);
        self
    }

    pub fn connect(mut self, from: &str, to: &str) -> Self {
        self.model.connections.push(Connection::new(from, to));
        self
    }

    pub fn branch(mut self, from: &str, to: &str, condition: &str) -> Self {
        self.model
            .connections
            .push(Connection::when(from, to, condition));
        self
    }

    pub fn connections(mut self, connections: impl IntoIterator<Item = Connection>) -> Self {
        self.model.connections.extend(connections);
        self
    }

    pub fn webhook(mut self, webhook: &str) -> Self {
        self.model.webhooks.push(webhook.to_string());
        self
    }

    pub fn form(mut self, form: &str) -> Self {
        self.model.forms.push(form.to_string());
        self
    }

    pub fn created_at(mut self, created_at: &str) -> Self {
        self.model.created_at = created_at.to_string();
        self
    }

    pub fn template(mut self, template: &str) -> Self {
        self.model.template = Some(template.to_string());
        self
    }

    /// Finishes the model. An unset `created_at` is stamped with the current UTC time.
    pub fn build(mut self) -> ProcessModel {
        if self.model.created_at.is_empty() {
            self.model.created_at = timestamp_now();
        }
        self.model
    }
}

/// RFC 3339 UTC timestamp with second precision.
pub(crate) fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
