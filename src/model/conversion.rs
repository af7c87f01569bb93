use super::definition::{Connection, Node, ProcessModel};
use super::document::{ConnectionDocument, ModelDocument, NodeDocument};
use crate::error::ValidationError;

/// A trait for document formats that can be turned into a typed [`ProcessModel`].
///
/// The JSON [`ModelDocument`] implements it; other front ends (a form-based
/// editor, an import from another tool) can implement it for their own
/// structs and feed the result to the validator or the store.
///
/// # Example
///
/// ```rust
/// use procflow::prelude::*;
///
/// struct Step { id: &'static str, kind: &'static str }
/// struct Pipeline { steps: Vec<Step> }
///
/// impl IntoProcessModel for Pipeline {
///     fn into_process_model(
///         self,
///         id: &str,
///     ) -> std::result::Result<ProcessModel, ValidationError> {
///         let mut builder = ProcessModel::builder(id, id);
///         let mut previous: Option<&str> = None;
///         for step in &self.steps {
///             let node = Node::parse(step.id.into(), step.kind, step.id.into(), 0, 0)?;
///             builder = builder.node(node);
///             if let Some(prev) = previous {
///                 builder = builder.connect(prev, step.id);
///             }
///             previous = Some(step.id);
///         }
///         Ok(builder.build())
///     }
/// }
///
/// let pipeline = Pipeline { steps: vec![
///     Step { id: "start", kind: "trigger" },
///     Step { id: "done", kind: "end" },
/// ]};
/// let model = pipeline.into_process_model("tiny").unwrap();
/// assert!(Validator::validate(&model).is_ok());
/// ```
pub trait IntoProcessModel {
    /// Consumes the document and produces a model carrying the given id.
    fn into_process_model(self, id: &str) -> Result<ProcessModel, ValidationError>;
}

impl IntoProcessModel for ModelDocument {
    fn into_process_model(self, id: &str) -> Result<ProcessModel, ValidationError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|n| Node::parse(n.id, &n.node_type, n.label, n.x, n.y))
            .collect::<Result<Vec<_>, _>>()?;

        let connections = self
            .connections
            .into_iter()
            .map(|c| Connection {
                from: c.from,
                to: c.to,
                condition: c.condition,
            })
            .collect();

        Ok(ProcessModel {
            id: id.to_string(),
            name: self.name,
            description: self.description,
            process_type: self.process_type,
            nodes,
            connections,
            webhooks: self.webhooks,
            forms: self.forms,
            created_at: self.created_at,
            template: self.template,
        })
    }
}

impl From<&ProcessModel> for ModelDocument {
    fn from(model: &ProcessModel) -> Self {
        ModelDocument {
            name: model.name.clone(),
            description: model.description.clone(),
            process_type: model.process_type.clone(),
            nodes: model
                .nodes
                .iter()
                .map(|n| NodeDocument {
                    id: n.id.clone(),
                    node_type: n.node_type.as_str().to_string(),
                    label: n.label.clone(),
                    x: n.x,
                    y: n.y,
                })
                .collect(),
            connections: model
                .connections
                .iter()
                .map(|c| ConnectionDocument {
                    from: c.from.clone(),
                    to: c.to.clone(),
                    condition: c.condition.clone(),
                })
                .collect(),
            webhooks: model.webhooks.clone(),
            forms: model.forms.clone(),
            created_at: model.created_at.clone(),
            template: model.template.clone(),
        }
    }
}
