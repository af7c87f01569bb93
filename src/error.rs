use std::fmt;
use thiserror::Error;

/// The structural rule a process model violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuralErrorKind {
    DuplicateId,
    MissingEndpoint,
    NoEntryPoint,
    MultipleEntryPoints,
    AmbiguousBranch,
    UnexpectedBranchLabel,
    UnreachableNode,
    CyclicGraph,
    DeadEnd,
}

impl fmt::Display for StructuralErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructuralErrorKind::DuplicateId => "DuplicateId",
            StructuralErrorKind::MissingEndpoint => "MissingEndpoint",
            StructuralErrorKind::NoEntryPoint => "NoEntryPoint",
            StructuralErrorKind::MultipleEntryPoints => "MultipleEntryPoints",
            StructuralErrorKind::AmbiguousBranch => "AmbiguousBranch",
            StructuralErrorKind::UnexpectedBranchLabel => "UnexpectedBranchLabel",
            StructuralErrorKind::UnreachableNode => "UnreachableNode",
            StructuralErrorKind::CyclicGraph => "CyclicGraph",
            StructuralErrorKind::DeadEnd => "DeadEnd",
        };
        f.write_str(name)
    }
}

/// A graph-level failure reported by the validator.
///
/// `node_id` and `connection_index` point at the offending element when the
/// rule concerns a single node or connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {reason}")]
pub struct StructuralError {
    pub kind: StructuralErrorKind,
    pub reason: String,
    pub node_id: Option<String>,
    pub connection_index: Option<usize>,
}

impl StructuralError {
    pub(crate) fn new(kind: StructuralErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
            node_id: None,
            connection_index: None,
        }
    }

    pub(crate) fn at_node(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    pub(crate) fn at_connection(mut self, index: usize) -> Self {
        self.connection_index = Some(index);
        self
    }
}

/// Errors that reject a process model before it can be stored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Node '{node_id}' has an unknown node type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Invalid process graph: {0}")]
    Structural(#[from] StructuralError),
}

impl ValidationError {
    /// The structural rule that failed, if this is a graph-level error.
    pub fn kind(&self) -> Option<StructuralErrorKind> {
        match self {
            ValidationError::Structural(err) => Some(err.kind),
            ValidationError::UnknownNodeType { .. } => None,
        }
    }

    /// The node the failure points at, if any.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            ValidationError::Structural(err) => err.node_id.as_deref(),
            ValidationError::UnknownNodeType { node_id, .. } => Some(node_id),
        }
    }
}

/// Errors raised by the execution-order resolver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Cannot resolve execution order of an invalid graph: {0}")]
    InvalidGraph(#[source] ValidationError),
}

/// Errors raised by a persistence collaborator.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed model collection: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by the process model store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("A process model with id '{0}' already exists")]
    DuplicateId(String),

    #[error("Process model '{0}' not found")]
    NotFound(String),

    #[error("Process model '{id}' was rejected: {source}")]
    Validation {
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error("Stored process model '{id}' is invalid: {source}")]
    CorruptModel {
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Errors that can occur when instantiating a built-in template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("Template '{0}' has no graph blueprint to instantiate")]
    NoBlueprint(String),
}
