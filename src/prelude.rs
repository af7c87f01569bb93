//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the procflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use procflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let store = ProcessModelStore::open(JsonFilePersistence::new("data/business_models.json"))?;
//! for model in store.list() {
//!     println!("{}: {}", model.id, PreviewFormatter::format(Resolver::resolve(&model)?));
//! }
//! # Ok(())
//! # }
//! ```

// Model definitions
pub use crate::model::{
    Connection, IntoProcessModel, ModelCollection, ModelDocument, ModelId, Node, NodeType,
    ProcessModel, ProcessModelBuilder,
};

// Validation and traversal
pub use crate::resolver::{BranchTaken, ExecutionOrder, ExecutionStep, Resolver};
pub use crate::validator::{Lint, LintKind, Validator};

// Storage
pub use crate::store::{JsonFilePersistence, MemoryPersistence, Persistence, ProcessModelStore};

// Reporting
pub use crate::analytics::ModelStatistics;
pub use crate::preview::PreviewFormatter;

// Error types
pub use crate::error::{
    PersistenceError, ResolveError, StoreError, StructuralError, StructuralErrorKind,
    TemplateError, ValidationError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
