//! # procflow - Business Process Model Engine
//!
//! **procflow** stores, validates and previews node-based business process
//! models: small workflow diagrams made of typed nodes (triggers, forms,
//! webhooks, conditions, ...) joined by connections, where condition nodes
//! fan out into labeled branches.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Data**: Read a model collection from JSON ([`store::JsonFilePersistence`]) or
//!     build models in code with [`ProcessModel::builder`](model::ProcessModel::builder). Custom
//!     formats implement [`IntoProcessModel`](model::IntoProcessModel).
//! 2.  **Validate**: [`Validator::validate`](validator::Validator::validate) checks the graph
//!     structure: unique ids, resolvable connections, a single entry, unambiguous
//!     branches, full reachability and termination in an `end` node.
//! 3.  **Store**: [`ProcessModelStore`](store::ProcessModelStore) only accepts models that pass
//!     validation and writes the whole collection atomically on every change.
//! 4.  **Preview**: [`Resolver::resolve`](resolver::Resolver::resolve) yields the steps a process
//!     goes through, walking every branch of every condition.
//!
//! ## Quick Start
//!
//! ```rust
//! use procflow::prelude::*;
//!
//! let model = ProcessModel::builder("signup", "Newsletter Signup")
//!     .process_type("lead_generation")
//!     .node(Node::new("start", NodeType::Trigger, "Visitor arrives"))
//!     .node(Node::new("form", NodeType::Form, "Signup form"))
//!     .node(Node::new("check", NodeType::Condition, "Double opt-in?"))
//!     .node(Node::new("welcome", NodeType::Notification, "Welcome mail"))
//!     .node(Node::new("end", NodeType::End, "Done"))
//!     .connect("start", "form")
//!     .connect("form", "check")
//!     .branch("check", "welcome", "confirmed")
//!     .branch("check", "end", "ignored")
//!     .connect("welcome", "end")
//!     .build();
//!
//! let store = ProcessModelStore::open(MemoryPersistence::new())?;
//! store.create(model)?;
//!
//! let model = store.get("signup")?;
//! let preview = PreviewFormatter::format(Resolver::resolve(&model)?);
//! assert!(preview.contains("[confirmed] welcome"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analytics;
pub mod error;
mod graph;
pub mod model;
pub mod prelude;
pub mod preview;
pub mod resolver;
pub mod store;
pub mod validator;
