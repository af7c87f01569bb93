//! Structural validation of process graphs.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. node ids are unique
//! 2. every connection endpoint names an existing node
//! 3. exactly one entry node exists
//! 4. condition nodes declare distinct, non-empty branch labels (and no other
//!    node labels its outgoing connections)
//! 5. every node is reachable from the entry without passing through an `end`
//! 6. every path from the entry reaches an `end` node without revisiting a node
use crate::error::{StructuralError, StructuralErrorKind, ValidationError};
use crate::graph::GraphIndex;
use crate::model::{NodeType, ProcessModel};
use ahash::AHashSet;
use itertools::Itertools;
use std::collections::VecDeque;
use tracing::{debug, warn};

mod lint;

pub use lint::{Lint, LintKind};

/// Validates process models before they are stored or traversed.
pub struct Validator;

impl Validator {
    /// Runs all structural checks against `model`.
    pub fn validate(model: &ProcessModel) -> Result<(), ValidationError> {
        let result = Self::check(model);
        match &result {
            Ok(()) => debug!(model = %model.id, "process model passed validation"),
            Err(err) => debug!(model = %model.id, error = %err, "process model rejected"),
        }
        result.map_err(ValidationError::from)
    }

    /// Reports non-fatal modeling issues. Never rejects a model.
    pub fn lint(model: &ProcessModel) -> Vec<Lint> {
        let graph = GraphIndex::new(model);
        let lints = lint::collect(&graph);
        for l in &lints {
            warn!(model = %model.id, node = %l.node_id, "{}", l.message);
        }
        lints
    }

    fn check(model: &ProcessModel) -> Result<(), StructuralError> {
        check_unique_ids(model)?;
        let graph = GraphIndex::new(model);
        check_endpoints(&graph)?;
        let entry = find_entry(&graph)?;
        check_branches(&graph)?;
        check_reachable(&graph, entry)?;
        check_terminates(&graph, entry)
    }
}

fn check_unique_ids(model: &ProcessModel) -> Result<(), StructuralError> {
    match model.nodes.iter().map(|n| n.id.as_str()).duplicates().next() {
        Some(dup) => Err(StructuralError::new(
            StructuralErrorKind::DuplicateId,
            format!("node id '{}' is declared more than once", dup),
        )
        .at_node(dup)),
        None => Ok(()),
    }
}

fn check_endpoints(graph: &GraphIndex) -> Result<(), StructuralError> {
    match graph.dangling.first() {
        Some(&(conn_idx, missing)) => Err(StructuralError::new(
            StructuralErrorKind::MissingEndpoint,
            format!(
                "connection #{} references node '{}', which does not exist",
                conn_idx, missing
            ),
        )
        .at_node(missing)
        .at_connection(conn_idx)),
        None => Ok(()),
    }
}

/// The entry is the only node without incoming connections that starts at
/// least one connection. Nodes with no connections at all are not entry
/// candidates; they surface later as unreachable. A single-node model is its
/// own entry.
pub(crate) fn find_entry(graph: &GraphIndex) -> Result<usize, StructuralError> {
    if graph.len() == 1 {
        return Ok(0);
    }

    let candidates: Vec<usize> = graph
        .sources()
        .filter(|&idx| !graph.outgoing(idx).is_empty())
        .collect();

    match candidates.as_slice() {
        [entry] => Ok(*entry),
        [] => Err(StructuralError::new(
            StructuralErrorKind::NoEntryPoint,
            "no node is free of incoming connections",
        )),
        [_, second, ..] => Err(StructuralError::new(
            StructuralErrorKind::MultipleEntryPoints,
            format!(
                "{} nodes have no incoming connections: {}",
                candidates.len(),
                candidates.iter().map(|&idx| &graph.node(idx).id).join(", ")
            ),
        )
        .at_node(&graph.node(*second).id)),
    }
}

fn check_branches(graph: &GraphIndex) -> Result<(), StructuralError> {
    for idx in 0..graph.len() {
        let node = graph.node(idx);
        let outgoing = graph.outgoing(idx);

        // Sibling connections sharing a label are ambiguous whatever the node type.
        if let Some((conn_idx, label)) = duplicate_label(graph, outgoing) {
            return Err(StructuralError::new(
                StructuralErrorKind::AmbiguousBranch,
                format!("'{}' declares branch '{}' more than once", node.id, label),
            )
            .at_node(&node.id)
            .at_connection(conn_idx));
        }

        if node.node_type != NodeType::Condition {
            if let Some(&conn_idx) = outgoing
                .iter()
                .find(|&&c| graph.connection(c).condition.is_some())
            {
                return Err(StructuralError::new(
                    StructuralErrorKind::UnexpectedBranchLabel,
                    format!(
                        "'{}' is a {} node but labels an outgoing connection",
                        node.id, node.node_type
                    ),
                )
                .at_node(&node.id)
                .at_connection(conn_idx));
            }
            continue;
        }

        if outgoing.len() < 2 {
            return Err(StructuralError::new(
                StructuralErrorKind::AmbiguousBranch,
                format!(
                    "condition node '{}' has {} outgoing connection(s), at least 2 are required",
                    node.id,
                    outgoing.len()
                ),
            )
            .at_node(&node.id));
        }

        if let Some(&conn_idx) = outgoing
            .iter()
            .find(|&&c| branch_label(graph, c).is_empty())
        {
            return Err(StructuralError::new(
                StructuralErrorKind::AmbiguousBranch,
                format!("condition node '{}' has an unlabeled branch", node.id),
            )
            .at_node(&node.id)
            .at_connection(conn_idx));
        }
    }
    Ok(())
}

/// Trimmed label of a connection, empty when it has none.
fn branch_label<'a>(graph: &GraphIndex<'a>, conn_idx: usize) -> &'a str {
    graph
        .connection(conn_idx)
        .condition
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
}

/// First connection whose non-empty label repeats an earlier sibling's.
fn duplicate_label<'a>(graph: &GraphIndex<'a>, outgoing: &[usize]) -> Option<(usize, &'a str)> {
    let mut seen = AHashSet::with_capacity(outgoing.len());
    outgoing
        .iter()
        .map(|&conn_idx| (conn_idx, branch_label(graph, conn_idx)))
        .filter(|(_, label)| !label.is_empty())
        .find(|&(_, label)| !seen.insert(label))
}

fn check_reachable(graph: &GraphIndex, entry: usize) -> Result<(), StructuralError> {
    let mut visited = vec![false; graph.len()];
    let mut queue = VecDeque::from([entry]);
    visited[entry] = true;

    while let Some(idx) = queue.pop_front() {
        // Connections leaving an end node are never followed.
        if graph.node(idx).node_type == NodeType::End {
            continue;
        }
        for &conn_idx in graph.outgoing(idx) {
            let next = graph.target(conn_idx);
            if !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }

    match visited.iter().position(|v| !v) {
        Some(idx) => {
            let node = graph.node(idx);
            Err(StructuralError::new(
                StructuralErrorKind::UnreachableNode,
                format!(
                    "node '{}' cannot be reached from entry '{}'",
                    node.id,
                    graph.node(entry).id
                ),
            )
            .at_node(&node.id))
        }
        None => Ok(()),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Depth-first walk from the entry. `end` nodes stop the walk; a node seen
/// again while still on the current path closes a cycle. The path never holds
/// more nodes than the graph has.
fn check_terminates(graph: &GraphIndex, entry: usize) -> Result<(), StructuralError> {
    let mut marks = vec![Mark::Unvisited; graph.len()];
    // (node, next outgoing position to explore)
    let mut stack: Vec<(usize, usize)> = vec![(entry, 0)];
    marks[entry] = Mark::OnPath;

    while let Some(top) = stack.last_mut() {
        let idx = top.0;
        let node = graph.node(idx);
        let outgoing = graph.outgoing(idx);

        if node.node_type == NodeType::End {
            marks[idx] = Mark::Done;
            stack.pop();
            continue;
        }
        if outgoing.is_empty() {
            return Err(StructuralError::new(
                StructuralErrorKind::DeadEnd,
                format!(
                    "path stops at '{}', a {} node, without reaching an end node",
                    node.id, node.node_type
                ),
            )
            .at_node(&node.id));
        }

        if top.1 == outgoing.len() {
            marks[idx] = Mark::Done;
            stack.pop();
            continue;
        }

        let conn_idx = outgoing[top.1];
        top.1 += 1;
        let next = graph.target(conn_idx);
        match marks[next] {
            Mark::Unvisited => {
                marks[next] = Mark::OnPath;
                stack.push((next, 0));
            }
            Mark::OnPath => {
                let target = graph.node(next);
                return Err(StructuralError::new(
                    StructuralErrorKind::CyclicGraph,
                    format!(
                        "connection #{} from '{}' returns to '{}' before an end node is reached",
                        conn_idx, node.id, target.id
                    ),
                )
                .at_node(&target.id)
                .at_connection(conn_idx));
            }
            Mark::Done => {}
        }
    }
    Ok(())
}
