//! Preview traversal of a validated process graph.
//!
//! The resolver walks the graph breadth-first from the entry node. It never
//! decides which branch of a condition is taken: after yielding a condition
//! node it walks every branch in declaration order, each to completion, and
//! tags the nodes it meets with the branch labels that led to them. Outside
//! of a branch every node is yielded once; inside different branches the same
//! node may appear once per branch path.
use crate::error::ResolveError;
use crate::graph::GraphIndex;
use crate::model::{Node, NodeType, ProcessModel};
use crate::validator::{self, Validator};
use ahash::AHashSet;
use std::collections::VecDeque;
use tracing::debug;

/// One branch decision on the way to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchTaken {
    /// Id of the condition node the branch leaves from.
    pub condition_node: String,
    /// Label of the connection that was followed.
    pub condition: String,
}

/// A single node visit produced by [`ExecutionOrder`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionStep<'a> {
    pub node: &'a Node,
    /// Branches taken from the entry to this visit, outermost first. Empty for
    /// nodes reached without passing through a condition.
    pub branch_path: Vec<BranchTaken>,
}

impl ExecutionStep<'_> {
    /// The condition value of the innermost branch this visit belongs to.
    pub fn incoming_condition(&self) -> Option<&str> {
        self.branch_path.last().map(|b| b.condition.as_str())
    }

    /// Number of nested branches this visit lies in.
    pub fn depth(&self) -> usize {
        self.branch_path.len()
    }
}

/// Produces execution orders for process models.
pub struct Resolver;

impl Resolver {
    /// Validates `model` and returns a lazy, restartable traversal over it.
    pub fn resolve(model: &ProcessModel) -> Result<ExecutionOrder<'_>, ResolveError> {
        Validator::validate(model).map_err(ResolveError::InvalidGraph)?;

        let graph = GraphIndex::new(model);
        // Validation guarantees a unique entry.
        let entry = validator::find_entry(&graph)
            .map_err(|e| ResolveError::InvalidGraph(e.into()))?;

        let successors: Vec<Vec<(usize, Option<&str>)>> = (0..graph.len())
            .map(|idx| {
                graph
                    .outgoing(idx)
                    .iter()
                    .map(|&conn_idx| {
                        let conn = graph.connection(conn_idx);
                        (graph.target(conn_idx), conn.condition.as_deref())
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        debug!(model = %model.id, entry = %model.nodes[entry].id, "resolving execution order");
        Ok(ExecutionOrder::new(model, entry, successors))
    }
}

/// A pending breadth-first walk under one branch path.
#[derive(Debug, Clone)]
struct Frame {
    path: Vec<BranchTaken>,
    queue: VecDeque<usize>,
    seen: AHashSet<usize>,
}

impl Frame {
    fn starting_at(idx: usize, path: Vec<BranchTaken>) -> Self {
        Self {
            path,
            queue: VecDeque::from([idx]),
            seen: AHashSet::from_iter([idx]),
        }
    }
}

/// Lazy traversal returned by [`Resolver::resolve`].
///
/// Branch walks are kept on a stack: a condition node pushes one frame per
/// branch and the top frame is drained before the one below it resumes.
#[derive(Debug, Clone)]
pub struct ExecutionOrder<'a> {
    model: &'a ProcessModel,
    entry: usize,
    /// `(target node, branch label)` per node, in declaration order.
    successors: Vec<Vec<(usize, Option<&'a str>)>>,
    frames: Vec<Frame>,
}

impl<'a> ExecutionOrder<'a> {
    fn new(
        model: &'a ProcessModel,
        entry: usize,
        successors: Vec<Vec<(usize, Option<&'a str>)>>,
    ) -> Self {
        Self {
            model,
            entry,
            successors,
            frames: vec![Frame::starting_at(entry, Vec::new())],
        }
    }

    /// Rewinds the traversal to the entry node.
    pub fn restart(&mut self) {
        self.frames = vec![Frame::starting_at(self.entry, Vec::new())];
    }

    pub fn model(&self) -> &'a ProcessModel {
        self.model
    }
}

impl<'a> Iterator for ExecutionOrder<'a> {
    type Item = ExecutionStep<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let model = self.model;
        loop {
            let frame = self.frames.last_mut()?;
            let Some(idx) = frame.queue.pop_front() else {
                self.frames.pop();
                continue;
            };

            let node = &model.nodes[idx];
            let path = frame.path.clone();

            match node.node_type {
                NodeType::End => {}
                NodeType::Condition => {
                    // Reverse so the first declared branch ends up on top.
                    let branches: Vec<Frame> = self.successors[idx]
                        .iter()
                        .rev()
                        .map(|&(target, label)| {
                            let mut branch_path = path.clone();
                            branch_path.push(BranchTaken {
                                condition_node: node.id.clone(),
                                condition: label.unwrap_or_default().to_string(),
                            });
                            Frame::starting_at(target, branch_path)
                        })
                        .collect();
                    self.frames.extend(branches);
                }
                _ => {
                    for &(target, _) in &self.successors[idx] {
                        if frame.seen.insert(target) {
                            frame.queue.push_back(target);
                        }
                    }
                }
            }

            return Some(ExecutionStep {
                node,
                branch_path: path,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;

    #[test]
    fn restart_rewinds_to_entry() {
        let model = ProcessModel::builder("m", "M")
            .nodes([
                Node::new("a", NodeType::Trigger, "A"),
                Node::new("b", NodeType::End, "B"),
            ])
            .connect("a", "b")
            .build();
        let mut order = Resolver::resolve(&model).unwrap();
        assert_eq!(order.next().map(|s| s.node.id.as_str()), Some("a"));
        order.restart();
        let ids: Vec<_> = order.map(|s| s.node.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn step_reports_innermost_condition() {
        let step = ExecutionStep {
            node: &Node::new("x", NodeType::Action, "X"),
            branch_path: vec![
                BranchTaken {
                    condition_node: "c1".into(),
                    condition: "yes".into(),
                },
                BranchTaken {
                    condition_node: "c2".into(),
                    condition: "late".into(),
                },
            ],
        };
        assert_eq!(step.incoming_condition(), Some("late"));
        assert_eq!(step.depth(), 2);
    }
}
