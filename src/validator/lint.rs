use super::find_entry;
use crate::graph::GraphIndex;
use crate::model::NodeType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintKind {
    /// The entry node is not a `trigger`.
    EntryNotTrigger,
    /// A `trigger` node sits somewhere other than the entry.
    MisplacedTrigger,
    /// An `end` node has outgoing connections, which are never followed.
    EndHasOutgoing,
}

/// A modeling smell that does not make the graph invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lint {
    pub kind: LintKind,
    pub node_id: String,
    pub message: String,
}

pub(super) fn collect(graph: &GraphIndex) -> Vec<Lint> {
    let mut lints = Vec::new();
    let entry = find_entry(graph).ok();

    if let Some(entry) = entry {
        let node = graph.node(entry);
        if node.node_type != NodeType::Trigger {
            lints.push(Lint {
                kind: LintKind::EntryNotTrigger,
                node_id: node.id.clone(),
                message: format!(
                    "entry node '{}' is a {} node, not a trigger",
                    node.id, node.node_type
                ),
            });
        }
    }

    for idx in 0..graph.len() {
        let node = graph.node(idx);
        match node.node_type {
            NodeType::Trigger if Some(idx) != entry => lints.push(Lint {
                kind: LintKind::MisplacedTrigger,
                node_id: node.id.clone(),
                message: format!("trigger '{}' is not the entry of the process", node.id),
            }),
            NodeType::End if !graph.outgoing(idx).is_empty() => lints.push(Lint {
                kind: LintKind::EndHasOutgoing,
                node_id: node.id.clone(),
                message: format!(
                    "end node '{}' has {} outgoing connection(s) that are never followed",
                    node.id,
                    graph.outgoing(idx).len()
                ),
            }),
            _ => {}
        }
    }

    lints
}
