use crate::model::{Connection, Node, ProcessModel};
use ahash::AHashMap;

/// Adjacency view over a [`ProcessModel`], addressing nodes by their position
/// in `model.nodes`.
///
/// Built once per validation or traversal. Connections whose endpoints do not
/// resolve are left out of the adjacency lists and recorded in `dangling`.
pub(crate) struct GraphIndex<'a> {
    pub model: &'a ProcessModel,
    positions: AHashMap<&'a str, usize>,
    /// Outgoing connection indices per node, in declaration order.
    outgoing: Vec<Vec<usize>>,
    incoming_count: Vec<usize>,
    /// `(connection index, unresolved node id)` for every broken endpoint.
    pub dangling: Vec<(usize, &'a str)>,
}

impl<'a> GraphIndex<'a> {
    pub fn new(model: &'a ProcessModel) -> Self {
        let mut positions = AHashMap::with_capacity(model.nodes.len());
        for (idx, node) in model.nodes.iter().enumerate() {
            // First declaration wins; duplicates are the validator's concern.
            positions.entry(node.id.as_str()).or_insert(idx);
        }

        let mut outgoing = vec![Vec::new(); model.nodes.len()];
        let mut incoming_count = vec![0; model.nodes.len()];
        let mut dangling = Vec::new();

        for (conn_idx, conn) in model.connections.iter().enumerate() {
            let from = positions.get(conn.from.as_str()).copied();
            let to = positions.get(conn.to.as_str()).copied();
            match (from, to) {
                (Some(from), Some(to)) => {
                    outgoing[from].push(conn_idx);
                    incoming_count[to] += 1;
                }
                (None, _) => dangling.push((conn_idx, conn.from.as_str())),
                (_, None) => dangling.push((conn_idx, conn.to.as_str())),
            }
        }

        Self {
            model,
            positions,
            outgoing,
            incoming_count,
            dangling,
        }
    }

    pub fn len(&self) -> usize {
        self.model.nodes.len()
    }

    pub fn node(&self, idx: usize) -> &'a Node {
        &self.model.nodes[idx]
    }

    pub fn connection(&self, conn_idx: usize) -> &'a Connection {
        &self.model.connections[conn_idx]
    }

    pub fn outgoing(&self, idx: usize) -> &[usize] {
        &self.outgoing[idx]
    }

    /// Position of the target node of a resolved connection.
    pub fn target(&self, conn_idx: usize) -> usize {
        self.positions[self.connection(conn_idx).to.as_str()]
    }

    /// Nodes with no incoming connection, in declaration order.
    pub fn sources(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|&idx| self.incoming_count[idx] == 0)
    }
}
