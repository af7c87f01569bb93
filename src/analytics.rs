use crate::model::{NodeType, ProcessModel, process_type_label};
use itertools::Itertools;
use std::collections::BTreeMap;

/// Size figures of a single model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub id: String,
    pub name: String,
    pub nodes: usize,
    pub connections: usize,
    pub webhooks: usize,
}

/// Aggregate figures over a collection of models.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelStatistics {
    pub total_models: usize,
    pub total_nodes: usize,
    pub total_connections: usize,
    /// Model count per process type display label. Unknown types are listed
    /// under their raw key.
    pub by_process_type: BTreeMap<String, usize>,
    pub node_type_usage: BTreeMap<NodeType, usize>,
    pub models: Vec<ModelSummary>,
}

impl ModelStatistics {
    pub fn collect<'a>(models: impl IntoIterator<Item = &'a ProcessModel>) -> Self {
        let models: Vec<&ProcessModel> = models.into_iter().collect();

        let by_process_type = models
            .iter()
            .map(|m| {
                process_type_label(&m.process_type)
                    .map(str::to_string)
                    .unwrap_or_else(|| m.process_type.clone())
            })
            .counts()
            .into_iter()
            .collect();

        let node_type_usage = models
            .iter()
            .flat_map(|m| m.nodes.iter().map(|n| n.node_type))
            .counts()
            .into_iter()
            .collect();

        Self {
            total_models: models.len(),
            total_nodes: models.iter().map(|m| m.nodes.len()).sum(),
            total_connections: models.iter().map(|m| m.connections.len()).sum(),
            by_process_type,
            node_type_usage,
            models: models
                .iter()
                .map(|m| ModelSummary {
                    id: m.id.clone(),
                    name: m.name.clone(),
                    nodes: m.nodes.len(),
                    connections: m.connections.len(),
                    webhooks: m.webhooks.len(),
                })
                .collect(),
        }
    }

    /// Average number of nodes per model, `0.0` for an empty collection.
    pub fn average_complexity(&self) -> f64 {
        if self.total_models == 0 {
            0.0
        } else {
            self.total_nodes as f64 / self.total_models as f64
        }
    }
}
