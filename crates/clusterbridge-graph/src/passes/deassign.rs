//! Removes trivial clusters produced by the clustering stage.
//!
//! Clustering sometimes yields many small clusters that are not worth
//! executing as a unit. A cluster is trivial when it has fewer than
//! [`MIN_NONTRIVIAL_NODES`] members whose op kind is outside
//! [`TRIVIAL_OP_KINDS`]. Every member of a trivial cluster loses its
//! assignment; members of surviving clusters are left alone, Const and
//! Identity nodes included. Triviality is a whole-cluster judgment.

use crate::{ClusterGraph, GraphPass};
use clusterbridge_core::{ClusterBridgeError, ClusterId, DeassignConfig, NodeIndex, Result};
use serde::Serialize;
use tracing::{debug, info};

pub use clusterbridge_core::TRIVIAL_OP_KINDS;

/// A cluster survives only with at least this many non-trivial members.
pub const MIN_NONTRIVIAL_NODES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BustedCluster {
    pub id: ClusterId,
    pub non_trivial_count: usize,
    pub nodes: Vec<String>,
}

/// What a deassignment run did to the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeassignReport {
    pub bypassed: bool,
    pub busted: Vec<BustedCluster>,
    pub surviving: Vec<ClusterId>,
}

impl DeassignReport {
    pub fn bypassed() -> Self {
        Self {
            bypassed: true,
            ..Self::default()
        }
    }

    pub fn busted_ids(&self) -> Vec<ClusterId> {
        self.busted.iter().map(|c| c.id).collect()
    }

    pub fn busted_node_count(&self) -> usize {
        self.busted.iter().map(|c| c.nodes.len()).sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeassignClusters {
    config: DeassignConfig,
}

impl DeassignClusters {
    pub fn new(config: DeassignConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeassignConfig {
        &self.config
    }

    pub fn deassign(&self, graph: &mut ClusterGraph) -> Result<DeassignReport> {
        if self.config.disabled {
            debug!("cluster deassignment disabled, leaving graph untouched");
            return Ok(DeassignReport::bypassed());
        }

        check_pairing(graph)?;

        let mut report = DeassignReport::default();
        for (id, members) in graph.clusters() {
            let non_trivial_count = members
                .iter()
                .filter_map(|idx| graph.node(*idx))
                .filter(|node| !node.op.is_trivial())
                .count();

            if non_trivial_count < MIN_NONTRIVIAL_NODES {
                report.busted.push(bust_cluster(graph, id, non_trivial_count, &members));
            } else {
                report.surviving.push(id);
            }
        }

        info!(
            busted = report.busted.len(),
            surviving = report.surviving.len(),
            nodes_released = report.busted_node_count(),
            "cluster deassignment complete"
        );
        Ok(report)
    }
}

/// Every assignment must carry the marked-for-clustering flag. Checked for
/// the whole graph before anything is cleared.
fn check_pairing(graph: &ClusterGraph) -> Result<()> {
    for node in graph.nodes() {
        if let Some(assignment) = node.cluster {
            if !assignment.is_well_formed() {
                return Err(ClusterBridgeError::malformed(
                    &node.name,
                    format!(
                        "cluster {} assigned without marked-for-clustering flag",
                        assignment.id
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn bust_cluster(
    graph: &mut ClusterGraph,
    id: ClusterId,
    non_trivial_count: usize,
    members: &[NodeIndex],
) -> BustedCluster {
    debug!("busting cluster {}", id);

    let mut nodes = Vec::with_capacity(members.len());
    for idx in members {
        if let Some(node) = graph.node_mut(*idx) {
            debug!("busting node: {} [{}]", node.name, node.op);
            node.clear_cluster();
            nodes.push(node.name.clone());
        }
    }

    BustedCluster {
        id,
        non_trivial_count,
        nodes,
    }
}

impl GraphPass for DeassignClusters {
    fn name(&self) -> &'static str {
        "DeassignClusters"
    }

    fn run(&self, graph: &mut ClusterGraph) -> Result<()> {
        self.deassign(graph).map(|_| ())
    }
}

/// Runs the deassignment pass once with the given configuration.
pub fn deassign_clusters(graph: &mut ClusterGraph, config: &DeassignConfig) -> Result<DeassignReport> {
    DeassignClusters::new(config.clone()).deassign(graph)
}
