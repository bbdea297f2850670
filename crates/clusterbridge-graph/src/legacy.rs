//! Conversion between typed cluster assignments and the attribute-bag
//! encoding (`_ngraph_cluster` / `_ngraph_marked_for_clustering`) used by
//! graphs exported from attribute-based pipelines.

use crate::ClusterGraph;
use clusterbridge_core::{
    Attributes, ClusterAssignment, ClusterBridgeError, ClusterId, GraphNode, Result,
    CLUSTER_ATTR, MARKED_FOR_CLUSTERING_ATTR,
};
use serde_json::Value;
use tracing::debug;

fn read_legacy_assignment(node: &GraphNode) -> Result<Option<ClusterAssignment>> {
    let id = node.attributes.get(CLUSTER_ATTR);
    let marked = node.attributes.get(MARKED_FOR_CLUSTERING_ATTR);

    let (id, marked) = match (id, marked) {
        (None, None) => return Ok(None),
        (Some(id), Some(marked)) => (id, marked),
        (Some(_), None) => {
            return Err(ClusterBridgeError::malformed(
                &node.name,
                format!("{CLUSTER_ATTR} without {MARKED_FOR_CLUSTERING_ATTR}"),
            ))
        }
        (None, Some(_)) => {
            return Err(ClusterBridgeError::malformed(
                &node.name,
                format!("{MARKED_FOR_CLUSTERING_ATTR} without {CLUSTER_ATTR}"),
            ))
        }
    };

    if node.cluster.is_some() {
        return Err(ClusterBridgeError::malformed(
            &node.name,
            "typed assignment and attribute annotations both present",
        ));
    }

    let id = id
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| {
            ClusterBridgeError::malformed(&node.name, format!("{CLUSTER_ATTR} is not an i32: {id}"))
        })?;
    let marked = marked.as_bool().ok_or_else(|| {
        ClusterBridgeError::malformed(
            &node.name,
            format!("{MARKED_FOR_CLUSTERING_ATTR} is not a bool: {marked}"),
        )
    })?;

    Ok(Some(ClusterAssignment {
        id: ClusterId(id),
        marked,
    }))
}

fn strip_legacy_keys(attributes: &mut Attributes) {
    attributes.remove(CLUSTER_ATTR);
    attributes.remove(MARKED_FOR_CLUSTERING_ATTR);
}

impl ClusterGraph {
    /// Moves attribute-encoded cluster annotations into the typed
    /// `cluster` field. Every node is validated before any is rewritten, so
    /// on error the graph is unchanged. Returns the number of nodes lifted.
    pub fn lift_legacy_annotations(&mut self) -> Result<usize> {
        let lifted = self
            .nodes()
            .map(read_legacy_assignment)
            .collect::<Result<Vec<_>>>()?;

        let mut count = 0;
        for (node, assignment) in self.nodes_mut().zip(lifted) {
            if let Some(assignment) = assignment {
                strip_legacy_keys(&mut node.attributes);
                node.cluster = Some(assignment);
                count += 1;
            }
        }
        debug!("lifted {} legacy cluster annotations", count);
        Ok(count)
    }

    /// Writes typed cluster assignments back out as attributes, clearing
    /// the typed field. Returns the number of nodes lowered.
    pub fn lower_to_legacy_annotations(&mut self) -> usize {
        let mut count = 0;
        for node in self.nodes_mut() {
            if let Some(assignment) = node.clear_cluster() {
                node.attributes
                    .insert(CLUSTER_ATTR.to_string(), Value::from(assignment.id.get()));
                node.attributes.insert(
                    MARKED_FOR_CLUSTERING_ATTR.to_string(),
                    Value::Bool(assignment.marked),
                );
                count += 1;
            }
        }
        count
    }
}
