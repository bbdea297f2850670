use crate::{ClusterAssignment, ClusterId, OpKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub type Attributes = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    pub op: OpKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterAssignment>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
}

impl GraphNode {
    pub fn new(name: impl Into<String>, op: impl Into<OpKind>) -> Self {
        Self {
            name: name.into(),
            op: op.into(),
            cluster: None,
            attributes: Attributes::new(),
        }
    }

    pub fn with_cluster(mut self, id: impl Into<ClusterId>) -> Self {
        self.cluster = Some(ClusterAssignment::new(id));
        self
    }

    pub fn with_assignment(mut self, assignment: ClusterAssignment) -> Self {
        self.cluster = Some(assignment);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn cluster_id(&self) -> Option<ClusterId> {
        self.cluster.map(|c| c.id)
    }

    pub fn is_clustered(&self) -> bool {
        self.cluster.is_some()
    }

    /// Drops both the cluster id and the marked-for-clustering flag.
    pub fn clear_cluster(&mut self) -> Option<ClusterAssignment> {
        self.cluster.take()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

impl GraphEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}
