use clusterbridge_core::{
    ClusterBridgeError, ClusterId, GraphEdge, GraphNode, NodeIndex, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;

/// A computation graph whose nodes may carry cluster assignments.
///
/// Node names are unique. Nodes are never removed, so a [`NodeIndex`] stays
/// valid for the lifetime of the graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawGraph")]
pub struct ClusterGraph {
    nodes: Vec<GraphNode>,
    #[serde(default)]
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    by_name: HashMap<String, NodeIndex>,
}

#[derive(Deserialize)]
struct RawGraph {
    nodes: Vec<GraphNode>,
    #[serde(default)]
    edges: Vec<GraphEdge>,
}

impl TryFrom<RawGraph> for ClusterGraph {
    type Error = ClusterBridgeError;

    fn try_from(raw: RawGraph) -> Result<Self> {
        let mut graph = ClusterGraph::new();
        for node in raw.nodes {
            graph.add_node(node)?;
        }
        for edge in raw.edges {
            graph.add_edge(edge.from, edge.to)?;
        }
        Ok(graph)
    }
}

impl ClusterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: GraphNode) -> Result<NodeIndex> {
        if self.by_name.contains_key(&node.name) {
            return Err(ClusterBridgeError::DuplicateNode(node.name));
        }
        let idx = NodeIndex(self.nodes.len());
        self.by_name.insert(node.name.clone(), idx);
        self.nodes.push(node);
        Ok(idx)
    }

    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> Result<()> {
        let (from, to) = (from.into(), to.into());
        for endpoint in [&from, &to] {
            if !self.by_name.contains_key(endpoint) {
                return Err(ClusterBridgeError::NodeNotFound(endpoint.clone()));
            }
        }
        self.edges.push(GraphEdge { from, to });
        Ok(())
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.nodes.get(idx.index())
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> Option<&mut GraphNode> {
        self.nodes.get_mut(idx.index())
    }

    pub fn node_by_name(&self, name: &str) -> Option<&GraphNode> {
        self.by_name.get(name).and_then(|idx| self.node(*idx))
    }

    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.by_name.get(name).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut GraphNode> {
        self.nodes.iter_mut()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Groups clustered nodes by cluster id, in ascending id order.
    /// Unclustered nodes do not appear.
    pub fn clusters(&self) -> BTreeMap<ClusterId, Vec<NodeIndex>> {
        let mut clusters: BTreeMap<ClusterId, Vec<NodeIndex>> = BTreeMap::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if let Some(id) = node.cluster_id() {
                clusters.entry(id).or_default().push(NodeIndex(idx));
            }
        }
        clusters
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
