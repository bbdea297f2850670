use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute key carrying a node's cluster id in attribute-bag graphs.
pub const CLUSTER_ATTR: &str = "_ngraph_cluster";

/// Companion flag set alongside [`CLUSTER_ATTR`] by the clustering stage.
pub const MARKED_FOR_CLUSTERING_ATTR: &str = "_ngraph_marked_for_clustering";

/// Operation kinds that never count towards a cluster's worth.
pub const TRIVIAL_OP_KINDS: [&str; 2] = [OpKind::CONST, OpKind::IDENTITY];

/// Position of a node inside its graph's node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(pub usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Operation-kind tag of a node, e.g. `MatMul`, `Const`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpKind(String);

impl OpKind {
    pub const CONST: &'static str = "Const";
    pub const IDENTITY: &'static str = "Identity";

    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for kinds listed in [`TRIVIAL_OP_KINDS`]. Matching is exact and
    /// case-sensitive.
    pub fn is_trivial(&self) -> bool {
        TRIVIAL_OP_KINDS.contains(&self.0.as_str())
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OpKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for OpKind {
    fn from(kind: String) -> Self {
        Self(kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub i32);

impl ClusterId {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ClusterId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// Cluster membership of a single node.
///
/// The id and the marked-for-clustering flag travel together: a node either
/// carries both (`Some(assignment)`) or neither (`None`). `marked` is always
/// `true` for a well-formed assignment coming out of the clustering stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub id: ClusterId,
    #[serde(default = "default_marked")]
    pub marked: bool,
}

fn default_marked() -> bool {
    true
}

impl ClusterAssignment {
    pub fn new(id: impl Into<ClusterId>) -> Self {
        Self {
            id: id.into(),
            marked: true,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.marked
    }
}
