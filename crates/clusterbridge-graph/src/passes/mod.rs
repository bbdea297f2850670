pub mod deassign;

pub use deassign::*;

use crate::ClusterGraph;
use clusterbridge_core::Result;

/// A refinement pass over a cluster-annotated graph.
pub trait GraphPass {
    /// Name used for logging and identification.
    fn name(&self) -> &'static str;

    /// Runs the pass, mutating the graph in place.
    fn run(&self, graph: &mut ClusterGraph) -> Result<()>;
}
