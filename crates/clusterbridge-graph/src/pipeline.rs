use crate::{ClusterGraph, DeassignClusters, GraphPass};
use clusterbridge_core::{BridgeConfig, Result};
use tracing::{error, info};

/// Runs a sequence of graph passes in registration order.
pub struct PassManager {
    passes: Vec<Box<dyn GraphPass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// The standard refinement pipeline for clustered graphs.
    pub fn from_config(config: &BridgeConfig) -> Self {
        let mut manager = Self::new();
        manager.add_pass(DeassignClusters::new(config.deassign.clone()));
        manager
    }

    pub fn add_pass<P: GraphPass + 'static>(&mut self, pass: P) {
        self.passes.push(Box::new(pass));
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Stops at the first failing pass and returns its error.
    pub fn run_all(&self, graph: &mut ClusterGraph) -> Result<()> {
        for pass in &self.passes {
            info!("Running pass: {}", pass.name());
            if let Err(e) = pass.run(graph) {
                error!("pass {} failed: {}", pass.name(), e);
                return Err(e);
            }
        }
        Ok(())
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}
