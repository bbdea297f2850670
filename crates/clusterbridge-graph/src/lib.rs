pub mod graph;
pub mod legacy;
pub mod passes;
pub mod pipeline;

pub use graph::*;
pub use passes::*;
pub use pipeline::*;
