pub mod genotype;
pub mod islands;
pub(crate) mod operators;
pub mod population;

pub use genotype::{CgpContext, FunctionGene, Genotype, NodeOp, OutputGene};
pub use islands::{Island, IslandsSelection};
pub use population::Population;
