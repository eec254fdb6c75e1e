//! Cartesian Genetic Programming engine.
//!
//! A genotype is a fixed grid of function nodes with index-based
//! connections, guaranteed acyclic by construction. [`Genotype::grow`]
//! compiles the subgraph reachable from the output genes into a
//! [`Brain`]: a minimal, topologically ordered instruction tape that a
//! domain drives with `set_input`/`think`/`output` over a simulated
//! episode. Populations of genotypes evolve generation over generation
//! through [`IslandsSelection`], an island-model algorithm with
//! elitism, age-protected extinction and reseeding.

pub mod config;
pub mod engines;
pub mod error;
pub mod functions;
pub mod types;

pub use config::{
    AppConfig, CgpConfig, ConfigManager, FixedCountMutation, IslandsConfig, MutationStrategy,
    ProbabilisticMutation,
};
pub use engines::generation::{
    CgpContext, FunctionGene, Genotype, Island, IslandsSelection, NodeOp, OutputGene, Population,
};
pub use engines::traits::{Domain, GenerationFactory, GenotypeFactory, SelectionAlgorithm};
pub use engines::Brain;
pub use error::{GridGpError, Result};
pub use functions::{FunctionCategory, FunctionId, FunctionRegistry};
pub use types::{Fitness, IndexType, MAX_FUNCTION_ARITY};
