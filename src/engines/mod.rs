pub mod evaluation;
pub mod generation;
pub mod traits;

pub use evaluation::Brain;
pub use generation::{CgpContext, Genotype, IslandsSelection, Population};
pub use traits::{Domain, GenerationFactory, GenotypeFactory, SelectionAlgorithm};
