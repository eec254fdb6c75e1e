pub mod brain;

pub use brain::{Brain, Instruction};
