/// Address type for the combined input + function-node space.
///
/// Connection indices, register indices and instruction destinations all
/// live in this space, so a single narrow type bounds the addressable
/// grid size (`inputs + rows * columns <= IndexType::MAX`).
pub type IndexType = u16;

/// Fitness scalar assigned by a domain after an evaluation episode.
pub type Fitness = f32;

/// Upper bound on function arity; every gene carries this many
/// connection slots regardless of the arity of its current function.
pub const MAX_FUNCTION_ARITY: usize = 2;
