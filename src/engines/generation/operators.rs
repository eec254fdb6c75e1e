use crate::config::ProbabilisticMutation;
use rand::{Rng, RngCore};

/// Decides, per gene, whether a mutation fires. One policy instance
/// lives for exactly one pass over a genotype, which visits every gene
/// exactly once in a fixed order.
pub(crate) trait MutationPolicy {
    fn mutate_function(&mut self, rng: &mut dyn RngCore) -> bool;
    fn mutate_connection(&mut self, rng: &mut dyn RngCore) -> bool;
    fn mutate_output(&mut self, rng: &mut dyn RngCore) -> bool;
    fn mutate_constant(&mut self, rng: &mut dyn RngCore) -> bool;
}

/// Independent Bernoulli trial per gene.
pub(crate) struct ProbabilisticPolicy {
    chances: ProbabilisticMutation,
}

impl ProbabilisticPolicy {
    pub fn new(chances: &ProbabilisticMutation) -> Self {
        Self {
            chances: chances.clone(),
        }
    }
}

impl MutationPolicy for ProbabilisticPolicy {
    fn mutate_function(&mut self, rng: &mut dyn RngCore) -> bool {
        rng.gen_bool(self.chances.function_mutation_chance)
    }

    fn mutate_connection(&mut self, rng: &mut dyn RngCore) -> bool {
        rng.gen_bool(self.chances.connection_mutation_chance)
    }

    fn mutate_output(&mut self, rng: &mut dyn RngCore) -> bool {
        rng.gen_bool(self.chances.output_mutation_chance)
    }

    fn mutate_constant(&mut self, rng: &mut dyn RngCore) -> bool {
        rng.gen_bool(self.chances.constant_mutation_chance)
    }
}

/// Sequential reservoir rule: mutates exactly
/// `min(mutation_count, total_genes)` genes, each position equally
/// likely, in a single pass.
pub(crate) struct FixedCountPolicy {
    remaining_genes: f64,
    remaining_mutations: f64,
}

impl FixedCountPolicy {
    pub fn new(total_genes: usize, mutation_count: usize) -> Self {
        Self {
            remaining_genes: total_genes as f64,
            remaining_mutations: mutation_count.min(total_genes) as f64,
        }
    }

    fn mutate_gene(&mut self, rng: &mut dyn RngCore) -> bool {
        debug_assert!(self.remaining_genes >= 1.0, "gene stream exhausted");
        let chance = self.remaining_mutations / self.remaining_genes;
        self.remaining_genes -= 1.0;
        if rng.gen_bool(chance) {
            self.remaining_mutations -= 1.0;
            true
        } else {
            false
        }
    }
}

impl MutationPolicy for FixedCountPolicy {
    fn mutate_function(&mut self, rng: &mut dyn RngCore) -> bool {
        self.mutate_gene(rng)
    }

    fn mutate_connection(&mut self, rng: &mut dyn RngCore) -> bool {
        self.mutate_gene(rng)
    }

    fn mutate_output(&mut self, rng: &mut dyn RngCore) -> bool {
        self.mutate_gene(rng)
    }

    fn mutate_constant(&mut self, rng: &mut dyn RngCore) -> bool {
        self.mutate_gene(rng)
    }
}

/// Single-point crossover: the child takes one parent's prefix and the
/// other's suffix, with a fair coin picking the order.
pub(crate) fn single_point_crossover<T: Clone, R: Rng>(a: &[T], b: &[T], rng: &mut R) -> Vec<T> {
    debug_assert_eq!(a.len(), b.len());
    if a.is_empty() {
        return Vec::new();
    }

    let split_point = rng.gen_range(0..a.len());
    let (first, second) = if rng.gen_bool(0.5) { (a, b) } else { (b, a) };
    first[..split_point]
        .iter()
        .chain(second[split_point..].iter())
        .cloned()
        .collect()
}
