use crate::config::CgpConfig;
use crate::engines::generation::genotype::{CgpContext, Genotype};
use crate::engines::traits::{Domain, GenerationFactory, GenotypeFactory, SelectionAlgorithm};
use crate::error::Result;
use crate::types::Fitness;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::Arc;

/// Derives an independent stream seed from the run seed (splitmix64
/// finalizer), so parallel slots never share generator state.
fn derive_seed(base: u64, stream: u64) -> u64 {
    let mut z = base.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// One generation's genotypes plus the generation counter. Genotypes
/// are replaced wholesale each generation, never mutated in place.
pub struct Population {
    ctx: Arc<CgpContext>,
    genotypes: Vec<Genotype>,
    generation: u32,
    run_seed: u64,
}

impl Population {
    pub fn new(config: CgpConfig, domain: &dyn Domain) -> Result<Self> {
        let run_seed = config
            .seed
            .unwrap_or_else(|| StdRng::from_entropy().gen());
        let ctx = Arc::new(CgpContext::new(config, domain.inputs(), domain.outputs())?);
        Ok(Self {
            ctx,
            genotypes: Vec::new(),
            generation: 0,
            run_seed,
        })
    }

    pub fn context(&self) -> &Arc<CgpContext> {
        &self.ctx
    }

    pub fn len(&self) -> usize {
        self.genotypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genotypes.is_empty()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn genotype(&self, index: usize) -> &Genotype {
        &self.genotypes[index]
    }

    pub fn genotype_mut(&mut self, index: usize) -> &mut Genotype {
        &mut self.genotypes[index]
    }

    pub fn genotypes(&self) -> &[Genotype] {
        &self.genotypes
    }

    /// Resets evolution to generation 0 with freshly randomized
    /// genotypes, seeded in parallel.
    pub fn create_primordial_generation(&mut self, population_size: usize) {
        assert!(population_size > 0);
        log::info!("Resetting evolution ...");

        self.generation = 0;
        let ctx = &self.ctx;
        let generation_seed = derive_seed(self.run_seed, 0);
        self.genotypes = (0..population_size)
            .into_par_iter()
            .map(|index| {
                let mut rng = StdRng::seed_from_u64(derive_seed(generation_seed, index as u64 + 1));
                let mut genotype = Genotype::new(Arc::clone(ctx));
                genotype.create_primordial_seed(&mut rng);
                genotype
            })
            .collect();
    }

    /// Scores every genotype, one brain per genotype, on independent
    /// worker threads.
    pub fn evaluate<F>(&mut self, eval: F)
    where
        F: Fn(&Genotype) -> Fitness + Sync,
    {
        self.genotypes.par_iter_mut().for_each(|genotype| {
            genotype.fitness = eval(genotype);
        });
    }

    /// Genotype indices sorted by fitness, best first.
    pub fn ranking_index(&self) -> Vec<usize> {
        let mut index: Vec<usize> = (0..self.genotypes.len()).collect();
        index.sort_by(|&a, &b| {
            self.genotypes[b]
                .fitness
                .total_cmp(&self.genotypes[a].fitness)
        });

        if log::log_enabled!(log::Level::Debug) {
            let sample: Vec<String> = index
                .iter()
                .take(16)
                .map(|&i| format!("{:.3}", self.genotypes[i].fitness))
                .collect();
            log::debug!("fitness values: {} ...", sample.join(" "));
        }
        index
    }

    /// Replaces the current genotypes with the next generation produced
    /// by `selection`, advancing the generation counter.
    pub fn create_next_generation(&mut self, selection: &mut dyn SelectionAlgorithm) {
        self.generation += 1;
        log::debug!("creating generation {}", self.generation);

        let generation_seed = derive_seed(self.run_seed, self.generation as u64);
        let slots = {
            let mut next = NextGeneration {
                previous: &self.genotypes,
                slots: (0..self.genotypes.len())
                    .map(|_| Genotype::new(Arc::clone(&self.ctx)))
                    .collect(),
                seed: generation_seed,
            };
            selection.create_next_generation(&mut next);
            next.slots
        };
        self.genotypes = slots;
    }
}

/// GenerationFactory over one population transition: read-only access
/// to the previous generation, exclusive slot-at-a-time access to the
/// next one.
struct NextGeneration<'p> {
    previous: &'p [Genotype],
    slots: Vec<Genotype>,
    seed: u64,
}

impl GenerationFactory for NextGeneration<'_> {
    fn len(&self) -> usize {
        self.slots.len()
    }

    fn fitness(&self, index: usize) -> Fitness {
        self.previous[index].fitness
    }

    fn fill(&mut self, op: &(dyn Fn(usize, &mut dyn GenotypeFactory) + Sync)) {
        let previous = self.previous;
        let seed = self.seed;
        self.slots
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, slot)| {
                let mut factory = SlotFactory {
                    previous,
                    slot,
                    rng: StdRng::seed_from_u64(derive_seed(seed, index as u64 + 1)),
                };
                op(index, &mut factory);
            });
    }
}

/// GenotypeFactory for a single output slot; owns the slot's RNG.
struct SlotFactory<'p, 's> {
    previous: &'p [Genotype],
    slot: &'s mut Genotype,
    rng: StdRng,
}

impl GenotypeFactory for SlotFactory<'_, '_> {
    fn create_primordial_seed(&mut self) {
        self.slot.create_primordial_seed(&mut self.rng);
    }

    fn replicate(&mut self, parent: usize) {
        *self.slot = self.previous[parent].clone();
        self.slot.fitness = 0.0;
    }

    fn crossover(&mut self, parent1: usize, parent2: usize, preference: f32) {
        let (p1, p2) = (&self.previous[parent1], &self.previous[parent2]);
        self.slot.inherit(p1, p2, preference, &mut self.rng);
    }

    fn mutate(&mut self) {
        self.slot.mutate(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubDomain {
        inputs: usize,
        outputs: usize,
    }

    impl Domain for StubDomain {
        fn inputs(&self) -> usize {
            self.inputs
        }

        fn outputs(&self) -> usize {
            self.outputs
        }
    }

    fn seeded_config() -> CgpConfig {
        CgpConfig {
            seed: Some(1234),
            ..CgpConfig::default()
        }
    }

    #[test]
    fn test_primordial_generation_resets_counter_and_size() {
        let domain = StubDomain {
            inputs: 4,
            outputs: 2,
        };
        let mut population = Population::new(seeded_config(), &domain).unwrap();
        population.create_primordial_generation(12);
        assert_eq!(population.len(), 12);
        assert_eq!(population.generation(), 0);
        assert!(population
            .genotypes()
            .iter()
            .all(|g| !g.function_genes().is_empty()));
    }

    #[test]
    fn test_primordial_generation_is_reproducible_for_a_fixed_seed() {
        let domain = StubDomain {
            inputs: 4,
            outputs: 2,
        };
        let mut a = Population::new(seeded_config(), &domain).unwrap();
        let mut b = Population::new(seeded_config(), &domain).unwrap();
        a.create_primordial_generation(8);
        b.create_primordial_generation(8);
        for i in 0..8 {
            assert_eq!(a.genotype(i), b.genotype(i));
        }
    }

    #[test]
    fn test_ranking_index_sorts_best_first() {
        let domain = StubDomain {
            inputs: 4,
            outputs: 2,
        };
        let mut population = Population::new(seeded_config(), &domain).unwrap();
        population.create_primordial_generation(5);
        for (i, fitness) in [0.5, 2.0, -1.0, 3.5, 1.0].iter().enumerate() {
            population.genotype_mut(i).fitness = *fitness;
        }
        assert_eq!(population.ranking_index(), vec![3, 1, 4, 0, 2]);
    }
}
