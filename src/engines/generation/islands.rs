use crate::config::{ConfigSection, IslandsConfig};
use crate::engines::generation::population::Population;
use crate::engines::traits::{GenerationFactory, SelectionAlgorithm};
use crate::error::Result;
use crate::types::Fitness;

/// One fixed-size contiguous slice of the population.
///
/// `parent: None` marks a primordial island: every one of its slots is
/// reseeded from scratch in the next apply phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Island {
    pub parent: Option<usize>,
    pub age: u32,
}

const PRIMORDIAL: Island = Island {
    parent: None,
    age: 0,
};

/// Island-model selection: genotypes compete for the leader slot within
/// their own island, islands compete for survival. The worst-ranked
/// islands past their protected age go extinct and are reseeded.
pub struct IslandsSelection {
    config: IslandsConfig,
    islands: Vec<Island>,
}

impl IslandsSelection {
    pub fn new(config: IslandsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            islands: Vec::new(),
        })
    }

    pub fn config(&self) -> &IslandsConfig {
        &self.config
    }

    pub fn islands(&self) -> &[Island] {
        &self.islands
    }
}

impl SelectionAlgorithm for IslandsSelection {
    fn new_population(&mut self, population: &Population) {
        let island_size = self.config.island_size;
        let islands_count = (population.len() + island_size - 1) / island_size;
        self.islands = vec![PRIMORDIAL; islands_count];
    }

    /// Two phases. Plan (sequential): pick each island's parent, decide
    /// extinctions, advance ages. Apply (parallel): rebuild every slot
    /// from the read-only island table.
    ///
    /// The extinction test reads the age an island entered this call
    /// with; ages advance afterwards. That gives a reseeded island the
    /// same full protection window as the initial islands.
    fn create_next_generation(&mut self, next_generation: &mut dyn GenerationFactory) {
        let island_size = self.config.island_size;
        let slot_count = next_generation.len();

        // each island's new parent: best of its slice, last seen wins ties
        for (island_index, island) in self.islands.iter_mut().enumerate() {
            let base = island_index * island_size;
            let end = (base + island_size).min(slot_count);
            let mut parent = base;
            for index in base..end {
                if next_generation.fitness(index) >= next_generation.fitness(parent) {
                    parent = index;
                }
            }
            island.parent = Some(parent);
        }

        // rank islands, worst parent first
        let parent_fitness: Vec<Fitness> = self
            .islands
            .iter()
            .map(|island| {
                island
                    .parent
                    .map_or(Fitness::NEG_INFINITY, |parent| {
                        next_generation.fitness(parent)
                    })
            })
            .collect();
        let mut ranked: Vec<usize> = (0..self.islands.len()).collect();
        ranked.sort_by(|&a, &b| parent_fitness[a].total_cmp(&parent_fitness[b]));

        // extinct the bottom islands, unless still age-protected
        let extinct_limit =
            (self.islands.len() as f32 * self.config.extinction_percentage).floor() as usize;
        for &island_index in ranked.iter().take(extinct_limit) {
            let island = &mut self.islands[island_index];
            if island.age >= self.config.protected_age {
                log::debug!(
                    "island {} went extinct (age {}, parent fitness {:.3})",
                    island_index,
                    island.age,
                    parent_fitness[island_index]
                );
                *island = PRIMORDIAL;
            }
        }

        // age the surviving islands
        for island in self.islands.iter_mut() {
            if island.parent.is_some() {
                island.age += 1;
            }
        }

        // rebuild every slot; the island leader survives verbatim in
        // its island's first slot, every other slot is a mutated copy
        let islands = &self.islands;
        next_generation.fill(&|index, factory| {
            let island_index = index / island_size;
            match islands[island_index].parent {
                None => factory.create_primordial_seed(),
                Some(parent) => {
                    factory.replicate(parent);
                    if index != island_index * island_size {
                        factory.mutate();
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_is_rejected() {
        assert!(IslandsSelection::new(IslandsConfig {
            island_size: 0,
            ..IslandsConfig::default()
        })
        .is_err());

        assert!(IslandsSelection::new(IslandsConfig {
            extinction_percentage: -0.5,
            ..IslandsConfig::default()
        })
        .is_err());
    }
}
