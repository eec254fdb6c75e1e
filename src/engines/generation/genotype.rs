use crate::config::{
    CgpConfig, ConfigSection, FixedCountMutation, MutationStrategy, ProbabilisticMutation,
};
use crate::engines::evaluation::Brain;
use crate::engines::generation::operators::{
    single_point_crossover, FixedCountPolicy, MutationPolicy, ProbabilisticPolicy,
};
use crate::error::{GridGpError, Result};
use crate::functions::{FunctionId, FunctionRegistry};
use crate::types::{Fitness, IndexType, MAX_FUNCTION_ARITY};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Immutable shape shared by every genotype of one population: the
/// validated configuration, the enabled function set and the domain's
/// input/output counts.
#[derive(Debug)]
pub struct CgpContext {
    config: CgpConfig,
    registry: FunctionRegistry,
    inputs: usize,
    outputs: usize,
}

impl CgpContext {
    pub fn new(config: CgpConfig, inputs: usize, outputs: usize) -> Result<Self> {
        config.validate()?;
        if inputs < 1 {
            return Err(GridGpError::Configuration(
                "domain must declare at least one input".to_string(),
            ));
        }
        if outputs < 1 {
            return Err(GridGpError::Configuration(
                "domain must declare at least one output".to_string(),
            ));
        }
        let address_space = inputs + config.node_count();
        if address_space > IndexType::MAX as usize + 1 {
            return Err(GridGpError::Configuration(format!(
                "grid too large: {} addressable nodes exceed the index type",
                address_space
            )));
        }
        let registry = FunctionRegistry::new(&config)?;
        Ok(Self {
            config,
            registry,
            inputs,
            outputs,
        })
    }

    pub fn config(&self) -> &CgpConfig {
        &self.config
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn outputs(&self) -> usize {
        self.outputs
    }

    pub fn node_count(&self) -> usize {
        self.config.node_count()
    }
}

/// What a function node computes: a library function, or one of the
/// genotype's evolvable constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeOp {
    Function(FunctionId),
    Constant(u16),
}

impl NodeOp {
    pub fn arity(self) -> usize {
        match self {
            NodeOp::Function(id) => id.arity(),
            NodeOp::Constant(_) => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionGene {
    pub op: NodeOp,
    pub connections: [IndexType; MAX_FUNCTION_ARITY],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputGene {
    pub connection: IndexType,
}

/// On-disk form; the header pins the population shape the genes were
/// bred for.
#[derive(Serialize, Deserialize)]
struct GenotypeRecord {
    inputs: usize,
    outputs: usize,
    rows: usize,
    columns: usize,
    function_genes: Vec<FunctionGene>,
    output_genes: Vec<OutputGene>,
    constants_genes: Vec<f32>,
}

/// One chromosome: a fixed grid of function genes in row-major column
/// order, one output gene per domain output, and the evolvable
/// constants pool. Lives for exactly one generation.
#[derive(Debug, Clone)]
pub struct Genotype {
    ctx: Arc<CgpContext>,
    function_genes: Vec<FunctionGene>,
    output_genes: Vec<OutputGene>,
    constants: Vec<f32>,
    pub fitness: Fitness,
}

/// Genotype equality covers the heritable material only, not fitness.
impl PartialEq for Genotype {
    fn eq(&self, other: &Self) -> bool {
        self.function_genes == other.function_genes
            && self.output_genes == other.output_genes
            && self.constants == other.constants
    }
}

fn quantize(value: f32, resolution: f32) -> f32 {
    (value / resolution) as i32 as f32 * resolution
}

impl Genotype {
    /// An empty genotype; call `create_primordial_seed` or `load` to
    /// give it genes.
    pub fn new(ctx: Arc<CgpContext>) -> Self {
        Self {
            ctx,
            function_genes: Vec::new(),
            output_genes: Vec::new(),
            constants: Vec::new(),
            fitness: 0.0,
        }
    }

    /// Builds a genotype from explicit genes. The gene vectors must
    /// match the context shape; connection values are trusted, exactly
    /// as they are when produced by mutation.
    pub fn from_genes(
        ctx: Arc<CgpContext>,
        function_genes: Vec<FunctionGene>,
        output_genes: Vec<OutputGene>,
        constants: Vec<f32>,
    ) -> Result<Self> {
        if function_genes.len() != ctx.node_count() {
            return Err(GridGpError::Genotype(format!(
                "expected {} function genes, got {}",
                ctx.node_count(),
                function_genes.len()
            )));
        }
        if output_genes.len() != ctx.outputs() {
            return Err(GridGpError::Genotype(format!(
                "expected {} output genes, got {}",
                ctx.outputs(),
                output_genes.len()
            )));
        }
        Ok(Self {
            ctx,
            function_genes,
            output_genes,
            constants,
            fitness: 0.0,
        })
    }

    pub fn context(&self) -> &Arc<CgpContext> {
        &self.ctx
    }

    pub fn function_genes(&self) -> &[FunctionGene] {
        &self.function_genes
    }

    pub fn output_genes(&self) -> &[OutputGene] {
        &self.output_genes
    }

    pub fn constants(&self) -> &[f32] {
        &self.constants
    }

    pub(crate) fn constant(&self, index: u16) -> f32 {
        self.constants[index as usize]
    }

    /// Compiles this genotype into an executable brain for one
    /// evaluation episode.
    pub fn grow(&self) -> Brain<'_> {
        Brain::new(self)
    }

    pub fn reset(&mut self) {
        self.function_genes.clear();
        self.output_genes.clear();
        self.constants.clear();
        self.fitness = 0.0;
    }

    /// Valid connection range `[min, max]` (inclusive) for a gene in
    /// `column`; `column == columns` addresses the output layer.
    ///
    /// Column 0 reaches only the domain inputs; column `c` reaches the
    /// inputs plus any node within `levels_back` preceding columns.
    /// This closed-form range is the single mechanism that keeps the
    /// encoded graph acyclic.
    pub fn connection_range(&self, column: usize, levels_back: usize) -> (IndexType, IndexType) {
        let config = self.ctx.config();
        let inputs = self.ctx.inputs();
        debug_assert!(column <= config.columns);
        debug_assert!(levels_back > 0);

        let layer_base = |layer: usize| -> usize {
            if layer == 0 {
                0
            } else {
                inputs + (layer - 1) * config.rows
            }
        };

        let layer = column + 1;
        let min_connection_layer = layer.saturating_sub(levels_back);
        let min_index = layer_base(min_connection_layer);
        let max_index = layer_base(layer) - 1;
        (min_index as IndexType, max_index as IndexType)
    }

    /// Reinitializes this genotype as a primordial seed: fresh random
    /// constants, then a full-probability resampling of every function
    /// id and connection. There is no separate random-generation path.
    pub fn create_primordial_seed<R: Rng>(&mut self, rng: &mut R) {
        let ctx = Arc::clone(&self.ctx);
        let config = ctx.config();

        let placeholder = FunctionGene {
            op: NodeOp::Function(ctx.registry().available()[0]),
            connections: [0; MAX_FUNCTION_ARITY],
        };
        self.function_genes = vec![placeholder; ctx.node_count()];
        self.output_genes = vec![OutputGene { connection: 0 }; ctx.outputs()];

        let range = config.evolvable_constants_range;
        let resolution = config.evolvable_constants_resolution;
        self.constants = (0..config.evolvable_constants_count)
            .map(|_| quantize(rng.gen_range(-range..=range), resolution))
            .collect();

        let full = ProbabilisticMutation {
            connection_mutation_chance: 1.0,
            function_mutation_chance: 1.0,
            output_mutation_chance: 1.0,
            constant_mutation_chance: 0.0,
        };
        self.probabilistic_mutation(&full, rng);
        self.fitness = 0.0;
    }

    /// Applies the population's configured mutation strategy.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R) {
        match self.ctx.config().mutation.clone() {
            MutationStrategy::Probabilistic(chances) => self.probabilistic_mutation(&chances, rng),
            MutationStrategy::FixedCount(fixed) => self.fixed_count_mutation(&fixed, rng),
        }
    }

    pub fn probabilistic_mutation<R: Rng>(&mut self, config: &ProbabilisticMutation, rng: &mut R) {
        let mut policy = ProbabilisticPolicy::new(config);
        self.mutate_with(&mut policy, rng);
    }

    pub fn fixed_count_mutation<R: Rng>(&mut self, config: &FixedCountMutation, rng: &mut R) {
        let total_genes = self.function_genes.len() * (1 + MAX_FUNCTION_ARITY)
            + self.output_genes.len()
            + self.constants.len();
        let mut policy = FixedCountPolicy::new(total_genes, config.mutation_count);
        self.mutate_with(&mut policy, rng);
    }

    /// One pass over every gene in fixed order: function ids and
    /// connections column by column, then outputs, then constants.
    /// Resampled values always come from the gene's valid range, so the
    /// result is structurally valid by construction; there is no
    /// rejection step.
    fn mutate_with<R: Rng>(&mut self, policy: &mut dyn MutationPolicy, rng: &mut R) {
        let ctx = Arc::clone(&self.ctx);
        let config = ctx.config();
        let available = ctx.registry().available();
        debug_assert!(!self.function_genes.is_empty());
        debug_assert!(!self.output_genes.is_empty());

        // function genes; the combined sample space covers the enabled
        // functions and the evolvable constants
        let constants_base = -(self.constants.len() as i64);
        for column in 0..config.columns {
            let (min_index, max_index) = self.connection_range(column, config.levels_back);
            for row in 0..config.rows {
                let gene = &mut self.function_genes[row + column * config.rows];
                if policy.mutate_function(rng) {
                    let index = rng.gen_range(constants_base..available.len() as i64);
                    gene.op = if index >= 0 {
                        NodeOp::Function(available[index as usize])
                    } else {
                        NodeOp::Constant((index - constants_base) as u16)
                    };
                }
                for connection in gene.connections.iter_mut() {
                    if policy.mutate_connection(rng) {
                        *connection = rng.gen_range(min_index..=max_index);
                    }
                }
            }
        }

        // output genes
        let output_levels_back = if config.outputs_use_levels_back {
            config.levels_back
        } else {
            config.columns + 1
        };
        let (min_index, max_index) = self.connection_range(config.columns, output_levels_back);
        for gene in self.output_genes.iter_mut() {
            if policy.mutate_output(rng) {
                gene.connection = rng.gen_range(min_index..=max_index);
            }
        }

        // evolvable constants
        let resolution = config.evolvable_constants_resolution;
        let std_dev = config.evolvable_constants_std_dev;
        for value in self.constants.iter_mut() {
            if policy.mutate_constant(rng) {
                let noise: f32 = rng.sample(StandardNormal);
                *value = quantize(*value + noise * std_dev, resolution);
            }
        }
    }

    /// Single-point crossover from two parents. `preference` is part of
    /// the factory contract and does not bias this recombination.
    pub fn inherit<R: Rng>(
        &mut self,
        parent1: &Genotype,
        parent2: &Genotype,
        _preference: f32,
        rng: &mut R,
    ) {
        self.function_genes =
            single_point_crossover(&parent1.function_genes, &parent2.function_genes, rng);
        self.output_genes =
            single_point_crossover(&parent1.output_genes, &parent2.output_genes, rng);
        self.constants = single_point_crossover(&parent1.constants, &parent2.constants, rng);
        self.fitness = 0.0;
    }

    pub fn save(&self) -> serde_json::Value {
        let config = self.ctx.config();
        json!({
            "inputs": self.ctx.inputs(),
            "outputs": self.ctx.outputs(),
            "rows": config.rows,
            "columns": config.columns,
            "function_genes": self.function_genes,
            "output_genes": self.output_genes,
            "constants_genes": self.constants,
        })
    }

    /// Rebuilds this genotype from `save()` output. A header or shape
    /// mismatch fails without touching the receiving genotype.
    pub fn load(&mut self, json_obj: &serde_json::Value) -> Result<()> {
        let record: GenotypeRecord = serde_json::from_value(json_obj.clone())?;
        let config = self.ctx.config();

        if record.inputs != self.ctx.inputs() {
            return Err(GridGpError::Genotype(
                "can't load genotype, mismatched inputs count".to_string(),
            ));
        }
        if record.outputs != self.ctx.outputs() {
            return Err(GridGpError::Genotype(
                "can't load genotype, mismatched outputs count".to_string(),
            ));
        }
        if record.rows != config.rows {
            return Err(GridGpError::Genotype(
                "can't load genotype, mismatched rows count".to_string(),
            ));
        }
        if record.columns != config.columns {
            return Err(GridGpError::Genotype(
                "can't load genotype, mismatched columns count".to_string(),
            ));
        }
        if record.function_genes.len() != self.ctx.node_count()
            || record.output_genes.len() != self.ctx.outputs()
        {
            return Err(GridGpError::Genotype(
                "can't load genotype, mismatched gene counts".to_string(),
            ));
        }
        let constants_count = record.constants_genes.len();
        for gene in &record.function_genes {
            if let NodeOp::Constant(index) = gene.op {
                if index as usize >= constants_count {
                    return Err(GridGpError::Genotype(format!(
                        "can't load genotype, constant index {} out of range",
                        index
                    )));
                }
            }
        }

        self.function_genes = record.function_genes;
        self.output_genes = record.output_genes;
        self.constants = record.constants_genes;
        self.fitness = 0.0;
        Ok(())
    }
}
