use super::traits::ConfigSection;
use crate::error::GridGpError;
use crate::functions::table::FunctionCategory;
use serde::{Deserialize, Serialize};

/// Independent per-gene mutation probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbabilisticMutation {
    pub connection_mutation_chance: f64,
    pub function_mutation_chance: f64,
    pub output_mutation_chance: f64,
    pub constant_mutation_chance: f64,
}

impl Default for ProbabilisticMutation {
    fn default() -> Self {
        Self {
            connection_mutation_chance: 0.05,
            function_mutation_chance: 0.05,
            output_mutation_chance: 0.1,
            constant_mutation_chance: 0.1,
        }
    }
}

/// Mutates a fixed number of genes per call, spread uniformly over the
/// whole genotype (function ids, connections, outputs and constants).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedCountMutation {
    pub mutation_count: usize,
}

impl Default for FixedCountMutation {
    fn default() -> Self {
        Self { mutation_count: 2 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MutationStrategy {
    Probabilistic(ProbabilisticMutation),
    FixedCount(FixedCountMutation),
}

impl Default for MutationStrategy {
    fn default() -> Self {
        MutationStrategy::Probabilistic(ProbabilisticMutation::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CgpConfig {
    /// Number of node rows.
    pub rows: usize,
    /// Number of node columns.
    pub columns: usize,
    /// Maximum number of preceding columns a connection may reach into.
    pub levels_back: usize,
    /// Use the levels-back value for the output genes too?
    pub outputs_use_levels_back: bool,

    // per-category function enable flags
    pub fn_basic_constants: bool,
    pub fn_transcendental_constants: bool,
    pub fn_basic_arithmetic: bool,
    pub fn_extra_arithmetic: bool,
    pub fn_common_math: bool,
    pub fn_extra_math: bool,
    pub fn_trigonometric: bool,
    pub fn_hyperbolic: bool,
    pub fn_ann_activation: bool,
    pub fn_comparisons: bool,
    pub fn_logic_gates: bool,
    pub fn_conditional: bool,
    pub fn_stateful: bool,

    /// The number of evolvable constants carried by each genotype.
    pub evolvable_constants_count: usize,
    /// Initial constant values are sampled from `[-range, +range]`.
    pub evolvable_constants_range: f32,
    /// Constant values are quantized to this resolution.
    pub evolvable_constants_resolution: f32,
    /// Mutation standard deviation, used for evolvable constants.
    pub evolvable_constants_std_dev: f32,

    pub mutation: MutationStrategy,

    /// Run seed; `None` draws one from OS entropy, which forfeits
    /// reproducibility of the evolutionary run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for CgpConfig {
    fn default() -> Self {
        Self {
            rows: 2,
            columns: 8,
            levels_back: 4,
            outputs_use_levels_back: false,
            fn_basic_constants: true,
            fn_transcendental_constants: true,
            fn_basic_arithmetic: true,
            fn_extra_arithmetic: true,
            fn_common_math: true,
            fn_extra_math: true,
            fn_trigonometric: true,
            fn_hyperbolic: true,
            fn_ann_activation: true,
            fn_comparisons: true,
            fn_logic_gates: true,
            fn_conditional: true,
            fn_stateful: true,
            evolvable_constants_count: 2,
            evolvable_constants_range: 10.0,
            evolvable_constants_resolution: 0.01,
            evolvable_constants_std_dev: 2.0,
            mutation: MutationStrategy::default(),
            seed: None,
        }
    }
}

impl CgpConfig {
    pub fn category_enabled(&self, category: FunctionCategory) -> bool {
        match category {
            FunctionCategory::BasicConstant => self.fn_basic_constants,
            FunctionCategory::TranscendentalConstant => self.fn_transcendental_constants,
            FunctionCategory::BasicArithmetic => self.fn_basic_arithmetic,
            FunctionCategory::ExtraArithmetic => self.fn_extra_arithmetic,
            FunctionCategory::CommonMath => self.fn_common_math,
            FunctionCategory::ExtraMath => self.fn_extra_math,
            FunctionCategory::Trigonometric => self.fn_trigonometric,
            FunctionCategory::Hyperbolic => self.fn_hyperbolic,
            FunctionCategory::AnnActivation => self.fn_ann_activation,
            FunctionCategory::Comparisons => self.fn_comparisons,
            FunctionCategory::LogicGates => self.fn_logic_gates,
            FunctionCategory::Conditional => self.fn_conditional,
            FunctionCategory::Stateful => self.fn_stateful,
        }
    }

    /// Total number of function nodes in the grid.
    pub fn node_count(&self) -> usize {
        self.rows * self.columns
    }
}

fn check_chance(name: &str, value: f64) -> Result<(), GridGpError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(GridGpError::Configuration(format!(
            "{} must be between 0 and 1",
            name
        )));
    }
    Ok(())
}

impl ConfigSection for CgpConfig {
    fn section_name() -> &'static str {
        "cgp"
    }

    fn validate(&self) -> Result<(), GridGpError> {
        if self.rows < 1 {
            return Err(GridGpError::Configuration("rows must be >= 1".to_string()));
        }
        if self.columns < 1 {
            return Err(GridGpError::Configuration(
                "columns must be >= 1".to_string(),
            ));
        }
        if self.levels_back < 1 {
            return Err(GridGpError::Configuration(
                "levels_back must be >= 1".to_string(),
            ));
        }
        if self.evolvable_constants_range < 0.0 {
            return Err(GridGpError::Configuration(
                "evolvable_constants_range must not be negative".to_string(),
            ));
        }
        if self.evolvable_constants_resolution <= 0.0 {
            return Err(GridGpError::Configuration(
                "evolvable_constants_resolution must be positive".to_string(),
            ));
        }
        if self.evolvable_constants_std_dev < 0.0 {
            return Err(GridGpError::Configuration(
                "evolvable_constants_std_dev must not be negative".to_string(),
            ));
        }
        match &self.mutation {
            MutationStrategy::Probabilistic(chances) => {
                check_chance(
                    "connection_mutation_chance",
                    chances.connection_mutation_chance,
                )?;
                check_chance("function_mutation_chance", chances.function_mutation_chance)?;
                check_chance("output_mutation_chance", chances.output_mutation_chance)?;
                check_chance("constant_mutation_chance", chances.constant_mutation_chance)?;
            }
            MutationStrategy::FixedCount(_) => {}
        }
        Ok(())
    }
}
