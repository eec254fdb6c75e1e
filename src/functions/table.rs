use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one entry in the function library.
///
/// NOTE: removal/reordering of ids breaks the serialization format
/// compatibility, so new functions go at the end of their own category
/// block only if the format is versioned, otherwise strictly at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionId {
    // basic constants
    ConstZero,
    ConstOne,
    ConstTwo,

    // transcendental constants
    ConstPi,
    ConstE,

    // basic arithmetic
    Identity,
    Add,
    Subtract,
    Multiply,
    Divide,
    Negate,

    // extra arithmetic
    Fmod,
    Remainder,
    Fdim,
    Ceil,
    Floor,

    // common math
    Abs,
    Average,
    Min,
    Max,
    Square,

    // extra (mostly transcendental) math
    Log,
    Log2,
    Sqrt,
    Power,
    Exp,
    Exp2,

    // trigonometric
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,

    // hyperbolic
    Sinh,
    Cosh,
    Tanh,

    // ANN activation
    AfnIdentity,
    AfnLogistic,
    AfnTanh,
    AfnReLU,
    AfnNeat,

    // comparisons
    CmpEq,
    CmpNe,
    CmpGt,
    CmpGe,
    CmpLt,
    CmpLe,

    // boolean logic gates
    And,
    Or,
    Not,
    Xor,

    // conditional
    IfOrZero,

    // stateful
    Velocity,
    HighWatermark,
    LowWatermark,
    MemoryCell,
    SoftMemoryCell,
    TimeDelay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCategory {
    BasicConstant,
    TranscendentalConstant,
    BasicArithmetic,
    ExtraArithmetic,
    CommonMath,
    ExtraMath,
    Trigonometric,
    Hyperbolic,
    AnnActivation,
    Comparisons,
    LogicGates,
    Conditional,
    Stateful,
}

#[derive(Debug, Clone, Copy)]
pub struct FunctionDef {
    pub id: FunctionId,
    pub name: &'static str,
    pub arity: usize,
    pub category: FunctionCategory,
}

macro_rules! fn_def {
    ($id:ident, $name:literal, $arity:literal, $category:ident) => {
        FunctionDef {
            id: FunctionId::$id,
            name: $name,
            arity: $arity,
            category: FunctionCategory::$category,
        }
    };
}

/// The full function library, indexed by `FunctionId` discriminant.
pub const FUNCTIONS: [FunctionDef; 58] = [
    fn_def!(ConstZero, "const_zero", 0, BasicConstant),
    fn_def!(ConstOne, "const_one", 0, BasicConstant),
    fn_def!(ConstTwo, "const_two", 0, BasicConstant),
    fn_def!(ConstPi, "const_pi", 0, TranscendentalConstant),
    fn_def!(ConstE, "const_e", 0, TranscendentalConstant),
    fn_def!(Identity, "identity", 1, BasicArithmetic),
    fn_def!(Add, "add", 2, BasicArithmetic),
    fn_def!(Subtract, "subtract", 2, BasicArithmetic),
    fn_def!(Multiply, "multiply", 2, BasicArithmetic),
    fn_def!(Divide, "divide", 2, BasicArithmetic),
    fn_def!(Negate, "negate", 1, BasicArithmetic),
    fn_def!(Fmod, "fmod", 2, ExtraArithmetic),
    fn_def!(Remainder, "remainder", 2, ExtraArithmetic),
    fn_def!(Fdim, "fdim", 2, ExtraArithmetic),
    fn_def!(Ceil, "ceil", 1, ExtraArithmetic),
    fn_def!(Floor, "floor", 1, ExtraArithmetic),
    fn_def!(Abs, "abs", 1, CommonMath),
    fn_def!(Average, "average", 2, CommonMath),
    fn_def!(Min, "min", 2, CommonMath),
    fn_def!(Max, "max", 2, CommonMath),
    fn_def!(Square, "square", 1, CommonMath),
    fn_def!(Log, "log", 1, ExtraMath),
    fn_def!(Log2, "log2", 1, ExtraMath),
    fn_def!(Sqrt, "sqrt", 1, ExtraMath),
    fn_def!(Power, "power", 2, ExtraMath),
    fn_def!(Exp, "exp", 1, ExtraMath),
    fn_def!(Exp2, "exp2", 1, ExtraMath),
    fn_def!(Sin, "sin", 1, Trigonometric),
    fn_def!(Cos, "cos", 1, Trigonometric),
    fn_def!(Tan, "tan", 1, Trigonometric),
    fn_def!(Asin, "asin", 1, Trigonometric),
    fn_def!(Acos, "acos", 1, Trigonometric),
    fn_def!(Atan, "atan", 1, Trigonometric),
    fn_def!(Sinh, "sinh", 1, Hyperbolic),
    fn_def!(Cosh, "cosh", 1, Hyperbolic),
    fn_def!(Tanh, "tanh", 1, Hyperbolic),
    fn_def!(AfnIdentity, "afn_identity", 1, AnnActivation),
    fn_def!(AfnLogistic, "afn_logistic", 1, AnnActivation),
    fn_def!(AfnTanh, "afn_tanh", 1, AnnActivation),
    fn_def!(AfnReLU, "afn_relu", 1, AnnActivation),
    fn_def!(AfnNeat, "afn_neat", 1, AnnActivation),
    fn_def!(CmpEq, "cmp_eq", 2, Comparisons),
    fn_def!(CmpNe, "cmp_ne", 2, Comparisons),
    fn_def!(CmpGt, "cmp_gt", 2, Comparisons),
    fn_def!(CmpGe, "cmp_ge", 2, Comparisons),
    fn_def!(CmpLt, "cmp_lt", 2, Comparisons),
    fn_def!(CmpLe, "cmp_le", 2, Comparisons),
    fn_def!(And, "and", 2, LogicGates),
    fn_def!(Or, "or", 2, LogicGates),
    fn_def!(Not, "not", 1, LogicGates),
    fn_def!(Xor, "xor", 2, LogicGates),
    fn_def!(IfOrZero, "if_or_zero", 2, Conditional),
    fn_def!(Velocity, "velocity", 1, Stateful),
    fn_def!(HighWatermark, "high_watermark", 1, Stateful),
    fn_def!(LowWatermark, "low_watermark", 1, Stateful),
    fn_def!(MemoryCell, "memory_cell", 2, Stateful),
    fn_def!(SoftMemoryCell, "soft_memory_cell", 2, Stateful),
    fn_def!(TimeDelay, "time_delay", 1, Stateful),
];

/// Standard logistic function, also used as the soft memory gate.
fn logistic(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// IEEE-754 remainder: `a - b * round_to_nearest_even(a / b)`.
fn ieee_remainder(a: f32, b: f32) -> f32 {
    a - b * (a / b).round_ties_even()
}

fn truthy(x: f32) -> bool {
    x != 0.0
}

fn bool_value(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

impl FunctionId {
    pub fn def(self) -> &'static FunctionDef {
        &FUNCTIONS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }

    pub fn arity(self) -> usize {
        self.def().arity
    }

    pub fn category(self) -> FunctionCategory {
        self.def().category
    }

    /// Applies the function's fixed numeric semantics.
    ///
    /// Every function is total: NaN and infinities flow through with
    /// standard IEEE-754 propagation. `state` is the per-instruction
    /// memory slot; only the stateful category reads or writes it.
    pub fn evaluate(self, a: f32, b: f32, state: &mut f32) -> f32 {
        match self {
            FunctionId::ConstZero => 0.0,
            FunctionId::ConstOne => 1.0,
            FunctionId::ConstTwo => 2.0,
            FunctionId::ConstPi => std::f32::consts::PI,
            FunctionId::ConstE => std::f32::consts::E,
            FunctionId::Identity => a,
            FunctionId::Add => a + b,
            FunctionId::Subtract => a - b,
            FunctionId::Multiply => a * b,
            FunctionId::Divide => a / b,
            FunctionId::Negate => -a,
            FunctionId::Fmod => a % b,
            FunctionId::Remainder => ieee_remainder(a, b),
            FunctionId::Fdim => {
                if a.is_nan() || b.is_nan() {
                    f32::NAN
                } else if a > b {
                    a - b
                } else {
                    0.0
                }
            }
            FunctionId::Ceil => a.ceil(),
            FunctionId::Floor => a.floor(),
            FunctionId::Abs => a.abs(),
            FunctionId::Average => (a + b) / 2.0,
            FunctionId::Min => a.min(b),
            FunctionId::Max => a.max(b),
            FunctionId::Square => a * a,
            FunctionId::Log => a.ln(),
            FunctionId::Log2 => a.log2(),
            FunctionId::Sqrt => a.sqrt(),
            FunctionId::Power => a.powf(b),
            FunctionId::Exp => a.exp(),
            FunctionId::Exp2 => a.exp2(),
            FunctionId::Sin => a.sin(),
            FunctionId::Cos => a.cos(),
            FunctionId::Tan => a.tan(),
            FunctionId::Asin => a.asin(),
            FunctionId::Acos => a.acos(),
            FunctionId::Atan => a.atan(),
            FunctionId::Sinh => a.sinh(),
            FunctionId::Cosh => a.cosh(),
            FunctionId::Tanh => a.tanh(),
            FunctionId::AfnIdentity => a,
            FunctionId::AfnLogistic => logistic(a),
            FunctionId::AfnTanh => a.tanh(),
            FunctionId::AfnReLU => {
                if a > 0.0 {
                    a
                } else {
                    0.0
                }
            }
            FunctionId::AfnNeat => {
                // classic NEAT sigmoid slope
                const SLOPE: f32 = 4.924273;
                logistic(a * SLOPE)
            }
            FunctionId::CmpEq => bool_value(a == b),
            FunctionId::CmpNe => bool_value(a != b),
            FunctionId::CmpGt => bool_value(a > b),
            FunctionId::CmpGe => bool_value(a >= b),
            FunctionId::CmpLt => bool_value(a < b),
            FunctionId::CmpLe => bool_value(a <= b),
            FunctionId::And => bool_value(truthy(a) && truthy(b)),
            FunctionId::Or => bool_value(truthy(a) || truthy(b)),
            FunctionId::Not => bool_value(!truthy(a)),
            FunctionId::Xor => bool_value(truthy(a) != truthy(b)),
            FunctionId::IfOrZero => {
                if truthy(a) {
                    b
                } else {
                    0.0
                }
            }
            FunctionId::Velocity => {
                let value = a - *state;
                *state = a;
                value
            }
            FunctionId::HighWatermark => {
                if a > *state {
                    *state = a;
                }
                *state
            }
            FunctionId::LowWatermark => {
                if a < *state {
                    *state = a;
                }
                *state
            }
            FunctionId::MemoryCell => {
                if b >= 0.0 {
                    *state = a;
                }
                *state
            }
            FunctionId::SoftMemoryCell => {
                let gate = logistic(b);
                *state = a * gate + *state * (1.0 - gate);
                *state
            }
            FunctionId::TimeDelay => {
                let value = *state;
                *state = a;
                value
            }
        }
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_id() {
        for (index, def) in FUNCTIONS.iter().enumerate() {
            assert_eq!(def.id as usize, index, "table out of order at {}", def.name);
        }
    }

    #[test]
    fn test_arity_bounds() {
        for def in &FUNCTIONS {
            assert!(def.arity <= crate::types::MAX_FUNCTION_ARITY);
        }
    }

    #[test]
    fn test_division_by_zero_is_not_an_error() {
        let mut state = 0.0;
        assert_eq!(
            FunctionId::Divide.evaluate(1.0, 0.0, &mut state),
            f32::INFINITY
        );
        assert!(FunctionId::Divide.evaluate(0.0, 0.0, &mut state).is_nan());
    }

    #[test]
    fn test_logic_gates_use_truthiness() {
        let mut state = 0.0;
        assert_eq!(FunctionId::And.evaluate(2.0, -3.0, &mut state), 1.0);
        assert_eq!(FunctionId::And.evaluate(2.0, 0.0, &mut state), 0.0);
        assert_eq!(FunctionId::Not.evaluate(0.0, 0.0, &mut state), 1.0);
        assert_eq!(FunctionId::Xor.evaluate(1.0, 5.0, &mut state), 0.0);
        assert_eq!(FunctionId::IfOrZero.evaluate(0.0, 7.0, &mut state), 0.0);
        assert_eq!(FunctionId::IfOrZero.evaluate(1.0, 7.0, &mut state), 7.0);
    }

    #[test]
    fn test_stateful_functions_carry_memory() {
        let mut state = 0.0;
        assert_eq!(FunctionId::TimeDelay.evaluate(4.0, 0.0, &mut state), 0.0);
        assert_eq!(FunctionId::TimeDelay.evaluate(9.0, 0.0, &mut state), 4.0);

        let mut velocity_state = 0.0;
        assert_eq!(
            FunctionId::Velocity.evaluate(3.0, 0.0, &mut velocity_state),
            3.0
        );
        assert_eq!(
            FunctionId::Velocity.evaluate(5.0, 0.0, &mut velocity_state),
            2.0
        );

        let mut watermark = 0.0;
        FunctionId::HighWatermark.evaluate(2.5, 0.0, &mut watermark);
        assert_eq!(
            FunctionId::HighWatermark.evaluate(1.0, 0.0, &mut watermark),
            2.5
        );
    }

    #[test]
    fn test_memory_cell_gating() {
        let mut state = 0.0;
        assert_eq!(FunctionId::MemoryCell.evaluate(4.0, 1.0, &mut state), 4.0);
        assert_eq!(FunctionId::MemoryCell.evaluate(9.0, -1.0, &mut state), 4.0);
        assert_eq!(FunctionId::MemoryCell.evaluate(9.0, 0.0, &mut state), 9.0);
    }
}
