// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The direction of preference for one criterion.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Impact {
    /// Higher raw values are preferred (`+`).
    Benefit,
    /// Lower raw values are preferred (`-`).
    Cost,
}

impl Impact {
    /// Parses the usual one-character notation: `+` for a benefit, `-` for a cost.
    pub fn from_symbol(s: &str) -> Option<Impact> {
        match s {
            "+" => Some(Impact::Benefit),
            "-" => Some(Impact::Cost),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Impact::Benefit => "+",
            Impact::Cost => "-",
        }
    }
}

// ******** Output data structures *********

/// The outcome for a single alternative.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ScoreResult {
    /// Relative closeness to the ideal solution, in [0, 1]. Higher is better.
    pub closeness: f64,
    /// 1 is the best alternative.
    pub rank: u32,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TopsisResult {
    /// One entry per alternative, in the order of the rows of the decision matrix.
    pub scores: Vec<ScoreResult>,
    /// The ideal best point, in the weighted space.
    pub ideal_best: Vec<f64>,
    /// The ideal worst point, in the weighted space.
    pub ideal_worst: Vec<f64>,
}

impl TopsisResult {
    pub fn closeness(&self) -> Vec<f64> {
        self.scores.iter().map(|s| s.closeness).collect()
    }

    pub fn ranks(&self) -> Vec<u32> {
        self.scores.iter().map(|s| s.rank).collect()
    }
}

/// Errors that prevent the algorithm from completing successfully.
///
/// Columns and rows are 0-based indexes into the decision matrix.
#[derive(PartialEq, Debug, Clone)]
pub enum TopsisError {
    /// The matrix has no rows or no columns.
    EmptyMatrix,
    /// A row does not have the same number of values as the first one.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// NaN or infinite value in the decision matrix.
    NonFiniteValue { row: usize, column: usize },
    /// The weights or the impacts do not match the number of criteria.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// Weights must be strictly positive and finite.
    NonPositiveWeight { column: usize, value: f64 },
    /// All the values of this criterion are zero: it cannot be normalized.
    DegenerateCriterion { column: usize },
    /// This alternative is at the same distance (zero) of both ideal points.
    DegenerateSolution { row: usize },
    /// The distances of this alternative to the ideal points exceed the range of `f64`.
    /// This only happens with weights of extreme magnitude.
    NonFiniteDistance { row: usize },
}

impl TopsisError {
    /// True for the errors caused by the content of the data itself, as opposed to
    /// malformed inputs.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            TopsisError::DegenerateCriterion { .. }
                | TopsisError::DegenerateSolution { .. }
                | TopsisError::NonFiniteDistance { .. }
        )
    }
}

impl Error for TopsisError {}

impl Display for TopsisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopsisError::EmptyMatrix => {
                write!(f, "the decision matrix needs at least one row and one column")
            }
            TopsisError::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} values, expected {} values",
                row, found, expected
            ),
            TopsisError::NonFiniteValue { row, column } => write!(
                f,
                "the value at row {} column {} is not a finite number",
                row, column
            ),
            TopsisError::DimensionMismatch {
                what,
                expected,
                found,
            } => write!(
                f,
                "number of {} ({}) must equal the number of criteria ({})",
                what, found, expected
            ),
            TopsisError::NonPositiveWeight { column, value } => write!(
                f,
                "the weight of criterion {} must be strictly positive, got {}",
                column, value
            ),
            TopsisError::DegenerateCriterion { column } => write!(
                f,
                "degenerate criterion: all the values of criterion {} are zero",
                column
            ),
            TopsisError::DegenerateSolution { row } => write!(
                f,
                "degenerate solution: alternative {} coincides with both ideal points",
                row
            ),
            TopsisError::NonFiniteDistance { row } => write!(
                f,
                "the distances of alternative {} to the ideal points overflow, use smaller weights",
                row
            ),
        }
    }
}

// ********* Configuration **********

/// How the weights are applied to the normalized matrix.
///
/// The closeness scores and the ranks do not depend on this choice: scaling all the
/// weights by the same factor scales all the distances by that factor. Only the
/// intermediate weighted matrix and the ideal points change.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum WeightNormalization {
    /// The weights multiply the normalized columns as given.
    Raw,
    /// The weights are first divided by their sum.
    SumToOne,
}

/// How alternatives with exactly the same closeness are ranked.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieMode {
    /// Tied alternatives all get the worst rank of their group: the rank of a value is
    /// the number of values greater than or equal to it. `[0.9, 0.5, 0.5, 0.1]` ranks as
    /// `[1, 3, 3, 4]`.
    Max,
    /// Tied alternatives all get the best rank of their group (competition ranking).
    /// `[0.9, 0.5, 0.5, 0.1]` ranks as `[1, 2, 2, 4]`.
    Min,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TopsisRules {
    pub weight_normalization: WeightNormalization,
    pub tie_mode: TieMode,
}

impl TopsisRules {
    pub const DEFAULT_RULES: TopsisRules = TopsisRules {
        weight_normalization: WeightNormalization::Raw,
        tie_mode: TieMode::Max,
    };
}

impl Default for TopsisRules {
    fn default() -> Self {
        TopsisRules::DEFAULT_RULES
    }
}
