/*!
This crate implements TOPSIS (Technique for Order of Preference by Similarity to Ideal
Solution), a method to rank alternatives against several, possibly conflicting, numeric
criteria.

Each alternative is a row of a [DecisionMatrix], each criterion is a column. The columns are
normalized, weighted, and compared against an ideal best and an ideal worst point derived
from the data. Alternatives close to the ideal best and far from the ideal worst get a
closeness score near 1 and the best ranks.

```
use topsis::*;

let matrix = DecisionMatrix::new(&[
    vec![250.0, 16.0, 12.0, 5.0],
    vec![200.0, 16.0, 8.0, 3.0],
    vec![300.0, 32.0, 16.0, 4.0],
    vec![275.0, 32.0, 8.0, 4.0],
])?;
let impacts = [Impact::Cost, Impact::Benefit, Impact::Benefit, Impact::Benefit];
let res = run_topsis(&matrix, &[1.0, 1.0, 1.0, 1.0], &impacts, &TopsisRules::DEFAULT_RULES)?;
assert_eq!(res.ranks(), vec![3, 4, 1, 2]);
# Ok::<(), TopsisError>(())
```

The individual steps are also exposed ([normalize], [weight], [derive_ideal_points],
[separation], [score], [rank]) for callers who want to inspect the intermediate values.

For a higher-level interface with named alternatives and criteria, see [builder::Builder].
The command line tool is described in the [manual].
*/

pub mod builder;
mod config;
pub mod manual;
mod matrix;

use log::{debug, info};

pub use crate::config::*;
pub use crate::matrix::DecisionMatrix;

/// Runs the full TOPSIS procedure.
///
/// Arguments:
/// * `matrix` the values of each criterion (columns) for each alternative (rows)
/// * `weights` one strictly positive weight per criterion
/// * `impacts` one impact per criterion
/// * `rules` the weight normalization and the tie policy for the ranks
///
/// The shape of the weights and impacts and the positivity of the weights are checked
/// before any computation.
pub fn run_topsis(
    matrix: &DecisionMatrix,
    weights: &[f64],
    impacts: &[Impact],
    rules: &TopsisRules,
) -> Result<TopsisResult, TopsisError> {
    info!(
        "Processing {:?} alternatives over {:?} criteria, rules: {:?}",
        matrix.num_rows(),
        matrix.num_cols(),
        rules
    );
    check_weights(weights, matrix.num_cols())?;
    check_len("impacts", impacts.len(), matrix.num_cols())?;

    let normalized = normalize(matrix)?;
    let weighted = weight(&normalized, weights, rules.weight_normalization)?;
    debug!("run_topsis: weighted matrix: {:?}", weighted.to_rows());

    let (ideal_best, ideal_worst) = derive_ideal_points(&weighted, impacts)?;
    debug!(
        "run_topsis: ideal best: {:?} ideal worst: {:?}",
        ideal_best, ideal_worst
    );

    let (dist_best, dist_worst) = separation(&weighted, &ideal_best, &ideal_worst)?;
    let closeness = score(&dist_best, &dist_worst)?;
    let ranks = rank(&closeness, rules.tie_mode);
    debug!("run_topsis: closeness: {:?} ranks: {:?}", closeness, ranks);

    let scores = closeness
        .iter()
        .zip(ranks.iter())
        .map(|(&closeness, &rank)| ScoreResult { closeness, rank })
        .collect();
    Ok(TopsisResult {
        scores,
        ideal_best,
        ideal_worst,
    })
}

/// Divides each column by its Euclidean norm.
///
/// Fails with [TopsisError::DegenerateCriterion] if a column only contains zeros.
pub fn normalize(matrix: &DecisionMatrix) -> Result<DecisionMatrix, TopsisError> {
    let mut norms: Vec<f64> = Vec::with_capacity(matrix.num_cols());
    for column in 0..matrix.num_cols() {
        let norm = euclidean_norm(matrix.column(column));
        // An infinite norm would also turn the whole column into zeros.
        if norm == 0.0 || !norm.is_finite() {
            return Err(TopsisError::DegenerateCriterion { column });
        }
        norms.push(norm);
    }
    debug!("normalize: column norms: {:?}", norms);
    Ok(matrix.map_columns(|col, x| x / norms[col]))
}

/// Multiplies each column by the weight of its criterion.
pub fn weight(
    normalized: &DecisionMatrix,
    weights: &[f64],
    policy: WeightNormalization,
) -> Result<DecisionMatrix, TopsisError> {
    check_weights(weights, normalized.num_cols())?;
    let effective: Vec<f64> = match policy {
        WeightNormalization::Raw => weights.to_vec(),
        WeightNormalization::SumToOne => {
            let total: f64 = weights.iter().sum();
            weights.iter().map(|w| w / total).collect()
        }
    };
    debug!("weight: effective weights: {:?}", effective);
    Ok(normalized.map_columns(|col, x| x * effective[col]))
}

/// Returns the ideal best and the ideal worst points of a weighted matrix.
///
/// For a benefit criterion, the best value is the maximum of the column and the worst value
/// the minimum. The roles are swapped for a cost criterion.
pub fn derive_ideal_points(
    weighted: &DecisionMatrix,
    impacts: &[Impact],
) -> Result<(Vec<f64>, Vec<f64>), TopsisError> {
    check_len("impacts", impacts.len(), weighted.num_cols())?;
    let mut ideal_best: Vec<f64> = Vec::with_capacity(impacts.len());
    let mut ideal_worst: Vec<f64> = Vec::with_capacity(impacts.len());
    for (col, impact) in impacts.iter().enumerate() {
        let max = weighted.column(col).fold(f64::NEG_INFINITY, f64::max);
        let min = weighted.column(col).fold(f64::INFINITY, f64::min);
        match impact {
            Impact::Benefit => {
                ideal_best.push(max);
                ideal_worst.push(min);
            }
            Impact::Cost => {
                ideal_best.push(min);
                ideal_worst.push(max);
            }
        }
    }
    Ok((ideal_best, ideal_worst))
}

/// Computes, for each alternative, its Euclidean distance to the ideal best and to the
/// ideal worst points.
pub fn separation(
    weighted: &DecisionMatrix,
    ideal_best: &[f64],
    ideal_worst: &[f64],
) -> Result<(Vec<f64>, Vec<f64>), TopsisError> {
    check_len("ideal best values", ideal_best.len(), weighted.num_cols())?;
    check_len("ideal worst values", ideal_worst.len(), weighted.num_cols())?;
    let distance = |row: &[f64], point: &[f64]| {
        euclidean_norm(row.iter().zip(point.iter()).map(|(x, p)| x - p))
    };
    let dist_best = weighted.rows().map(|r| distance(r, ideal_best)).collect();
    let dist_worst = weighted.rows().map(|r| distance(r, ideal_worst)).collect();
    Ok((dist_best, dist_worst))
}

/// The relative closeness of each alternative: `worst / (best + worst)`.
///
/// Fails with [TopsisError::DegenerateSolution] when both distances of an alternative are
/// zero, which happens when all the alternatives are identical, and with
/// [TopsisError::NonFiniteDistance] when a distance or their sum is not finite.
pub fn score(dist_best: &[f64], dist_worst: &[f64]) -> Result<Vec<f64>, TopsisError> {
    check_len("worst distances", dist_worst.len(), dist_best.len())?;
    let mut res: Vec<f64> = Vec::with_capacity(dist_best.len());
    for (row, (&best, &worst)) in dist_best.iter().zip(dist_worst.iter()).enumerate() {
        let total = best + worst;
        if !total.is_finite() {
            return Err(TopsisError::NonFiniteDistance { row });
        }
        if total == 0.0 {
            return Err(TopsisError::DegenerateSolution { row });
        }
        res.push(worst / total);
    }
    Ok(res)
}

/// Ranks the closeness scores, 1 being the highest score.
///
/// Only scores that are exactly equal are considered tied. See [TieMode] for how the ties
/// are ranked. The scores must not contain NaN, which [score] never produces.
pub fn rank(closeness: &[f64], tie_mode: TieMode) -> Vec<u32> {
    debug_assert!(closeness.iter().all(|x| !x.is_nan()));
    let mut sorted: Vec<f64> = closeness.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    closeness
        .iter()
        .map(|&x| {
            let r = match tie_mode {
                // Number of values greater than or equal to x.
                TieMode::Max => sorted.partition_point(|&y| y >= x),
                // One plus the number of values strictly greater than x.
                TieMode::Min => sorted.partition_point(|&y| y > x) + 1,
            };
            r as u32
        })
        .collect()
}

fn check_len(what: &'static str, found: usize, expected: usize) -> Result<(), TopsisError> {
    if found != expected {
        return Err(TopsisError::DimensionMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

fn check_weights(weights: &[f64], num_criteria: usize) -> Result<(), TopsisError> {
    check_len("weights", weights.len(), num_criteria)?;
    for (column, &value) in weights.iter().enumerate() {
        if !(value > 0.0 && value.is_finite()) {
            return Err(TopsisError::NonPositiveWeight { column, value });
        }
    }
    Ok(())
}

// The values are scaled by the largest magnitude first so that squaring cannot overflow.
fn euclidean_norm<I>(values: I) -> f64
where
    I: Iterator<Item = f64> + Clone,
{
    let scale = values.clone().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let sum_sq: f64 = values.map(|x| (x / scale) * (x / scale)).sum();
    scale * sum_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn phones() -> DecisionMatrix {
        DecisionMatrix::new(&[
            vec![250.0, 16.0, 12.0, 5.0],
            vec![200.0, 16.0, 8.0, 3.0],
            vec![300.0, 32.0, 16.0, 4.0],
            vec![275.0, 32.0, 8.0, 4.0],
        ])
        .unwrap()
    }

    const PHONE_IMPACTS: [Impact; 4] = [
        Impact::Cost,
        Impact::Benefit,
        Impact::Benefit,
        Impact::Benefit,
    ];

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < EPS, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn phones_example() {
        let _ = env_logger::try_init();
        let res = run_topsis(
            &phones(),
            &[0.25, 0.25, 0.25, 0.25],
            &PHONE_IMPACTS,
            &TopsisRules::DEFAULT_RULES,
        )
        .unwrap();
        assert_close(
            &res.closeness(),
            &[
                0.4586600391552112,
                0.2667475159551103,
                0.67978390387488,
                0.46354773600413696,
            ],
        );
        assert_eq!(res.ranks(), vec![3, 4, 1, 2]);
        assert_close(
            &res.ideal_best,
            &[
                0.09656090991705352,
                0.15811388300841897,
                0.17407765595569785,
                0.1538643637241659,
            ],
        );
        assert_close(
            &res.ideal_worst,
            &[
                0.14484136487558028,
                0.07905694150420949,
                0.08703882797784893,
                0.09231861823449955,
            ],
        );
    }

    #[test]
    fn weight_policies_give_the_same_scores() {
        let raw = run_topsis(
            &phones(),
            &[1.0, 2.0, 3.0, 4.0],
            &PHONE_IMPACTS,
            &TopsisRules::DEFAULT_RULES,
        )
        .unwrap();
        let rules = TopsisRules {
            weight_normalization: WeightNormalization::SumToOne,
            ..TopsisRules::DEFAULT_RULES
        };
        let summed = run_topsis(&phones(), &[1.0, 2.0, 3.0, 4.0], &PHONE_IMPACTS, &rules).unwrap();
        assert_close(&raw.closeness(), &summed.closeness());
        assert_eq!(raw.ranks(), summed.ranks());
        // The ideal points live in the weighted space and differ by the sum of the weights.
        let scaled: Vec<f64> = summed.ideal_best.iter().map(|x| x * 10.0).collect();
        assert_close(&raw.ideal_best, &scaled);
    }

    #[test]
    fn normalize_columns() {
        let m = DecisionMatrix::new(&[vec![3.0, 1.0], vec![4.0, 0.0]]).unwrap();
        let n = normalize(&m).unwrap();
        assert_close(n.row(0), &[0.6, 1.0]);
        assert_close(n.row(1), &[0.8, 0.0]);
    }

    #[test]
    fn normalize_large_values() {
        let m = DecisionMatrix::new(&[vec![3e300], vec![4e300]]).unwrap();
        let n = normalize(&m).unwrap();
        assert_close(&n.column(0).collect::<Vec<f64>>(), &[0.6, 0.8]);
    }

    #[test]
    fn zero_column_is_degenerate() {
        let m = DecisionMatrix::new(&[vec![1.0, 0.0, 2.0], vec![2.0, 0.0, 1.0]]).unwrap();
        assert_eq!(
            normalize(&m),
            Err(TopsisError::DegenerateCriterion { column: 1 })
        );
        let res = run_topsis(
            &m,
            &[1.0, 1.0, 1.0],
            &[Impact::Benefit, Impact::Benefit, Impact::Cost],
            &TopsisRules::DEFAULT_RULES,
        );
        assert_eq!(res, Err(TopsisError::DegenerateCriterion { column: 1 }));
    }

    #[test]
    fn weights_are_applied_per_column() {
        let m = DecisionMatrix::new(&[vec![1.0, 1.0], vec![2.0, 3.0]]).unwrap();
        let w = weight(&m, &[2.0, 0.5], WeightNormalization::Raw).unwrap();
        assert_close(w.row(1), &[4.0, 1.5]);
        let w = weight(&m, &[3.0, 1.0], WeightNormalization::SumToOne).unwrap();
        assert_close(w.row(1), &[1.5, 0.75]);
    }

    #[test]
    fn weights_must_be_positive() {
        let m = DecisionMatrix::new(&[vec![1.0, 1.0]]).unwrap();
        assert_eq!(
            weight(&m, &[1.0, 0.0], WeightNormalization::Raw),
            Err(TopsisError::NonPositiveWeight {
                column: 1,
                value: 0.0
            })
        );
        assert_eq!(
            weight(&m, &[-1.0, 1.0], WeightNormalization::Raw),
            Err(TopsisError::NonPositiveWeight {
                column: 0,
                value: -1.0
            })
        );
    }

    #[test]
    fn ideal_points_follow_impacts() {
        let m = DecisionMatrix::new(&[vec![1.0, 5.0], vec![3.0, 2.0], vec![2.0, 4.0]]).unwrap();
        let (best, worst) = derive_ideal_points(&m, &[Impact::Benefit, Impact::Cost]).unwrap();
        assert_eq!(best, vec![3.0, 2.0]);
        assert_eq!(worst, vec![1.0, 5.0]);
    }

    #[test]
    fn separation_distances() {
        let m = DecisionMatrix::new(&[vec![0.0, 0.0], vec![3.0, 4.0]]).unwrap();
        let (best, worst) = separation(&m, &[3.0, 4.0], &[0.0, 0.0]).unwrap();
        assert_close(&best, &[5.0, 0.0]);
        assert_close(&worst, &[0.0, 5.0]);
    }

    #[test]
    fn score_values() {
        let s = score(&[1.0, 0.0, 3.0], &[1.0, 2.0, 1.0]).unwrap();
        assert_close(&s, &[0.5, 1.0, 0.25]);
        assert_eq!(
            score(&[1.0, 0.0], &[1.0, 0.0]),
            Err(TopsisError::DegenerateSolution { row: 1 })
        );
    }

    #[test]
    fn overflowing_distances_are_reported() {
        let m = DecisionMatrix::new(&[vec![-1.0, 1.0], vec![1.0, 2.0], vec![1.0, 3.0]]).unwrap();
        let res = run_topsis(
            &m,
            &[f64::MAX, 1.0],
            &[Impact::Benefit, Impact::Benefit],
            &TopsisRules::DEFAULT_RULES,
        );
        assert_eq!(res, Err(TopsisError::NonFiniteDistance { row: 0 }));
        assert!(res.unwrap_err().is_degenerate());
        assert_eq!(
            score(&[1.0, f64::MAX], &[1.0, f64::MAX]),
            Err(TopsisError::NonFiniteDistance { row: 1 })
        );
    }

    #[test]
    fn single_alternative_is_degenerate() {
        let m = DecisionMatrix::new(&[vec![1.0, 2.0]]).unwrap();
        let res = run_topsis(
            &m,
            &[1.0, 1.0],
            &[Impact::Benefit, Impact::Cost],
            &TopsisRules::DEFAULT_RULES,
        );
        assert_eq!(res, Err(TopsisError::DegenerateSolution { row: 0 }));
    }

    #[test]
    fn rank_max_ties() {
        assert_eq!(rank(&[0.9, 0.5, 0.5, 0.1], TieMode::Max), vec![1, 3, 3, 4]);
        assert_eq!(rank(&[0.5, 0.5, 0.5], TieMode::Max), vec![3, 3, 3]);
        assert_eq!(rank(&[0.2, 0.7, 0.4], TieMode::Max), vec![3, 1, 2]);
    }

    #[test]
    fn rank_min_ties() {
        assert_eq!(rank(&[0.9, 0.5, 0.5, 0.1], TieMode::Min), vec![1, 2, 2, 4]);
        assert_eq!(rank(&[0.5, 0.5, 0.5], TieMode::Min), vec![1, 1, 1]);
    }

    #[test]
    fn identical_rows_share_a_rank() {
        let m = DecisionMatrix::new(&[
            vec![250.0, 16.0, 12.0],
            vec![200.0, 16.0, 8.0],
            vec![200.0, 16.0, 8.0],
            vec![300.0, 32.0, 16.0],
        ])
        .unwrap();
        let impacts = [Impact::Cost, Impact::Benefit, Impact::Benefit];
        let res = run_topsis(&m, &[1.0, 1.0, 1.0], &impacts, &TopsisRules::DEFAULT_RULES).unwrap();
        let ranks = res.ranks();
        assert_eq!(res.scores[1].closeness, res.scores[2].closeness);
        assert_eq!(ranks[1], ranks[2]);
        // Rows 1 and 2 are the cheapest but the weakest: the tie is at the bottom.
        assert_eq!(ranks, vec![2, 4, 4, 1]);
    }

    #[test]
    fn mismatched_lengths() {
        let m = phones();
        assert_eq!(
            run_topsis(&m, &[1.0, 1.0], &PHONE_IMPACTS, &TopsisRules::DEFAULT_RULES),
            Err(TopsisError::DimensionMismatch {
                what: "weights",
                expected: 4,
                found: 2
            })
        );
        assert_eq!(
            run_topsis(
                &m,
                &[1.0, 1.0, 1.0, 1.0],
                &PHONE_IMPACTS[..3],
                &TopsisRules::DEFAULT_RULES
            ),
            Err(TopsisError::DimensionMismatch {
                what: "impacts",
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn error_messages_name_the_element() {
        let e = TopsisError::DegenerateCriterion { column: 2 };
        assert!(e.is_degenerate());
        assert!(e.to_string().contains("criterion 2"));
        let e = TopsisError::DimensionMismatch {
            what: "weights",
            expected: 4,
            found: 3,
        };
        assert!(!e.is_degenerate());
        assert_eq!(
            e.to_string(),
            "number of weights (3) must equal the number of criteria (4)"
        );
    }
}
