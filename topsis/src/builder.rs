pub use crate::config::*;
use crate::{run_topsis, DecisionMatrix};

/// A named criterion, with its weight and its impact.
#[derive(PartialEq, Debug, Clone)]
pub struct Criterion {
    pub name: String,
    pub weight: f64,
    pub impact: Impact,
}

/// The result for one named alternative.
#[derive(PartialEq, Debug, Clone)]
pub struct RankedAlternative {
    pub name: String,
    pub closeness: f64,
    pub rank: u32,
}

/// A builder for ranking named alternatives.
///
/// The names of the alternatives are only carried to the output, they play no role in
/// the computation. Several alternatives may share the same name.
///
/// ```
/// use topsis::builder::Builder;
/// use topsis::{Impact, TopsisError, TopsisRules};
///
/// let mut builder = Builder::new(&TopsisRules::DEFAULT_RULES)
///     .criterion("price", 1.0, Impact::Cost)
///     .criterion("storage", 1.0, Impact::Benefit);
///
/// builder.add_alternative("basic", &[200.0, 16.0])?;
/// builder.add_alternative("pro", &[300.0, 64.0])?;
///
/// let ranked = builder.run()?;
/// assert_eq!(ranked[1].name, "pro");
/// assert_eq!(ranked[1].rank, 1);
///
/// # Ok::<(), TopsisError>(())
/// ```
pub struct Builder {
    pub(crate) _rules: TopsisRules,
    pub(crate) _criteria: Vec<Criterion>,
    pub(crate) _names: Vec<String>,
    pub(crate) _rows: Vec<Vec<f64>>,
}

impl Builder {
    pub fn new(rules: &TopsisRules) -> Builder {
        Builder {
            _rules: rules.clone(),
            _criteria: Vec::new(),
            _names: Vec::new(),
            _rows: Vec::new(),
        }
    }

    /// Appends a criterion. The values of the alternatives follow the order in which the
    /// criteria are declared.
    pub fn criterion(mut self, name: &str, weight: f64, impact: Impact) -> Builder {
        self._criteria.push(Criterion {
            name: name.to_string(),
            weight,
            impact,
        });
        self
    }

    pub fn criteria(mut self, criteria: &[Criterion]) -> Builder {
        self._criteria.extend_from_slice(criteria);
        self
    }

    /// Adds an alternative with one value per declared criterion.
    pub fn add_alternative(&mut self, name: &str, values: &[f64]) -> Result<(), TopsisError> {
        if values.len() != self._criteria.len() {
            return Err(TopsisError::DimensionMismatch {
                what: "values",
                expected: self._criteria.len(),
                found: values.len(),
            });
        }
        self._names.push(name.to_string());
        self._rows.push(values.to_vec());
        Ok(())
    }

    /// Ranks the alternatives. The output is in the order in which the alternatives were added.
    pub fn run(&self) -> Result<Vec<RankedAlternative>, TopsisError> {
        let matrix = DecisionMatrix::new(&self._rows)?;
        let weights: Vec<f64> = self._criteria.iter().map(|c| c.weight).collect();
        let impacts: Vec<Impact> = self._criteria.iter().map(|c| c.impact).collect();
        let res = run_topsis(&matrix, &weights, &impacts, &self._rules)?;
        Ok(self
            ._names
            .iter()
            .zip(res.scores.iter())
            .map(|(name, s)| RankedAlternative {
                name: name.clone(),
                closeness: s.closeness,
                rank: s.rank,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_carried_through() {
        let mut builder = Builder::new(&TopsisRules::DEFAULT_RULES).criteria(&[
            Criterion {
                name: "price".to_string(),
                weight: 0.25,
                impact: Impact::Cost,
            },
            Criterion {
                name: "storage".to_string(),
                weight: 0.25,
                impact: Impact::Benefit,
            },
            Criterion {
                name: "camera".to_string(),
                weight: 0.25,
                impact: Impact::Benefit,
            },
            Criterion {
                name: "looks".to_string(),
                weight: 0.25,
                impact: Impact::Benefit,
            },
        ]);
        builder.add_alternative("M1", &[250.0, 16.0, 12.0, 5.0]).unwrap();
        builder.add_alternative("M2", &[200.0, 16.0, 8.0, 3.0]).unwrap();
        builder.add_alternative("M3", &[300.0, 32.0, 16.0, 4.0]).unwrap();
        builder.add_alternative("M4", &[275.0, 32.0, 8.0, 4.0]).unwrap();
        let res = builder.run().unwrap();
        let names: Vec<&str> = res.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["M1", "M2", "M3", "M4"]);
        let ranks: Vec<u32> = res.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![3, 4, 1, 2]);
    }

    #[test]
    fn wrong_number_of_values() {
        let mut builder =
            Builder::new(&TopsisRules::DEFAULT_RULES).criterion("a", 1.0, Impact::Benefit);
        assert_eq!(
            builder.add_alternative("x", &[1.0, 2.0]),
            Err(TopsisError::DimensionMismatch {
                what: "values",
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn no_alternatives() {
        let builder =
            Builder::new(&TopsisRules::DEFAULT_RULES).criterion("a", 1.0, Impact::Benefit);
        assert_eq!(builder.run(), Err(TopsisError::EmptyMatrix));
    }
}
