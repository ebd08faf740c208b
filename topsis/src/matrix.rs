use crate::config::TopsisError;

/// A dense matrix of criterion values: one row per alternative, one column per criterion.
///
/// Invariant: at least one row and one column, all values finite.
#[derive(PartialEq, Debug, Clone)]
pub struct DecisionMatrix {
    num_rows: usize,
    num_cols: usize,
    // Row-major storage.
    values: Vec<f64>,
}

impl DecisionMatrix {
    /// Builds a matrix from its rows, checking that it is rectangular, non-empty and finite.
    pub fn new(rows: &[Vec<f64>]) -> Result<DecisionMatrix, TopsisError> {
        let num_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if num_cols == 0 {
            return Err(TopsisError::EmptyMatrix);
        }
        let mut values: Vec<f64> = Vec::with_capacity(rows.len() * num_cols);
        for (row, r) in rows.iter().enumerate() {
            if r.len() != num_cols {
                return Err(TopsisError::RaggedRow {
                    row,
                    expected: num_cols,
                    found: r.len(),
                });
            }
            if let Some(column) = r.iter().position(|x| !x.is_finite()) {
                return Err(TopsisError::NonFiniteValue { row, column });
            }
            values.extend_from_slice(r);
        }
        Ok(DecisionMatrix {
            num_rows: rows.len(),
            num_cols,
            values,
        })
    }

    // Internal constructor for the intermediate matrices, which keep the shape of their input.
    pub(crate) fn from_parts(num_rows: usize, num_cols: usize, values: Vec<f64>) -> DecisionMatrix {
        assert_eq!(num_rows * num_cols, values.len());
        DecisionMatrix {
            num_rows,
            num_cols,
            values,
        }
    }

    /// The number of alternatives.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// The number of criteria.
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.num_cols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.num_cols..(row + 1) * self.num_cols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + Clone {
        self.values.chunks(self.num_cols)
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + Clone + '_ {
        self.rows().map(move |r| r[col])
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(|r| r.to_vec()).collect()
    }

    /// Applies a function to every value, with the index of its column.
    pub(crate) fn map_columns<F>(&self, f: F) -> DecisionMatrix
    where
        F: Fn(usize, f64) -> f64,
    {
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(idx, x)| f(idx % self.num_cols, *x))
            .collect();
        DecisionMatrix::from_parts(self.num_rows, self.num_cols, values)
    }
}
