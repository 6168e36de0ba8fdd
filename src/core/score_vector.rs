//! Per-pass score lookup table.
//!
//! One row per residue id, one column per translated query position:
//! `row(r)[q] = matrix[r][query[q]]`. Built once at the start of a pass so
//! the scanner's inner loop reads a slice instead of the matrix. The
//! reserved non-residue row holds a single constant, the matrix self-score
//! of the residue id just below the reserved one, not per-column lookups.

use crate::core::matrix::SubstitutionMatrix;

#[derive(Debug)]
pub struct ScoreVector {
    rows: usize,
    positions: usize,
    data: Vec<i32>,
}

impl ScoreVector {
    /// `query` holds residue ids for the current pass; `non_residue` is the
    /// alphabet's reserved id.
    pub fn build(query: &[u8], matrix: &SubstitutionMatrix, non_residue: u8) -> Self {
        let rows = matrix.size();
        let positions = query.len();
        let mut data = vec![0i32; rows * positions];
        for r in 0..rows {
            let row = &mut data[r * positions..(r + 1) * positions];
            if r == non_residue as usize {
                let fill = matrix.score(non_residue - 1, non_residue - 1);
                row.fill(fill);
            } else {
                for (col, &q) in query.iter().enumerate() {
                    row[col] = matrix.score(r as u8, q);
                }
            }
        }
        Self {
            rows,
            positions,
            data,
        }
    }

    /// Number of query positions in this pass.
    pub fn positions(&self) -> usize {
        self.positions
    }

    #[inline(always)]
    pub fn row(&self, residue: u8) -> &[i32] {
        let r = residue as usize;
        debug_assert!(r < self.rows);
        &self.data[r * self.positions..(r + 1) * self.positions]
    }
}
