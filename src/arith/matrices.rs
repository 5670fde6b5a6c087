//! Matrices over GF(2^n) and the Gauss-Jordan recovery solve.

use super::gf2n::Field;
use super::rows::Row;

/// A height x width rectangle of field elements, stored by rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    field: &'static Field,
    rows: Vec<Row>,
}

impl Matrix {
    /// A matrix of zeros.
    pub fn zero(field: &'static Field, height: usize, width: usize) -> Matrix {
        Matrix {
            field,
            rows: (0..height).map(|_| Row::zero(field, width)).collect(),
        }
    }

    pub fn from_rows(field: &'static Field, rows: Vec<Row>) -> Matrix {
        debug_assert!(rows.iter().all(|r| r.width() == rows[0].width()));
        Matrix { field, rows }
    }

    /// The Vandermonde matrix on the given share indexes:
    /// `M[i][j] = indexes[i]^j`, each index embedded as the element
    /// with that little-endian encoding. Distinct indexes make every
    /// square submatrix on chosen rows invertible, which is what lets
    /// any satisfying participant set reconstruct.
    pub fn vandermonde(field: &'static Field, indexes: &[usize], width: usize) -> Matrix {
        let rows = indexes
            .iter()
            .map(|&index| {
                let base = field.index_elem(index);
                Row::from_elems(field, (0..width).map(|j| base.pow(j)).collect())
            })
            .collect();
        Matrix { field, rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows[0].width()
    }

    pub fn row(&self, i: usize) -> &Row {
        &self.rows[i]
    }

    /// Right-multiplies by a row vector: out[i] = rows[i] . r.
    pub fn mul(&self, r: &Row) -> Row {
        let elems = self.rows.iter().map(|row| row.dot(r)).collect();
        Row::from_elems(self.field, elems)
    }

    /// Finds the row vector r with r . M = (1, 0, 0, ...), or `None`
    /// when the system is rank-deficient for that target.
    ///
    /// Gauss-Jordan with partial pivoting, run on a transposed copy so
    /// the input is never mutated. For a tall matrix the loop finishes
    /// after `width` pivots and the untouched target entries stay zero,
    /// which is exactly the padded solution.
    pub fn recovery(&self) -> Option<Row> {
        let (height, width) = (self.height(), self.width());

        // The target vector e1; reduced in lockstep with the pivots.
        let mut aug = Row::zero(self.field, height);
        aug[0] = self.field.one();

        let mut f = self.transposed();

        let pivots = width.min(height);
        for i in 0..pivots {
            // First row at or below the diagonal with a usable pivot.
            let pivot = (i..pivots).find(|&j| !f.rows[j][i].is_zero())?;
            f.rows.swap(i, pivot);
            aug.swap(i, pivot);

            // Normalize the pivot to one.
            let inv = f.rows[i][i].invert();
            f.rows[i].scale_assign(&inv);
            aug[i] = aug[i].mul(&inv);

            // Cancel the pivot column above and below.
            for k in 0..pivots {
                if k == i || f.rows[k][i].is_zero() {
                    continue;
                }
                let c = f.rows[k][i].clone();
                let scaled = f.rows[i].scale(&c);
                f.rows[k].add_assign(&scaled);
                let cancel = aug[i].mul(&c);
                aug[k].add_assign(&cancel);
            }
        }

        Some(aug)
    }

    fn transposed(&self) -> Matrix {
        let (height, width) = (self.height(), self.width());
        let mut f = Matrix::zero(self.field, width, height);
        for i in 0..height {
            for j in 0..width {
                f.rows[j][i] = self.rows[i][j].clone();
            }
        }
        f
    }
}
