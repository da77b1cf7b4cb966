// Square matrix buffers used as kernel operands.

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{MatrixError, Result};

/// An owned `n x n` matrix of doubles in row-major order, so element
/// `(i, j)` lives at offset `i * n + j` of [`Matrix::as_slice`].
///
/// The storage is released when the matrix is dropped, on every exit path.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Array2<f64>,
}

impl Matrix {
    /// Allocates a zero-filled `n x n` matrix.
    ///
    /// Fails instead of aborting if the allocator cannot provide the storage.
    pub fn allocate(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(MatrixError::EmptyDimension);
        }
        let len = n.checked_mul(n).ok_or(MatrixError::TooLarge { n })?;

        let mut storage: Vec<f64> = Vec::new();
        storage
            .try_reserve_exact(len)
            .map_err(|source| MatrixError::Allocation { n, source })?;
        storage.resize(len, 0.0);

        let data = Array2::from_shape_vec((n, n), storage)?;
        Ok(Self { data })
    }

    /// The `A` operand: every element is `1.0`.
    pub fn ones(n: usize) -> Result<Self> {
        let mut matrix = Self::allocate(n)?;
        matrix.fill_ones();
        Ok(matrix)
    }

    /// The `B` operand: every element of row `k` is `k + 1`.
    pub fn row_constant(n: usize) -> Result<Self> {
        let mut matrix = Self::allocate(n)?;
        matrix.fill_row_constant();
        Ok(matrix)
    }

    pub fn fill_ones(&mut self) {
        self.data.fill(1.0);
    }

    pub fn fill_row_constant(&mut self) {
        for (k, mut row) in self.data.rows_mut().into_iter().enumerate() {
            row.fill((k + 1) as f64);
        }
    }

    pub fn zero(&mut self) {
        self.data.fill(0.0);
    }

    /// Side length of the matrix.
    pub fn dim(&self) -> usize {
        self.data.nrows()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.data.row(i)
    }

    /// The first `min(count, n)` elements of row 0, a cheap look at the
    /// result without printing the whole matrix.
    pub fn first_row_projection(&self, count: usize) -> Vec<f64> {
        self.data.row(0).iter().take(count).copied().collect()
    }

    pub fn as_slice(&self) -> &[f64] {
        // storage is always built in standard layout, never transposed
        self.data.as_slice().expect("matrix storage is row-major")
    }

    pub fn as_slice_mut(&mut self) -> &mut [f64] {
        self.data.as_slice_mut().expect("matrix storage is row-major")
    }
}

/// The three buffers of one run: `C = A x B`.
///
/// `C` starts zeroed, which the accumulating kernels require and the naive
/// kernel ignores.
#[derive(Debug)]
pub struct Operands {
    pub a: Matrix,
    pub b: Matrix,
    pub c: Matrix,
}

impl Operands {
    pub fn allocate(n: usize) -> Result<Self> {
        Ok(Self {
            a: Matrix::ones(n)?,
            b: Matrix::row_constant(n)?,
            c: Matrix::allocate(n)?,
        })
    }

    pub fn dim(&self) -> usize {
        self.a.dim()
    }
}

/// Every entry of `A x B` for the operands built by [`Operands::allocate`]:
/// `sum over k of (k + 1) = n(n + 1)/2`.
pub fn expected_entry(n: usize) -> f64 {
    (n * (n + 1) / 2) as f64
}
