#[cfg(test)]
mod tests;

pub mod error;
pub mod matrix;

// Home of the square matrix multiplication kernels.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

pub use error::{MatrixError, Result};
pub use matrix::{Matrix, Operands, expected_entry};

/// Block size used when none is given on the command line.
pub const DEFAULT_BLOCK_SIZE: NonZeroUsize = NonZeroUsize::new(128).unwrap();

/// Textbook `i-j-k` product.
///
/// The reduction over `k` is kept in a local accumulator and written to
/// `C[i, j]` once, so `c` does not need to be zeroed. `B` is walked down its
/// columns with stride `n`, which makes this the cache-unfriendly baseline.
///
/// __Arguments:__
///
/// + `a`, `b` - row-major `n x n` operands
///
/// + `c` - row-major `n x n` output, overwritten
///
/// + `n` - side length of all three matrices
///
pub fn multiply_naive(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += a[i * n + k] * b[k * n + j];
            }
            c[i * n + j] = sum;
        }
    }
}

/// Row-oriented `i-k-j` product.
///
/// `A[i, k]` is loaded once and scaled across row `k` of `B` into row `i` of
/// `C`, so both `B` and `C` are walked contiguously. Each `C[i, j]` is built
/// up over all `k`, so `c` must be zeroed beforehand.
pub fn multiply_row_order(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    for i in 0..n {
        for k in 0..n {
            let a_ik = a[i * n + k];
            for j in 0..n {
                c[i * n + j] += a_ik * b[k * n + j];
            }
        }
    }
}

/// Cache-blocked product.
///
/// The `i`, `j` and `k` ranges are cut into cubes of side `block_size` so the
/// slices of `A`, `B` and `C` touched by one block can stay resident in cache.
/// Inside a block the loops run in the same `i-k-j` order as
/// [`multiply_row_order`]. Block ends are clamped to `n`, so `n` need not be
/// a multiple of the block size, and a block size of `n` or more is a single
/// block spanning the whole matrix.
///
/// `c` must be zeroed beforehand.
pub fn multiply_blocked(a: &[f64], b: &[f64], c: &mut [f64], n: usize, block_size: NonZeroUsize) {
    let bs = block_size.get();

    for i0 in (0..n).step_by(bs) {
        let i_max = (i0 + bs).min(n);
        for j0 in (0..n).step_by(bs) {
            let j_max = (j0 + bs).min(n);
            for k0 in (0..n).step_by(bs) {
                let k_max = (k0 + bs).min(n);

                for i in i0..i_max {
                    for k in k0..k_max {
                        let a_ik = a[i * n + k];
                        for j in j0..j_max {
                            c[i * n + j] += a_ik * b[k * n + j];
                        }
                    }
                }
            }
        }
    }
}

/// Method selector as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Standard,
    Line,
    Block,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Standard, Method::Line, Method::Block];

    pub fn name(self) -> &'static str {
        match self {
            Method::Standard => "standard",
            Method::Line => "line",
            Method::Block => "block",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| MatrixError::UnknownMethod(s.to_owned()))
    }
}

/// One multiplication strategy, ready to apply to a set of operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    Naive,
    RowOrder,
    Blocked { block_size: NonZeroUsize },
}

impl Kernel {
    /// The block size only matters for [`Method::Block`].
    pub fn new(method: Method, block_size: NonZeroUsize) -> Self {
        match method {
            Method::Standard => Kernel::Naive,
            Method::Line => Kernel::RowOrder,
            Method::Block => Kernel::Blocked { block_size },
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Kernel::Naive => Method::Standard,
            Kernel::RowOrder => Method::Line,
            Kernel::Blocked { .. } => Method::Block,
        }
    }

    pub fn block_size(&self) -> Option<NonZeroUsize> {
        match self {
            Kernel::Blocked { block_size } => Some(*block_size),
            _ => None,
        }
    }

    /// Whether `C` has to start at zero because the kernel accumulates into it.
    pub fn accumulates(&self) -> bool {
        !matches!(self, Kernel::Naive)
    }

    /// Computes `c = a x b` (accumulating kernels add to `c`).
    pub fn apply(&self, a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
        let n = a.dim();
        for actual in [b.dim(), c.dim()] {
            if actual != n {
                return Err(MatrixError::DimensionMismatch { expected: n, actual });
            }
        }

        let (a, b, c) = (a.as_slice(), b.as_slice(), c.as_slice_mut());
        match *self {
            Kernel::Naive => multiply_naive(a, b, c, n),
            Kernel::RowOrder => multiply_row_order(a, b, c, n),
            Kernel::Blocked { block_size } => multiply_blocked(a, b, c, n, block_size),
        }
        Ok(())
    }

    /// Allocates a zeroed output and multiplies into it.
    pub fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        let mut c = Matrix::allocate(a.dim())?;
        self.apply(a, b, &mut c)?;
        Ok(c)
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kernel::Blocked { block_size } => write!(f, "block (size {block_size})"),
            other => write!(f, "{}", other.method()),
        }
    }
}
