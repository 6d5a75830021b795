use ndarray::{Array1, Array2, ArrayBase, Data, Ix1, Ix2};
use num_complex::Complex;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Error {
    NotPositiveDefinite,
}

// Pivots at or below this fraction of the largest diagonal entry of the
// input matrix are treated as zero.
const RELATIVE_PIVOT_THRESHOLD: f64 = 1e-9;

// Cholesky factorization M = L·Lᴴ of a Hermitian positive-definite matrix,
// with L lower triangular and a real positive diagonal. Solves reuse the
// factor, so the inverse of M is never formed explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Cholesky {
    l: Array2<Complex<f64>>,
}

impl Cholesky {
    pub fn new<S>(m: &ArrayBase<S, Ix2>) -> Result<Cholesky, Error>
    where
        S: Data<Elem = Complex<f64>>,
    {
        let n = m.nrows();
        assert_eq!(m.ncols(), n);
        let max_diag = (0..n).map(|j| m[[j, j]].re).fold(0.0_f64, f64::max);
        let threshold = max_diag * RELATIVE_PIVOT_THRESHOLD;
        let mut l: Array2<Complex<f64>> = Array2::zeros((n, n));
        for j in 0..n {
            let mut d = m[[j, j]].re;
            for k in 0..j {
                d -= l[[j, k]].norm_sqr();
            }
            // A NaN pivot also fails this test
            if !(d > threshold) {
                return Err(Error::NotPositiveDefinite);
            }
            l[[j, j]] = Complex::new(d.sqrt(), 0.0);
            for i in (j + 1)..n {
                let mut s = m[[i, j]];
                for k in 0..j {
                    s -= l[[i, k]] * l[[j, k]].conj();
                }
                l[[i, j]] = s / l[[j, j]];
            }
        }
        Ok(Cholesky { l })
    }

    // Solves M x = b
    pub fn solve<S>(&self, b: &ArrayBase<S, Ix1>) -> Array1<Complex<f64>>
    where
        S: Data<Elem = Complex<f64>>,
    {
        let n = self.l.nrows();
        assert_eq!(b.len(), n);
        let mut x = b.to_owned();
        // Forward substitution L u = b
        for i in 0..n {
            for k in 0..i {
                let t = self.l[[i, k]] * x[k];
                x[i] -= t;
            }
            x[i] /= self.l[[i, i]];
        }
        // Backward substitution Lᴴ x = u
        for i in (0..n).rev() {
            for k in (i + 1)..n {
                let t = self.l[[k, i]].conj() * x[k];
                x[i] -= t;
            }
            x[i] /= self.l[[i, i]];
        }
        x
    }

    // Solves M X = B column by column
    pub fn solve_matrix<S>(&self, b: &ArrayBase<S, Ix2>) -> Array2<Complex<f64>>
    where
        S: Data<Elem = Complex<f64>>,
    {
        let mut x: Array2<Complex<f64>> = Array2::zeros(b.dim());
        for (j, col) in b.columns().into_iter().enumerate() {
            x.column_mut(j).assign(&self.solve(&col));
        }
        x
    }

    // Returns the diagonal of M⁻¹. Since M⁻¹ = L⁻ᴴ·L⁻¹, the t-th diagonal
    // entry equals ‖L⁻¹·eₜ‖², so only forward substitutions are needed.
    pub fn inverse_diagonal(&self) -> Array1<f64> {
        let n = self.l.nrows();
        let mut diag: Array1<f64> = Array1::zeros(n);
        let mut v: Array1<Complex<f64>> = Array1::zeros(n);
        for t in 0..n {
            // Entries before t stay zero under forward substitution on eₜ
            for x in v.iter_mut() {
                *x = Complex::new(0.0, 0.0);
            }
            v[t] = Complex::new(1.0, 0.0);
            for i in t..n {
                for k in t..i {
                    let u = self.l[[i, k]] * v[k];
                    v[i] -= u;
                }
                v[i] /= self.l[[i, i]];
            }
            diag[t] = v.iter().map(|x| x.norm_sqr()).sum();
        }
        diag
    }
}
