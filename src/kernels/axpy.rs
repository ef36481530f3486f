//! Strided vector primitives: `y += alpha * x` and `y = x`
//!
//! Both follow the BLAS level-1 calling shape (`n`, then each vector with
//! its increment) so callers can walk rows or columns of a dense buffer
//! without building an intermediate slice.

use crate::scalar::Scalar;

/// Computes `y[k * incy] += alpha * x[k * incx]` for `k` in `0..n`
///
/// # Arguments
///
/// * `n` - Number of elements to update
/// * `alpha` - Scale applied to `x`
/// * `x` - Source buffer, read at multiples of `incx`
/// * `incx` - Step between consecutive source elements (at least 1)
/// * `y` - Destination buffer, updated at multiples of `incy`
/// * `incy` - Step between consecutive destination elements (at least 1)
///
/// # Panics
///
/// Panics if either buffer is too short for `n` elements at its increment
#[inline]
pub fn axpy<T: Scalar>(n: usize, alpha: T, x: &[T], incx: usize, y: &mut [T], incy: usize) {
    if n == 0 {
        return;
    }

    if incx == 1 && incy == 1 {
        let (x, y) = (&x[..n], &mut y[..n]);
        if alpha == T::one() {
            for (yk, &xk) in y.iter_mut().zip(x) {
                *yk += xk;
            }
        } else {
            for (yk, &xk) in y.iter_mut().zip(x) {
                *yk += alpha * xk;
            }
        }
        return;
    }

    assert!(
        (n - 1) * incx < x.len() && (n - 1) * incy < y.len(),
        "Strided buffers too short for {} elements",
        n
    );
    for k in 0..n {
        y[k * incy] += alpha * x[k * incx];
    }
}

/// Computes `y[k * incy] = x[k * incx]` for `k` in `0..n`
///
/// # Panics
///
/// Panics if either buffer is too short for `n` elements at its increment
#[inline]
pub fn copy<T: Copy>(n: usize, x: &[T], incx: usize, y: &mut [T], incy: usize) {
    if n == 0 {
        return;
    }

    if incx == 1 && incy == 1 {
        y[..n].copy_from_slice(&x[..n]);
        return;
    }

    assert!(
        (n - 1) * incx < x.len() && (n - 1) * incy < y.len(),
        "Strided buffers too short for {} elements",
        n
    );
    for k in 0..n {
        y[k * incy] = x[k * incx];
    }
}
