//! Element types accepted by the product kernels
//!
//! Dense operands and results are generic over [`Scalar`] (`f64` and `f32`).
//! Vectors multiplied against a sparse matrix may additionally hold integer or
//! logical elements; those go through [`VectorElement`], which promotes each
//! element to a floating-point result type and reports missing-value sentinels.

use num_traits::Float;
use std::fmt::Debug;
use std::ops::AddAssign;

/// Missing-value sentinel for integer vectors
pub const NA_INTEGER: i32 = i32::MIN;

/// Missing-value sentinel for logical vectors
pub const NA_LOGICAL: i32 = i32::MIN;

const NA_REAL_BITS: u64 = 0x7FF0_0000_0000_07A2;

/// The double-precision missing value, a NaN carrying payload 1954
#[inline]
pub fn na_real() -> f64 {
    f64::from_bits(NA_REAL_BITS)
}

/// Whether `x` is exactly the [`na_real`] bit pattern
#[inline]
pub fn is_na_real(x: f64) -> bool {
    x.to_bits() == NA_REAL_BITS
}

/// Floating-point element type of a dense operand or result
pub trait Scalar: Float + AddAssign + Default + Debug + Send + Sync + 'static {
    /// Short type name used in log records
    const NAME: &'static str;

    /// Converts from double precision, rounding if needed
    fn cast_from(v: f64) -> Self;

    /// Converts to double precision without loss
    fn widen(self) -> f64;

    /// Value written to a result slot whose inputs contained a missing element
    fn missing() -> Self;
}

impl Scalar for f64 {
    const NAME: &'static str = "f64";

    #[inline]
    fn cast_from(v: f64) -> Self {
        v
    }

    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn missing() -> Self {
        na_real()
    }
}

impl Scalar for f32 {
    const NAME: &'static str = "f32";

    #[inline]
    fn cast_from(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }

    #[inline]
    fn missing() -> Self {
        f32::NAN
    }
}

/// Element of a dense or sparse vector multiplied against a sparse matrix
pub trait VectorElement: Copy + Debug + Send + Sync + 'static {
    /// Result type of a product involving this element
    type Output: Scalar;

    /// The numeric value this element contributes, or `None` when it is the
    /// missing-value sentinel of its type
    fn promote(self) -> Option<Self::Output>;
}

impl VectorElement for f64 {
    type Output = f64;

    #[inline]
    fn promote(self) -> Option<f64> {
        Some(self)
    }
}

impl VectorElement for f32 {
    type Output = f32;

    #[inline]
    fn promote(self) -> Option<f32> {
        Some(self)
    }
}

impl VectorElement for i32 {
    type Output = f64;

    #[inline]
    fn promote(self) -> Option<f64> {
        if self == NA_INTEGER {
            None
        } else {
            Some(self as f64)
        }
    }
}

/// Three-valued logical element: false (0), true (any other value) or missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Logical(pub i32);

impl Logical {
    pub const FALSE: Logical = Logical(0);
    pub const TRUE: Logical = Logical(1);
    pub const NA: Logical = Logical(NA_LOGICAL);

    pub fn is_na(self) -> bool {
        self.0 == NA_LOGICAL
    }
}

impl From<bool> for Logical {
    fn from(b: bool) -> Self {
        if b {
            Logical::TRUE
        } else {
            Logical::FALSE
        }
    }
}

impl VectorElement for Logical {
    type Output = f64;

    #[inline]
    fn promote(self) -> Option<f64> {
        if self.is_na() {
            None
        } else if self.0 != 0 {
            Some(1.0)
        } else {
            Some(0.0)
        }
    }
}
