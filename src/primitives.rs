//! Binding primitives.
//!
//! - **bind**: associate two hypervectors element-wise (XOR or multiply)
//! - **unbind**: recover one operand given the other (same as bind)
//! - **hamming_distance**: count of disagreeing elements
//!
//! Lengths are never silently reconciled. [`Primitives::try_bind`] reports
//! a mismatch as an error; [`Primitives::bind`] treats it as a broken
//! precondition and panics.

use crate::error::{ItemMemError, Result};
use crate::representation::Representation;
use crate::vector::Hypervector;

/// Collection of binding operations.
pub struct Primitives;

impl Primitives {
    /// Bind two equal-length vectors under `mode`.
    ///
    /// Binary: `out[i] = a[i] ^ b[i]`. Bipolar: `out[i] = a[i] * b[i]`.
    ///
    /// # Panics
    /// If the dimensions differ.
    pub fn bind(a: &Hypervector, b: &Hypervector, mode: Representation) -> Hypervector {
        assert_eq!(
            a.dimensions(),
            b.dimensions(),
            "Dimension mismatch in bind"
        );

        let data: Vec<i8> = a
            .data()
            .iter()
            .zip(b.data().iter())
            .map(|(&x, &y)| mode.bind_element(x, y))
            .collect();

        Hypervector::from_data(data)
    }

    /// Bind two vectors, rejecting mismatched lengths.
    pub fn try_bind(a: &Hypervector, b: &Hypervector, mode: Representation) -> Result<Hypervector> {
        if a.dimensions() != b.dimensions() {
            return Err(ItemMemError::DimensionMismatch {
                expected: a.dimensions(),
                got: b.dimensions(),
            });
        }
        Ok(Self::bind(a, b, mode))
    }

    /// Unbind: recover `value` from `bind(key, value)` given `key`.
    ///
    /// XOR and bipolar multiplication are both self-inverse.
    pub fn unbind(bound: &Hypervector, key: &Hypervector, mode: Representation) -> Hypervector {
        Self::bind(bound, key, mode)
    }

    /// Number of positions where the two vectors differ.
    pub fn hamming_distance(a: &Hypervector, b: &Hypervector) -> usize {
        assert_eq!(
            a.dimensions(),
            b.dimensions(),
            "Dimension mismatch in hamming_distance"
        );

        a.data()
            .iter()
            .zip(b.data().iter())
            .filter(|(x, y)| x != y)
            .count()
    }

    /// Fraction of positions where the two vectors differ, in [0, 1].
    ///
    /// Independent random vectors sit near 0.5.
    pub fn normalized_hamming(a: &Hypervector, b: &Hypervector) -> f64 {
        if a.dimensions() == 0 {
            return 0.0;
        }
        Self::hamming_distance(a, b) as f64 / a.dimensions() as f64
    }
}
