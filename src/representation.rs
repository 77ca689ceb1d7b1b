//! Representation modes for hypervector elements.
//!
//! - **Binary**: elements in {0, 1}, bound with XOR
//! - **Bipolar**: elements in {-1, 1}, bound with multiplication
//!
//! Both operators are self-inverse, so unbinding is the same as binding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Element representation of a hypervector.
///
/// Chosen once when an encoder is built and never changed afterwards, so
/// generation and binding always agree on the element domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Elements in {0, 1}
    #[default]
    Binary,
    /// Elements in {-1, 1}
    Bipolar,
}

impl Representation {
    /// The two symbols of this representation, indexed by a fair coin flip.
    pub fn symbols(self) -> [i8; 2] {
        match self {
            Representation::Binary => [0, 1],
            Representation::Bipolar => [-1, 1],
        }
    }

    /// Map a coin flip (0 or 1) onto an element.
    ///
    /// Bipolar uses `bit * 2 - 1`, which keeps it a fair two-symbol choice.
    #[inline]
    pub fn symbol_for_bit(self, bit: u32) -> i8 {
        let bit = (bit & 1) as i8;
        match self {
            Representation::Binary => bit,
            Representation::Bipolar => bit * 2 - 1,
        }
    }

    /// Whether `value` is a valid element of this representation.
    #[inline]
    pub fn contains(self, value: i8) -> bool {
        match self {
            Representation::Binary => value == 0 || value == 1,
            Representation::Bipolar => value == -1 || value == 1,
        }
    }

    /// Bind one pair of elements.
    #[inline]
    pub fn bind_element(self, a: i8, b: i8) -> i8 {
        match self {
            Representation::Binary => a ^ b,
            Representation::Bipolar => a * b,
        }
    }

    /// The identity element of binding (`bind(x, identity) == x`).
    pub fn identity(self) -> i8 {
        match self {
            Representation::Binary => 0,
            Representation::Bipolar => 1,
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Binary => write!(f, "binary"),
            Representation::Bipolar => write!(f, "bipolar"),
        }
    }
}

impl FromStr for Representation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" => Ok(Representation::Binary),
            "bipolar" => Ok(Representation::Bipolar),
            other => Err(format!("unknown representation '{other}' (expected binary or bipolar)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_for_bit() {
        assert_eq!(Representation::Binary.symbol_for_bit(0), 0);
        assert_eq!(Representation::Binary.symbol_for_bit(1), 1);
        assert_eq!(Representation::Bipolar.symbol_for_bit(0), -1);
        assert_eq!(Representation::Bipolar.symbol_for_bit(1), 1);
    }

    #[test]
    fn test_symbol_for_bit_uses_low_bit_only() {
        assert_eq!(Representation::Binary.symbol_for_bit(0xFFFF_FFFE), 0);
        assert_eq!(Representation::Bipolar.symbol_for_bit(0x8000_0001), 1);
    }

    #[test]
    fn test_bind_element_tables() {
        let bin = Representation::Binary;
        assert_eq!(bin.bind_element(1, 1), 0);
        assert_eq!(bin.bind_element(1, 0), 1);
        assert_eq!(bin.bind_element(0, 1), 1);
        assert_eq!(bin.bind_element(0, 0), 0);

        let bip = Representation::Bipolar;
        assert_eq!(bip.bind_element(-1, -1), 1);
        assert_eq!(bip.bind_element(-1, 1), -1);
        assert_eq!(bip.bind_element(1, -1), -1);
        assert_eq!(bip.bind_element(1, 1), 1);
    }

    #[test]
    fn test_identity() {
        for mode in [Representation::Binary, Representation::Bipolar] {
            for x in mode.symbols() {
                assert_eq!(mode.bind_element(x, mode.identity()), x);
            }
        }
    }

    #[test]
    fn test_contains() {
        assert!(Representation::Binary.contains(0));
        assert!(!Representation::Binary.contains(-1));
        assert!(Representation::Bipolar.contains(-1));
        assert!(!Representation::Bipolar.contains(0));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Bipolar".parse::<Representation>(), Ok(Representation::Bipolar));
        assert_eq!(Representation::Binary.to_string(), "binary");
        assert!("ternary".parse::<Representation>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Representation::Bipolar).unwrap();
        assert_eq!(json, "\"bipolar\"");
        let back: Representation = serde_json::from_str("\"binary\"").unwrap();
        assert_eq!(back, Representation::Binary);
    }
}
