//! Tolerance-equality between numeric guidance bounds.

use serde::{Deserialize, Serialize};

use crate::Unit;

/// Absorbs binary rounding so that 45.1 - 45.0 still counts as 0.10 apart.
const SLACK: f64 = 1e-9;

/// Thresholds for deciding that two figures are "the same" guidance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Absolute difference allowed between percent values (percentage points).
    pub percent_abs: f64,
    /// Absolute difference allowed between per-share values.
    pub eps_abs: f64,
    /// Relative difference allowed for everything else.
    pub relative: f64,
    /// Floor applied to the mean magnitude used as the relative denominator.
    pub relative_floor: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            percent_abs: 0.10,
            eps_abs: 0.01,
            relative: 0.01,
            relative_floor: 1.0,
        }
    }
}

impl Tolerance {
    /// Whether `a` and `b` are within tolerance for `unit`. A missing value never matches.
    pub fn close_enough(&self, a: Option<f64>, b: Option<f64>, unit: &Unit) -> bool {
        let (Some(a), Some(b)) = (a, b) else {
            return false;
        };
        let diff = (a - b).abs();
        match unit {
            Unit::Percent => diff <= self.percent_abs + SLACK,
            Unit::Eps => diff <= self.eps_abs + SLACK,
            _ => {
                let denom = ((a + b) / 2.0).abs().max(self.relative_floor);
                diff / denom <= self.relative + SLACK
            }
        }
    }
}

/// [`Tolerance::close_enough`] under the default policy.
pub fn close_enough(a: Option<f64>, b: Option<f64>, unit: &Unit) -> bool {
    Tolerance::default().close_enough(a, b, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_never_matches() {
        assert!(!close_enough(None, Some(1.0), &Unit::Usd));
        assert!(!close_enough(Some(1.0), None, &Unit::Usd));
        assert!(!close_enough(None, None, &Unit::Usd));
    }

    #[test]
    fn percent_uses_absolute_points() {
        assert!(close_enough(Some(45.0), Some(45.1), &Unit::Percent));
        assert!(!close_enough(Some(45.0), Some(45.2), &Unit::Percent));
    }

    #[test]
    fn eps_uses_absolute_cents() {
        assert!(close_enough(Some(1.00), Some(1.01), &Unit::Eps));
        assert!(!close_enough(Some(1.00), Some(1.05), &Unit::Eps));
    }

    #[test]
    fn other_units_use_relative_difference() {
        assert!(close_enough(Some(10.0), Some(10.1), &Unit::Usd));
        assert!(!close_enough(Some(10.0), Some(10.3), &Unit::Usd));
        assert!(close_enough(Some(94.0e9), Some(94.5e9), &Unit::Usd));
        assert!(close_enough(Some(3.0), Some(3.02), &Unit::Other(String::new())));
    }

    #[test]
    fn denominator_floor_near_zero() {
        // Mean magnitude 0.05 is floored to 1.0, so a 0.01 gap passes.
        assert!(close_enough(Some(0.0), Some(0.01), &Unit::Usd));
        assert!(!close_enough(Some(0.0), Some(0.1), &Unit::Usd));
    }

    #[test]
    fn symmetric() {
        let pairs = [
            (1.0, 1.05),
            (10.0, 10.1),
            (0.0, 0.01),
            (-3.0, 3.0),
            (45.0, 45.1),
            (1e9, 1.009e9),
        ];
        let units = [
            Unit::Percent,
            Unit::Eps,
            Unit::Usd,
            Unit::Other("bps".into()),
        ];
        for (a, b) in pairs {
            for u in &units {
                assert_eq!(
                    close_enough(Some(a), Some(b), u),
                    close_enough(Some(b), Some(a), u),
                    "asymmetric for {a} vs {b} in {u}"
                );
            }
        }
    }

    #[test]
    fn deserializes_partial_policy() {
        let t: Tolerance = serde_json::from_str(r#"{"eps_abs": 0.02}"#).unwrap();
        assert_eq!(t.eps_abs, 0.02);
        assert_eq!(t.percent_abs, 0.10);
    }
}
