//! Composite currency strength score.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight of the 24h percentage change.
pub const WEIGHT_24H: f64 = 0.5;
/// Weight of the 7d percentage change.
pub const WEIGHT_7D: f64 = 0.3;
/// Weight of the 30d percentage change.
pub const WEIGHT_30D: f64 = 0.2;

const STRONG_THRESHOLD: f64 = 2.0;
const WEAK_THRESHOLD: f64 = -2.0;

/// Classification of a strength score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthClass {
    Strong,
    Moderate,
    Weak,
}

impl StrengthClass {
    /// Classify a score: above +2 is strong, below -2 is weak.
    pub fn from_score(score: f64) -> Self {
        if score > STRONG_THRESHOLD {
            StrengthClass::Strong
        } else if score < WEAK_THRESHOLD {
            StrengthClass::Weak
        } else {
            StrengthClass::Moderate
        }
    }
}

impl fmt::Display for StrengthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrengthClass::Strong => write!(f, "strong"),
            StrengthClass::Moderate => write!(f, "moderate"),
            StrengthClass::Weak => write!(f, "weak"),
        }
    }
}

/// Weighted blend of 24h/7d/30d percentage changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrencyStrength {
    pub score: f64,
    pub class: StrengthClass,
}

/// Compute the strength score. Missing changes count as 0.
///
/// Returns `None` only if the resulting score is not finite.
pub fn strength_score(
    change_24h: Option<f64>,
    change_7d: Option<f64>,
    change_30d: Option<f64>,
) -> Option<CurrencyStrength> {
    let score = WEIGHT_24H * change_24h.unwrap_or(0.0)
        + WEIGHT_7D * change_7d.unwrap_or(0.0)
        + WEIGHT_30D * change_30d.unwrap_or(0.0);

    score.is_finite().then(|| CurrencyStrength {
        score,
        class: StrengthClass::from_score(score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_score() {
        let strength = strength_score(Some(4.0), Some(2.0), Some(1.0)).unwrap();
        // 2.0 + 0.6 + 0.2
        assert!((strength.score - 2.8).abs() < 1e-10);
        assert_eq!(strength.class, StrengthClass::Strong);
    }

    #[test]
    fn test_missing_terms_default_to_zero() {
        let strength = strength_score(None, None, None).unwrap();
        assert_eq!(strength.score, 0.0);
        assert_eq!(strength.class, StrengthClass::Moderate);

        let strength = strength_score(None, Some(-10.0), None).unwrap();
        assert!((strength.score + 3.0).abs() < 1e-10);
        assert_eq!(strength.class, StrengthClass::Weak);
    }

    #[test]
    fn test_non_finite_score_excluded() {
        assert!(strength_score(Some(f64::NAN), None, None).is_none());
        assert!(strength_score(None, Some(f64::INFINITY), None).is_none());
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(StrengthClass::from_score(2.0), StrengthClass::Moderate);
        assert_eq!(StrengthClass::from_score(2.01), StrengthClass::Strong);
        assert_eq!(StrengthClass::from_score(-2.0), StrengthClass::Moderate);
        assert_eq!(StrengthClass::from_score(-2.01), StrengthClass::Weak);
    }
}
