//! Binding strength and overall candidate classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ΔG below this (kcal/mol) is strong binding.
pub const STRONG_BINDING_CUTOFF: f64 = -9.0;
/// ΔG below this (kcal/mol) is at least moderate binding.
pub const MODERATE_BINDING_CUTOFF: f64 = -7.0;

/// Binding strength implied by the predicted ΔG alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingStrength {
    #[serde(rename = "Strong Binding")]
    Strong,
    #[serde(rename = "Moderate Binding")]
    Moderate,
    #[serde(rename = "Weak Binding")]
    Weak,
}

impl BindingStrength {
    pub fn classify(delta_g: f64) -> Self {
        if delta_g < STRONG_BINDING_CUTOFF {
            BindingStrength::Strong
        } else if delta_g < MODERATE_BINDING_CUTOFF {
            BindingStrength::Moderate
        } else {
            BindingStrength::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BindingStrength::Strong => "Strong Binding",
            BindingStrength::Moderate => "Moderate Binding",
            BindingStrength::Weak => "Weak Binding",
        }
    }
}

impl fmt::Display for BindingStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Overall drug candidate assessment combining ΔG and drug-likeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Excellent Drug Candidate")]
    Excellent,
    #[serde(rename = "Promising but needs optimization")]
    NeedsOptimization,
    #[serde(rename = "Moderate Candidate")]
    Moderate,
    #[serde(rename = "Poor Candidate")]
    Poor,
}

impl Recommendation {
    /// First matching rule wins.
    pub fn from_prediction(delta_g: f64, is_drug_like: bool) -> Self {
        if delta_g < STRONG_BINDING_CUTOFF && is_drug_like {
            Recommendation::Excellent
        } else if delta_g < STRONG_BINDING_CUTOFF {
            Recommendation::NeedsOptimization
        } else if delta_g < MODERATE_BINDING_CUTOFF && is_drug_like {
            Recommendation::Moderate
        } else {
            Recommendation::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Excellent => "Excellent Drug Candidate",
            Recommendation::NeedsOptimization => "Promising but needs optimization",
            Recommendation::Moderate => "Moderate Candidate",
            Recommendation::Poor => "Poor Candidate",
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            Recommendation::Excellent => "Strong binding AND drug-like properties!",
            Recommendation::NeedsOptimization => "Strong binding but poor drug-likeness.",
            Recommendation::Moderate => "Acceptable binding with good drug-like properties.",
            Recommendation::Poor => "Weak binding and/or poor drug-likeness.",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_cutoffs_are_strict() {
        assert_eq!(BindingStrength::classify(-9.001), BindingStrength::Strong);
        assert_eq!(BindingStrength::classify(-9.0), BindingStrength::Moderate);
        assert_eq!(BindingStrength::classify(-7.001), BindingStrength::Moderate);
        assert_eq!(BindingStrength::classify(-7.0), BindingStrength::Weak);
        assert_eq!(BindingStrength::classify(-3.2), BindingStrength::Weak);
    }

    #[test]
    fn test_recommendation_priority() {
        assert_eq!(Recommendation::from_prediction(-10.2, true), Recommendation::Excellent);
        assert_eq!(Recommendation::from_prediction(-10.2, false), Recommendation::NeedsOptimization);
        assert_eq!(Recommendation::from_prediction(-8.0, true), Recommendation::Moderate);
        assert_eq!(Recommendation::from_prediction(-8.0, false), Recommendation::Poor);
        assert_eq!(Recommendation::from_prediction(-9.0, true), Recommendation::Moderate);
        assert_eq!(Recommendation::from_prediction(-7.0, true), Recommendation::Poor);
    }

    #[test]
    fn test_labels_serialize_verbatim() {
        assert_eq!(
            serde_json::to_string(&Recommendation::NeedsOptimization).unwrap(),
            "\"Promising but needs optimization\""
        );
        assert_eq!(serde_json::to_string(&BindingStrength::Strong).unwrap(), "\"Strong Binding\"");
        assert_eq!(Recommendation::Excellent.to_string(), "Excellent Drug Candidate");
    }
}
