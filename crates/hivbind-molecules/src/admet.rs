//! Drug-likeness assessment using Lipinski's Rule of Five.

use hivbind_common::LigandProperties;
use serde::{Deserialize, Serialize};

/// Maximum number of failed rules for a compound to count as drug-like.
pub const MAX_VIOLATIONS: u8 = 1;

/// One of the four Rule of Five thresholds. All limits are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LipinskiRule {
    MolecularWeight,
    LogP,
    HBondDonors,
    HBondAcceptors,
}

impl LipinskiRule {
    pub const ALL: [LipinskiRule; 4] = [
        LipinskiRule::MolecularWeight,
        LipinskiRule::LogP,
        LipinskiRule::HBondDonors,
        LipinskiRule::HBondAcceptors,
    ];

    pub fn limit(&self) -> f64 {
        match self {
            LipinskiRule::MolecularWeight => 500.0,
            LipinskiRule::LogP => 5.0,
            LipinskiRule::HBondDonors => 5.0,
            LipinskiRule::HBondAcceptors => 10.0,
        }
    }

    pub fn value_of(&self, properties: &LigandProperties) -> f64 {
        match self {
            LipinskiRule::MolecularWeight => properties.molecular_weight,
            LipinskiRule::LogP => properties.logp,
            LipinskiRule::HBondDonors => properties.hbond_donors as f64,
            LipinskiRule::HBondAcceptors => properties.hbond_acceptors as f64,
        }
    }

    /// e.g. "Molecular Weight ≤ 500 Da" or "Molecular Weight > 500 Da".
    pub fn describe(&self, passed: bool) -> String {
        let op = if passed { "≤" } else { ">" };
        match self {
            LipinskiRule::MolecularWeight => format!("Molecular Weight {} 500 Da", op),
            LipinskiRule::LogP => format!("LogP {} 5", op),
            LipinskiRule::HBondDonors => format!("Hydrogen Bond Donors {} 5", op),
            LipinskiRule::HBondAcceptors => format!("Hydrogen Bond Acceptors {} 10", op),
        }
    }
}

/// Outcome of a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: LipinskiRule,
    pub value: f64,
    pub passed: bool,
}

impl RuleOutcome {
    pub fn describe(&self) -> String {
        self.rule.describe(self.passed)
    }
}

/// Rule of Five result for a ligand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugLikenessAssessment {
    pub rules: [RuleOutcome; 4],
    pub violations: u8,
    pub is_drug_like: bool,
}

/// Evaluate all four rules independently.
pub fn assess(properties: &LigandProperties) -> DrugLikenessAssessment {
    let rules = LipinskiRule::ALL.map(|rule| {
        let value = rule.value_of(properties);
        RuleOutcome { rule, value, passed: value <= rule.limit() }
    });
    let violations = rules.iter().filter(|r| !r.passed).count() as u8;

    DrugLikenessAssessment {
        rules,
        violations,
        is_drug_like: violations <= MAX_VIOLATIONS,
    }
}
