//! Core entity types shared by the fetcher, predictor and assessor.

use serde::{Deserialize, Serialize};

/// Names of the model features, in the order the scaler and model consume them.
pub const FEATURE_NAMES: [&str; 4] = ["MW", "LogP", "HBD", "HBA"];

/// Number of model features.
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

// ---------------------------------------------------------------------------
// Ligand
// ---------------------------------------------------------------------------

/// Descriptors of a single compound as reported by PubChem.
///
/// A zero value may mean the database did not report the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LigandProperties {
    /// g/mol
    pub molecular_weight: f64,
    /// Octanol-water partition coefficient (XLogP).
    pub logp: f64,
    pub hbond_donors: u32,
    pub hbond_acceptors: u32,
}

impl LigandProperties {
    pub fn new(molecular_weight: f64, logp: f64, hbond_donors: u32, hbond_acceptors: u32) -> Self {
        Self { molecular_weight, logp, hbond_donors, hbond_acceptors }
    }

    /// Feature vector in `FEATURE_NAMES` order.
    pub fn feature_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.molecular_weight,
            self.logp,
            self.hbond_donors as f64,
            self.hbond_acceptors as f64,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_vector_order() {
        let props = LigandProperties::new(628.8, 5.92, 2, 5);
        assert_eq!(props.feature_vector(), [628.8, 5.92, 2.0, 5.0]);
    }

    #[test]
    fn test_properties_serialization() {
        let props = LigandProperties::new(300.0, 2.0, 1, 4);
        let json = serde_json::to_string(&props).unwrap();
        assert!(json.contains("\"molecular_weight\":300.0"));
        assert!(json.contains("\"hbond_acceptors\":4"));
    }
}
