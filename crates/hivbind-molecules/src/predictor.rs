//! Binding affinity (ΔG) prediction against HIV-1 protease.

use hivbind_common::error::PredictionError;
use hivbind_common::LigandProperties;
use tracing::debug;

use crate::model::{FeatureScaler, PretrainedArtifacts, RegressionModel};

/// Scale the [MW, LogP, HBD, HBA] vector and run the model. Returns ΔG in kcal/mol.
pub fn predict(
    properties: &LigandProperties,
    model: &dyn RegressionModel,
    scaler: &dyn FeatureScaler,
) -> Result<f64, PredictionError> {
    let features = properties.feature_vector();
    let scaled = scaler.transform(&features)?;
    if scaled.iter().any(|v| !v.is_finite()) {
        return Err(PredictionError::NonFinite("feature scaler".to_string()));
    }

    let delta_g = model.predict(&scaled)?;
    if !delta_g.is_finite() {
        return Err(PredictionError::NonFinite("regression model".to_string()));
    }

    debug!(?features, ?scaled, delta_g, "Predicted binding affinity");
    Ok(delta_g)
}

/// Predictor bound to the process-wide artifacts.
#[derive(Clone)]
pub struct AffinityPredictor {
    artifacts: PretrainedArtifacts,
}

impl AffinityPredictor {
    pub fn new(artifacts: PretrainedArtifacts) -> Self {
        Self { artifacts }
    }

    /// Predict ΔG for the given ligand.
    pub fn predict(&self, properties: &LigandProperties) -> Result<f64, PredictionError> {
        predict(properties, self.artifacts.model.as_ref(), self.artifacts.scaler.as_ref())
    }
}
