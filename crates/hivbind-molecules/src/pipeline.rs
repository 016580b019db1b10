//! Request boundary: CID in, prediction report or error out.

use hivbind_common::error::RequestError;
use hivbind_common::LigandProperties;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::admet::{assess, DrugLikenessAssessment};
use crate::ligand::{compound_page_url, PropertySource};
use crate::model::PretrainedArtifacts;
use crate::predictor::AffinityPredictor;
use crate::scoring::{BindingStrength, Recommendation};

/// Everything shown to the user for one compound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub cid: String,
    pub properties: LigandProperties,
    /// kcal/mol
    pub delta_g: f64,
    pub binding: BindingStrength,
    pub assessment: DrugLikenessAssessment,
    pub recommendation: Recommendation,
    pub compound_url: String,
}

/// Fetch → predict → assess, one request at a time. Holds no per-request state.
pub struct BindingPipeline {
    source: Arc<dyn PropertySource>,
    predictor: AffinityPredictor,
}

impl BindingPipeline {
    pub fn new(source: Arc<dyn PropertySource>, artifacts: PretrainedArtifacts) -> Self {
        Self {
            source,
            predictor: AffinityPredictor::new(artifacts),
        }
    }

    pub async fn run(&self, identifier: &str) -> Result<PredictionReport, RequestError> {
        let cid = identifier.trim();
        if cid.is_empty() {
            return Err(RequestError::EmptyIdentifier);
        }

        info!("Running binding prediction for CID {}", cid);

        let properties = self.source.fetch(cid).await.map_err(|e| {
            warn!(cid = cid, error = %e, "Property fetch failed");
            e
        })?;

        let delta_g = self.predictor.predict(&properties).map_err(|e| {
            warn!(cid = cid, error = %e, "Prediction failed");
            e
        })?;

        let assessment = assess(&properties);
        let binding = BindingStrength::classify(delta_g);
        let recommendation = Recommendation::from_prediction(delta_g, assessment.is_drug_like);

        info!(
            cid = cid,
            delta_g,
            violations = assessment.violations,
            %recommendation,
            "Prediction complete"
        );

        Ok(PredictionReport {
            cid: cid.to_string(),
            properties,
            delta_g,
            binding,
            assessment,
            recommendation,
            compound_url: compound_page_url(cid),
        })
    }
}
