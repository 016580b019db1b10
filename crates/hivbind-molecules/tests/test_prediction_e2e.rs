//! End-to-end prediction pipeline with stub property sources and artifacts.

use async_trait::async_trait;
use hivbind_common::error::{FetchError, PredictionError, RequestError};
use hivbind_common::LigandProperties;
use hivbind_molecules::ligand::PropertySource;
use hivbind_molecules::model::{FeatureScaler, PretrainedArtifacts, RegressionModel};
use hivbind_molecules::scoring::{BindingStrength, Recommendation};
use hivbind_molecules::BindingPipeline;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Returns fixed properties and records the identifiers it was asked for.
struct StubSource {
    result: Result<LigandProperties, FetchError>,
    requested: Mutex<Vec<String>>,
}

impl StubSource {
    fn new(result: Result<LigandProperties, FetchError>) -> Arc<Self> {
        Arc::new(Self { result, requested: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl PropertySource for StubSource {
    async fn fetch(&self, identifier: &str) -> Result<LigandProperties, FetchError> {
        self.requested.lock().unwrap().push(identifier.to_string());
        self.result.clone()
    }
}

struct Identity;

impl FeatureScaler for Identity {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError> {
        Ok(features.to_vec())
    }
}

/// Always predicts the same ΔG and counts calls.
struct FixedModel {
    delta_g: f64,
    calls: AtomicUsize,
}

impl FixedModel {
    fn new(delta_g: f64) -> Arc<Self> {
        Arc::new(Self { delta_g, calls: AtomicUsize::new(0) })
    }
}

impl RegressionModel for FixedModel {
    fn predict(&self, _features: &[f64]) -> Result<f64, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.delta_g)
    }
}

fn pipeline(source: Arc<StubSource>, model: Arc<FixedModel>) -> BindingPipeline {
    BindingPipeline::new(source, PretrainedArtifacts::new(model, Arc::new(Identity)))
}

#[tokio::test]
async fn test_strong_binder_with_poor_drug_likeness() {
    let source = StubSource::new(Ok(LigandProperties::new(628.8, 5.92, 2, 5)));
    let report = pipeline(source, FixedModel::new(-10.2)).run("92727").await.unwrap();

    assert_eq!(report.assessment.violations, 2);
    assert!(!report.assessment.is_drug_like);
    assert_eq!(report.binding, BindingStrength::Strong);
    assert_eq!(report.recommendation, Recommendation::NeedsOptimization);
    assert_eq!(report.recommendation.label(), "Promising but needs optimization");
    assert_eq!(report.compound_url, "https://pubchem.ncbi.nlm.nih.gov/compound/92727");
}

#[tokio::test]
async fn test_excellent_candidate() {
    let source = StubSource::new(Ok(LigandProperties::new(300.0, 2.0, 1, 4)));
    let report = pipeline(source, FixedModel::new(-9.5)).run("5362440").await.unwrap();

    assert_eq!(report.assessment.violations, 0);
    assert!(report.assessment.is_drug_like);
    assert_eq!(report.binding, BindingStrength::Strong);
    assert_eq!(report.recommendation.label(), "Excellent Drug Candidate");
}

#[tokio::test]
async fn test_boundary_delta_g_is_not_strong() {
    let source = StubSource::new(Ok(LigandProperties::new(300.0, 2.0, 1, 4)));
    let report = pipeline(source, FixedModel::new(-9.0)).run("64143").await.unwrap();

    assert_eq!(report.binding, BindingStrength::Moderate);
    assert_eq!(report.recommendation, Recommendation::Moderate);
}

#[tokio::test]
async fn test_fetch_failure_skips_prediction() {
    let source = StubSource::new(Err(FetchError::Transport("request timed out".to_string())));
    let model = FixedModel::new(-10.0);
    let err = pipeline(source, model.clone()).run("392622").await.unwrap_err();

    assert_eq!(err, RequestError::Fetch(FetchError::Transport("request timed out".to_string())));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_identifier_is_trimmed_and_required() {
    let source = StubSource::new(Ok(LigandProperties::new(300.0, 2.0, 1, 4)));
    let model = FixedModel::new(-6.0);
    let pipeline = pipeline(source.clone(), model.clone());

    assert_eq!(pipeline.run("   ").await.unwrap_err(), RequestError::EmptyIdentifier);
    assert!(source.requested.lock().unwrap().is_empty());

    let report = pipeline.run("  2244\n").await.unwrap();
    assert_eq!(report.cid, "2244");
    assert_eq!(*source.requested.lock().unwrap(), vec!["2244".to_string()]);
    assert_eq!(report.binding, BindingStrength::Weak);
    assert_eq!(report.recommendation, Recommendation::Poor);
}

#[tokio::test]
async fn test_prediction_error_is_scoped_to_request() {
    struct Failing;
    impl RegressionModel for Failing {
        fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
            Err(PredictionError::FeatureCount { expected: 6, actual: features.len() })
        }
    }

    let source = StubSource::new(Ok(LigandProperties::new(300.0, 2.0, 1, 4)));
    let pipeline = BindingPipeline::new(
        source,
        PretrainedArtifacts::new(Arc::new(Failing), Arc::new(Identity)),
    );

    for _ in 0..2 {
        let err = pipeline.run("2244").await.unwrap_err();
        assert_eq!(
            err,
            RequestError::Prediction(PredictionError::FeatureCount { expected: 6, actual: 4 })
        );
    }
}

#[tokio::test]
async fn test_report_serializes_labels() {
    let source = StubSource::new(Ok(LigandProperties::new(628.8, 5.92, 2, 5)));
    let report = pipeline(source, FixedModel::new(-10.2)).run("92727").await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["binding"], "Strong Binding");
    assert_eq!(json["recommendation"], "Promising but needs optimization");
    assert_eq!(json["assessment"]["violations"], 2);
    assert_eq!(json["properties"]["hbond_donors"], 2);
}
