//! Pre-trained regression model and feature scaler.
//!
//! Both artifacts are exported from the training environment as JSON:
//!   - `scaler.json`: standard scaler (`mean`, `scale`)
//!   - `rf_model.json`: random forest in scikit-learn's flattened tree layout,
//!     or a linear model, tagged by `kind`
//!
//! Features are always ordered [MW, LogP, HBD, HBA].

use hivbind_common::error::{PredictionError, StartupError};
use hivbind_common::{FEATURE_COUNT, FEATURE_NAMES};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Forward transform applied to raw features before prediction.
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError>;
}

/// Maps a scaled feature vector to a single predicted value.
pub trait RegressionModel: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError>;
}

// ── Scaler ───────────────────────────────────────────────────────────────────

/// Standardisation: `(x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    fn validate(&self) -> Result<(), String> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {} means and scales, found {} and {}",
                FEATURE_COUNT,
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err("mean and scale must be finite".to_string());
        }
        check_feature_names(self.feature_names.as_deref())
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError> {
        if features.len() != self.mean.len() {
            return Err(PredictionError::FeatureCount {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // constant features are fitted with a zero scale
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}

// ── Models ───────────────────────────────────────────────────────────────────

/// A serialized regression model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForest),
    Linear(LinearModel),
}

impl ModelArtifact {
    pub fn n_features(&self) -> usize {
        match self {
            ModelArtifact::RandomForest(forest) => forest.n_features,
            ModelArtifact::Linear(linear) => linear.coefficients.len(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            ModelArtifact::RandomForest(forest) => forest.validate(),
            ModelArtifact::Linear(linear) => linear.validate(),
        }
    }
}

impl RegressionModel for ModelArtifact {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        match self {
            ModelArtifact::RandomForest(forest) => forest.predict(features),
            ModelArtifact::Linear(linear) => linear.predict(features),
        }
    }
}

/// Random forest regressor: the mean of its trees' predictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub trees: Vec<DecisionTree>,
}

/// One regression tree as parallel node arrays.
///
/// Node `i` is a leaf when `children_left[i] == -1`; otherwise samples with
/// `x[feature[i]] <= threshold[i]` go left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

const LEAF: i64 = -1;

impl DecisionTree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [self.children_right.len(), self.feature.len(), self.threshold.len(), self.value.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err("tree node arrays differ in length".to_string());
        }

        for i in 0..n {
            let (left, right) = (self.children_left[i], self.children_right[i]);
            if left == LEAF {
                if right != LEAF {
                    return Err(format!("node {} has a right child but no left child", i));
                }
                if !self.value[i].is_finite() {
                    return Err(format!("leaf {} has a non-finite value", i));
                }
                continue;
            }
            // children always follow their parent, so traversal terminates
            for child in [left, right] {
                if child <= i as i64 || child >= n as i64 {
                    return Err(format!("node {} has out-of-order child {}", i, child));
                }
            }
            if self.feature[i] < 0 || self.feature[i] >= n_features as i64 {
                return Err(format!("node {} splits on unknown feature {}", i, self.feature[i]));
            }
            if !self.threshold[i].is_finite() {
                return Err(format!("node {} has a non-finite threshold", i));
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf. Every step is bounds-checked and must move
    /// to a later node, so a malformed tree is an error rather than a panic or a loop.
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        let mut node = 0usize;
        loop {
            let (left, right, feature, threshold, value) = match (
                self.children_left.get(node),
                self.children_right.get(node),
                self.feature.get(node),
                self.threshold.get(node),
                self.value.get(node),
            ) {
                (Some(&l), Some(&r), Some(&f), Some(&t), Some(&v)) => (l, r, f, t, v),
                _ => return Err(malformed_tree(format!("node {} does not exist", node))),
            };
            if left == LEAF {
                return Ok(value);
            }
            let x = usize::try_from(feature)
                .ok()
                .and_then(|f| features.get(f))
                .ok_or_else(|| {
                    malformed_tree(format!("node {} splits on unknown feature {}", node, feature))
                })?;
            let next = if *x <= threshold { left } else { right };
            if next <= node as i64 {
                return Err(malformed_tree(format!("node {} has out-of-order child {}", node, next)));
            }
            node = next as usize;
        }
    }
}

fn malformed_tree(reason: String) -> PredictionError {
    PredictionError::Invalid(format!("malformed decision tree: {}", reason))
}

impl RandomForest {
    fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("random forest has no trees".to_string());
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return Err("feature_names does not match n_features".to_string());
            }
        }
        check_feature_names(self.feature_names.as_deref())?;
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }
}

impl RegressionModel for RandomForest {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        if features.len() != self.n_features {
            return Err(PredictionError::FeatureCount {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        if self.trees.is_empty() {
            return Err(PredictionError::Invalid("random forest has no trees".to_string()));
        }
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.predict(features)?;
        }
        Ok(total / self.trees.len() as f64)
    }
}

/// Linear regressor: `intercept + Σ coefficients[i] * x[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("linear model has no coefficients".to_string());
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("linear model parameters must be finite".to_string());
        }
        Ok(())
    }
}

impl RegressionModel for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        if features.len() != self.coefficients.len() {
            return Err(PredictionError::FeatureCount {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }
        Ok(self.intercept
            + self.coefficients.iter().zip(features).map(|(c, x)| c * x).sum::<f64>())
    }
}

fn check_feature_names(names: Option<&[String]>) -> Result<(), String> {
    match names {
        Some(names) if !names.iter().map(String::as_str).eq(FEATURE_NAMES) => Err(format!(
            "feature order {:?} does not match {:?}",
            names, FEATURE_NAMES
        )),
        _ => Ok(()),
    }
}

// ── Loading ──────────────────────────────────────────────────────────────────

/// Model and scaler shared read-only for the lifetime of the process.
#[derive(Clone)]
pub struct PretrainedArtifacts {
    pub model: Arc<dyn RegressionModel>,
    pub scaler: Arc<dyn FeatureScaler>,
}

impl PretrainedArtifacts {
    pub fn new(model: Arc<dyn RegressionModel>, scaler: Arc<dyn FeatureScaler>) -> Self {
        Self { model, scaler }
    }

    /// Load and validate both artifacts. Either file missing is a startup error.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, StartupError> {
        let model: ModelArtifact = read_artifact(model_path)?;
        model.validate().map_err(|reason| invalid(model_path, reason))?;

        let scaler: StandardScaler = read_artifact(scaler_path)?;
        scaler.validate().map_err(|reason| invalid(scaler_path, reason))?;

        if model.n_features() != FEATURE_COUNT {
            return Err(invalid(
                model_path,
                format!("model expects {} features, not {}", model.n_features(), FEATURE_COUNT),
            ));
        }

        info!(
            model = %model_path.display(),
            scaler = %scaler_path.display(),
            "Pre-trained artifacts loaded"
        );
        Ok(Self::new(Arc::new(model), Arc::new(scaler)))
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, StartupError> {
    if !path.exists() {
        return Err(StartupError::ArtifactMissing { path: path.to_path_buf() });
    }
    debug!(path = %path.display(), "Reading artifact");
    let content = std::fs::read_to_string(path).map_err(|source| StartupError::ArtifactRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| invalid(path, e.to_string()))
}

fn invalid(path: &Path, reason: String) -> StartupError {
    StartupError::ArtifactInvalid { path: path.to_path_buf(), reason }
}
