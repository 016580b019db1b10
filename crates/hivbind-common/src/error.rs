use std::path::PathBuf;

use thiserror::Error;

/// Failure to retrieve ligand properties from the compound database.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Timeout, DNS, connection or non-success HTTP status.
    #[error("PubChem API error: {0}")]
    Transport(String),

    /// The response body did not have the expected shape or values.
    #[error("Unexpected PubChem response: {0}")]
    Parse(String),
}

/// Failure inside the scaler or regression model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("feature vector has {actual} values, model expects {expected}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("non-finite value produced by {0}")]
    NonFinite(String),

    #[error("prediction failed: {0}")]
    Invalid(String),
}

/// Pre-trained artifacts could not be loaded. Fatal to the session.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(
        "Model file not found: {}. Place the model and scaler files in the configured artifacts directory (--models-dir or [artifacts] in hivbind.toml).",
        .path.display()
    )]
    ArtifactMissing { path: PathBuf },

    #[error("Could not read {}: {source}", .path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid artifact {}: {reason}", .path.display())]
    ArtifactInvalid { path: PathBuf, reason: String },
}

/// Error scoped to a single prediction request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("Please enter a PubChem CID.")]
    EmptyIdentifier,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictionError),
}

pub type Result<T> = std::result::Result<T, RequestError>;
