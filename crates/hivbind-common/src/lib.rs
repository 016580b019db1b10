//! hivbind-common - Shared types, errors, and the sandboxed HTTP client used across all hivbind crates.

pub mod error;
pub mod entities;
pub mod sandbox;

// Re-export commonly used types
pub use entities::{LigandProperties, FEATURE_COUNT, FEATURE_NAMES};
pub use error::{FetchError, PredictionError, RequestError, StartupError};
