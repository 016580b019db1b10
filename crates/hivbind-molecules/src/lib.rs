//! hivbind-molecules - HIV-1 protease binding affinity prediction.
//!
//! Each request runs one linear pass:
//! 1. Fetching ligand descriptors from PubChem
//! 2. Scaling [MW, LogP, HBD, HBA] and predicting ΔG with the pre-trained model
//! 3. Lipinski's Rule of Five drug-likeness assessment
//! 4. Binding strength and overall candidate classification

pub mod ligand;
pub mod model;
pub mod predictor;
pub mod admet;
pub mod scoring;
pub mod pipeline;

pub use pipeline::{BindingPipeline, PredictionReport};
