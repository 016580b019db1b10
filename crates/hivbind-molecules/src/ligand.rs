//! Ligand property retrieval from PubChem.
//!
//! API docs: https://pubchem.ncbi.nlm.nih.gov/docs/pug-rest
//! Endpoint: https://pubchem.ncbi.nlm.nih.gov/rest/pug
//!
//! One GET per compound:
//!   /compound/cid/{cid}/property/MolecularWeight,XLogP,HBondDonorCount,HBondAcceptorCount/JSON
//!
//! Returns `{"PropertyTable": {"Properties": [{...}]}}`. Only the first entry is used.

use async_trait::async_trait;
use hivbind_common::error::FetchError;
use hivbind_common::sandbox::SandboxClient as Client;
use hivbind_common::LigandProperties;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub const PUBCHEM_API_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";
const PUBCHEM_COMPOUND_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/compound";
const PROPERTY_LIST: &str = "MolecularWeight,XLogP,HBondDonorCount,HBondAcceptorCount";

/// Source of ligand descriptors for a compound identifier.
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Fetch the four descriptors for one compound. Single attempt, no retries.
    async fn fetch(&self, identifier: &str) -> Result<LigandProperties, FetchError>;
}

/// PubChem PUG REST client.
pub struct PubChemClient {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct PropertyTableResponse {
    #[serde(rename = "PropertyTable")]
    property_table: PropertyTable,
}

#[derive(Deserialize)]
struct PropertyTable {
    #[serde(rename = "Properties")]
    properties: Vec<Map<String, Value>>,
}

#[derive(Deserialize)]
struct FaultResponse {
    #[serde(rename = "Fault")]
    fault: Fault,
}

#[derive(Deserialize)]
struct Fault {
    #[serde(rename = "Message")]
    message: Option<String>,
    #[serde(rename = "Details", default)]
    details: Vec<String>,
}

impl PubChemClient {
    /// Client against the public PubChem endpoint with the default timeout.
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::new()?,
            base_url: parse_base_url(PUBCHEM_API_URL)?,
        })
    }

    /// Client against an arbitrary PUG REST base URL.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::with_timeout(timeout)?,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Property request URL for a compound. The identifier becomes one path segment.
    ///
    /// `.` and `..` cannot be carried as a segment (URL normalisation removes
    /// them, even percent-encoded), so they are rejected before any request.
    pub fn property_url(&self, identifier: &str) -> Result<String, FetchError> {
        if identifier == "." || identifier == ".." {
            return Err(FetchError::Transport(format!(
                "invalid CID {:?}: not usable as a request path segment",
                identifier
            )));
        }
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("compound")
                .push("cid")
                .push(identifier)
                .push("property")
                .push(PROPERTY_LIST)
                .push("JSON");
        }
        Ok(url.to_string())
    }
}

#[async_trait]
impl PropertySource for PubChemClient {
    #[instrument(skip(self))]
    async fn fetch(&self, identifier: &str) -> Result<LigandProperties, FetchError> {
        let url = self.property_url(identifier)?;

        debug!(cid = identifier, "Fetching PubChem properties");

        let resp = self.client
            .get(&url)?
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = match fault_message(&body) {
                Some(detail) => format!("HTTP {} for CID {}: {}", status, identifier, detail),
                None => format!("HTTP {} for CID {}", status, identifier),
            };
            return Err(FetchError::Transport(message));
        }

        let props = parse_property_table(&body)?;
        info!(
            cid = identifier,
            mw = props.molecular_weight,
            logp = props.logp,
            hbd = props.hbond_donors,
            hba = props.hbond_acceptors,
            "Ligand properties retrieved"
        );
        Ok(props)
    }
}

/// Link to the compound summary page.
pub fn compound_page_url(identifier: &str) -> String {
    let mut url = match Url::parse(PUBCHEM_COMPOUND_URL) {
        Ok(url) => url,
        Err(_) => return PUBCHEM_COMPOUND_URL.to_string(),
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(identifier);
    }
    url.to_string()
}

/// Extract the four descriptors from a PUG REST property table body.
///
/// Missing or null fields default to zero. Values may be JSON numbers or
/// numeric strings (PubChem reports `MolecularWeight` as a string).
pub fn parse_property_table(body: &str) -> Result<LigandProperties, FetchError> {
    let response: PropertyTableResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Parse(format!("expected a PropertyTable: {}", e)))?;

    let record = response
        .property_table
        .properties
        .first()
        .ok_or_else(|| FetchError::Parse("PropertyTable contains no compounds".to_string()))?;

    let molecular_weight = real_field(record, "MolecularWeight")?;
    if molecular_weight < 0.0 {
        return Err(FetchError::Parse(format!(
            "MolecularWeight is negative: {}",
            molecular_weight
        )));
    }

    Ok(LigandProperties {
        molecular_weight,
        logp: real_field(record, "XLogP")?,
        hbond_donors: count_field(record, "HBondDonorCount")?,
        hbond_acceptors: count_field(record, "HBondAcceptorCount")?,
    })
}

fn parse_base_url(base_url: &str) -> Result<Url, FetchError> {
    let url = Url::parse(base_url)
        .map_err(|e| FetchError::Transport(format!("invalid PubChem base URL {}: {}", base_url, e)))?;
    if url.cannot_be_a_base() {
        return Err(FetchError::Transport(format!("invalid PubChem base URL {}", base_url)));
    }
    Ok(url)
}

fn transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Transport(format!("request timed out: {}", e))
    } else {
        FetchError::Transport(e.to_string())
    }
}

fn fault_message(body: &str) -> Option<String> {
    let fault = serde_json::from_str::<FaultResponse>(body).ok()?.fault;
    let mut parts: Vec<String> = fault.message.into_iter().collect();
    parts.extend(fault.details);
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn real_field(record: &Map<String, Value>, name: &str) -> Result<f64, FetchError> {
    let value = match record.get(name) {
        None | Some(Value::Null) => return Ok(0.0),
        Some(v) => v,
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(x) if x.is_finite() => Ok(x),
        _ => Err(FetchError::Parse(format!("{} is not numeric: {}", name, value))),
    }
}

fn count_field(record: &Map<String, Value>, name: &str) -> Result<u32, FetchError> {
    let x = real_field(record, name)?;
    if x < 0.0 || x.fract() != 0.0 || x > u32::MAX as f64 {
        return Err(FetchError::Parse(format!(
            "{} is not a non-negative integer: {}",
            name, x
        )));
    }
    Ok(x as u32)
}
