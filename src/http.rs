//! Blocking HTTP client for the external medicament database.
//!
//! Implements [`DrugInfoService`] against the public API the reference data
//! comes from. Every failure mode — transport error, non-success status,
//! undecodable body, timeout — is folded into the outcome's error field so
//! the calling command handler always completes.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde_json::{json, Value};

use crate::service::{CompositionOutcome, DrugInfoService, LookupOutcome};

/// Error constructing the HTTP service; never raised per-request.
#[derive(Debug)]
pub enum ServiceConfigError {
    InvalidBaseUrl(String),
    Client(String),
}

impl fmt::Display for ServiceConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceConfigError::InvalidBaseUrl(msg) => write!(f, "invalid base URL: {}", msg),
            ServiceConfigError::Client(msg) => write!(f, "failed to build HTTP client: {}", msg),
        }
    }
}

impl std::error::Error for ServiceConfigError {}

pub struct HttpDrugInfoService {
    client: Client,
    base_url: Url,
}

impl HttpDrugInfoService {
    pub const DEFAULT_BASE_URL: &'static str = "https://medicaments-api.giygas.dev";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new() -> Result<Self, ServiceConfigError> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ServiceConfigError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ServiceConfigError::InvalidBaseUrl(e.to_string()))?;
        let client = Client::builder()
            .timeout(Self::DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ServiceConfigError::Client(e.to_string()))?;
        Ok(HttpDrugInfoService { client, base_url })
    }

    /// `<base>/medicament/<name>`, name lowercased the way the upstream API
    /// expects, with the segment percent-encoded.
    fn medicament_url(&self, drug_name: &str) -> Result<Url, String> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| "base URL cannot carry path segments".to_string())?
            .push("medicament")
            .push(&drug_name.to_lowercase());
        Ok(url)
    }

    fn get(&self, drug_name: &str) -> Result<Response, String> {
        let url = self.medicament_url(drug_name)?;
        self.client.get(url).send().map_err(|e| e.to_string())
    }
}

impl DrugInfoService for HttpDrugInfoService {
    fn fetch_composition(&self, drug_name: &str) -> CompositionOutcome {
        let result = self.get(drug_name).and_then(|response| {
            if !response.status().is_success() {
                return Err(format!(
                    "External API failed with status: {}",
                    response.status().as_u16()
                ));
            }
            response.json::<Value>().map_err(|e| e.to_string())
        });
        match result {
            // The composition count is the length of the returned array.
            Ok(data) => CompositionOutcome {
                count: data.as_array().map_or(0, |a| a.len() as u64),
                error: None,
            },
            Err(error) => {
                tracing::warn!(drug_name, %error, "composition fetch failed");
                CompositionOutcome {
                    count: 0,
                    error: Some(error),
                }
            }
        }
    }

    fn fetch_drug_info(&self, drug_name: &str) -> LookupOutcome {
        let response = match self.get(drug_name) {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(drug_name, %error, "drug lookup failed");
                return LookupOutcome {
                    data: json!({ "message": error }),
                    error: true,
                };
            }
        };
        if response.status() == StatusCode::NOT_FOUND {
            return LookupOutcome::not_found(drug_name);
        }
        if !response.status().is_success() {
            return LookupOutcome {
                data: json!({
                    "message": format!(
                        "External API failed with status: {}",
                        response.status().as_u16()
                    ),
                }),
                error: true,
            };
        }
        match response.json::<Value>() {
            Ok(data) => LookupOutcome { data, error: false },
            Err(e) => LookupOutcome {
                data: json!({ "message": e.to_string() }),
                error: true,
            },
        }
    }
}
