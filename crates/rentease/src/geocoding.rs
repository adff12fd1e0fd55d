//! Pincode to address lookup used to prefill listing addresses.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GeocodingConfig;
use crate::marketplace::Address;

/// Resolves a postal code into area, city and state.
pub trait PincodeLookup: Send + Sync {
    fn lookup(&self, pincode: u32) -> Result<Address, LookupError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("pincode lookup is disabled")]
    Disabled,
    #[error("pincode lookup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("pincode service answered with status {0}")]
    Status(u16),
    #[error("pincode service returned an unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no address details found for pincode {0}")]
    NoMatch(u32),
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(rename = "PostOffice", default)]
    post_offices: Option<Vec<PostOffice>>,
}

#[derive(Debug, Deserialize)]
struct PostOffice {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "District")]
    district: String,
    #[serde(rename = "State")]
    state: String,
}

/// Map a postalpincode.in response body to an address using the first post office.
pub fn parse_lookup_response(body: &str, pincode: u32) -> Result<Address, LookupError> {
    let responses: Vec<LookupResponse> = serde_json::from_str(body)?;

    let post_office = responses
        .into_iter()
        .next()
        .and_then(|response| response.post_offices)
        .and_then(|offices| offices.into_iter().next())
        .ok_or(LookupError::NoMatch(pincode))?;

    Ok(Address {
        area: post_office.name,
        city: post_office.district,
        state: post_office.state,
        pincode,
    })
}

/// Client for the India Post pincode API.
pub struct PostalPincodeClient {
    client: Client,
    base_url: String,
}

impl PostalPincodeClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl PincodeLookup for PostalPincodeClient {
    fn lookup(&self, pincode: u32) -> Result<Address, LookupError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), pincode);
        debug!(%url, "looking up pincode");

        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.text()?;
        parse_lookup_response(&body, pincode)
    }
}

/// Lookup that always declines, for offline use.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLookup;

impl PincodeLookup for DisabledLookup {
    fn lookup(&self, _pincode: u32) -> Result<Address, LookupError> {
        Err(LookupError::Disabled)
    }
}

/// Build the configured lookup. A client that cannot be constructed degrades to
/// [`DisabledLookup`].
pub fn from_config(config: &GeocodingConfig) -> Box<dyn PincodeLookup> {
    if !config.enabled {
        return Box::new(DisabledLookup);
    }

    match PostalPincodeClient::new(config.base_url.clone(), config.timeout) {
        Ok(client) => Box::new(client),
        Err(err) => {
            warn!(error = %err, "pincode lookup unavailable; falling back to manual entry");
            Box::new(DisabledLookup)
        }
    }
}
