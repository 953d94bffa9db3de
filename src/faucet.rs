//! Faucet HTTP boundary
//!
//! The faucet speaks an untyped protocol: HTTP 200 means the transfer was
//! queued, a non-200 carrying [`BUSY_BODY`] means "try again shortly", and any
//! other non-200 is a refusal for that address. [`FaucetReply::classify`] is
//! the only place that knows about the literal body.

use crate::address::EthAddress;
use crate::config::{DripConfig, FaucetMethod};
use crate::error::{DripError, DripResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;


pub const BUSY_BODY: &str = r#"{"message":"Another transaction is processing, please wait"}"#;


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaucetReply {

    Funded,

    Busy,

    Rejected { status: u16, reason: String },
}

impl FaucetReply {

    pub fn classify(status: u16, body: &str) -> Self {
        if status == 200 {
            return FaucetReply::Funded;
        }

        if body == BUSY_BODY {
            return FaucetReply::Busy;
        }

        FaucetReply::Rejected {
            status,
            reason: rejection_reason(body),
        }
    }
}


#[derive(Deserialize)]
struct FaucetMessage {
    message: String,
}

fn rejection_reason(body: &str) -> String {
    match serde_json::from_str::<FaucetMessage>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => "empty response".to_string(),
        Err(_) => body.trim().to_string(),
    }
}


/// `Err(DripError::Network)` is a transport failure; faucet-level outcomes
/// are always `Ok`.
pub trait Faucet {
    fn request_funds(&self, address: &EthAddress) -> DripResult<FaucetReply>;
}


#[derive(Debug, Clone)]
pub struct FaucetSettings {
    pub url: String,
    pub token: String,
    pub method: FaucetMethod,
    pub timeout: Duration,
}

impl FaucetSettings {
    pub fn from_config(config: &DripConfig) -> Self {
        Self {
            url: config.ethereum.faucet.clone(),
            token: config.request.token.clone(),
            method: config.request.method,
            timeout: config.request_timeout(),
        }
    }
}


pub struct HttpFaucet {
    settings: FaucetSettings,
    client: reqwest::blocking::Client,
}

impl HttpFaucet {
    pub fn new(settings: FaucetSettings) -> DripResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .user_agent(format!("drip/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DripError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { settings, client })
    }
}

impl Faucet for HttpFaucet {
    fn request_funds(&self, address: &EthAddress) -> DripResult<FaucetReply> {
        let method = match self.settings.method {
            FaucetMethod::Get => reqwest::Method::GET,
            FaucetMethod::Post => reqwest::Method::POST,
        };
        let address = address.to_string();

        let response = self
            .client
            .request(method, &self.settings.url)
            .query(&[("token", self.settings.token.as_str()), ("address", address.as_str())])
            .send()
            .map_err(|e| DripError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| DripError::Network(format!("Failed to read faucet response: {}", e)))?;

        debug!(%address, status, body = %body, "faucet replied");
        Ok(FaucetReply::classify(status, &body))
    }
}
