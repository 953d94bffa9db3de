//! Configuration for drip
//!
//! Layered in this order: JSON file (`--config` or `DRIP_CONFIG`), then
//! environment variables, then command line overrides. [`DripConfig::validate`]
//! runs last and any failure aborts the run.

use crate::error::{DripError, DripResult};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;


pub const CONFIG_ENV: &str = "DRIP_CONFIG";

pub const DEFAULT_TOKEN: &str = "Q";

/// Upper bound for any single configured wait.
pub const MAX_DELAY_MS: u64 = 3_600_000;

pub const MAX_DEADLINE_SECS: u64 = 7 * 24 * 3_600;


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DripConfig {

    #[serde(default)]
    pub ethereum: EthereumConfig,

    #[serde(default)]
    pub request: RequestConfig,

    #[serde(default)]
    pub pacing: PacingConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub derivation: DerivationConfig,

    /// Hard stop for the whole funding run.
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EthereumConfig {

    #[serde(default)]
    pub mnemonic: String,

    #[serde(default)]
    pub addresses_number: u32,

    #[serde(default)]
    pub start_number: u32,

    /// Base URL of the faucet endpoint.
    #[serde(default)]
    pub faucet: String,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaucetMethod {
    Get,
    Post,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {

    pub token: String,

    pub method: FaucetMethod,

    pub timeout_secs: u64,

    pub busy_delay_ms: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            token: DEFAULT_TOKEN.to_string(),
            method: FaucetMethod::Post,
            timeout_secs: 20,
            busy_delay_ms: 5_000,
        }
    }
}


/// Delay between two addresses: `base_delay_ms + uniform(0, jitter_ms)`, or
/// `base_delay_ms + fallback_jitter_ms` when randomness is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {

    pub base_delay_ms: u64,

    pub jitter_ms: u64,

    pub fallback_jitter_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 3_000,
            jitter_ms: 8_500,
            fallback_jitter_ms: 3_000,
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {

    /// Transport failures tolerated per address before it is marked failed.
    pub max_transport_retries: usize,

    pub min_backoff_ms: u64,

    pub max_backoff_ms: u64,

    /// `None` keeps retrying a busy faucet until the deadline.
    pub max_busy_retries: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_transport_retries: 8,
            min_backoff_ms: 500,
            max_backoff_ms: 30_000,
            max_busy_retries: None,
        }
    }
}


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivationConfig {

    pub range: IndexRange,
}


#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexRange {
    /// `[start, start + count)`
    #[default]
    Exact,

    /// `[0, count + start)`, of which the first `count` are funded.
    Legacy,
}

impl IndexRange {

    pub fn derivation_range(&self, start: u32, count: u32) -> DripResult<Range<u32>> {
        let end = start.checked_add(count).ok_or_else(|| {
            DripError::Config(format!("Index range overflows: start {} + count {}", start, count))
        })?;

        Ok(match self {
            IndexRange::Exact => start..end,
            IndexRange::Legacy => 0..end,
        })
    }
}

impl DripConfig {

    pub fn load(path: Option<&Path>) -> DripResult<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> DripResult<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            DripError::Config(format!("Cannot read config {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&data).map_err(|e| {
            DripError::Config(format!("Malformed config {}: {}", path.display(), e))
        })
    }

    /// Applies `ETHEREUM_*` and `DRIP_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> DripResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mnemonic) = lookup("ETHEREUM_MNEMONIC") {
            self.ethereum.mnemonic = mnemonic;
        }

        if let Some(count) = lookup("ETHEREUM_ADDRESSES_NUMBER") {
            self.ethereum.addresses_number = parse_env("ETHEREUM_ADDRESSES_NUMBER", &count)?;
        }

        if let Some(start) = lookup("ETHEREUM_START_NUMBER") {
            self.ethereum.start_number = parse_env("ETHEREUM_START_NUMBER", &start)?;
        }

        if let Some(faucet) = lookup("ETHEREUM_FAUCET") {
            self.ethereum.faucet = faucet;
        }

        if let Some(token) = lookup("DRIP_TOKEN") {
            self.request.token = token;
        }

        if let Some(timeout) = lookup("DRIP_TIMEOUT_SECS") {
            self.request.timeout_secs = parse_env("DRIP_TIMEOUT_SECS", &timeout)?;
        }

        if let Some(deadline) = lookup("DRIP_DEADLINE_SECS") {
            self.deadline_secs = Some(parse_env("DRIP_DEADLINE_SECS", &deadline)?);
        }

        Ok(())
    }

    /// Everything needed to derive accounts; no faucet settings.
    pub fn validate_derivation(&self) -> DripResult<()> {
        if self.ethereum.mnemonic.trim().is_empty() {
            return Err(DripError::Config("mnemonic is required".to_string()));
        }
        bip39::Mnemonic::parse_normalized(&self.ethereum.mnemonic)?;

        if self.ethereum.addresses_number == 0 {
            return Err(DripError::Config("addresses_number must be greater than zero".to_string()));
        }

        let range = self.derivation_range()?;
        if range.end > bip32::ChildNumber::HARDENED_FLAG {
            return Err(DripError::Config(format!(
                "Index range {:?} exceeds the non-hardened child space", range
            )));
        }

        if self.derivation.range == IndexRange::Legacy && self.ethereum.start_number > 0 {
            warn!(
                start_number = self.ethereum.start_number,
                "legacy range derives from index 0 and funds the first {} accounts",
                self.ethereum.addresses_number
            );
        }

        Ok(())
    }

    pub fn validate(&self) -> DripResult<()> {
        self.validate_derivation()?;

        validate_faucet_url(&self.ethereum.faucet)?;

        if self.request.timeout_secs == 0 {
            return Err(DripError::Config("request timeout must be greater than zero".to_string()));
        }

        if self.retry.min_backoff_ms > self.retry.max_backoff_ms {
            return Err(DripError::Config(format!(
                "min_backoff_ms ({}) exceeds max_backoff_ms ({})",
                self.retry.min_backoff_ms, self.retry.max_backoff_ms
            )));
        }

        let delays = [
            ("request.busy_delay_ms", self.request.busy_delay_ms),
            ("pacing.base_delay_ms", self.pacing.base_delay_ms),
            ("pacing.jitter_ms", self.pacing.jitter_ms),
            ("pacing.fallback_jitter_ms", self.pacing.fallback_jitter_ms),
            ("retry.max_backoff_ms", self.retry.max_backoff_ms),
        ];
        for (name, value) in delays {
            if value > MAX_DELAY_MS {
                return Err(DripError::Config(format!(
                    "{} ({}) exceeds the {} ms limit", name, value, MAX_DELAY_MS
                )));
            }
        }

        if let Some(deadline) = self.deadline_secs {
            if deadline == 0 || deadline > MAX_DEADLINE_SECS {
                return Err(DripError::Config(format!(
                    "deadline_secs must be between 1 and {}, got {}", MAX_DEADLINE_SECS, deadline
                )));
            }
        }

        Ok(())
    }

    pub fn derivation_range(&self) -> DripResult<Range<u32>> {
        self.derivation
            .range
            .derivation_range(self.ethereum.start_number, self.ethereum.addresses_number)
    }

    /// Copy safe to print.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if !config.ethereum.mnemonic.is_empty() {
            config.ethereum.mnemonic = "<redacted>".to_string();
        }
        config
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request.timeout_secs)
    }

    pub fn busy_delay(&self) -> Duration {
        Duration::from_millis(self.request.busy_delay_ms)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}


fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> DripResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| DripError::Config(format!("{} has invalid value {:?}: {}", key, value, e)))
}


fn validate_faucet_url(faucet: &str) -> DripResult<()> {
    if faucet.is_empty() {
        return Err(DripError::Config("faucet URL is required".to_string()));
    }

    let url = reqwest::Url::parse(faucet)
        .map_err(|e| DripError::Config(format!("Invalid faucet URL {}: {}", faucet, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(DripError::Config(format!("Unsupported faucet URL scheme: {}", scheme))),
    }
}
