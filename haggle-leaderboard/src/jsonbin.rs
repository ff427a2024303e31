//! JSONBin-compatible remote document store.
//!
//! Reads `GET {base}/b/{bin}/latest` (the list sits under `record`) and
//! writes `PUT {base}/b/{bin}` with the bare list as the body. Both calls
//! carry the master key in `X-Master-Key`.

use std::time::Duration;

use async_trait::async_trait;
use haggle_game::ScoreEntry;
use serde::Deserialize;

use crate::error::LeaderboardError;
use crate::store::ScoreStore;

pub const DEFAULT_BASE_URL: &str = "https://api.jsonbin.io/v3";
pub const MASTER_KEY_HEADER: &str = "X-Master-Key";

pub const KEY_ENV_VAR: &str = "HAGGLE_JSONBIN_KEY";
pub const BIN_ENV_VAR: &str = "HAGGLE_JSONBIN_BIN";
pub const URL_ENV_VAR: &str = "HAGGLE_JSONBIN_URL";

/// Where the leaderboard document lives and how to authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonBinConfig {
    pub base_url: String,
    pub bin_id: String,
    pub master_key: String,
    /// Per-request timeout. `None` keeps the HTTP client's default (no limit).
    pub timeout_ms: Option<u64>,
}

impl JsonBinConfig {
    #[must_use]
    pub fn new(bin_id: impl Into<String>, master_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bin_id: bin_id.into(),
            master_key: master_key.into(),
            timeout_ms: None,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Read `HAGGLE_JSONBIN_KEY`, `HAGGLE_JSONBIN_BIN`, and optionally
    /// `HAGGLE_JSONBIN_URL` from the environment.
    ///
    /// # Errors
    ///
    /// Returns `Config` when the key or bin id is missing.
    pub fn from_env() -> Result<Self, LeaderboardError> {
        let key = std::env::var(KEY_ENV_VAR)
            .map_err(|_| LeaderboardError::Config(format!("{KEY_ENV_VAR} is not set")))?;
        let bin = std::env::var(BIN_ENV_VAR)
            .map_err(|_| LeaderboardError::Config(format!("{BIN_ENV_VAR} is not set")))?;
        let config = Self::new(bin, key);
        Ok(match std::env::var(URL_ENV_VAR) {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(url.trim()),
            _ => config,
        })
    }

    fn validate(&self) -> Result<(), LeaderboardError> {
        if self.base_url.trim().is_empty() {
            return Err(LeaderboardError::Config(
                "jsonbin base url cannot be empty".to_string(),
            ));
        }
        if self.bin_id.trim().is_empty() {
            return Err(LeaderboardError::Config(
                "jsonbin bin id cannot be empty".to_string(),
            ));
        }
        if self.master_key.trim().is_empty() {
            return Err(LeaderboardError::Config(
                "jsonbin master key cannot be empty".to_string(),
            ));
        }
        if self.timeout_ms == Some(0) {
            return Err(LeaderboardError::Config(
                "jsonbin timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct LatestRecord {
    #[serde(default)]
    record: Vec<ScoreEntry>,
}

pub struct JsonBinStore {
    bin_url: String,
    master_key: String,
    client: reqwest::Client,
}

impl JsonBinStore {
    /// # Errors
    ///
    /// Returns `Config` for blank fields or a zero timeout, or if the HTTP
    /// client cannot be built.
    pub fn new(config: JsonBinConfig) -> Result<Self, LeaderboardError> {
        config.validate()?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder
            .build()
            .map_err(|error| LeaderboardError::Config(error.to_string()))?;
        Ok(Self {
            bin_url: format!(
                "{}/b/{}",
                config.base_url.trim().trim_end_matches('/'),
                config.bin_id.trim()
            ),
            master_key: config.master_key,
            client,
        })
    }

    async fn error_for_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, LeaderboardError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(LeaderboardError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ScoreStore for JsonBinStore {
    fn name(&self) -> &'static str {
        "jsonbin"
    }

    async fn load(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let response = self
            .client
            .get(format!("{}/latest", self.bin_url))
            .header(MASTER_KEY_HEADER, &self.master_key)
            .send()
            .await?;
        let response = Self::error_for_status(response).await?;
        let body = response.text().await?;
        let latest: LatestRecord = serde_json::from_str(&body)?;
        Ok(latest.record)
    }

    async fn replace(&self, entries: &[ScoreEntry]) -> Result<(), LeaderboardError> {
        let response = self
            .client
            .put(&self.bin_url)
            .header(MASTER_KEY_HEADER, &self.master_key)
            .json(entries)
            .send()
            .await?;
        Self::error_for_status(response).await?;
        Ok(())
    }
}
