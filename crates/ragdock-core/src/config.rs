//! Configuration resolved once at process start.
//!
//! `ServiceMode` decides whether service traits are backed by remote HTTP
//! clients or by in-memory implementations. The decision is made here, in one
//! place, and never re-read from the environment by the services themselves.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default request timeout for storage and search calls, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default LLM completion timeout, in seconds.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
/// Extra allowance on top of the LLM timeout before the HTTP client gives up.
pub const LLM_TIMEOUT_BUFFER_SECS: u64 = 5;

/// Which implementation backs each external service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    /// Remote HTTP services (object storage, search, LLM).
    Remote,
    /// In-memory implementations, for development and tests.
    Memory,
}

impl ServiceMode {
    fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "memory" => Ok(Self::Memory),
            other => Err(Error::Config(format!(
                "unknown service mode '{other}' (expected 'remote' or 'memory')"
            ))),
        }
    }
}

/// Object storage connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Base URL of the blob endpoint, e.g. `https://acct.blob.example.net`.
    pub endpoint: String,
    /// Shared access token appended to read requests.
    pub access_token: Option<String>,
    /// Default container holding uploaded documents.
    pub container: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Search service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Base URL of the search service.
    pub endpoint: String,
    /// Admin API key sent in the `api-key` header.
    pub api_key: String,
    /// REST API version query parameter.
    pub api_version: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// LLM chat-completion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Chat completions URL (OpenAI-compatible).
    pub endpoint: String,
    /// API key for the `Authorization: Bearer` header.
    pub api_key: Option<String>,
    /// Model (or deployment) name.
    pub model: String,
    /// Completion timeout in seconds. The HTTP client allows an extra
    /// [`LLM_TIMEOUT_BUFFER_SECS`] on top before treating the call as hung.
    pub timeout_secs: u64,
}

/// Top-level RagDock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    pub mode: ServiceMode,
    pub storage: StorageSettings,
    pub search: SearchSettings,
    pub llm: LlmSettings,
}

impl RagConfig {
    /// Resolve configuration from the environment.
    ///
    /// `RAGDOCK_MODE=memory` selects the in-memory service implementations;
    /// in that mode the endpoint variables may be left unset.
    pub fn from_env() -> Result<Self> {
        let mode = match std::env::var("RAGDOCK_MODE") {
            Ok(v) => ServiceMode::parse(&v)?,
            Err(_) => ServiceMode::Remote,
        };

        let storage = StorageSettings {
            endpoint: env_or(mode, "RAGDOCK_STORAGE_ENDPOINT")?,
            access_token: std::env::var("RAGDOCK_STORAGE_TOKEN").ok(),
            container: std::env::var("RAGDOCK_STORAGE_CONTAINER")
                .unwrap_or_else(|_| "documents".into()),
            timeout_secs: env_secs("RAGDOCK_STORAGE_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let search = SearchSettings {
            endpoint: env_or(mode, "RAGDOCK_SEARCH_ENDPOINT")?,
            api_key: env_or(mode, "RAGDOCK_SEARCH_API_KEY")?,
            api_version: std::env::var("RAGDOCK_SEARCH_API_VERSION")
                .unwrap_or_else(|_| "2023-11-01".into()),
            timeout_secs: env_secs("RAGDOCK_SEARCH_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let llm = LlmSettings {
            endpoint: env_or(mode, "RAGDOCK_LLM_ENDPOINT")?,
            api_key: std::env::var("RAGDOCK_LLM_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok(),
            model: std::env::var("RAGDOCK_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            timeout_secs: env_secs("RAGDOCK_LLM_TIMEOUT_SECS", DEFAULT_LLM_TIMEOUT_SECS),
        };

        Ok(Self {
            mode,
            storage,
            search,
            llm,
        })
    }

    /// An all-in-memory configuration, for tests and local development.
    pub fn in_memory() -> Self {
        Self {
            mode: ServiceMode::Memory,
            storage: StorageSettings {
                endpoint: String::new(),
                access_token: None,
                container: "documents".into(),
                timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            search: SearchSettings {
                endpoint: String::new(),
                api_key: String::new(),
                api_version: "2023-11-01".into(),
                timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            llm: LlmSettings {
                endpoint: String::new(),
                api_key: None,
                model: "offline".into(),
                timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            },
        }
    }
}

/// Required in remote mode, optional (empty) in memory mode.
fn env_or(mode: ServiceMode, key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(v) => Ok(v),
        Err(_) if mode == ServiceMode::Memory => Ok(String::new()),
        Err(_) => Err(Error::Config(format!("{key} is not set"))),
    }
}

fn env_secs(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
