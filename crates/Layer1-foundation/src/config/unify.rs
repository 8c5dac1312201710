//! Unify connection settings
//!
//! 로드 순서 (뒤가 우선): 기본값 → 글로벌 → 프로젝트 → 환경변수

use crate::auth::UsernamePasswordAuth;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 설정 파일명
pub const UNIFY_CONFIG_FILE: &str = "config.toml";

/// 글로벌 설정 디렉토리 (<config dir>/unify/)
pub const UNIFY_CONFIG_DIR: &str = "unify";

/// 프로젝트 설정 디렉토리 (./.unify/)
pub const UNIFY_PROJECT_DIR: &str = ".unify";

pub const DEFAULT_PROTOCOL: &str = "http";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 9100;
pub const DEFAULT_BASE_PATH: &str = "/api/versioned/v1/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a Unify instance
///
/// Every field is optional so layers can be merged; the `effective_*`
/// accessors fill in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifyConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl UnifyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// 글로벌 + 프로젝트 + 환경변수 병합 로드
    pub fn load() -> Result<Self> {
        let global_dir = dirs::config_dir().map(|dir| dir.join(UNIFY_CONFIG_DIR));
        let project_dir = std::env::current_dir()
            .ok()
            .map(|dir| dir.join(UNIFY_PROJECT_DIR));

        Self::load_layers(global_dir.as_deref(), project_dir.as_deref(), |key| {
            std::env::var(key).ok()
        })
    }

    /// Defaults, then `<global_dir>/config.toml`, then
    /// `<project_dir>/config.toml`, then `lookup` for `UNIFY_*` variables
    ///
    /// Missing directories and files are skipped.
    pub fn load_layers<F>(
        global_dir: Option<&Path>,
        project_dir: Option<&Path>,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        for dir in [global_dir, project_dir].into_iter().flatten() {
            let path = dir.join(UNIFY_CONFIG_FILE);
            if path.exists() {
                config.merge(Self::load_from(&path)?);
            }
        }

        config.apply_env_with(lookup);
        tracing::debug!(origin = %config.origin(), "Loaded Unify config");

        Ok(config)
    }

    /// Load a single file, without defaults layering or env overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(toml::from_str(&content)?)
    }

    /// Fields set in `other` win
    pub fn merge(&mut self, other: UnifyConfig) {
        if other.protocol.is_some() {
            self.protocol = other.protocol;
        }
        if other.host.is_some() {
            self.host = other.host;
        }
        if other.port.is_some() {
            self.port = other.port;
        }
        if other.base_path.is_some() {
            self.base_path = other.base_path;
        }
        if other.username.is_some() {
            self.username = other.username;
        }
        if other.password.is_some() {
            self.password = other.password;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }

    /// 환경변수 오버라이드 (UNIFY_*)
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(protocol) = lookup("UNIFY_PROTOCOL") {
            self.protocol = Some(protocol);
        }
        if let Some(host) = lookup("UNIFY_HOST") {
            self.host = Some(host);
        }
        if let Some(port) = lookup("UNIFY_PORT") {
            match port.parse() {
                Ok(port) => self.port = Some(port),
                Err(_) => tracing::warn!("Ignoring invalid UNIFY_PORT: {}", port),
            }
        }
        if let Some(base_path) = lookup("UNIFY_BASE_PATH") {
            self.base_path = Some(base_path);
        }
        if let Some(username) = lookup("UNIFY_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = lookup("UNIFY_PASSWORD") {
            self.password = Some(password);
        }
    }

    // ========================================================================
    // Effective values
    // ========================================================================

    pub fn effective_protocol(&self) -> &str {
        self.protocol.as_deref().unwrap_or(DEFAULT_PROTOCOL)
    }

    pub fn effective_host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// `protocol://host:port`
    pub fn origin(&self) -> String {
        format!(
            "{}://{}:{}",
            self.effective_protocol(),
            self.effective_host(),
            self.effective_port()
        )
    }

    /// Base path with a leading and trailing `/`
    pub fn normalized_base_path(&self) -> String {
        normalize_base_path(self.base_path.as_deref().unwrap_or(DEFAULT_BASE_PATH))
    }

    pub fn credentials(&self) -> Result<UsernamePasswordAuth> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                Ok(UsernamePasswordAuth::new(username.clone(), password.clone()))
            }
            (None, _) => Err(Error::Config(
                "No username configured. Set UNIFY_USERNAME or add `username` to config.toml"
                    .to_string(),
            )),
            (_, None) => Err(Error::Config(
                "No password configured. Set UNIFY_PASSWORD or add `password` to config.toml"
                    .to_string(),
            )),
        }
    }
}

/// Ensure a leading and trailing `/`
pub fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}
