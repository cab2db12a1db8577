// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

// Router Configuration Types
//
// Defines the configuration schema for a NEXIS router process:
// - HTTP bind settings and CORS origins
// - Credentials and endpoints for each backend
// - The public model table (key -> backend + upstream model)
// - Default model key and outbound timeout
// - Logging settings
//
// Loaded once at startup, then shared read-only. Adapters never read the
// environment themselves; everything they need is resolved here first.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::llm::{BackendKind, GenerationOptions};
use super::model_registry::{default_model_bindings, ModelBinding, ModelRegistry, RegistryError};

/// Prefix that marks a value to be read from the environment.
pub const ENV_PREFIX: &str = "env:";

pub const DEFAULT_GITHUB_MODELS_ENDPOINT: &str = "https://models.github.ai/inference";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are NEXIS AI, a helpful assistant.";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://nexis-ai-frontend.onrender.com";

/// Top-level router configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Key used when a request names no model
    #[serde(default = "default_model_key")]
    pub default_model: String,

    /// Upper bound on every outbound backend call, in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Per-backend endpoints and credentials
    #[serde(default)]
    pub backends: BackendsConfig,

    /// Public model table
    #[serde(default = "default_model_bindings")]
    pub models: Vec<ModelBinding>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Network bind address (e.g. "0.0.0.0" or "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP API port
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendsConfig {
    #[serde(default)]
    pub github_models: GithubModelsConfig,

    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub tunnel: TunnelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubModelsConfig {
    /// Base URL; "/chat/completions" is appended
    #[serde(default = "default_github_models_endpoint")]
    pub endpoint: String,

    /// Bearer token (supports "env:VAR_NAME")
    #[serde(default = "default_github_token")]
    pub token: Option<String>,

    /// Maximum output tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Assistant persona sent as the system message
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL; "/models/<model>:generateContent" is appended
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,

    /// API key (supports "env:VAR_NAME")
    #[serde(default = "default_gemini_api_key")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TunnelConfig {
    /// Public tunnel URL; changes between deployments (supports "env:VAR_NAME")
    #[serde(default = "default_tunnel_url")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_model_key() -> String {
    "tinyllama".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec![DEFAULT_ALLOWED_ORIGIN.to_string()]
}

fn default_github_models_endpoint() -> String {
    DEFAULT_GITHUB_MODELS_ENDPOINT.to_string()
}

fn default_github_token() -> Option<String> {
    Some("env:GITHUB_TOKEN".to_string())
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_gemini_endpoint() -> String {
    DEFAULT_GEMINI_ENDPOINT.to_string()
}

fn default_gemini_api_key() -> Option<String> {
    Some("env:GEMINI_API_KEY".to_string())
}

fn default_tunnel_url() -> Option<String> {
    Some("env:TUNNEL_URL".to_string())
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for GithubModelsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_github_models_endpoint(),
            token: default_github_token(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_gemini_endpoint(),
            api_key: default_gemini_api_key(),
        }
    }
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            base_url: default_tunnel_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            default_model: default_model_key(),
            timeout_seconds: default_timeout_seconds(),
            backends: BackendsConfig::default(),
            models: default_model_bindings(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Resolve a value that may use "env:VAR_NAME" indirection.
pub fn resolve_secret(
    value: &Option<String>,
    lookup: &impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Option<String>> {
    match value {
        Some(v) => match v.strip_prefix(ENV_PREFIX) {
            Some(var_name) => lookup(var_name)
                .map(Some)
                .ok_or_else(|| anyhow::anyhow!("Environment variable not set: {}", var_name)),
            None => Ok(Some(v.clone())),
        },
        None => Ok(None),
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl RouterConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Configuration file locations, in the order they are checked
    /// 1. NEXIS_CONFIG_PATH environment variable
    /// 2. ./nexis-config.yaml (working directory)
    /// 3. ~/.nexis/config.yaml (user home)
    /// 4. /etc/nexis/config.yaml (system, Unix) or C:\ProgramData\Nexis\config.yaml (Windows)
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("NEXIS_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("./nexis-config.yaml"));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".nexis").join("config.yaml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/nexis/config.yaml"));
        #[cfg(windows)]
        paths.push(PathBuf::from("C:\\ProgramData\\Nexis\\config.yaml"));

        paths
    }

    /// First existing configuration file, if any
    pub fn discover_config() -> Option<PathBuf> {
        Self::candidate_paths().into_iter().find(|p| p.exists())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path: fail if missing/invalid
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(process_env);
    }

    /// Same as [`apply_env_overrides`](Self::apply_env_overrides) with an explicit lookup
    pub fn apply_env_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("GITHUB_TOKEN") {
            tracing::info!("Environment override: GITHUB_TOKEN");
            self.backends.github_models.token = Some(token);
        }

        if let Some(key) = lookup("GEMINI_API_KEY") {
            tracing::info!("Environment override: GEMINI_API_KEY");
            self.backends.gemini.api_key = Some(key);
        }

        if let Some(url) = lookup("TUNNEL_URL") {
            tracing::info!("Environment override: TUNNEL_URL={}", url);
            self.backends.tunnel.base_url = Some(url);
        }

        if let Some(model) = lookup("NEXIS_DEFAULT_MODEL") {
            tracing::info!("Environment override: NEXIS_DEFAULT_MODEL={}", model);
            self.default_model = model;
        }

        if let Some(val) = lookup("NEXIS_TIMEOUT_SECONDS") {
            match val.parse::<u64>() {
                Ok(secs) => {
                    tracing::info!("Environment override: NEXIS_TIMEOUT_SECONDS={}", secs);
                    self.timeout_seconds = secs;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for NEXIS_TIMEOUT_SECONDS: '{}'. Expected seconds. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Replace every "env:VAR_NAME" credential with its value
    pub fn resolve_secrets(&mut self) -> anyhow::Result<()> {
        self.resolve_secrets_from(process_env)
    }

    /// Same as [`resolve_secrets`](Self::resolve_secrets) with an explicit lookup.
    ///
    /// An unset variable only matters for backends the model table uses; for
    /// the others the credential is cleared.
    pub fn resolve_secrets_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        let used = self.model_registry()?.backends();

        let github = &mut self.backends.github_models.token;
        *github = resolve_or_clear(github, &lookup, used.contains(&BackendKind::GithubModels))?;

        let gemini = &mut self.backends.gemini.api_key;
        *gemini = resolve_or_clear(gemini, &lookup, used.contains(&BackendKind::Gemini))?;

        let tunnel = &mut self.backends.tunnel.base_url;
        *tunnel = resolve_or_clear(tunnel, &lookup, used.contains(&BackendKind::Tunnel))?;

        Ok(())
    }

    /// Build the immutable model table
    pub fn model_registry(&self) -> Result<ModelRegistry, RegistryError> {
        ModelRegistry::from_bindings(&self.models)
    }

    /// Outbound timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Generation options applied to every dispatched call
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            max_tokens: self.backends.github_models.max_tokens,
            temperature: self.backends.github_models.temperature,
            timeout: self.timeout(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let registry = self.model_registry()?;

        if registry.is_empty() {
            anyhow::bail!("At least one model must be configured");
        }

        if !registry.contains(&self.default_model) {
            anyhow::bail!(
                "Default model '{}' is not in the model table",
                self.default_model
            );
        }

        if self.timeout_seconds == 0 {
            anyhow::bail!("timeout_seconds must be greater than zero");
        }

        let github = &self.backends.github_models;
        if github.max_tokens == 0 {
            anyhow::bail!("backends.github_models.max_tokens must be greater than zero");
        }
        if !(0.0..=2.0).contains(&github.temperature) {
            anyhow::bail!(
                "backends.github_models.temperature must be between 0 and 2, got {}",
                github.temperature
            );
        }

        let used = registry.backends();
        if used.contains(&BackendKind::GithubModels) && github.endpoint.is_empty() {
            anyhow::bail!("backends.github_models.endpoint cannot be empty");
        }
        if used.contains(&BackendKind::Gemini) && self.backends.gemini.endpoint.is_empty() {
            anyhow::bail!("backends.gemini.endpoint cannot be empty");
        }

        Ok(())
    }

    /// Fail when a backend the model table uses has no credential.
    ///
    /// Call after [`resolve_secrets`](Self::resolve_secrets).
    pub fn check_credentials(&self) -> anyhow::Result<()> {
        for kind in self.model_registry()?.backends() {
            let (field, value) = match kind {
                BackendKind::GithubModels => {
                    ("backends.github_models.token", &self.backends.github_models.token)
                }
                BackendKind::Gemini => ("backends.gemini.api_key", &self.backends.gemini.api_key),
                BackendKind::Tunnel => ("backends.tunnel.base_url", &self.backends.tunnel.base_url),
                BackendKind::Echo => continue,
            };

            match value.as_deref() {
                Some(v) if !v.is_empty() && !v.starts_with(ENV_PREFIX) => {}
                _ => anyhow::bail!("{} is required by '{}' models but is not set", field, kind),
            }
        }
        Ok(())
    }

    /// Resolve secrets, validate and check credentials in one step.
    pub fn prepare(mut self) -> anyhow::Result<Self> {
        self.resolve_secrets()?;
        self.validate()?;
        self.check_credentials()?;
        Ok(self)
    }
}

fn resolve_or_clear(
    value: &Option<String>,
    lookup: &impl Fn(&str) -> Option<String>,
    required: bool,
) -> anyhow::Result<Option<String>> {
    match resolve_secret(value, lookup) {
        Ok(resolved) => Ok(resolved),
        Err(e) if required => Err(e),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model_registry::ECHO_MODEL;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn echo_only() -> RouterConfig {
        RouterConfig {
            models: vec![ModelBinding::new("tinyllama", BackendKind::Echo, ECHO_MODEL)],
            ..RouterConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert_eq!(config.default_model, "tinyllama");
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.backends.github_models.max_tokens, 1000);
        assert!((config.backends.github_models.temperature - 0.7).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = RouterConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config.default_model, "tinyllama");
        assert_eq!(config.models, default_model_bindings());
        assert_eq!(
            config.backends.tunnel.base_url.as_deref(),
            Some("env:TUNNEL_URL")
        );
    }

    #[test]
    fn test_yaml_model_table() {
        let yaml = r#"
default_model: fast
timeout_seconds: 10
backends:
  gemini:
    api_key: literal-key
models:
  - key: fast
    backend: gemini
    model: gemini-1.5-flash
  - key: soon
    backend: echo
    model: unimplemented
"#;
        let config = RouterConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.models.len(), 2);
        assert_eq!(config.models[0].backend, BackendKind::Gemini);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nexis-config.yaml");

        let mut config = RouterConfig::default();
        config.server.port = 9100;
        config.to_yaml_file(&path).unwrap();

        let loaded = RouterConfig::from_yaml_file(&path).unwrap();
        assert_eq!(loaded.server.port, 9100);
        assert_eq!(loaded.models, config.models);
    }

    #[test]
    fn test_validation() {
        let mut config = RouterConfig::default();
        assert!(config.validate().is_ok());

        config.default_model = "TinyLlama".to_string();
        assert!(config.validate().is_err());
        config.default_model = "tinyllama".to_string();

        config.timeout_seconds = 0;
        assert!(config.validate().is_err());
        config.timeout_seconds = 30;

        config.backends.github_models.temperature = 3.5;
        assert!(config.validate().is_err());
        config.backends.github_models.temperature = 0.7;

        config.models.push(ModelBinding::new("qwen", BackendKind::Echo, ECHO_MODEL));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RouterConfig::default();
        config.apply_env_overrides_from(env(&[
            ("TUNNEL_URL", "https://abc.ngrok.app"),
            ("NEXIS_DEFAULT_MODEL", "qwen"),
            ("NEXIS_TIMEOUT_SECONDS", "not-a-number"),
        ]));

        assert_eq!(
            config.backends.tunnel.base_url.as_deref(),
            Some("https://abc.ngrok.app")
        );
        assert_eq!(config.default_model, "qwen");
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_resolve_secret() {
        let lookup = env(&[("TOKEN", "abc")]);
        assert_eq!(
            resolve_secret(&Some("env:TOKEN".into()), &lookup).unwrap(),
            Some("abc".to_string())
        );
        assert_eq!(
            resolve_secret(&Some("plain".into()), &lookup).unwrap(),
            Some("plain".to_string())
        );
        assert_eq!(resolve_secret(&None, &lookup).unwrap(), None);
        assert!(resolve_secret(&Some("env:MISSING".into()), &lookup).is_err());
    }

    #[test]
    fn test_missing_credentials_are_fatal() {
        let mut config = RouterConfig::default();
        let err = config
            .resolve_secrets_from(env(&[("GITHUB_TOKEN", "t"), ("GEMINI_API_KEY", "k")]))
            .unwrap_err();
        assert!(err.to_string().contains("TUNNEL_URL"));

        let mut config = RouterConfig::default();
        config.backends.tunnel.base_url = Some(String::new());
        config
            .resolve_secrets_from(env(&[("GITHUB_TOKEN", "t"), ("GEMINI_API_KEY", "k")]))
            .unwrap();
        assert!(config.check_credentials().is_err());
    }

    #[test]
    fn test_all_credentials_present() {
        let mut config = RouterConfig::default();
        config
            .resolve_secrets_from(env(&[
                ("GITHUB_TOKEN", "t"),
                ("GEMINI_API_KEY", "k"),
                ("TUNNEL_URL", "https://tunnel.example"),
            ]))
            .unwrap();
        assert!(config.check_credentials().is_ok());
        assert_eq!(config.backends.github_models.token.as_deref(), Some("t"));
    }

    #[test]
    fn test_unused_backends_need_no_credentials() {
        let mut config = echo_only();
        config.resolve_secrets_from(env(&[])).unwrap();
        assert!(config.check_credentials().is_ok());
        assert!(config.backends.github_models.token.is_none());
    }
}
