//! Configuration for the grading service
//!
//! The configuration is built once at startup (from the environment or a
//! TOML file) and shared read-only behind an `Arc` afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Number of credential slots for the multimodal provider
pub const CREDENTIAL_SLOTS: usize = 5;

/// Environment variables the service cannot work without
const REQUIRED_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GITHUB_API_TOKEN"];

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraderConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload intake configuration
    #[serde(default)]
    pub upload: UploadConfig,
    /// Gemini (multimodal) configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// GitHub Models (chat) configuration
    #[serde(default)]
    pub github: GithubModelsConfig,
}

impl GraderConfig {
    /// Build configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.server.host = host;
        }
        if let Some(port) = get("PORT").and_then(|v| v.parse().ok()) {
            config.server.port = port;
        }
        if let Some(bytes) = get("MAX_FILE_SIZE_MB")
            .and_then(|v| v.parse::<u64>().ok())
            .and_then(|mb| mb.checked_mul(1024 * 1024))
        {
            config.upload.max_file_size_bytes = bytes;
        }
        if let Some(max_files) = get("MAX_FILES").and_then(|v| v.parse().ok()) {
            config.upload.max_files = max_files;
        }
        if let Some(dir) = get("UPLOAD_DIR") {
            config.upload.upload_dir = PathBuf::from(dir);
        }

        config.gemini.api_keys = (0..CREDENTIAL_SLOTS)
            .map(|slot| get(&credential_var(slot)))
            .collect();
        if let Some(model) = get("GEMINI_MODEL") {
            config.gemini.default_model = model;
        }

        config.github.token = get("GITHUB_API_TOKEN");
        if let Some(model) = get("DEEPSEEK_MODEL") {
            config.github.deepseek_model = model;
        }
        if let Some(model) = get("GPT_MODEL") {
            config.github.gpt_model = model;
        }

        config
    }

    /// Required settings that are absent. Reported at startup; calls that
    /// need them fail later with a configuration failure.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_VARS
            .iter()
            .copied()
            .filter(|var| match *var {
                "GOOGLE_API_KEY" => self.gemini.api_key(0).is_none(),
                "GITHUB_API_TOKEN" => self.github.token.is_none(),
                _ => false,
            })
            .collect()
    }
}

/// Environment variable holding credential slot `slot`
fn credential_var(slot: usize) -> String {
    if slot == 0 {
        "GOOGLE_API_KEY".to_string()
    } else {
        format!("GOOGLE_API_KEY{}", slot)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
        }
    }
}

/// Upload intake configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory where uploads are staged until processed
    pub upload_dir: PathBuf,
    /// Maximum size of a single file (default: 10MB)
    pub max_file_size_bytes: u64,
    /// Maximum number of files per batch
    pub max_files: usize,
}

impl UploadConfig {
    /// Request body limit for multipart uploads
    pub fn body_limit(&self) -> usize {
        let total = self.max_file_size_bytes.saturating_mul(self.max_files as u64);
        // Room for multipart framing and text fields
        usize::try_from(total)
            .unwrap_or(usize::MAX)
            .saturating_add(1024 * 1024)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            max_file_size_bytes: 10 * 1024 * 1024, // 10MB
            max_files: 12,
        }
    }
}

/// Gemini (multimodal provider) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Ordered credential slots; unset slots are `None`
    #[serde(default)]
    pub api_keys: Vec<Option<String>>,
    /// API base URL
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Model used for extraction when the caller does not pick one
    #[serde(default = "default_flash_model")]
    pub default_model: String,
    /// Fast model variant
    #[serde(default = "default_flash_model")]
    pub flash_model: String,
    /// Large model variant
    #[serde(default = "default_pro_model")]
    pub pro_model: String,
    /// Output token cap per call
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Optional HTTP client timeout; unset means no client-side timeout
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_flash_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_pro_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_max_output_tokens() -> u32 {
    8192
}

impl GeminiConfig {
    /// Key configured in `slot`, if any
    pub fn api_key(&self, slot: usize) -> Option<&str> {
        self.api_keys
            .get(slot)
            .and_then(|key| key.as_deref())
            .filter(|key| !key.is_empty())
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_keys: vec![None; CREDENTIAL_SLOTS],
            base_url: default_gemini_base_url(),
            default_model: default_flash_model(),
            flash_model: default_flash_model(),
            pro_model: default_pro_model(),
            max_output_tokens: default_max_output_tokens(),
            request_timeout_secs: None,
        }
    }
}

/// GitHub Models (chat provider) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubModelsConfig {
    /// Bearer token
    #[serde(default)]
    pub token: Option<String>,
    /// Inference endpoint
    #[serde(default = "default_github_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_deepseek_model")]
    pub deepseek_model: String,
    #[serde(default = "default_gpt_model")]
    pub gpt_model: String,
    /// System message sent with DeepSeek requests
    #[serde(default)]
    pub deepseek_system_message: Option<String>,
    /// System message sent with GPT requests
    #[serde(default = "default_gpt_system_message")]
    pub gpt_system_message: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_sampling")]
    pub temperature: f32,
    #[serde(default = "default_sampling")]
    pub top_p: f32,
    /// Optional HTTP client timeout; unset means no client-side timeout
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_github_endpoint() -> String {
    "https://models.github.ai/inference".to_string()
}

fn default_deepseek_model() -> String {
    "deepseek/DeepSeek-V3-0324".to_string()
}

fn default_gpt_model() -> String {
    "openai/gpt-4o".to_string()
}

fn default_gpt_system_message() -> Option<String> {
    Some("You are a helpful assistant.".to_string())
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_sampling() -> f32 {
    1.0
}

impl Default for GithubModelsConfig {
    fn default() -> Self {
        Self {
            token: None,
            endpoint: default_github_endpoint(),
            deepseek_model: default_deepseek_model(),
            gpt_model: default_gpt_model(),
            deepseek_system_message: None,
            gpt_system_message: default_gpt_system_message(),
            max_tokens: default_max_tokens(),
            temperature: default_sampling(),
            top_p: default_sampling(),
            request_timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GraderConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upload.max_files, 12);
        assert_eq!(config.upload.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.gemini.api_keys.len(), CREDENTIAL_SLOTS);
        assert_eq!(config.gemini.pro_model, "gemini-2.5-pro");
        assert_eq!(config.github.gpt_system_message.as_deref(), Some("You are a helpful assistant."));
        assert!(config.github.deepseek_system_message.is_none());
    }

    #[test]
    fn test_from_lookup_reads_credential_slots() {
        let config = GraderConfig::from_lookup(lookup(&[
            ("GOOGLE_API_KEY", "key-0"),
            ("GOOGLE_API_KEY2", "key-2"),
            ("GOOGLE_API_KEY4", "  "),
            ("GITHUB_API_TOKEN", "gh-token"),
            ("PORT", "8081"),
            ("MAX_FILE_SIZE_MB", "4"),
            ("GPT_MODEL", "openai/gpt-4.1"),
        ]));

        assert_eq!(config.gemini.api_key(0), Some("key-0"));
        assert_eq!(config.gemini.api_key(1), None);
        assert_eq!(config.gemini.api_key(2), Some("key-2"));
        assert_eq!(config.gemini.api_key(4), None);
        assert_eq!(config.github.token.as_deref(), Some("gh-token"));
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.upload.max_file_size_bytes, 4 * 1024 * 1024);
        assert_eq!(config.github.gpt_model, "openai/gpt-4.1");
        assert!(config.missing_required().is_empty());
    }

    #[test]
    fn test_invalid_numbers_keep_defaults() {
        let config = GraderConfig::from_lookup(lookup(&[("PORT", "eighty"), ("MAX_FILES", "-3")]));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upload.max_files, 12);
    }

    #[test]
    fn test_oversized_file_limit_keeps_default() {
        let config = GraderConfig::from_lookup(lookup(&[("MAX_FILE_SIZE_MB", "18446744073709551615")]));
        assert_eq!(config.upload.max_file_size_bytes, 10 * 1024 * 1024);

        let config = GraderConfig::from_lookup(lookup(&[("MAX_FILE_SIZE_MB", "25")]));
        assert_eq!(config.upload.max_file_size_bytes, 25 * 1024 * 1024);
    }

    #[test]
    fn test_missing_required() {
        let config = GraderConfig::from_lookup(lookup(&[("GOOGLE_API_KEY1", "secondary")]));
        assert_eq!(config.missing_required(), vec!["GOOGLE_API_KEY", "GITHUB_API_TOKEN"]);
    }

    #[test]
    fn test_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grader.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 9000
enable_cors = false

[gemini]
api_keys = ["primary"]
pro_model = "gemini-exp"

[github]
token = "gh"
"#,
        )
        .unwrap();

        let config = GraderConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.gemini.api_key(0), Some("primary"));
        assert_eq!(config.gemini.pro_model, "gemini-exp");
        assert_eq!(config.gemini.flash_model, "gemini-2.5-flash");
        assert_eq!(config.github.deepseek_model, "deepseek/DeepSeek-V3-0324");
        assert_eq!(config.upload.max_files, 12);
    }
}
