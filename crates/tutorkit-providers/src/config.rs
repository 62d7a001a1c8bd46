//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tutorkit_core::traits::TutorClient;

use crate::gemini::GeminiProvider;
use crate::mock::MockTutor;

/// Configuration for a single tutoring backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    /// Offline backend with a fixed canned response. For demos and tests.
    Mock {
        #[serde(default)]
        response: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
            ProviderConfig::Mock { response } => f
                .debug_struct("Mock")
                .field("response", response)
                .finish(),
        }
    }
}

/// Top-level tutorkit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use for enrichment and chat.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Curriculum document to load.
    #[serde(default = "default_curriculum_path")]
    pub curriculum_path: PathBuf,
    /// Where mastery progress is persisted.
    #[serde(default = "default_mastery_path")]
    pub mastery_path: PathBuf,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_curriculum_path() -> PathBuf {
    PathBuf::from("curriculum.json")
}
fn default_mastery_path() -> PathBuf {
    PathBuf::from("mastery.json")
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            curriculum_path: default_curriculum_path(),
            mastery_path: default_mastery_path(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            model: model.clone(),
        },
        ProviderConfig::Mock { response } => ProviderConfig::Mock {
            response: response.clone(),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `tutorkit.toml` in the current directory
/// 2. `~/.config/tutorkit/config.toml`
///
/// Environment variable override: `TUTORKIT_GEMINI_KEY`.
pub fn load_config() -> Result<TutorConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<TutorConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("tutorkit.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<TutorConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => TutorConfig::default(),
    };

    // Apply env var overrides
    if let Ok(key) = std::env::var("TUTORKIT_GEMINI_KEY") {
        config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
                model: None,
            });
        if let Some(ProviderConfig::Gemini { api_key, .. }) = config.providers.get_mut("gemini") {
            *api_key = key;
        }
    }

    // Resolve env vars in all provider configs
    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("tutorkit"))
}

/// Create a tutoring client from its configuration.
pub fn create_client(config: &ProviderConfig) -> Result<Box<dyn TutorClient>> {
    match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => {
            if api_key.is_empty() {
                anyhow::bail!(
                    "gemini provider has no API key; set TUTORKIT_GEMINI_KEY or api_key in config"
                );
            }
            Ok(Box::new(GeminiProvider::new(
                api_key,
                base_url.clone(),
                model.clone(),
            )))
        }
        ProviderConfig::Mock { response } => Ok(Box::new(match response {
            Some(text) => MockTutor::with_fixed_response(text),
            None => MockTutor::new(HashMap::new()),
        })),
    }
}

impl TutorConfig {
    /// Create the default client configured for this install.
    pub fn default_client(&self) -> Result<Box<dyn TutorClient>> {
        let provider = self.providers.get(&self.default_provider).with_context(|| {
            format!(
                "provider {} is not configured; add it to tutorkit.toml or set TUTORKIT_GEMINI_KEY",
                self.default_provider
            )
        })?;
        create_client(provider)
    }
}
