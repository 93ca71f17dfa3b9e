//! Client configuration and loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use careerpath_core::model::Role;
use careerpath_core::session::Session;

/// Top-level careerpath configuration.
///
/// Note: Custom Debug impl masks the token to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend API; endpoint paths are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token issued by the backend's auth flow.
    #[serde(default)]
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Where exported recommendation PDFs are written.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// The signed-in viewer.
    #[serde(default)]
    pub user: Option<UserConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub email: String,
    pub role: Role,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("export_dir", &self.export_dir)
            .field("user", &self.user)
            .finish()
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api/".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout(),
            export_dir: default_export_dir(),
            user: None,
        }
    }
}

impl ClientConfig {
    /// The viewer identity for the role gate.
    pub fn session(&self) -> Session {
        match &self.user {
            Some(user) => Session::signed_in(&user.email, user.role),
            None => Session::anonymous(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `careerpath.toml` in the current directory
/// 2. `~/.config/careerpath/config.toml`
///
/// Environment variable overrides: `CAREERPATH_BASE_URL`, `CAREERPATH_TOKEN`,
/// `CAREERPATH_EMAIL`, `CAREERPATH_ROLE`.
pub fn load_config() -> Result<ClientConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ClientConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("careerpath.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ClientConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ClientConfig::default(),
    };

    apply_env_overrides(&mut config)?;

    config.base_url = resolve_env_vars(&config.base_url);
    config.token = config
        .token
        .as_deref()
        .map(resolve_env_vars)
        .filter(|t| !t.is_empty());

    Ok(config)
}

fn apply_env_overrides(config: &mut ClientConfig) -> Result<()> {
    if let Ok(url) = std::env::var("CAREERPATH_BASE_URL") {
        config.base_url = url;
    }
    if let Ok(token) = std::env::var("CAREERPATH_TOKEN") {
        config.token = Some(token);
    }

    let email = std::env::var("CAREERPATH_EMAIL").ok();
    let role = std::env::var("CAREERPATH_ROLE")
        .ok()
        .map(|r| r.parse::<Role>().map_err(anyhow::Error::msg))
        .transpose()
        .context("invalid CAREERPATH_ROLE")?;

    if let Some(user) = config.user.as_mut() {
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(role) = role {
            user.role = role;
        }
    } else if let (Some(email), Some(role)) = (email, role) {
        config.user = Some(UserConfig { email, role });
    }

    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("careerpath"))
}
