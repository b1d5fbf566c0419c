use crate::config::Config;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Backend secrets and the optional pinned primary model for one run.
#[derive(Clone, Default)]
pub struct Credentials {
    pub primary_api_key: Option<String>,
    pub secondary_api_key: Option<String>,
    pub pinned_model: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("primary_api_key", &self.primary_api_key.as_ref().map(|_| "<set>"))
            .field("secondary_api_key", &self.secondary_api_key.as_ref().map(|_| "<set>"))
            .field("pinned_model", &self.pinned_model)
            .finish()
    }
}

impl Credentials {
    /// Process environment wins over the `.env` file; the process environment
    /// is never modified.
    pub fn load(cfg: &Config) -> Result<Self> {
        let file_vars = read_env_file(Path::new(&cfg.providers.env_file))?;
        let lookup = |name: &str| -> Option<String> {
            if name.is_empty() {
                return None;
            }
            std::env::var(name)
                .ok()
                .or_else(|| file_vars.get(name).cloned())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let pinned_model = lookup(&cfg.providers.primary.pinned_model_env).or_else(|| {
            Some(cfg.providers.primary.pinned_model.trim().to_string()).filter(|m| !m.is_empty())
        });

        Ok(Self {
            primary_api_key: lookup(&cfg.providers.primary.api_key_env),
            secondary_api_key: lookup(&cfg.providers.secondary.api_key_env),
            pinned_model,
        })
    }

    pub fn any_backend(&self) -> bool {
        self.primary_api_key.is_some() || self.secondary_api_key.is_some()
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let mut vars = HashMap::new();
    if path.as_os_str().is_empty() || !path.exists() {
        return Ok(vars);
    }
    debug!("reading env file {}", path.display());
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("opening env file: {}", path.display()))?;
    for item in iter {
        let (k, v) = item.with_context(|| format!("parsing env file: {}", path.display()))?;
        vars.insert(k, v);
    }
    Ok(vars)
}
