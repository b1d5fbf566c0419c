use crate::config::Config;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Routes to capture, in evaluation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInventory {
    #[serde(rename = "baseURL", default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(rename = "productPath", default)]
    pub product_path: Option<String>,
}

fn default_base_url() -> String {
    crate::config::Pages::default().base_url
}

impl PageInventory {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        if !cfg.pages.inventory.is_empty() {
            return Self::load(Path::new(&cfg.pages.inventory));
        }
        let product_path = if cfg.pages.product_path.is_empty() {
            None
        } else {
            Some(cfg.pages.product_path.clone())
        };
        Ok(Self {
            base_url: cfg.pages.base_url.clone(),
            paths: cfg.pages.paths.clone(),
            product_path,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading page inventory: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing page inventory: {}", path.display()))
    }

    /// Configured paths, then the product path if present.
    pub fn routes(&self) -> Vec<String> {
        let mut routes = self.paths.clone();
        if let Some(p) = self.product_path.as_deref().filter(|p| !p.is_empty()) {
            routes.push(p.to_string());
        }
        routes
    }

    pub fn url_for(&self, route: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), route)
    }
}
