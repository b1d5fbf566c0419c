use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pages: Pages,
    #[serde(default)]
    pub capture: Capture,
    #[serde(default)]
    pub providers: Providers,
    #[serde(default)]
    pub http: Http,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Pages {
    pub base_url: String,
    pub paths: Vec<String>,
    pub product_path: String,
    /// Optional `pages.json` inventory; replaces the inline lists when set.
    pub inventory: String,
}
impl Default for Pages {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9292".into(),
            paths: vec!["/".into()],
            product_path: "".into(),
            inventory: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Capture {
    pub mode: String,
    pub command: String,
    pub args: Vec<String>,
    pub screenshot_dir: String,
    pub timeout_seconds: u64,
    pub settle_ms: u64,
    pub full_page: bool,
}
impl Default for Capture {
    fn default() -> Self {
        Self {
            mode: "command".into(),
            command: "node".into(),
            args: vec!["scripts/capture.mjs".into()],
            screenshot_dir: "eval-screenshots".into(),
            timeout_seconds: 60,
            settle_ms: 3000,
            full_page: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Providers {
    pub env_file: String,
    pub primary: PrimaryProvider,
    pub secondary: SecondaryProvider,
}
impl Default for Providers {
    fn default() -> Self {
        Self {
            env_file: ".env".into(),
            primary: Default::default(),
            secondary: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryProvider {
    pub base_url: String,
    pub api_key_env: String,
    pub models: Vec<String>,
    pub pinned_model: String,
    pub pinned_model_env: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
}
impl Default for PrimaryProvider {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            models: vec![
                "gemini-2.5-pro".into(),
                "gemini-2.5-flash".into(),
                "gemini-2.0-flash".into(),
            ],
            pinned_model: "".into(),
            pinned_model_env: "GEMINI_MODEL".into(),
            temperature: 0.0,
            max_output_tokens: 4096,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryProvider {
    pub base_url: String,
    pub api_key_env: String,
    pub model: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
}
impl Default for SecondaryProvider {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            model: "gpt-4o".into(),
            temperature: 0.2,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Http {
    pub connect_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
}
impl Default for Http {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: 10,
            request_timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub write_report_json: bool,
    pub report_path: String,
    pub print_summary: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            write_report_json: true,
            report_path: "eval-screenshots/report.json".into(),
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "eval-screenshots/visual-verdict.log".into(),
        }
    }
}
