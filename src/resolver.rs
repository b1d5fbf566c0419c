//! Run-scoped provider search.
//!
//! The first call walks the primary candidate list in priority order,
//! skipping models the backend reports as unavailable, then falls back to the
//! secondary backend's single model. Whichever candidate answers first is
//! bound for the rest of the run; later calls go straight to it.

use crate::{
    backend::{BackendError, BackendKind, GeminiBackend, OpenAiBackend, VisionBackend},
    config::Config,
    credentials::Credentials,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCandidate {
    pub backend: BackendKind,
    pub model: String,
}

impl ProviderCandidate {
    pub fn new(backend: BackendKind, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }
}

impl std::fmt::Display for ProviderCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.backend, self.model)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("{name} backend failed for {candidate}: {error}")]
    Backend {
        candidate: ProviderCandidate,
        name: String,
        error: BackendError,
    },
    #[error(
        "all primary models returned model-not-found ({tried}) and no secondary backend is configured"
    )]
    Exhausted { tried: String },
}

struct SecondarySlot {
    backend: Box<dyn VisionBackend>,
    model: String,
}

#[derive(Default)]
pub struct ProviderResolver {
    primary: Option<Box<dyn VisionBackend>>,
    candidates: Vec<String>,
    secondary: Option<SecondarySlot>,
    resolved: Option<ProviderCandidate>,
}

impl ProviderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pinned model replaces the whole candidate list.
    pub fn with_primary(
        mut self,
        backend: Box<dyn VisionBackend>,
        models: Vec<String>,
        pinned: Option<String>,
    ) -> Self {
        self.candidates = match pinned {
            Some(m) => vec![m],
            None => models,
        };
        self.primary = Some(backend);
        self
    }

    pub fn with_secondary(mut self, backend: Box<dyn VisionBackend>, model: impl Into<String>) -> Self {
        self.secondary = Some(SecondarySlot {
            backend,
            model: model.into(),
        });
        self
    }

    /// Builds the HTTP backends whose credentials are present. Fails before
    /// any network activity when neither is usable.
    pub fn from_config(cfg: &Config, creds: &Credentials) -> Result<Self> {
        let mut resolver = Self::new();
        if let Some(key) = creds.primary_api_key.clone() {
            resolver = resolver.with_primary(
                Box::new(GeminiBackend::new(cfg, key)?),
                cfg.providers.primary.models.clone(),
                creds.pinned_model.clone(),
            );
        }
        if let Some(key) = creds.secondary_api_key.clone() {
            resolver = resolver.with_secondary(
                Box::new(OpenAiBackend::new(cfg, key)?),
                cfg.providers.secondary.model.clone(),
            );
        }
        resolver.ensure_configured()?;
        Ok(resolver)
    }

    pub fn ensure_configured(&self) -> Result<(), ResolveError> {
        let primary_usable = self.primary.is_some() && !self.candidates.is_empty();
        if primary_usable || self.secondary.is_some() {
            return Ok(());
        }
        if self.primary.is_some() {
            return Err(ResolveError::Configuration(
                "primary backend has no candidate models and no secondary backend is configured"
                    .into(),
            ));
        }
        Err(ResolveError::Configuration(
            "no vision backend credentials are set; configure the primary or secondary API key"
                .into(),
        ))
    }

    /// Search order, including the secondary fallback.
    pub fn plan(&self) -> Vec<ProviderCandidate> {
        let mut out = Vec::new();
        if self.primary.is_some() {
            out.extend(
                self.candidates
                    .iter()
                    .map(|m| ProviderCandidate::new(BackendKind::PrimaryVision, m.clone())),
            );
        }
        if let Some(s) = &self.secondary {
            out.push(ProviderCandidate::new(BackendKind::SecondaryVision, s.model.clone()));
        }
        out
    }

    pub fn resolved(&self) -> Option<&ProviderCandidate> {
        self.resolved.as_ref()
    }

    pub fn resolve(&mut self, image: &[u8]) -> Result<String, ResolveError> {
        if let Some(bound) = self.resolved.as_ref() {
            return self.call_bound(bound, image);
        }
        self.ensure_configured()?;

        let mut tried = Vec::new();
        if let Some(primary) = self.primary.as_deref() {
            for model in &self.candidates {
                info!("trying {} model {}", primary.name(), model);
                match primary.evaluate(image, model) {
                    Ok(text) => {
                        let candidate = ProviderCandidate::new(BackendKind::PrimaryVision, model.clone());
                        info!("resolved provider: {} {}", primary.name(), candidate);
                        self.resolved = Some(candidate);
                        return Ok(text);
                    }
                    Err(e) if e.is_model_unavailable() => {
                        warn!("{} model {} not available, skipping: {}", primary.name(), model, e);
                        tried.push(model.clone());
                    }
                    Err(error) => {
                        return Err(ResolveError::Backend {
                            candidate: ProviderCandidate::new(BackendKind::PrimaryVision, model.clone()),
                            name: primary.name().to_string(),
                            error,
                        });
                    }
                }
            }
        }

        let Some(secondary) = self.secondary.as_ref() else {
            return Err(ResolveError::Exhausted {
                tried: tried.join(", "),
            });
        };

        let candidate = ProviderCandidate::new(BackendKind::SecondaryVision, secondary.model.clone());
        info!("falling back to {} model {}", secondary.backend.name(), secondary.model);
        match secondary.backend.evaluate(image, &secondary.model) {
            Ok(text) => {
                info!("resolved provider: {} {}", secondary.backend.name(), candidate);
                self.resolved = Some(candidate);
                Ok(text)
            }
            Err(error) => Err(ResolveError::Backend {
                candidate,
                name: secondary.backend.name().to_string(),
                error,
            }),
        }
    }

    fn call_bound(&self, bound: &ProviderCandidate, image: &[u8]) -> Result<String, ResolveError> {
        let backend = match bound.backend {
            BackendKind::PrimaryVision => self.primary.as_deref(),
            BackendKind::SecondaryVision => self.secondary.as_ref().map(|s| s.backend.as_ref()),
        }
        .ok_or_else(|| {
            ResolveError::Configuration(format!("bound provider {bound} has no backend"))
        })?;

        backend
            .evaluate(image, &bound.model)
            .map_err(|error| ResolveError::Backend {
                candidate: bound.clone(),
                name: backend.name().to_string(),
                error,
            })
    }
}
