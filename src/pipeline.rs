use crate::{
    resolver::{ProviderCandidate, ProviderResolver},
    target::EvaluationTarget,
    util::sha256_hex,
    verdict::{self, Outcome, Verdict},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

/// Process exit status for a finished (or aborted) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Pass = 0,
    Fail = 1,
    Error = 2,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<Outcome> for ExitStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Pass => ExitStatus::Pass,
            Outcome::Fail => ExitStatus::Fail,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedPage {
    #[serde(flatten)]
    pub verdict: Verdict,
    pub image_sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub verdicts: Vec<EvaluatedPage>,
    pub resolved_provider: Option<ProviderCandidate>,
}

impl RunResult {
    pub fn outcome(&self) -> Outcome {
        if self.verdicts.iter().all(|p| p.verdict.passed()) {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }

    pub fn passed(&self) -> usize {
        self.verdicts.iter().filter(|p| p.verdict.passed()).count()
    }

    pub fn exit_status(&self) -> ExitStatus {
        self.outcome().into()
    }
}

/// Evaluates targets one at a time through a single run-scoped resolver.
pub struct Pipeline {
    resolver: ProviderResolver,
}

impl Pipeline {
    pub fn new(resolver: ProviderResolver) -> Self {
        Self { resolver }
    }

    /// Any backend failure aborts the run; no partial result is returned.
    pub fn run<I>(mut self, targets: I) -> Result<RunResult>
    where
        I: IntoIterator<Item = EvaluationTarget>,
    {
        self.resolver.ensure_configured()?;
        let started = Instant::now();
        let mut verdicts = Vec::new();

        for target in targets {
            info!("evaluating {}", target.route);
            let raw = self
                .resolver
                .resolve(&target.image)
                .with_context(|| format!("evaluating {}", target.route))?;

            let parsed = verdict::parse(&raw);
            if parsed.issues.iter().any(|i| i == verdict::UNPARSEABLE_ISSUE) {
                warn!("{}: could not parse verdict, treating as FAIL", target.route);
            }
            info!(
                "{} -> {} ({} issue(s))",
                target.route,
                parsed.outcome,
                parsed.issues.len()
            );

            verdicts.push(EvaluatedPage {
                image_sha256: sha256_hex(&target.image),
                verdict: parsed.for_route(target.route),
            });
        }

        info!(
            "evaluated {} page(s) in {:.1}s",
            verdicts.len(),
            started.elapsed().as_secs_f32()
        );

        Ok(RunResult {
            verdicts,
            resolved_provider: self.resolver.resolved().cloned(),
        })
    }
}
