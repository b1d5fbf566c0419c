use crate::{
    pipeline::{EvaluatedPage, RunResult},
    resolver::ProviderCandidate,
    verdict::Outcome,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started: String,
    pub finished: String,
    pub provider: Option<ProviderCandidate>,
    pub outcome: Outcome,
    pub passed: usize,
    pub total: usize,
    pub verdicts: Vec<EvaluatedPage>,
}

impl RunReport {
    pub fn new(result: &RunResult, started: String, finished: String) -> Self {
        Self {
            started,
            finished,
            provider: result.resolved_provider.clone(),
            outcome: result.outcome(),
            passed: result.passed(),
            total: result.verdicts.len(),
            verdicts: result.verdicts.clone(),
        }
    }
}

/// Human-readable results table.
pub fn render_summary(result: &RunResult) -> String {
    let rule = "=".repeat(70);
    let mut out = String::new();

    let provider = match &result.resolved_provider {
        Some(p) => format!("Provider: {} | Model: {}", p.backend, p.model),
        None => "Provider: none | Model: none".to_string(),
    };
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "AI VISUAL EVALUATION RESULTS");
    let _ = writeln!(out, "{provider}");
    let _ = writeln!(out, "{rule}\n");

    for page in &result.verdicts {
        let v = &page.verdict;
        let icon = if v.passed() { '✓' } else { '✗' };
        let _ = writeln!(out, "{icon} {} — {}", v.route, v.outcome);
        for issue in &v.issues {
            let _ = writeln!(out, "    - {issue}");
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "Passed: {}/{} | Overall: {}",
        result.passed(),
        result.verdicts.len(),
        result.outcome()
    );
    let _ = write!(out, "{rule}");
    out
}
