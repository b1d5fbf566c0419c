//! Turns a backend's free-text answer into a pass/fail verdict.
//!
//! `parse` is total: text without a recognizable `EVALUATION:` marker yields
//! a failing verdict with one synthetic issue instead of an error.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

pub const UNPARSEABLE_ISSUE: &str =
    "(Could not parse evaluation verdict from AI response — defaulting to FAIL)";

const MARKER: &str = "EVALUATION:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Pass,
    Fail,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Pass => f.write_str("PASS"),
            Outcome::Fail => f.write_str("FAIL"),
        }
    }
}

/// Outcome and issues before a route is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedVerdict {
    pub outcome: Outcome,
    pub issues: Vec<String>,
}

impl ParsedVerdict {
    pub fn for_route(self, route: impl Into<String>) -> Verdict {
        Verdict {
            route: route.into(),
            outcome: self.outcome,
            issues: self.issues,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub route: String,
    pub outcome: Outcome,
    pub issues: Vec<String>,
}

impl Verdict {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }
}

pub fn parse(text: &str) -> ParsedVerdict {
    if let Some(v) = parse_lines(text) {
        return v;
    }

    let full = normalize(text);
    let outcome = if full.contains("EVALUATION: PASS") {
        Some(Outcome::Pass)
    } else if full.contains("EVALUATION: FAIL") {
        Some(Outcome::Fail)
    } else {
        None
    };

    match outcome {
        Some(outcome) => ParsedVerdict {
            outcome,
            issues: Vec::new(),
        },
        None => ParsedVerdict {
            outcome: Outcome::Fail,
            issues: vec![UNPARSEABLE_ISSUE.to_string()],
        },
    }
}

/// Line scan: the first valid `EVALUATION:` line fixes the outcome; later
/// marker lines are ignored. `- ` lines after a FAIL marker become issues.
fn parse_lines(text: &str) -> Option<ParsedVerdict> {
    let mut outcome = None;
    let mut issues = Vec::new();

    for line in text.trim().lines() {
        let trimmed = line.trim();
        match outcome {
            None => {
                if let Some(rest) = normalize(trimmed).strip_prefix(MARKER) {
                    outcome = match rest.trim() {
                        "PASS" => Some(Outcome::Pass),
                        "FAIL" => Some(Outcome::Fail),
                        _ => None,
                    };
                }
            }
            Some(Outcome::Pass) => break,
            Some(Outcome::Fail) => {
                if let Some(issue) = trimmed.strip_prefix("- ") {
                    issues.push(issue.to_string());
                }
            }
        }
    }

    outcome.map(|outcome| ParsedVerdict { outcome, issues })
}

/// NFKC + upper-case, so full-width colons and similar drift still match.
fn normalize(s: &str) -> String {
    s.nfkc().collect::<String>().to_uppercase()
}
