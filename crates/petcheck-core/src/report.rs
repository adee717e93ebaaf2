//! Run results: per-scenario outcomes and the run summary
//!
//! These types are what `petcheck run --output json` prints and what is saved
//! as `summary.json`. [`generate_schema`] exports their JSON Schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::expect::AssertionFailure;

/// Scenario outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every expectation held
    Pass,
    /// A response broke an expectation
    Fail,
    /// The scenario could not be carried out (fixture, transport, setup)
    Error,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => f.pad("PASS"),
            Self::Fail => f.pad("FAIL"),
            Self::Error => f.pad("ERROR"),
        }
    }
}

/// Result of one best-effort delete after a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CleanupReport {
    /// What was deleted, e.g. `pet 4821`
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// 200 or 404
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioReport {
    /// `group::name`
    pub name: String,
    pub description: String,
    pub outcome: Outcome,
    /// HTTP requests sent, setup included
    pub requests: u32,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<AssertionFailure>,
    /// Message for [`Outcome::Error`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cleanup: Vec<CleanupReport>,
}

impl ScenarioReport {
    /// One line for terminal output.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let mut line = format!("{:<5} {} ({} ms)", self.outcome, self.name, self.duration_ms);
        if let Some(failure) = &self.failure {
            line.push_str(&format!("\n      {failure}"));
        }
        if let Some(error) = &self.error {
            line.push_str(&format!("\n      {error}"));
        }
        line
    }
}

/// Summary of a whole run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RunReport {
    pub base_url: String,
    /// RFC 3339 start time
    pub started_at: String,
    pub duration_ms: u64,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    /// Selected but not run because an earlier scenario failed
    pub skipped: usize,
    pub scenarios: Vec<ScenarioReport>,
}

impl RunReport {
    #[must_use]
    pub fn from_scenarios(
        base_url: impl Into<String>,
        started_at: impl Into<String>,
        duration_ms: u64,
        scenarios: Vec<ScenarioReport>,
        skipped: usize,
    ) -> Self {
        let count = |o: Outcome| scenarios.iter().filter(|s| s.outcome == o).count();
        let (passed, failed, errored) = (
            count(Outcome::Pass),
            count(Outcome::Fail),
            count(Outcome::Error),
        );
        Self {
            base_url: base_url.into(),
            started_at: started_at.into(),
            duration_ms,
            total: scenarios.len(),
            passed,
            failed,
            errored,
            skipped,
            scenarios,
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.total > 0 && self.passed == self.total
    }

    /// 0 all passed, 1 any scenario failed or errored, 3 nothing could run
    /// (no scenarios, or every scenario errored).
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.total == 0 || self.errored == self.total {
            3
        } else if self.is_pass() {
            0
        } else {
            1
        }
    }

    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} passed, {} failed, {} errors",
            self.passed, self.failed, self.errored
        );
        if self.skipped > 0 {
            line.push_str(&format!(", {} skipped", self.skipped));
        }
        line
    }
}

/// JSON Schema of [`RunReport`].
///
/// # Errors
///
/// Only if the generated schema cannot be serialized.
pub fn generate_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(RunReport);
    serde_json::to_string_pretty(&schema)
}
