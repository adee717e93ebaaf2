//! Sequential scenario execution with best-effort cleanup

use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use petcheck_core::{CleanupReport, Config, Outcome, RunReport, ScenarioReport};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{info, warn};

use crate::client::{HttpClient, ReqwestClient, TransportError};
use crate::scenario::{Cleanup, Scenario, ScenarioContext, ScenarioError};

/// Delete statuses that count as a successful cleanup.
const CLEANUP_OK: [u16; 2] = [200, 404];

/// Runs scenarios one after another against one service.
pub struct ScenarioRunner<C> {
    client: C,
    config: Config,
    seed: Option<u64>,
}

impl ScenarioRunner<ReqwestClient> {
    /// Runner over HTTP, configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Ok(Self::new(ReqwestClient::from_config(config)?, config.clone()))
    }
}

impl<C: HttpClient> ScenarioRunner<C> {
    #[must_use]
    pub fn new(client: C, config: Config) -> Self {
        Self {
            client,
            config,
            seed: None,
        }
    }

    /// Adds name substrings to the scenario filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl IntoIterator<Item = String>) -> Self {
        self.config.scenarios.extend(filter);
        self
    }

    #[must_use]
    pub fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.config.stop_on_failure = stop;
        self
    }

    /// Fixed fixture seed; the default draws one from entropy.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Scenarios admitted by the filter, in catalog order.
    #[must_use]
    pub fn select<'s>(&self, catalog: &'s [Scenario]) -> Vec<&'s Scenario> {
        catalog
            .iter()
            .filter(|s| self.config.selects(&s.id()))
            .collect()
    }

    pub fn run(&self, catalog: &[Scenario]) -> RunReport {
        let started_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let start = Instant::now();
        let selected = self.select(catalog);
        let mut rng = self
            .seed
            .map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);

        info!(
            base_url = %self.config.base_url,
            scenarios = selected.len(),
            "starting run"
        );

        let mut reports = Vec::with_capacity(selected.len());
        let mut skipped = 0;
        for (i, scenario) in selected.iter().enumerate() {
            let report = self.run_one(scenario, &mut rng);
            let passed = report.outcome == Outcome::Pass;
            reports.push(report);
            if !passed && self.config.stop_on_failure {
                skipped = selected.len() - i - 1;
                info!(skipped, "stopping after first failure");
                break;
            }
        }

        RunReport::from_scenarios(
            self.config.base_url.clone(),
            started_at,
            elapsed_ms(start),
            reports,
            skipped,
        )
    }

    /// Runs one scenario body, then its cleanups. Cleanup never changes the outcome.
    pub fn run_one(&self, scenario: &Scenario, rng: &mut SmallRng) -> ScenarioReport {
        let id = scenario.id();
        info!(scenario = %id, "running");
        let start = Instant::now();

        let mut ctx = ScenarioContext::new(&self.client, rng, &self.config.api_key);
        let result = (scenario.run)(&mut ctx);
        let mut requests = ctx.requests();
        let cleanups = ctx.take_cleanups();
        drop(ctx);

        let cleanup: Vec<CleanupReport> = cleanups
            .iter()
            .map(|c| {
                requests += 1;
                self.cleanup(c)
            })
            .collect();

        let (outcome, failure, error) = match result {
            Ok(()) => (Outcome::Pass, None, None),
            Err(ScenarioError::Assertion(f)) => (Outcome::Fail, Some(f), None),
            Err(e) => (e.outcome(), None, Some(e.to_string())),
        };
        let duration_ms = elapsed_ms(start);
        match outcome {
            Outcome::Pass => info!(scenario = %id, duration_ms, "passed"),
            Outcome::Fail => info!(
                scenario = %id,
                failure = %failure.as_ref().map(ToString::to_string).unwrap_or_default(),
                "failed"
            ),
            Outcome::Error => info!(
                scenario = %id,
                error = %error.as_deref().unwrap_or_default(),
                "errored"
            ),
        }

        ScenarioReport {
            name: id,
            description: scenario.description.to_string(),
            outcome,
            requests,
            duration_ms,
            failure,
            error,
            cleanup,
        }
    }

    fn cleanup(&self, cleanup: &Cleanup) -> CleanupReport {
        let target = cleanup.target();
        match self.client.request(&cleanup.request(&self.config.api_key)) {
            Ok(resp) => {
                let ok = CLEANUP_OK.contains(&resp.status);
                if !ok {
                    warn!(%target, status = resp.status, "cleanup returned unexpected status");
                }
                CleanupReport {
                    target,
                    status: Some(resp.status),
                    ok,
                    error: None,
                }
            }
            Err(e) => {
                warn!(%target, error = %e, "cleanup failed");
                CleanupReport {
                    target,
                    status: None,
                    ok: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
