//! Scenario definition and the context a scenario body runs in

use petcheck_core::expect::{AssertionFailure, ResponseSpec};
use petcheck_core::{FixtureError, Outcome, PreconditionError, SerializationError};
use rand::rngs::SmallRng;
use tracing::debug;

use crate::client::{ApiRequest, ApiResponse, HttpClient, TransportError};

/// Body of a scenario. Returning `Ok` means every expectation held.
pub type ScenarioFn = fn(&mut ScenarioContext<'_>) -> Result<(), ScenarioError>;

/// One named contract check against the service.
#[derive(Clone, Copy)]
pub struct Scenario {
    /// Resource group: `pet`, `store` or `user`
    pub group: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub run: ScenarioFn,
}

impl Scenario {
    /// `group::name`
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}::{}", self.group, self.name)
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("group", &self.group)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Remote resource to delete once the scenario is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleanup {
    Pet(i64),
    Order(i64),
    User(String),
}

impl Cleanup {
    #[must_use]
    pub fn request(&self, api_key: &str) -> ApiRequest {
        match self {
            Self::Pet(id) => ApiRequest::delete("/pet/{petId}")
                .path_param("petId", id)
                .header("api_key", api_key),
            Self::Order(id) => {
                ApiRequest::delete("/store/order/{orderId}").path_param("orderId", id)
            }
            Self::User(username) => {
                ApiRequest::delete("/user/{username}").path_param("username", username)
            }
        }
    }

    /// `pet 4821`, for reports.
    #[must_use]
    pub fn target(&self) -> String {
        match self {
            Self::Pet(id) => format!("pet {id}"),
            Self::Order(id) => format!("order {id}"),
            Self::User(username) => format!("user {username}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("fixture: {0}")]
    Fixture(#[from] FixtureError),
    #[error("{0}")]
    Assertion(#[from] AssertionFailure),
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    #[error("setup: {0}")]
    Setup(String),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl From<SerializationError> for ScenarioError {
    fn from(e: SerializationError) -> Self {
        Self::Fixture(e.into())
    }
}

impl From<PreconditionError> for ScenarioError {
    fn from(e: PreconditionError) -> Self {
        Self::Fixture(e.into())
    }
}

impl ScenarioError {
    /// An assertion failure fails the scenario; anything else is an error.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        match self {
            Self::Assertion(_) => Outcome::Fail,
            _ => Outcome::Error,
        }
    }
}

/// What a scenario body can do: send requests, check them, draw fixtures
/// and schedule cleanup.
pub struct ScenarioContext<'a> {
    client: &'a dyn HttpClient,
    rng: &'a mut SmallRng,
    api_key: &'a str,
    cleanups: Vec<Cleanup>,
    requests: u32,
}

impl<'a> ScenarioContext<'a> {
    pub fn new(client: &'a dyn HttpClient, rng: &'a mut SmallRng, api_key: &'a str) -> Self {
        Self {
            client,
            rng,
            api_key,
            cleanups: Vec::new(),
            requests: 0,
        }
    }

    /// Fixture randomness for this run.
    pub fn rng(&mut self) -> &mut SmallRng {
        &mut *self.rng
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key
    }

    /// Sends without checking anything.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Transport`] if no response was received.
    pub fn send(&mut self, request: &ApiRequest) -> Result<ApiResponse, ScenarioError> {
        self.requests += 1;
        debug!(request = %request.label(), path = %request.resolved_path(), "sending");
        let response = self.client.request(request)?;
        debug!(request = %request.label(), status = response.status, "received");
        Ok(response)
    }

    /// Sends and checks the response.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Assertion`] on the first broken expectation.
    pub fn expect(
        &mut self,
        request: &ApiRequest,
        spec: &ResponseSpec,
    ) -> Result<ApiResponse, ScenarioError> {
        let response = self.send(request)?;
        spec.check(&response)?;
        Ok(response)
    }

    /// Like [`expect`](Self::expect), but a broken expectation means the
    /// scenario could not be prepared, so it errors instead of failing.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Setup`] when the response does not conform.
    pub fn setup(
        &mut self,
        what: &str,
        request: &ApiRequest,
        spec: &ResponseSpec,
    ) -> Result<ApiResponse, ScenarioError> {
        let response = self.send(request)?;
        spec.check(&response)
            .map_err(|f| ScenarioError::Setup(format!("{what}: {f}")))?;
        Ok(response)
    }

    pub fn register_cleanup(&mut self, cleanup: Cleanup) {
        if !self.cleanups.contains(&cleanup) {
            self.cleanups.push(cleanup);
        }
    }

    #[must_use]
    pub fn requests(&self) -> u32 {
        self.requests
    }

    /// Registered cleanups, most recent first.
    pub fn take_cleanups(&mut self) -> Vec<Cleanup> {
        let mut cleanups = std::mem::take(&mut self.cleanups);
        cleanups.reverse();
        cleanups
    }
}
