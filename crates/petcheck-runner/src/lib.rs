//! petcheck-runner: HTTP transport, scenario orchestration and the built-in catalog

pub mod catalog;
pub mod client;
pub mod runner;
pub mod scenario;

#[cfg(test)]
mod testing;

pub use client::{
    ApiRequest, ApiResponse, Body, FilePart, HttpClient, Method, ReqwestClient, TransportError,
};
pub use runner::ScenarioRunner;
pub use scenario::{Cleanup, Scenario, ScenarioContext, ScenarioError, ScenarioFn};
