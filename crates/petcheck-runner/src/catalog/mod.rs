//! Built-in scenarios for the pet, store and user resources
//!
//! Each scenario creates what it needs through the API, registers it for
//! cleanup and checks the documented contract of one endpoint.

mod pet;
mod store;
mod user;

use petcheck_core::expect::{ResponseSpec, equal_to, not_null};
use petcheck_core::{User, fixture, wire};
use serde_json::{Value, json};

use crate::client::ApiRequest;
use crate::scenario::{Cleanup, Scenario, ScenarioContext, ScenarioError};

const JSON: &str = "application/json";

/// Every built-in scenario, grouped by resource.
#[must_use]
pub fn all() -> Vec<Scenario> {
    pet::SCENARIOS
        .iter()
        .chain(store::SCENARIOS)
        .chain(user::SCENARIOS)
        .copied()
        .collect()
}

/// `{code, type, message}` envelope the service answers with.
fn api_message(status: u16, code: i64, kind: &str) -> ResponseSpec {
    ResponseSpec::new()
        .status(status)
        .body("code", equal_to(code))
        .body("type", equal_to(kind))
        .schema(envelope_schema())
}

fn envelope_schema() -> Value {
    json!({
        "type": "object",
        "required": ["code", "type", "message"],
        "properties": {
            "code": {"type": "integer"},
            "type": {"type": "string"},
            "message": {"type": "string"}
        }
    })
}

fn id_field(response: &crate::ApiResponse, what: &str) -> Result<i64, ScenarioError> {
    response
        .field("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| ScenarioError::Setup(format!("{what}: response has no numeric id")))
}

/// Creates a random pet and returns the id the service assigned.
fn create_pet(ctx: &mut ScenarioContext<'_>) -> Result<i64, ScenarioError> {
    let pet = fixture::random_pet(ctx.rng())?;
    ctx.register_cleanup(Cleanup::Pet(pet.id));
    let response = ctx.setup(
        "create pet",
        &ApiRequest::post("/pet").json(wire::to_json(&pet)?),
        &ResponseSpec::new().status(200),
    )?;
    let id = id_field(&response, "create pet")?;
    ctx.register_cleanup(Cleanup::Pet(id));
    Ok(id)
}

/// Places the deterministic test order and returns its id.
fn create_order(ctx: &mut ScenarioContext<'_>) -> Result<i64, ScenarioError> {
    let order = fixture::test_order(ctx.rng())?;
    ctx.register_cleanup(Cleanup::Order(order.id));
    let response = ctx.setup(
        "place order",
        &ApiRequest::post("/store/order").json(wire::to_json(&order)?),
        &ResponseSpec::new().status(200).body("id", not_null()),
    )?;
    let id = id_field(&response, "place order")?;
    ctx.register_cleanup(Cleanup::Order(id));
    Ok(id)
}

/// Registers `user` with the service.
fn create_user(ctx: &mut ScenarioContext<'_>, user: &User) -> Result<(), ScenarioError> {
    ctx.register_cleanup(Cleanup::User(user.username().to_string()));
    ctx.setup(
        "create user",
        &ApiRequest::post("/user").json(wire::to_json(user)?),
        &ResponseSpec::new().status(200),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use petcheck_core::{FailureKind, Response};
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let scenarios = all();
        let ids: HashSet<_> = scenarios.iter().map(Scenario::id).collect();
        assert_eq!(ids.len(), scenarios.len());
    }

    #[test]
    fn every_group_present() {
        let groups: HashSet<_> = all().iter().map(|s| s.group).collect();
        assert_eq!(groups, HashSet::from(["pet", "store", "user"]));
    }

    #[test]
    fn envelope_requires_string_message() {
        let spec = api_message(200, 200, "unknown");
        let ok = Response::new(200, json!({"code": 200, "type": "unknown", "message": "ok"}));
        assert!(spec.check(&ok).is_ok());

        let numeric = Response::new(200, json!({"code": 200, "type": "unknown", "message": 7}));
        let failure = spec.check(&numeric).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Schema);
        assert_eq!(failure.index, 3);

        let missing = Response::new(200, json!({"code": 200, "type": "unknown"}));
        assert_eq!(spec.check(&missing).unwrap_err().kind, FailureKind::Schema);
    }

    #[test]
    fn descriptions_name_an_endpoint() {
        for s in all() {
            assert!(
                s.description.contains(" /"),
                "{} lacks an endpoint in its description",
                s.id()
            );
        }
    }
}
