use petcheck_core::expect::{
    JsonType, ResponseSpec, contains_string, equal_to, greater_than, in_range, not_empty,
    not_null, of_type, one_of,
};
use serde_json::json;
use petcheck_core::fixture::{self, invalid};
use petcheck_core::wire;

use super::{JSON, create_order};
use crate::client::ApiRequest;
use crate::scenario::{Cleanup, Scenario, ScenarioContext, ScenarioError};

pub(super) const SCENARIOS: &[Scenario] = &[
    Scenario {
        group: "store",
        name: "inventory",
        description: "GET /store/inventory returns a non-empty status map",
        run: inventory,
    },
    Scenario {
        group: "store",
        name: "place_order",
        description: "POST /store/order with a random order echoes it",
        run: place_order,
    },
    Scenario {
        group: "store",
        name: "get_order",
        description: "GET /store/order/{orderId} returns a placed order",
        run: get_order,
    },
    Scenario {
        group: "store",
        name: "get_nonexistent_order",
        description: "GET /store/order/{orderId} on an unknown id returns 404",
        run: get_nonexistent_order,
    },
    Scenario {
        group: "store",
        name: "delete_nonexistent_order",
        description: "DELETE /store/order/{orderId} on an unknown id returns 404",
        run: delete_nonexistent_order,
    },
    Scenario {
        group: "store",
        name: "delete_order",
        description: "DELETE /store/order/{orderId} removes a placed order",
        run: delete_order,
    },
];

fn order_by_id(request: ApiRequest, id: i64) -> ApiRequest {
    request.path_param("orderId", id)
}

fn inventory(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let spec = ResponseSpec::new()
        .status(200)
        .content_type(JSON)
        .body("", of_type(JsonType::Object))
        .body("", not_empty())
        .schema(json!({
            "type": "object",
            "additionalProperties": {"type": "integer"}
        }));
    ctx.expect(&ApiRequest::get("/store/inventory"), &spec)?;
    Ok(())
}

fn place_order(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let order = fixture::random_order(ctx.rng())?;
    ctx.register_cleanup(Cleanup::Order(order.id));
    let spec = ResponseSpec::new()
        .status(200)
        .body("id", greater_than(0.0))
        .body("quantity", in_range(1.0, 10.0))
        .body("shipDate", not_null())
        .body("status", one_of(["placed", "approved", "delivered"]))
        .body("complete", one_of([true, false]));
    ctx.expect(
        &ApiRequest::post("/store/order").json(wire::to_json(&order)?),
        &spec,
    )?;
    Ok(())
}

fn get_order(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = create_order(ctx)?;
    let spec = ResponseSpec::new()
        .status(200)
        .body("id", equal_to(id))
        .body("status", not_null())
        .body("shipDate", not_null())
        .body("complete", not_null());
    ctx.expect(&order_by_id(ApiRequest::get("/store/order/{orderId}"), id), &spec)?;
    Ok(())
}

fn get_nonexistent_order(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let spec = ResponseSpec::new()
        .status(404)
        .body("message", contains_string("Order not found"));
    ctx.expect(
        &order_by_id(
            ApiRequest::get("/store/order/{orderId}"),
            invalid::NONEXISTENT_ORDER_ID,
        ),
        &spec,
    )?;
    Ok(())
}

fn delete_nonexistent_order(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let spec = ResponseSpec::new()
        .status(404)
        .body("message", contains_string("Order Not Found"));
    ctx.expect(
        &order_by_id(
            ApiRequest::delete("/store/order/{orderId}"),
            invalid::NONEXISTENT_ORDER_ID,
        ),
        &spec,
    )?;
    Ok(())
}

fn delete_order(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = create_order(ctx)?;
    ctx.expect(
        &order_by_id(ApiRequest::delete("/store/order/{orderId}"), id),
        &ResponseSpec::new().status(200),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScenarioRunner;
    use crate::client::{Body, Method};
    use crate::testing::FakeClient;
    use petcheck_core::{Config, FailureKind, Outcome, ScenarioReport};
    use serde_json::Value;

    fn run(client: &FakeClient, name: &str) -> ScenarioReport {
        let scenario = *SCENARIOS.iter().find(|s| s.name == name).unwrap();
        ScenarioRunner::new(client, Config::default())
            .with_seed(Some(11))
            .run(&[scenario])
            .scenarios
            .remove(0)
    }

    /// Orders are echoed; only 10000..20000 exist.
    fn store(req: &ApiRequest) -> (u16, Value) {
        if let Some(Body::Json(json)) = &req.body {
            return (200, serde_json::from_str(json).unwrap());
        }
        if req.path == "/store/inventory" {
            return (200, json!({"available": 12, "sold": 3}));
        }
        let id: i64 = req.path_params[0].1.parse().unwrap();
        match (req.method, (10_000..20_000).contains(&id)) {
            (Method::Get, true) => (
                200,
                json!({"id": id, "petId": 1, "quantity": 1, "shipDate": "x", "status": "placed", "complete": false}),
            ),
            (Method::Get, false) => (404, json!({"code": 1, "type": "error", "message": "Order not found"})),
            (_, true) => (200, json!({"code": 200, "type": "unknown", "message": id.to_string()})),
            (_, false) => (404, json!({"code": 404, "type": "unknown", "message": "Order Not Found"})),
        }
    }

    #[test]
    fn all_store_scenarios_pass_against_conforming_service() {
        let client = FakeClient::new(store);
        for scenario in SCENARIOS {
            let report = run(&client, scenario.name);
            assert_eq!(report.outcome, Outcome::Pass, "{report:?}");
        }
    }

    #[test]
    fn inventory_must_not_be_empty() {
        let client = FakeClient::new(|_| (200, json!({})));
        let failure = run(&client, "inventory").failure.unwrap();
        assert_eq!(failure.index, 3);
    }

    #[test]
    fn inventory_counts_must_be_integers() {
        let client = FakeClient::new(|_| (200, json!({"available": "many"})));
        let failure = run(&client, "inventory").failure.unwrap();
        assert_eq!(failure.kind, FailureKind::Schema);
    }

    #[test]
    fn echoed_quantity_out_of_range_fails() {
        let client = FakeClient::new(|req| {
            let (status, mut body) = store(req);
            if req.path == "/store/order" {
                body["quantity"] = json!(11);
            }
            (status, body)
        });
        let failure = run(&client, "place_order").failure.unwrap();
        assert_eq!(failure.path.as_deref(), Some("quantity"));
        assert_eq!(failure.expected, "within [1, 10]");
    }

    #[test]
    fn nonexistent_order_id_is_fixed() {
        let client = FakeClient::new(store);
        run(&client, "delete_nonexistent_order");
        assert_eq!(client.sent()[0].resolved_path(), "/store/order/999999999");
    }

    #[test]
    fn placed_order_is_cleaned_up() {
        let client = FakeClient::new(store);
        let report = run(&client, "place_order");
        assert_eq!(report.cleanup.len(), 1);
        assert!(report.cleanup[0].ok);
        assert_eq!(client.sent().last().unwrap().method, Method::Delete);
    }
}
