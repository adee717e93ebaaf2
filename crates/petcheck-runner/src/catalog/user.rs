use petcheck_core::expect::{
    ResponseSpec, any_of, contains_string, equal_to, matches_pattern, not_empty, not_null, one_of,
};
use petcheck_core::fixture::{self, TEST_PASSWORD, TEST_USERNAME, invalid};
use petcheck_core::wire;

use super::{api_message, create_user};
use crate::client::ApiRequest;
use crate::scenario::{Cleanup, Scenario, ScenarioContext, ScenarioError};

/// Users in the batch-creation scenario.
const BATCH_SIZE: usize = 2;

pub(super) const SCENARIOS: &[Scenario] = &[
    Scenario {
        group: "user",
        name: "create_user",
        description: "POST /user with a random user",
        run: create_random_user,
    },
    Scenario {
        group: "user",
        name: "create_with_array",
        description: "POST /user/createWithArray with two random users",
        run: create_with_array,
    },
    Scenario {
        group: "user",
        name: "login",
        description: "GET /user/login with the test credentials opens a session",
        run: login,
    },
    Scenario {
        group: "user",
        name: "logout",
        description: "GET /user/logout closes the session",
        run: logout,
    },
    Scenario {
        group: "user",
        name: "delete_user",
        description: "DELETE /user/{username} removes the test user",
        run: delete_user,
    },
    Scenario {
        group: "user",
        name: "delete_nonexistent_user",
        description: "DELETE /user/{username} on an unknown name returns 404",
        run: delete_nonexistent_user,
    },
    Scenario {
        group: "user",
        name: "get_user",
        description: "GET /user/{username} returns the test user",
        run: get_user,
    },
    Scenario {
        group: "user",
        name: "get_nonexistent_user",
        description: "GET /user/{username} on an unknown name returns a 404 error envelope",
        run: get_nonexistent_user,
    },
];

fn by_username(request: ApiRequest, username: &str) -> ApiRequest {
    request.path_param("username", username)
}

fn create_random_user(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let user = fixture::random_user(ctx.rng())?;
    ctx.register_cleanup(Cleanup::User(user.username().to_string()));
    ctx.expect(
        &ApiRequest::post("/user").json(wire::to_json(&user)?),
        &api_message(200, 200, "unknown"),
    )?;
    Ok(())
}

fn create_with_array(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let mut items = Vec::with_capacity(BATCH_SIZE);
    for _ in 0..BATCH_SIZE {
        let user = fixture::random_user(ctx.rng())?;
        ctx.register_cleanup(Cleanup::User(user.username().to_string()));
        items.push(wire::to_json(&user)?);
    }
    let spec = api_message(200, 200, "unknown").body(
        "message",
        any_of([contains_string("ok"), matches_pattern(r"^\d+$")?]),
    );
    ctx.expect(
        &ApiRequest::post("/user/createWithArray").json(wire::join_array(&items)),
        &spec,
    )?;
    Ok(())
}

fn login(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let request = ApiRequest::get("/user/login")
        .query("username", TEST_USERNAME)
        .query("password", TEST_PASSWORD);
    let spec = api_message(200, 200, "unknown")
        .body("message", contains_string("logged in user session:"));
    ctx.expect(&request, &spec)?;
    Ok(())
}

fn logout(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let spec = api_message(200, 200, "unknown").body("message", contains_string("ok"));
    ctx.expect(&ApiRequest::get("/user/logout"), &spec)?;
    Ok(())
}

fn delete_user(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let user = fixture::test_user(ctx.rng())?;
    create_user(ctx, &user)?;
    let spec = api_message(200, 200, "unknown").body("message", equal_to(TEST_USERNAME));
    ctx.expect(
        &by_username(ApiRequest::delete("/user/{username}"), TEST_USERNAME),
        &spec,
    )?;
    Ok(())
}

fn delete_nonexistent_user(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let username = invalid::nonexistent_username("nonexistentuser");
    ctx.expect(
        &by_username(ApiRequest::delete("/user/{username}"), &username),
        &ResponseSpec::new().status(404),
    )?;
    Ok(())
}

fn get_user(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let user = fixture::test_user(ctx.rng())?;
    create_user(ctx, &user)?;
    let spec = ResponseSpec::new()
        .status(200)
        .body("id", not_null())
        .body("username", equal_to(TEST_USERNAME))
        .body("firstName", not_empty())
        .body("lastName", not_empty())
        .body("email", matches_pattern(r".+@.+\..+")?)
        .body("password", not_null())
        .body("phone", not_null())
        .body("userStatus", one_of([0, 1]));
    ctx.expect(
        &by_username(ApiRequest::get("/user/{username}"), TEST_USERNAME),
        &spec,
    )?;
    Ok(())
}

fn get_nonexistent_user(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let username = invalid::nonexistent_username("user");
    let spec = api_message(404, 1, "error").body("message", contains_string("User not found"));
    ctx.expect(
        &by_username(ApiRequest::get("/user/{username}"), &username),
        &spec,
    )?;
    Ok(())
}
