use petcheck_core::expect::{
    ResponseSpec, contains_string, empty, equal_to, has_key, matches_pattern, not_empty, not_null,
    one_of,
};
use petcheck_core::fixture::{self, invalid};
use petcheck_core::wire;

use super::{JSON, api_message, create_pet};
use crate::client::{ApiRequest, FilePart};
use crate::scenario::{Cleanup, Scenario, ScenarioContext, ScenarioError};

/// Shape of a generated pet name.
const PET_NAME_PATTERN: &str = r"^[A-Za-z]+_[0-9a-f]{5}$";

/// 1x1 transparent PNG.
const TEST_IMAGE: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

pub(super) const SCENARIOS: &[Scenario] = &[
    Scenario {
        group: "pet",
        name: "add_random_pet",
        description: "POST /pet with a random pet echoes a well-formed pet",
        run: add_random_pet,
    },
    Scenario {
        group: "pet",
        name: "upload_image_with_metadata",
        description: "POST /pet/{petId}/uploadImage with metadata and file",
        run: upload_image_with_metadata,
    },
    Scenario {
        group: "pet",
        name: "upload_image_without_metadata",
        description: "POST /pet/{petId}/uploadImage with only a file",
        run: upload_image_without_metadata,
    },
    Scenario {
        group: "pet",
        name: "find_by_status_available",
        description: "GET /pet/findByStatus?status=available returns only available pets",
        run: find_by_status_available,
    },
    Scenario {
        group: "pet",
        name: "find_by_status_multiple",
        description: "GET /pet/findByStatus?status=available,pending filters by both",
        run: find_by_status_multiple,
    },
    Scenario {
        group: "pet",
        name: "find_by_status_unknown",
        description: "GET /pet/findByStatus with an unknown status returns []",
        run: find_by_status_unknown,
    },
    Scenario {
        group: "pet",
        name: "find_by_status_padded",
        description: "GET /pet/findByStatus tolerates spaces around statuses",
        run: find_by_status_padded,
    },
    Scenario {
        group: "pet",
        name: "get_pet",
        description: "GET /pet/{petId} returns a freshly created pet",
        run: get_pet,
    },
    Scenario {
        group: "pet",
        name: "get_pet_malformed_id",
        description: "GET /pet/{petId} rejects malformed ids with 400",
        run: get_pet_malformed_id,
    },
    Scenario {
        group: "pet",
        name: "update_pet",
        description: "PUT /pet replaces a pet with the fixed test pet",
        run: update_pet,
    },
    Scenario {
        group: "pet",
        name: "delete_pet",
        description: "DELETE /pet/{petId} removes an existing pet",
        run: delete_pet,
    },
    Scenario {
        group: "pet",
        name: "delete_nonexistent_pet",
        description: "DELETE /pet/{petId} on an unknown id returns 404",
        run: delete_nonexistent_pet,
    },
    Scenario {
        group: "pet",
        name: "update_status_form",
        description: "POST /pet/{petId} form update of the status",
        run: update_status_form,
    },
    Scenario {
        group: "pet",
        name: "update_status_and_name_form",
        description: "POST /pet/{petId} form update of status and name",
        run: update_status_and_name_form,
    },
    Scenario {
        group: "pet",
        name: "update_form_malformed_id",
        description: "POST /pet/{petId} form update rejects malformed ids with 405",
        run: update_form_malformed_id,
    },
];

fn add_random_pet(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let pet = fixture::random_pet(ctx.rng())?;
    ctx.register_cleanup(Cleanup::Pet(pet.id));
    let spec = ResponseSpec::new()
        .status(200)
        .body("id", not_null())
        .body("name", matches_pattern(PET_NAME_PATTERN)?)
        .body("status", one_of(["available", "pending", "sold"]))
        .body("photoUrls", not_empty())
        .every("tags", "", has_key("name"));
    ctx.expect(&ApiRequest::post("/pet").json(wire::to_json(&pet)?), &spec)?;
    Ok(())
}

fn upload_image(pet_id: i64) -> ApiRequest {
    ApiRequest::post("/pet/{petId}/uploadImage").path_param("petId", pet_id)
}

fn test_image() -> FilePart {
    FilePart {
        field: "file".into(),
        file_name: "test_image.png".into(),
        mime: "image/png".into(),
        bytes: TEST_IMAGE.to_vec(),
    }
}

fn upload_image_with_metadata(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = create_pet(ctx)?;
    let request = upload_image(id)
        .multipart_text("additionalMetadata", "test metadata")
        .multipart_file(test_image());
    let spec = api_message(200, 200, "unknown").body("message", contains_string("File uploaded"));
    ctx.expect(&request, &spec)?;
    Ok(())
}

fn upload_image_without_metadata(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = create_pet(ctx)?;
    let request = upload_image(id).multipart_file(test_image());
    let spec = ResponseSpec::new().status(200).body("message", not_null());
    ctx.expect(&request, &spec)?;
    Ok(())
}

fn find_by_status(status: &str) -> ApiRequest {
    ApiRequest::get("/pet/findByStatus").query("status", status)
}

fn find_by_status_available(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let spec = ResponseSpec::new()
        .status(200)
        .content_type(JSON)
        .every("", "status", equal_to("available"));
    ctx.expect(&find_by_status("available"), &spec)?;
    Ok(())
}

fn find_by_status_multiple(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let spec = ResponseSpec::new()
        .status(200)
        .every("", "status", one_of(["available", "pending"]));
    ctx.expect(&find_by_status("available,pending"), &spec)?;
    Ok(())
}

fn find_by_status_unknown(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let spec = ResponseSpec::new().status(200).body("", empty());
    ctx.expect(&find_by_status("unknown_status"), &spec)?;
    Ok(())
}

fn find_by_status_padded(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let spec = ResponseSpec::new()
        .status(200)
        .every("", "status", one_of(["available", "pending"]));
    ctx.expect(&find_by_status(" available , pending "), &spec)?;
    Ok(())
}

fn get_by_id(id: impl ToString) -> ApiRequest {
    ApiRequest::get("/pet/{petId}").path_param("petId", id)
}

fn get_pet(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = create_pet(ctx)?;
    let spec = ResponseSpec::new().status(200).body("id", equal_to(id));
    ctx.expect(&get_by_id(id), &spec)?;
    Ok(())
}

fn get_pet_malformed_id(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let spec = ResponseSpec::new()
        .status(400)
        .body("message", contains_string("Invalid ID"));
    for id in invalid::MALFORMED_PET_IDS {
        ctx.expect(&get_by_id(id), &spec)?;
    }
    Ok(())
}

fn update_pet(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = create_pet(ctx)?;
    let mut pet = fixture::test_pet(ctx.rng())?;
    pet.id = id;
    let spec = ResponseSpec::new()
        .status(200)
        .body("id", equal_to(id))
        .body("name", equal_to(fixture::TEST_PET_NAME))
        .body("status", equal_to("available"))
        .body("category.name", equal_to("mammal"));
    ctx.expect(&ApiRequest::put("/pet").json(wire::to_json(&pet)?), &spec)?;
    Ok(())
}

fn delete_by_id(ctx: &ScenarioContext<'_>, id: i64) -> ApiRequest {
    ApiRequest::delete("/pet/{petId}")
        .path_param("petId", id)
        .header("api_key", ctx.api_key())
}

fn delete_pet(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = create_pet(ctx)?;
    let request = delete_by_id(ctx, id);
    ctx.expect(&request, &ResponseSpec::new().status(200))?;
    Ok(())
}

fn delete_nonexistent_pet(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = invalid::unlikely_pet_id(ctx.rng())?;
    let request = delete_by_id(ctx, id);
    ctx.expect(&request, &ResponseSpec::new().status(404))?;
    Ok(())
}

fn update_form(id: impl ToString) -> ApiRequest {
    ApiRequest::post("/pet/{petId}").path_param("petId", id)
}

fn update_status_form(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = create_pet(ctx)?;
    ctx.expect(
        &update_form(id).form("status", "sold"),
        &ResponseSpec::new().status(200),
    )?;
    ctx.expect(
        &get_by_id(id),
        &ResponseSpec::new().status(200).body("status", equal_to("sold")),
    )?;
    Ok(())
}

fn update_status_and_name_form(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = create_pet(ctx)?;
    ctx.expect(
        &update_form(id).form("status", "sold").form("name", "newName"),
        &ResponseSpec::new().status(200),
    )?;
    let spec = ResponseSpec::new()
        .status(200)
        .body("name", equal_to("newName"))
        .body("status", equal_to("sold"));
    ctx.expect(&get_by_id(id), &spec)?;
    Ok(())
}

fn update_form_malformed_id(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let spec = ResponseSpec::new()
        .status(405)
        .body("message", contains_string("Invalid input"));
    for id in invalid::MALFORMED_FORM_PET_IDS {
        ctx.expect(&update_form(id).form("name", "Test"), &spec)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Body, Method};
    use crate::testing::FakeClient;
    use crate::ScenarioRunner;
    use petcheck_core::{Config, Outcome};
    use serde_json::{Value, json};

    fn scenario(name: &str) -> Scenario {
        *SCENARIOS.iter().find(|s| s.name == name).unwrap()
    }

    fn run(client: &FakeClient, name: &str) -> petcheck_core::ScenarioReport {
        ScenarioRunner::new(client, Config::default())
            .with_seed(Some(5))
            .run(&[scenario(name)])
            .scenarios
            .remove(0)
    }

    /// Echoes created pets back, like the live service.
    fn echo_pets(req: &ApiRequest) -> (u16, Value) {
        match (req.method, req.path.as_str(), &req.body) {
            (Method::Post | Method::Put, "/pet", Some(Body::Json(json))) => {
                (200, serde_json::from_str(json).unwrap())
            }
            (Method::Get, "/pet/{petId}", _) => {
                let id: i64 = req.path_params[0].1.parse().unwrap_or(0);
                if id > 0 {
                    (200, json!({"id": id, "name": "newName", "status": "sold", "photoUrls": []}))
                } else {
                    (400, json!({"code": 400, "type": "unknown", "message": "Invalid ID supplied"}))
                }
            }
            (Method::Delete, _, _) => (200, json!({"code": 200, "type": "unknown", "message": "ok"})),
            (Method::Post, "/pet/{petId}/uploadImage", Some(Body::Multipart { file, .. })) => {
                let file = file.as_ref().unwrap();
                (
                    200,
                    json!({
                        "code": 200,
                        "type": "unknown",
                        "message": format!("additionalMetadata: null\nFile uploaded to ./{}, {} bytes", file.file_name, file.bytes.len())
                    }),
                )
            }
            _ => (200, json!({})),
        }
    }

    #[test]
    fn add_random_pet_passes_against_echo() {
        let client = FakeClient::new(echo_pets);
        let report = run(&client, "add_random_pet");
        assert_eq!(report.outcome, Outcome::Pass, "{report:?}");
        assert_eq!(report.cleanup.len(), 1);
        assert!(report.cleanup[0].target.starts_with("pet "));
    }

    #[test]
    fn add_random_pet_fails_on_bad_name() {
        let client = FakeClient::new(|req| {
            let mut body = echo_pets(req).1;
            body["name"] = json!("NoSuffix");
            (200, body)
        });
        let report = run(&client, "add_random_pet");
        assert_eq!(report.outcome, Outcome::Fail);
        assert_eq!(report.failure.unwrap().path.as_deref(), Some("name"));
    }

    #[test]
    fn upload_sends_multipart_with_metadata() {
        let client = FakeClient::new(echo_pets);
        let report = run(&client, "upload_image_with_metadata");
        assert_eq!(report.outcome, Outcome::Pass, "{report:?}");

        let sent = client.sent();
        let upload = sent
            .iter()
            .find(|r| r.path == "/pet/{petId}/uploadImage")
            .unwrap();
        match &upload.body {
            Some(Body::Multipart { fields, file }) => {
                assert_eq!(fields[0].0, "additionalMetadata");
                assert_eq!(file.as_ref().unwrap().bytes, TEST_IMAGE);
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn find_by_status_reports_counter_example() {
        let client = FakeClient::new(|_| {
            (200, json!([{"status": "available"}, {"status": "sold"}]))
        });
        let report = run(&client, "find_by_status_multiple");
        let failure = report.failure.unwrap();
        assert_eq!(failure.path.as_deref(), Some("[1].status"));
        assert_eq!(failure.actual, "\"sold\"");
    }

    #[test]
    fn find_by_status_unknown_accepts_empty_array() {
        let client = FakeClient::new(|_| (200, json!([])));
        assert_eq!(run(&client, "find_by_status_unknown").outcome, Outcome::Pass);
    }

    #[test]
    fn malformed_ids_are_all_tried() {
        let client = FakeClient::new(echo_pets);
        let report = run(&client, "get_pet_malformed_id");
        assert_eq!(report.outcome, Outcome::Pass, "{report:?}");
        assert_eq!(report.requests, 4);
    }

    #[test]
    fn form_update_then_read_back() {
        let client = FakeClient::new(echo_pets);
        let report = run(&client, "update_status_and_name_form");
        assert_eq!(report.outcome, Outcome::Pass, "{report:?}");

        let sent = client.sent();
        let form = sent
            .iter()
            .find(|r| r.method == Method::Post && r.path == "/pet/{petId}")
            .unwrap();
        assert_eq!(
            form.body,
            Some(Body::Form(vec![
                ("status".into(), "sold".into()),
                ("name".into(), "newName".into())
            ]))
        );
    }

    #[test]
    fn delete_pet_sends_api_key_and_cleans_up() {
        let client = FakeClient::new(echo_pets);
        let report = run(&client, "delete_pet");
        assert_eq!(report.outcome, Outcome::Pass);
        let deletes: Vec<_> = client
            .sent()
            .into_iter()
            .filter(|r| r.method == Method::Delete)
            .collect();
        assert_eq!(deletes.len(), 2);
        assert!(deletes.iter().all(|r| r.headers == [("api_key".to_string(), "12".to_string())]));
    }

    #[test]
    fn failed_setup_is_an_error() {
        let client = FakeClient::new(|_| (500, json!({"message": "boom"})));
        let report = run(&client, "get_pet");
        assert_eq!(report.outcome, Outcome::Error);
        assert!(report.error.unwrap().starts_with("setup: create pet"));
        assert_eq!(report.cleanup.len(), 1, "generated pet id is still cleaned up");
    }
}
