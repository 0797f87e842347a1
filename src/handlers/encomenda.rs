// src/handlers/encomenda.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::{parse_id, AppJson};
use crate::dtos::encomenda::EncomendaRequest;
use crate::error::{AppError, NOT_FOUND_MESSAGE};
use crate::models::encomenda::Encomenda;
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::not_found(NOT_FOUND_MESSAGE)
}

// GET /encomendas - List all records, newest id first
#[instrument(skip(state))]
pub async fn list_encomendas(State(state): State<AppState>) -> Result<Json<Vec<Encomenda>>, AppError> {
    let encomendas = state.store.list_encomendas().await?;
    Ok(Json(encomendas))
}

// GET /encomendas/:id
#[instrument(skip(state))]
pub async fn get_encomenda(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Encomenda>, AppError> {
    let id = parse_id(&id)?;

    let encomenda = state.store.get_encomenda(id).await?.ok_or_else(not_found)?;

    Ok(Json(encomenda))
}

// POST /encomendas/post - Create a record, the store assigns the id
#[instrument(skip(state, payload))]
pub async fn create_encomenda(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Map<String, Value>>,
) -> Result<(StatusCode, Json<Encomenda>), AppError> {
    let new = EncomendaRequest::try_from(payload)?.into_new()?;

    let encomenda = state.store.create_encomenda(new).await?;
    info!(id = encomenda.id, "Encomenda created");

    Ok((StatusCode::CREATED, Json(encomenda)))
}

// PUT /encomendas/:id - Replace every business field
#[instrument(skip(state, payload))]
pub async fn replace_encomenda(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(payload): AppJson<Map<String, Value>>,
) -> Result<Json<Encomenda>, AppError> {
    let id = parse_id(&id)?;
    let new = EncomendaRequest::try_from(payload)?.into_new()?;

    let encomenda = state.store.replace_encomenda(id, new).await?.ok_or_else(not_found)?;

    Ok(Json(encomenda))
}

// PATCH /encomendas/:id - Update only the fields sent
#[instrument(skip(state, payload))]
pub async fn update_encomenda(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(payload): AppJson<Map<String, Value>>,
) -> Result<Json<Encomenda>, AppError> {
    let id = parse_id(&id)?;
    let patch = EncomendaRequest::try_from(payload)?.into_patch()?;

    let encomenda = state.store.update_encomenda(id, patch).await?.ok_or_else(not_found)?;

    Ok(Json(encomenda))
}

// DELETE /encomendas/:id
#[instrument(skip(state))]
pub async fn delete_encomenda(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;

    if !state.store.delete_encomenda(id).await? {
        return Err(not_found());
    }
    info!(id, "Encomenda deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::dtos::encomenda::{INVALID_BODY, INVALID_CHUMBO, NOTHING_TO_UPDATE};
    use crate::error::NOT_FOUND_MESSAGE;
    use crate::handlers::INVALID_ID;
    use crate::test_support::TestApp;

    fn steel() -> Value {
        json!({ "usuarios_id": 1, "material": "steel", "chumbo": 2, "peso_laco": 0.5, "cor": "red" })
    }

    async fn create(app: &TestApp, body: Value) -> Value {
        let response = app.server.post("/api/encomendas/post").authorization_bearer(&app.token).json(&body).await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    #[tokio::test]
    async fn create_returns_record_with_id() {
        let app = TestApp::new().await;

        let body = create(&app, steel()).await;

        assert!(body["id"].as_i64().unwrap() >= 1);
        assert_eq!(body["usuarios_id"], 1);
        assert_eq!(body["material"], "steel");
        assert_eq!(body["chumbo"], 2.0);
        assert_eq!(body["peso_laco"], 0.5);
        assert_eq!(body["cor"], "red");
    }

    #[tokio::test]
    async fn create_accepts_english_field_names() {
        let app = TestApp::new().await;

        let body = create(
            &app,
            json!({ "ownerUserId": 1, "material": "steel", "leadAmount": 2, "loopWeight": 0.5, "color": "red" }),
        )
        .await;

        assert_eq!(body["cor"], "red");
        assert_eq!(body["peso_laco"], 0.5);
    }

    #[tokio::test]
    async fn created_record_can_be_fetched() {
        let app = TestApp::new().await;
        let created = create(&app, steel()).await;
        let id = created["id"].as_i64().unwrap();

        let response = app.server.get(&format!("/api/encomendas/{id}")).authorization_bearer(&app.token).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), created);
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_with_generic_message() {
        let app = TestApp::new().await;
        let mut body = steel();
        body["usuarios_id"] = json!(0);

        let response = app.server.post("/api/encomendas/post").authorization_bearer(&app.token).json(&body).await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>(), json!({ "erro": INVALID_BODY }));
    }

    #[tokio::test]
    async fn create_rejects_malformed_json() {
        let app = TestApp::new().await;

        let response = app
            .server
            .post("/api/encomendas/post")
            .authorization_bearer(&app.token)
            .content_type("application/json")
            .bytes("{not json".into())
            .await;

        response.assert_status_bad_request();
        assert!(response.json::<Value>()["erro"].is_string());
    }

    #[tokio::test]
    async fn create_rejects_array_body() {
        let app = TestApp::new().await;

        let response = app
            .server
            .post("/api/encomendas/post")
            .authorization_bearer(&app.token)
            .json(&json!([1, "steel", 2, 0.5, "red"]))
            .await;

        response.assert_status_bad_request();
        assert!(response.json::<Value>()["erro"].is_string());

        let response = app.server.get("/api/encomendas").authorization_bearer(&app.token).await;
        assert!(response.json::<Vec<Value>>().is_empty());
    }

    #[tokio::test]
    async fn both_spellings_of_a_field_are_a_bad_request() {
        let app = TestApp::new().await;
        let mut body = steel();
        body["ownerUserId"] = json!(1);

        let response = app.server.post("/api/encomendas/post").authorization_bearer(&app.token).json(&body).await;
        response.assert_status_bad_request();
        assert!(response.json::<Value>()["erro"].is_string());

        let id = create(&app, steel()).await["id"].as_i64().unwrap();
        let response = app
            .server
            .patch(&format!("/api/encomendas/{id}"))
            .authorization_bearer(&app.token)
            .json(&json!({ "cor": "blue", "color": "green" }))
            .await;
        response.assert_status_bad_request();
        assert!(response.json::<Value>()["erro"].is_string());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let app = TestApp::new().await;
        let first = create(&app, steel()).await;
        let second = create(&app, steel()).await;

        let response = app.server.get("/api/encomendas").authorization_bearer(&app.token).await;

        response.assert_status_ok();
        let ids: Vec<i64> = response
            .json::<Vec<Value>>()
            .iter()
            .map(|e| e["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![second["id"].as_i64().unwrap(), first["id"].as_i64().unwrap()]);
    }

    #[tokio::test]
    async fn get_rejects_bad_ids_and_reports_missing() {
        let app = TestApp::new().await;

        for raw in ["-1", "0", "abc", "2.5"] {
            let response = app.server.get(&format!("/api/encomendas/{raw}")).authorization_bearer(&app.token).await;
            response.assert_status_bad_request();
            assert_eq!(response.json::<Value>(), json!({ "erro": INVALID_ID }));
        }

        let response = app.server.get("/api/encomendas/999999").authorization_bearer(&app.token).await;
        response.assert_status_not_found();
        assert_eq!(response.json::<Value>(), json!({ "erro": NOT_FOUND_MESSAGE }));
    }

    #[tokio::test]
    async fn put_replaces_all_fields() {
        let app = TestApp::new().await;
        let id = create(&app, steel()).await["id"].as_i64().unwrap();

        let replacement = json!({ "usuarios_id": 2, "material": "iron", "chumbo": 0, "peso_laco": 0, "cor": "green" });
        let response = app
            .server
            .put(&format!("/api/encomendas/{id}"))
            .authorization_bearer(&app.token)
            .json(&replacement)
            .await;

        response.assert_status_ok();
        let mut expected = replacement;
        expected["id"] = json!(id);
        expected["chumbo"] = json!(0.0);
        expected["peso_laco"] = json!(0.0);
        assert_eq!(response.json::<Value>(), expected);
    }

    #[tokio::test]
    async fn put_requires_every_field() {
        let app = TestApp::new().await;
        let id = create(&app, steel()).await["id"].as_i64().unwrap();

        for field in ["usuarios_id", "material", "chumbo", "peso_laco", "cor"] {
            let mut body = steel();
            body.as_object_mut().unwrap().remove(field);
            let response = app
                .server
                .put(&format!("/api/encomendas/{id}"))
                .authorization_bearer(&app.token)
                .json(&body)
                .await;
            response.assert_status_bad_request();
        }

        // The stored record is untouched
        let response = app.server.get(&format!("/api/encomendas/{id}")).authorization_bearer(&app.token).await;
        assert_eq!(response.json::<Value>()["material"], "steel");
    }

    #[tokio::test]
    async fn put_on_missing_record_is_not_found() {
        let app = TestApp::new().await;

        let response = app.server.put("/api/encomendas/77").authorization_bearer(&app.token).json(&steel()).await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn patch_changes_only_the_sent_field() {
        let app = TestApp::new().await;
        let created = create(&app, steel()).await;
        let id = created["id"].as_i64().unwrap();

        let response = app
            .server
            .patch(&format!("/api/encomendas/{id}"))
            .authorization_bearer(&app.token)
            .json(&json!({ "cor": "blue" }))
            .await;

        response.assert_status_ok();
        let mut expected = created;
        expected["cor"] = json!("blue");
        assert_eq!(response.json::<Value>(), expected);
    }

    #[tokio::test]
    async fn patch_with_zero_writes_zero() {
        let app = TestApp::new().await;
        let created = create(&app, steel()).await;
        let id = created["id"].as_i64().unwrap();

        let response = app
            .server
            .patch(&format!("/api/encomendas/{id}"))
            .authorization_bearer(&app.token)
            .json(&json!({ "chumbo": 0 }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["chumbo"], 0.0);
        assert_eq!(body["peso_laco"], created["peso_laco"]);
    }

    #[tokio::test]
    async fn patch_rejections() {
        let app = TestApp::new().await;
        let id = create(&app, steel()).await["id"].as_i64().unwrap();
        let path = format!("/api/encomendas/{id}");

        let response = app.server.patch(&path).authorization_bearer(&app.token).json(&json!({})).await;
        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>(), json!({ "erro": NOTHING_TO_UPDATE }));

        let response = app.server.patch(&path).authorization_bearer(&app.token).json(&json!({ "chumbo": -2 })).await;
        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>(), json!({ "erro": INVALID_CHUMBO }));

        let response = app.server.patch("/api/encomendas/0").authorization_bearer(&app.token).json(&json!({ "cor": "x" })).await;
        response.assert_status_bad_request();

        let response = app.server.patch("/api/encomendas/4242").authorization_bearer(&app.token).json(&json!({ "cor": "x" })).await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let app = TestApp::new().await;
        let id = create(&app, steel()).await["id"].as_i64().unwrap();
        let path = format!("/api/encomendas/{id}");

        let response = app.server.delete(&path).authorization_bearer(&app.token).await;
        response.assert_status(StatusCode::NO_CONTENT);
        assert!(response.as_bytes().is_empty());

        app.server.get(&path).authorization_bearer(&app.token).await.assert_status_not_found();
        app.server.delete(&path).authorization_bearer(&app.token).await.assert_status_not_found();
    }

    #[tokio::test]
    async fn routes_require_a_token() {
        let app = TestApp::new().await;

        let response = app.server.get("/api/encomendas").await;
        response.assert_status_unauthorized();
        assert!(response.json::<Value>()["erro"].is_string());

        let response = app.server.post("/api/encomendas/post").authorization_bearer("garbage").json(&steel()).await;
        response.assert_status_unauthorized();
    }
}
