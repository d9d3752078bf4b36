//! HTTP REST API routes

mod definition_routes;
mod rules_routes;
mod sheet_routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;
use crate::infrastructure::websocket;

pub(crate) use sheet_routes::parse_character_id;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Definition routes
        .route(
            "/api/characters/{id}/definition",
            get(definition_routes::get_definition).put(definition_routes::put_definition),
        )
        // Sheet routes
        .route(
            "/api/characters/{id}/sheet",
            get(sheet_routes::get_sheet).post(sheet_routes::get_or_generate_sheet),
        )
        .route(
            "/api/characters/{id}/sheet/regenerate",
            post(sheet_routes::regenerate_sheet),
        )
        .route(
            "/api/characters/{id}/sheet/progress",
            get(sheet_routes::get_progress),
        )
        .route(
            "/api/characters/{id}/sheet/ws",
            get(websocket::progress_ws_handler),
        )
        // Rules and pipeline status
        .route("/api/rules", get(rules_routes::get_rules))
        .route("/api/pipeline/stats", get(rules_routes::get_pipeline_stats))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::application::ports::outbound::{LlmResponse, MockLlmPort};
    use crate::domain::entities::CharacterDefinition;
    use crate::domain::value_objects::{AppSettings, CharacterId};
    use crate::infrastructure::persistence::{
        InMemoryCharacterDefinitionRepository, InMemoryCharacterSheetStore,
    };
    use crate::test_fixtures::{elf_wizard_sage, fast_settings, srd};

    fn app() -> Router {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Ok(LlmResponse::text("Flavor text.")));
        let settings: AppSettings = fast_settings();

        let state = AppState::from_parts(
            settings,
            srd(),
            Arc::new(InMemoryCharacterDefinitionRepository::new()),
            Arc::new(InMemoryCharacterSheetStore::new()),
            Arc::new(llm),
        );
        create_routes().with_state(Arc::new(state))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn put_definition(app: &Router, definition: &CharacterDefinition) -> StatusCode {
        let uri = format!("/api/characters/{}/definition", definition.id);
        let body = serde_json::to_value(definition).unwrap();
        send(app, "PUT", &uri, Some(body)).await.0
    }

    #[tokio::test]
    async fn test_sheet_lifecycle() {
        let app = app();
        let definition = elf_wizard_sage();
        let base = format!("/api/characters/{}/sheet", definition.id);

        assert_eq!(put_definition(&app, &definition).await, StatusCode::OK);

        let (status, _) = send(&app, "GET", &base, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, sheet) = send(&app, "POST", &base, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sheet["class"], "Wizard");
        assert_eq!(sheet["languages"][1], "Elvish");

        let (status, cached) = send(&app, "GET", &base, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cached, sheet);

        let (status, progress) = send(&app, "GET", &format!("{}/progress", base), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(progress["status"], "succeeded");

        let (status, stats) = send(&app, "GET", "/api/pipeline/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["runs_started"], 1);
    }

    #[tokio::test]
    async fn test_regenerate_with_missing_class_is_unprocessable() {
        let app = app();
        let mut definition = elf_wizard_sage();
        definition.class_id = None;
        put_definition(&app, &definition).await;

        let uri = format!("/api/characters/{}/sheet/regenerate", definition.id);
        let (status, _) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids() {
        let app = app();

        let uri = format!("/api/characters/{}/sheet/regenerate", CharacterId::new());
        let (status, _) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/api/characters/not-a-uuid/sheet", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_definition_id_must_match_path() {
        let app = app();
        let definition = elf_wizard_sage();
        let uri = format!("/api/characters/{}/definition", CharacterId::new());
        let body = serde_json::to_value(&definition).unwrap();

        let (status, _) = send(&app, "PUT", &uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rules_summary() {
        let (status, rules) = send(&app(), "GET", "/api/rules", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rules["version"], "srd-5.1-core-1");
        assert!(rules["classes"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c["id"] == "wizard"));
    }
}
