pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{catalog, discovery, gateway, matching, personality};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Assessment
        .route(
            "/api/v1/assessment/questions",
            get(personality::handlers::handle_questions),
        )
        .route(
            "/api/v1/assessment/score",
            post(personality::handlers::handle_score),
        )
        // Discovery
        .route(
            "/api/v1/discovery",
            post(discovery::handlers::handle_discovery),
        )
        // Careers
        .route("/api/v1/careers", get(catalog::handlers::handle_list_careers))
        .route(
            "/api/v1/careers/search",
            get(catalog::handlers::handle_search_careers),
        )
        .route("/api/v1/careers/match", post(matching::handlers::handle_match))
        .route("/api/v1/careers/:id", get(catalog::handlers::handle_get_career))
        // Generation
        .route("/api/v1/generate", post(gateway::handlers::handle_generate))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::catalog::builtin::builtin_catalog;
    use crate::discovery::DiscoveryOrchestrator;
    use crate::gateway::testing::ScriptedBackend;
    use crate::gateway::{GatewayConfig, GenerationGateway, InMemoryGenerationStore};
    use crate::matching::{MatchEngine, MatchLimits};
    use crate::personality::{PersonalityScorer, QuestionBank};

    fn app_with(backend: Arc<ScriptedBackend>) -> Router {
        let catalog = Arc::new(builtin_catalog().unwrap());
        let orchestrator = DiscoveryOrchestrator::new(
            PersonalityScorer::new(Arc::new(QuestionBank::riasec())),
            MatchEngine::default(),
            Arc::clone(&catalog),
            MatchLimits::new(2, 5).unwrap(),
        );
        let gateway = GenerationGateway::new(
            backend,
            Arc::new(InMemoryGenerationStore::new()),
            GatewayConfig {
                default_timeout: Duration::from_secs(5),
                ..GatewayConfig::default()
            },
        );
        build_router(AppState {
            catalog,
            orchestrator: Arc::new(orchestrator),
            gateway,
        })
    }

    fn app() -> Router {
        app_with(Arc::new(ScriptedBackend::new("Generated text.")))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_catalog_and_store() {
        let (status, body) = send(app(), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["careers"], 16);
        assert_eq!(body["generation_cache"], "memory");
    }

    #[tokio::test]
    async fn test_score_endpoint_returns_vector_and_code() {
        let request = post_json(
            "/api/v1/assessment/score",
            json!({"answers": {"r1": 5, "i1": 4, "a1": 1, "s1": 2, "e1": 3, "c1": 1}}),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "RIE");
        assert_eq!(body["personality"]["investigative"], 80.0);
        assert_eq!(
            body["personality_code"],
            json!(["Realistic", "Investigative", "Enterprising"])
        );
    }

    #[tokio::test]
    async fn test_score_endpoint_rejects_unknown_category() {
        let request = post_json(
            "/api/v1/assessment/score",
            json!({"answers": {"r1": {"Mystic": 2}}}),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_questions_endpoint_lists_bank() {
        let (status, body) = send(app(), get_req("/api/v1/assessment/questions")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["questions"].as_array().unwrap().len(), 18);
        assert_eq!(body["scale_max"], 5.0);
    }

    #[tokio::test]
    async fn test_discovery_endpoint_uses_default_caps() {
        let request = post_json(
            "/api/v1/discovery",
            json!({"answers": {"s1": 5, "s2": 5, "a1": 4}, "skills": ["communication"]}),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["primary_matches"].as_array().unwrap().len(), 2);
        assert_eq!(body["alternative_matches"].as_array().unwrap().len(), 5);
        assert_eq!(body["enrichment"]["status"], "not_requested");
    }

    #[tokio::test]
    async fn test_discovery_endpoint_rejects_negative_top_k() {
        let request = post_json("/api/v1/discovery", json!({"top_k": -1}));
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_enriched_discovery_endpoint() {
        let backend = Arc::new(ScriptedBackend::new("Because you like people."));
        let request = post_json(
            "/api/v1/discovery",
            json!({"answers": {"s1": 5}, "enrich": true, "top_k": 1, "alt_k": 0}),
        );
        let (status, body) = send(app_with(backend.clone()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enrichment"]["status"], "enriched");
        assert_eq!(
            body["enrichment"]["rationales"][0]["text"],
            "Because you like people."
        );
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_match_endpoint_ranks_supplied_vector() {
        let request = post_json(
            "/api/v1/careers/match",
            json!({
                "personality": {
                    "realistic": 20, "investigative": 95, "artistic": 30,
                    "social": 20, "enterprising": 20, "conventional": 60
                },
                "skills": ["statistics", "python"],
                "top_k": 1,
                "alt_k": 2
            }),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["primary"].as_array().unwrap().len(), 1);
        assert_eq!(body["alternatives"].as_array().unwrap().len(), 2);
        assert_eq!(body["primary"][0]["rank"], 1);
    }

    #[tokio::test]
    async fn test_match_endpoint_rejects_out_of_range_vector() {
        let request = post_json(
            "/api/v1/careers/match",
            json!({
                "personality": {
                    "realistic": 120, "investigative": 0, "artistic": 0,
                    "social": 0, "enterprising": 0, "conventional": 0
                }
            }),
        );
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_career_lookup_and_not_found() {
        let (status, body) = send(app(), get_req("/api/v1/careers/registered-nurse")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "registered-nurse");

        let (status, body) = send(app(), get_req("/api/v1/careers/astronaut")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_career_list_and_search() {
        let (status, body) = send(app(), get_req("/api/v1/careers")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 16);

        let (status, body) = send(app(), get_req("/api/v1/careers/search?q=engineer")).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap())
            .collect();
        assert!(ids.contains(&"software-engineer"));
        assert!(ids.contains(&"mechanical-engineer"));

        let (status, _) = send(app(), get_req("/api/v1/careers/search?q=%20")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_endpoint_caches_second_call() {
        let backend = Arc::new(ScriptedBackend::new("Nurses often work shifts."));
        let app = app_with(backend.clone());
        let body = json!({
            "template_id": "career_question",
            "params": [
                {"name": "personality_code", "value": "SIC"},
                {"name": "career_title", "value": "Registered Nurse"},
                {"name": "question", "value": "Do nurses work nights?"}
            ]
        });

        let (status, first) = send(app.clone(), post_json("/api/v1/generate", body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["cached"], false);

        let (_, second) = send(app, post_json("/api/v1/generate", body)).await;
        assert_eq!(second["cached"], true);
        assert_eq!(second["text"], "Nurses often work shifts.");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_generate_endpoint_rejects_unknown_template() {
        let (status, body) = send(
            app(),
            post_json("/api/v1/generate", json!({"template_id": "haiku"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
