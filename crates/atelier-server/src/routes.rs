//! Router configuration

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the public site router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home).post(handlers::submit_contact))
        .route("/projects", get(handlers::project_list))
        .route("/projects/", get(handlers::project_list))
        .route("/research", get(handlers::research_list))
        .route("/research/", get(handlers::research_list))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    use atelier_core::config::Config;
    use atelier_core::domain::messages::{MessageRepository, MessageStatus};
    use atelier_core::domain::projects::{Project, ProjectRepository, ProjectType};
    use atelier_core::mail::{MailError, Mailer, OutboundEmail};
    use atelier_core::storage::Database;

    /// Transport stub: records attempts, optionally fails
    struct StubMailer {
        fail: Option<MailError>,
        attempts: Mutex<Vec<OutboundEmail>>,
    }

    impl StubMailer {
        fn ok() -> Self {
            Self {
                fail: None,
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: MailError) -> Self {
            Self {
                fail: Some(error),
                attempts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Mailer for StubMailer {
        async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
            self.attempts.lock().unwrap().push(email.clone());
            match &self.fail {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        }
    }

    async fn test_app(mailer: StubMailer) -> (Database, Router) {
        let db = Database::in_memory().await.unwrap();
        let mut config = Config::default();
        config.mail.owner_address = "owner@atelier.example".to_string();

        let state = AppState::new(db.clone(), Arc::new(mailer), Arc::new(config));
        (db, create_router(state))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn form_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_home_renders_index_template() {
        let (_db, app) = test_app(StubMailer::ok()).await;

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_json(response).await;
        assert_eq!(page["template"], "index");
        assert!(page["context"]["services"].is_array());
        assert!(page["context"]["form"]["errors"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_project_listing_route() {
        let (db, app) = test_app(StubMailer::ok()).await;

        let repo = ProjectRepository::new(&db);
        for (slug, date) in [("a", "2023-01-01"), ("b", "2024-06-01"), ("c", "2022-03-01")] {
            repo.create(&Project::new(
                slug.to_uppercase(),
                slug,
                "d",
                ProjectType::Web,
                date.parse().unwrap(),
            ))
            .await
            .unwrap();
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/projects")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_json(response).await;
        assert_eq!(page["template"], "projects");
        let dates: Vec<&str> = page["context"]["projects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["completion_date"].as_str().unwrap())
            .collect();
        assert_eq!(dates, vec!["2024-06-01", "2023-01-01", "2022-03-01"]);
    }

    #[tokio::test]
    async fn test_research_listing_route() {
        let (_db, app) = test_app(StubMailer::ok()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/research/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_json(response).await;
        assert_eq!(page["template"], "research");
        assert!(page["context"]["papers"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_valid_submission_reports_success_and_stores_read_message() {
        let (db, app) = test_app(StubMailer::ok()).await;

        let response = app
            .oneshot(form_request(
                "name=Juma&email=juma%40example.com&subject=Quote&message=Hello",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_json(response).await;
        let flash = &page["context"]["flash"][0];
        assert_eq!(flash["level"], "success");
        assert!(flash["text"]
            .as_str()
            .unwrap()
            .contains("Your message has been sent successfully"));

        let stored = MessageRepository::new(&db).list_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, MessageStatus::Read);
    }

    #[tokio::test]
    async fn test_invalid_submission_re_presents_form_with_errors() {
        let (db, app) = test_app(StubMailer::ok()).await;

        let response = app
            .oneshot(form_request("name=&email=bad&subject=&message="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_json(response).await;
        let errors = page["context"]["form"]["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 4);
        // Submitted values are echoed back for re-presentation
        assert_eq!(page["context"]["form"]["values"]["email"], "bad");
        assert!(page["context"]["flash"].as_array().unwrap().is_empty());

        // No record was created
        assert_eq!(MessageRepository::new(&db).count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_reports_error_and_keeps_record_new() {
        let (db, app) = test_app(StubMailer::failing(MailError::Transport(
            "connection refused".to_string(),
        )))
        .await;

        let response = app
            .oneshot(form_request(
                "name=Juma&email=juma%40example.com&subject=Quote&message=Hello",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_json(response).await;
        let flash = &page["context"]["flash"][0];
        assert_eq!(flash["level"], "error");
        assert!(flash["text"].as_str().unwrap().contains("connection refused"));

        let stored = MessageRepository::new(&db).list_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, MessageStatus::New);
    }

    #[tokio::test]
    async fn test_header_failure_reports_generic_error() {
        let (_db, app) = test_app(StubMailer::failing(MailError::InvalidHeader(
            "raw detail".to_string(),
        )))
        .await;

        let response = app
            .oneshot(form_request(
                "name=Juma&email=juma%40example.com&subject=Quote&message=Hello",
            ))
            .await
            .unwrap();

        let page = body_json(response).await;
        let flash = &page["context"]["flash"][0];
        assert_eq!(flash["level"], "error");
        assert_eq!(flash["text"], "Invalid header found.");
    }
}
