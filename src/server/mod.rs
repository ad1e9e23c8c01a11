//! # Backend proxy
//!
//! The browser (or the desktop client) never talks to Notion directly. It
//! calls this server, which forwards the request with the right credentials
//! and reshapes the answer into [`Card`](crate::core::Card)s.
//!
//! ## Routes
//! - `GET /api/cards`: all rows of the database, first page only
//! - `POST /api/update-card`: record a rating on one page
//! - `GET /api/demo-credentials`: the configured demo pair, unauthenticated
//! - anything else: files from `STATIC_DIR`, falling back to its `index.html`
//!
//! ## Credentials
//! Chosen per deployment with `CREDENTIAL_MODE`:
//! - `fixed`: `NOTION_KEY` / `NOTION_DATABASE_ID` for every request
//! - `header`: each request carries `x-notion-key` / `x-notion-db-id`, or gets 401
//!
//! Nothing is stored between requests. The demo endpoint is not a security
//! boundary; only expose it to trusted users.
use std::{
    sync::Arc,
    time::Duration,
};

use axum::{
    http::{
        header::CONTENT_TYPE,
        HeaderName,
        Method,
    },
    routing::{
        get,
        post,
    },
    Router,
};
use tokio::{
    net::TcpListener,
    signal,
};
use tower_http::{
    cors::{
        Any,
        CorsLayer,
    },
    services::{
        ServeDir,
        ServeFile,
    },
};
use tracing::{
    error,
    info,
};

pub mod config;
pub mod credentials;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use routes::{
    cards_handler,
    demo_credentials_handler,
    update_card_handler,
};
use state::State;

use crate::core::{
    FlashcardError,
    DATABASE_HEADER,
    KEY_HEADER,
};

pub fn router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(KEY_HEADER),
            HeaderName::from_static(DATABASE_HEADER),
        ])
        .max_age(Duration::from_secs(60 * 60));

    let static_dir = &state.config.static_dir;
    let assets =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/api/cards", get(cards_handler))
        .route("/api/update-card", post(update_card_handler))
        .route("/api/demo-credentials", get(demo_credentials_handler))
        .fallback_service(assets)
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(config: Config) -> Result<(), FlashcardError> {
    info!("Starting server in {} credential mode...", config.credential_mode);
    let state = State::new(config);

    let address = state.config.address();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on http://{address}");

    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{
            signal,
            SignalKind,
        };

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        fs,
    };

    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use serde_json::{
        json,
        Value,
    };
    use wiremock::{
        matchers::{
            body_partial_json,
            header,
            method,
            path,
        },
        Mock,
        MockServer,
        ResponseTemplate,
    };

    use super::*;
    use crate::{
        client::{
            BackendClient,
            CredentialStore,
            Effect,
            Session,
            ViewState,
        },
        core::Credentials,
    };

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    async fn spawn_app(config: Config) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let app = router(State::new(config));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{address}")
    }

    fn notion_page(id: &str, question: &str, times_studied: u32) -> Value {
        json!({
            "id": id,
            "properties": {
                "Front": { "title": [{ "plain_text": question }] },
                "Times Studied": { "number": times_studied }
            }
        })
    }

    #[tokio::test]
    async fn test_missing_headers_are_rejected_without_calling_notion() {
        let notion = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(0)
            .mount(&notion)
            .await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&notion)
            .await;

        let base = spawn_app(config(&[("NOTION_API_URL", notion.uri().as_str())])).await;
        let http = reqwest::Client::new();

        let response = http.get(format!("{base}/api/cards")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Missing Notion credentials" }));

        let response = http
            .post(format!("{base}/api/update-card"))
            .header(KEY_HEADER, "only-key")
            .json(&json!({ "pageId": "p", "level": "Good" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_cards_are_mapped_from_notion() {
        let notion = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/databases/db_user/query"))
            .and(header("authorization", "Bearer secret_user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [notion_page("p1", "Hola?", 2), { "id": "p2", "properties": {} }]
            })))
            .expect(1)
            .mount(&notion)
            .await;

        let base = spawn_app(config(&[("NOTION_API_URL", notion.uri().as_str())])).await;
        let response = reqwest::Client::new()
            .get(format!("{base}/api/cards"))
            .header(KEY_HEADER, "secret_user")
            .header(DATABASE_HEADER, "db_user")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!([
                { "id": "p1", "question": "Hola?", "answer": "No Answer", "timesStudied": 2 },
                { "id": "p2", "question": "No Question", "answer": "No Answer", "timesStudied": 0 }
            ])
        );
    }

    #[tokio::test]
    async fn test_upstream_error_message_is_relayed() {
        let notion = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "object": "error",
                "message": "Could not find database with ID: db_user."
            })))
            .mount(&notion)
            .await;

        let base = spawn_app(config(&[("NOTION_API_URL", notion.uri().as_str())])).await;
        let response = reqwest::Client::new()
            .get(format!("{base}/api/cards"))
            .header(KEY_HEADER, "secret_user")
            .header(DATABASE_HEADER, "db_user")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Could not find database with ID: db_user." }));
    }

    #[tokio::test]
    async fn test_html_from_notion_is_an_error_not_an_empty_deck() {
        let notion = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html>captive portal</html>"),
            )
            .mount(&notion)
            .await;

        let base = spawn_app(config(&[("NOTION_API_URL", notion.uri().as_str())])).await;
        let response = reqwest::Client::new()
            .get(format!("{base}/api/cards"))
            .header(KEY_HEADER, "secret_user")
            .header(DATABASE_HEADER, "db_user")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().is_some_and(|e| e.starts_with("JSON error")));
    }

    #[tokio::test]
    async fn test_empty_database_leads_to_empty_deck_then_setup() {
        let notion = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/databases/db_user/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(1)
            .mount(&notion)
            .await;

        let base = spawn_app(config(&[("NOTION_API_URL", notion.uri().as_str())])).await;

        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::at(dir.path().join("credentials.json"));
        let (mut session, _) = Session::start(store.clone());
        let (generation, credentials) =
            match session.submit_credentials("secret_user", "db_user") {
                Some(Effect::FetchCards { generation, credentials }) => (generation, credentials),
                other => panic!("Expected a fetch, got {:?}", other),
            };
        assert_eq!(credentials, Credentials::new("secret_user", "db_user"));

        let cards = BackendClient::new(base, credentials).list_cards().await;
        session.cards_loaded(generation, cards);
        assert_eq!(session.state(), &ViewState::Empty);
        assert!(store.load().is_some());

        session.return_to_setup();
        assert_eq!(session.state(), &ViewState::Unconfigured { notice: None });
        assert!(store.load().is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_malformed_update_body_gets_json_error() {
        let base = spawn_app(config(&[
            ("CREDENTIAL_MODE", "fixed"),
            ("NOTION_KEY", "secret_env"),
            ("NOTION_DATABASE_ID", "db_env"),
        ]))
        .await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/update-card"))
            .header("content-type", "application/json")
            .body("{ not json")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn test_transport_failure_is_generic() {
        // nothing listens on port 9 of localhost
        let base = spawn_app(config(&[("NOTION_API_URL", "http://127.0.0.1:9")])).await;
        let response = reqwest::Client::new()
            .get(format!("{base}/api/cards"))
            .header(KEY_HEADER, "k")
            .header(DATABASE_HEADER, "d")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Failed to reach Notion" }));
    }

    #[tokio::test]
    async fn test_update_card_in_fixed_mode() {
        let notion = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/pages/p1"))
            .and(header("authorization", "Bearer secret_env"))
            .and(body_partial_json(json!({
                "properties": {
                    "Level": { "select": { "name": "Easy" } },
                    "Times Studied": { "number": 1 }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "object": "page" })))
            .expect(1)
            .mount(&notion)
            .await;

        let base = spawn_app(config(&[
            ("NOTION_API_URL", notion.uri().as_str()),
            ("CREDENTIAL_MODE", "fixed"),
            ("NOTION_KEY", "secret_env"),
            ("NOTION_DATABASE_ID", "db_env"),
        ]))
        .await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/update-card"))
            .json(&json!({ "pageId": "p1", "level": "Easy" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "success": true }));
    }

    #[tokio::test]
    async fn test_demo_credentials() {
        let base = spawn_app(config(&[
            ("DEMO_NOTION_KEY", "secret_demo"),
            ("DEMO_NOTION_DB_ID", "db_demo"),
        ]))
        .await;

        let body: Value = reqwest::get(format!("{base}/api/demo-credentials"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, json!({ "notionKey": "secret_demo", "dbId": "db_demo" }));
    }

    #[tokio::test]
    async fn test_static_files_fall_back_to_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<html>flashcards</html>").unwrap();
        fs::write(dir.path().join("app.js"), "console.log('hi')").unwrap();

        let static_dir = dir.path().to_string_lossy().to_string();
        let base = spawn_app(config(&[("STATIC_DIR", static_dir.as_str())])).await;

        let asset = reqwest::get(format!("{base}/app.js")).await.unwrap();
        assert_eq!(asset.status(), StatusCode::OK);
        assert_eq!(asset.text().await.unwrap(), "console.log('hi')");

        let page = reqwest::get(format!("{base}/study/deck/3")).await.unwrap();
        assert_eq!(page.status(), StatusCode::OK);
        assert_eq!(page.text().await.unwrap(), "<html>flashcards</html>");
    }
}
