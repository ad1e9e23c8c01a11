use reqwest::{
    Client,
    Method,
    StatusCode,
    Url,
};
use serde_json::Value;
use tracing::debug;

use crate::core::{
    Credentials,
    FlashcardError,
};

pub const NOTION_API_URL: &str = "https://api.notion.com";
pub const NOTION_VERSION: &str = "2022-06-28";

/// Thin wrapper over the Notion REST API. Holds no credentials of its own:
/// every call is made with the pair the caller passes in.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: Client,
    base_url: String,
}

impl NotionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(Client::new(), base_url)
    }

    pub fn with_http(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Joins `segments` onto the base URL, percent-encoding each one so ids
    /// taken from callers cannot escape their path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FlashcardError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            FlashcardError::Config(format!("Invalid Notion API URL {}: {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                FlashcardError::Config(format!("Notion API URL has no path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn make_request(
        &self,
        method: Method,
        segments: &[&str],
        credentials: &Credentials,
        body: Option<Value>,
    ) -> Result<Value, FlashcardError> {
        let url = self.endpoint(segments)?;
        debug!("Notion {method} {url}");

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&credentials.key)
            .header("Notion-Version", NOTION_VERSION);

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let payload: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            return Err(FlashcardError::Notion { status, message: upstream_message(&payload, status) });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `POST /v1/databases/{id}/query` with an empty body: no filter, no sort,
    /// first page only.
    pub async fn query_database(&self, credentials: &Credentials) -> Result<Value, FlashcardError> {
        let segments = ["v1", "databases", credentials.database_id.as_str(), "query"];
        self.make_request(Method::POST, &segments, credentials, Some(serde_json::json!({}))).await
    }

    pub async fn retrieve_database(
        &self,
        credentials: &Credentials,
    ) -> Result<Value, FlashcardError> {
        let segments = ["v1", "databases", credentials.database_id.as_str()];
        self.make_request(Method::GET, &segments, credentials, None).await
    }

    pub async fn update_page(
        &self,
        credentials: &Credentials,
        page_id: &str,
        properties: Value,
    ) -> Result<(), FlashcardError> {
        let body = serde_json::json!({ "properties": properties });
        self.make_request(Method::PATCH, &["v1", "pages", page_id], credentials, Some(body)).await?;
        Ok(())
    }
}

fn upstream_message(payload: &Value, status: StatusCode) -> String {
    payload["message"]
        .as_str()
        .filter(|message| !message.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Notion API returned {status}"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{
            body_json,
            header,
            method,
            path,
        },
        Mock,
        MockServer,
        ResponseTemplate,
    };

    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("secret_abc", "db123")
    }

    #[tokio::test]
    async fn test_query_sends_auth_and_version_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/databases/db123/query"))
            .and(header("authorization", "Bearer secret_abc"))
            .and(header("notion-version", NOTION_VERSION))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = NotionClient::new(server.uri());
        let payload = client.query_database(&credentials()).await.unwrap();
        assert_eq!(payload, json!({ "results": [] }));
    }

    #[tokio::test]
    async fn test_upstream_message_is_relayed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "object": "error",
                "status": 401,
                "code": "unauthorized",
                "message": "API token is invalid."
            })))
            .mount(&server)
            .await;

        let client = NotionClient::new(server.uri());
        match client.query_database(&credentials()).await {
            Err(FlashcardError::Notion { status, message }) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "API token is invalid.");
            }
            other => panic!("Expected Notion error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_falls_back_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
            .mount(&server)
            .await;

        let client = NotionClient::new(server.uri());
        let err = client.update_page(&credentials(), "page1", json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Notion API returned 502 Bad Gateway");
    }

    #[tokio::test]
    async fn test_html_success_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html>captive portal</html>"),
            )
            .mount(&server)
            .await;

        let client = NotionClient::new(server.uri());
        let result = client.query_database(&credentials()).await;
        assert!(matches!(result, Err(FlashcardError::Json(_))));
    }

    #[tokio::test]
    async fn test_ids_are_encoded_as_single_segments() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/pages/a%2F..%2Fdatabases%3Fx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "object": "page" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/databases/db%2Fquery/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = NotionClient::new(server.uri());
        client.update_page(&credentials(), "a/../databases?x", json!({})).await.unwrap();
        client.query_database(&Credentials::new("secret_abc", "db/query")).await.unwrap();
    }
}
