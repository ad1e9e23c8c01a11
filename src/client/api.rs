use reqwest::{
    Client,
    RequestBuilder,
    Response,
    StatusCode,
};
use serde::de::DeserializeOwned;

use crate::core::{
    Card,
    Credentials,
    DemoCredentials,
    ErrorBody,
    FlashcardError,
    Level,
    UpdateCardRequest,
    DATABASE_HEADER,
    KEY_HEADER,
};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Talks to the flashcards backend on behalf of one set of credentials.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(KEY_HEADER, &self.credentials.key)
            .header(DATABASE_HEADER, &self.credentials.database_id)
    }

    pub async fn list_cards(&self) -> Result<Vec<Card>, FlashcardError> {
        let url = format!("{}/api/cards", self.base_url);
        let response = self.authorized(self.http.get(url)).send().await?;
        read_json(response).await
    }

    pub async fn update_card(
        &self,
        card_id: &str,
        level: Level,
        times_studied: u32,
    ) -> Result<(), FlashcardError> {
        let url = format!("{}/api/update-card", self.base_url);
        let body = UpdateCardRequest {
            page_id: card_id.to_string(),
            level: level.as_str().to_string(),
            current_times_studied: Some(times_studied),
        };
        let response = self.authorized(self.http.post(url)).json(&body).send().await?;
        read_json::<serde_json::Value>(response).await?;
        Ok(())
    }
}

pub async fn demo_credentials(base_url: &str) -> Result<Credentials, FlashcardError> {
    let url = format!("{}/api/demo-credentials", base_url.trim_end_matches('/'));
    let response = Client::new().get(url).send().await?;
    let demo: DemoCredentials = read_json(response).await?;
    Ok(demo.into())
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FlashcardError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        return Err(FlashcardError::Unauthorized);
    }

    if !status.is_success() {
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("Server returned {status}"),
        };
        return Err(FlashcardError::Server(message));
    }

    Ok(response.json().await?)
}
