//! Mapping between Notion pages and [`Card`]s.
//!
//! The flashcard database is expected to carry these properties:
//!
//! - `Front` (title): the question
//! - `Back` (rich text): the answer
//! - `Times Studied` (number)
//! - `Level` (select): last rating, one of `Again`, `Hard`, `Good`, `Easy`
//! - `Last Reviewed` (date)
//!
//! Any of them may be missing on a given row; reads fall back to defaults.
use chrono::{
    DateTime,
    SecondsFormat,
    Utc,
};
use serde_json::{
    json,
    Value,
};
use tracing::info;

use crate::core::{
    Card,
    Credentials,
    FlashcardError,
};

pub mod api;

pub use api::NotionClient;

pub const QUESTION_PROPERTY: &str = "Front";
pub const ANSWER_PROPERTY: &str = "Back";
pub const TIMES_STUDIED_PROPERTY: &str = "Times Studied";
pub const LEVEL_PROPERTY: &str = "Level";
pub const LAST_REVIEWED_PROPERTY: &str = "Last Reviewed";

pub const FALLBACK_QUESTION: &str = "No Question";
pub const FALLBACK_ANSWER: &str = "No Answer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub id: String,
    pub title: String,
}

fn first_plain_text<'a>(runs: &'a Value) -> Option<&'a str> {
    runs[0]["plain_text"].as_str().filter(|text| !text.is_empty())
}

fn study_count(value: &Value) -> u32 {
    value
        .as_f64()
        .filter(|n| n.is_finite() && *n >= 0.0)
        // float-to-int `as` saturates at u32::MAX
        .map(|n| n as u32)
        .unwrap_or(0)
}

/// Never fails: every page becomes a card, with defaults for whatever is missing.
pub fn card_from_page(page: &Value) -> Card {
    let properties = &page["properties"];

    Card {
        id: page["id"].as_str().unwrap_or_default().to_string(),
        question: first_plain_text(&properties[QUESTION_PROPERTY]["title"])
            .unwrap_or(FALLBACK_QUESTION)
            .to_string(),
        answer: first_plain_text(&properties[ANSWER_PROPERTY]["rich_text"])
            .unwrap_or(FALLBACK_ANSWER)
            .to_string(),
        times_studied: study_count(&properties[TIMES_STUDIED_PROPERTY]["number"]),
    }
}

pub fn cards_from_query(payload: &Value) -> Vec<Card> {
    payload["results"]
        .as_array()
        .map(|pages| pages.iter().map(card_from_page).collect())
        .unwrap_or_default()
}

/// Properties written after a review. A missing count is treated as zero.
pub fn review_properties(
    level: &str,
    current_times_studied: Option<u32>,
    reviewed_at: DateTime<Utc>,
) -> Value {
    let times_studied = current_times_studied.unwrap_or(0).saturating_add(1);

    json!({
        LEVEL_PROPERTY: { "select": { "name": level } },
        LAST_REVIEWED_PROPERTY: {
            "date": { "start": reviewed_at.to_rfc3339_opts(SecondsFormat::Millis, true) }
        },
        TIMES_STUDIED_PROPERTY: { "number": times_studied },
    })
}

pub async fn query_cards(
    client: &NotionClient,
    credentials: &Credentials,
) -> Result<Vec<Card>, FlashcardError> {
    let payload = client.query_database(credentials).await?;
    let cards = cards_from_query(&payload);
    info!("Fetched {} cards from database {}", cards.len(), credentials.database_id);
    Ok(cards)
}

pub async fn update_card(
    client: &NotionClient,
    credentials: &Credentials,
    page_id: &str,
    level: &str,
    current_times_studied: Option<u32>,
) -> Result<(), FlashcardError> {
    let properties = review_properties(level, current_times_studied, Utc::now());
    client.update_page(credentials, page_id, properties).await?;
    info!("Recorded {level} for page {page_id}");
    Ok(())
}

pub async fn retrieve_database(
    client: &NotionClient,
    credentials: &Credentials,
) -> Result<DatabaseInfo, FlashcardError> {
    let payload = client.retrieve_database(credentials).await?;

    Ok(DatabaseInfo {
        id: payload["id"].as_str().unwrap_or(&credentials.database_id).to_string(),
        title: payload["title"][0]["plain_text"].as_str().unwrap_or_default().to_string(),
    })
}
