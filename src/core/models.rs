use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

/// Request headers carrying per-caller credentials.
pub const KEY_HEADER: &str = "x-notion-key";
pub const DATABASE_HEADER: &str = "x-notion-db-id";

/// One question/answer row of the Notion database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub times_studied: u32,
}

/// Notion integration secret plus the database it should read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "notion_key")]
    pub key: String,
    #[serde(rename = "db_id")]
    pub database_id: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self { key: key.into(), database_id: database_id.into() }
    }

    pub fn is_complete(&self) -> bool {
        !self.key.trim().is_empty() && !self.database_id.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Again,
    Hard,
    Good,
    Easy,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Again, Level::Hard, Level::Good, Level::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Again => "Again",
            Level::Hard => "Hard",
            Level::Good => "Good",
            Level::Easy => "Easy",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/update-card`. `level` stays a plain string so unknown
/// tokens are forwarded to Notion untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    pub page_id: String,
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_times_studied: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoCredentials {
    pub notion_key: String,
    pub db_id: String,
}

impl From<DemoCredentials> for Credentials {
    fn from(demo: DemoCredentials) -> Self {
        Credentials { key: demo.notion_key, database_id: demo.db_id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAck {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
