use std::path::{
    Path,
    PathBuf,
};

use tracing::warn;

use crate::{
    core::{
        Credentials,
        FlashcardError,
    },
    persistence::{
        delete_data_file,
        get_data_file_path,
        load_json,
        save_json,
    },
};

const CREDENTIALS_FILE: &str = "credentials.json";

/// Durable home of the Notion key and database id between sessions.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` when nothing usable is stored. An unreadable file is
    /// treated the same as an absent one.
    pub fn load(&self) -> Option<Credentials> {
        match load_json::<Credentials>(&self.path) {
            Ok(Some(credentials)) if credentials.is_complete() => Some(credentials),
            Ok(_) => None,
            Err(e) => {
                warn!("Failed to load {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, credentials: &Credentials) -> Result<(), FlashcardError> {
        save_json(credentials, &self.path)
    }

    pub fn clear(&self) -> Result<(), FlashcardError> {
        delete_data_file(&self.path)
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::at(get_data_file_path(CREDENTIALS_FILE))
    }
}
