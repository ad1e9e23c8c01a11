use std::sync::Arc;

use super::config::Config;
use crate::notion::NotionClient;

/// Shared by every request. Holds configuration and a pooled HTTP client,
/// never per-caller data.
pub struct State {
    pub config: Config,
    pub notion: NotionClient,
}

impl State {
    pub fn new(config: Config) -> Arc<Self> {
        let notion = NotionClient::new(config.notion_api_url.clone());
        Arc::new(Self { config, notion })
    }
}
