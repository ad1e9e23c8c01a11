use std::{
    env,
    fmt::{
        self,
        Display,
    },
    path::PathBuf,
    str::FromStr,
};

use tracing::{
    info,
    warn,
};

use crate::{
    core::{
        Credentials,
        FlashcardError,
    },
    notion::api::NOTION_API_URL,
};

/// Where the Notion key and database id for a request come from. One mode per
/// deployment; the two are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    /// The pair configured at startup, for every caller.
    Fixed,
    /// `x-notion-key` / `x-notion-db-id` request headers.
    Header,
}

impl FromStr for CredentialMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" | "env" => Ok(CredentialMode::Fixed),
            "header" | "headers" => Ok(CredentialMode::Header),
            other => Err(format!("unknown credential mode '{other}', expected 'fixed' or 'header'")),
        }
    }
}

impl Display for CredentialMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialMode::Fixed => f.write_str("fixed"),
            CredentialMode::Header => f.write_str("header"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub credential_mode: CredentialMode,
    pub fixed_credentials: Credentials,
    pub demo_credentials: Credentials,
    pub static_dir: PathBuf,
    pub notion_api_url: String,
}

impl Config {
    pub fn load() -> Result<Self, FlashcardError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Credentials are not validated
    /// here; a bad pair only shows up as an upstream failure.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FlashcardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let notion_key = lookup("NOTION_KEY").unwrap_or_default();
        let database_id = lookup("NOTION_DATABASE_ID").unwrap_or_default();

        let demo_credentials = Credentials::new(
            lookup("DEMO_NOTION_KEY").unwrap_or_else(|| notion_key.clone()),
            lookup("DEMO_NOTION_DB_ID").unwrap_or_else(|| database_id.clone()),
        );

        let config = Self {
            host: try_load(&lookup, "HOST", "0.0.0.0")?,
            port: try_load(&lookup, "PORT", "5000")?,
            credential_mode: try_load(&lookup, "CREDENTIAL_MODE", "header")?,
            fixed_credentials: Credentials::new(notion_key, database_id),
            demo_credentials,
            static_dir: try_load(&lookup, "STATIC_DIR", "frontend/build")?,
            notion_api_url: try_load(&lookup, "NOTION_API_URL", NOTION_API_URL)?,
        };

        if config.credential_mode == CredentialMode::Fixed && !config.fixed_credentials.is_complete()
        {
            warn!("CREDENTIAL_MODE is fixed but NOTION_KEY or NOTION_DATABASE_ID is empty");
        }

        Ok(config)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, FlashcardError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            FlashcardError::Config(format!("{key}: {e}"))
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, FlashcardError> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:5000");
        assert_eq!(config.credential_mode, CredentialMode::Header);
        assert_eq!(config.static_dir, PathBuf::from("frontend/build"));
        assert_eq!(config.notion_api_url, NOTION_API_URL);
        assert_eq!(config.fixed_credentials, Credentials::new("", ""));
    }

    #[test]
    fn test_demo_credentials_fall_back_to_fixed_pair() {
        let config = config_from(&[
            ("NOTION_KEY", "secret_main"),
            ("NOTION_DATABASE_ID", "db_main"),
            ("DEMO_NOTION_DB_ID", "db_demo"),
            ("CREDENTIAL_MODE", "Fixed"),
            ("PORT", "8080"),
        ])
        .unwrap();

        assert_eq!(config.credential_mode, CredentialMode::Fixed);
        assert_eq!(config.port, 8080);
        assert_eq!(config.fixed_credentials, Credentials::new("secret_main", "db_main"));
        assert_eq!(config.demo_credentials, Credentials::new("secret_main", "db_demo"));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(matches!(config_from(&[("PORT", "eighty")]), Err(FlashcardError::Config(_))));
        assert!(matches!(
            config_from(&[("CREDENTIAL_MODE", "cookie")]),
            Err(FlashcardError::Config(_))
        ));
    }
}
