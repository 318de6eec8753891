use std::path::PathBuf;

use serde::Deserialize;

/// Path of the conversation endpoint, relative to the backend URL
pub const CONVERSATION_PATH: &str = "/api/conversation";

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Recommendation backend base URL
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Overrides where the session id is persisted
    #[serde(default)]
    pub session_file: Option<PathBuf>,

    /// A/B test group forwarded to the backend with every request
    #[serde(default)]
    pub ab_test_group: Option<String>,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            session_file: None,
            ab_test_group: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Full URL of the conversation endpoint
    pub fn conversation_url(&self) -> String {
        format!(
            "{}{}",
            self.backend_url.trim_end_matches('/'),
            CONVERSATION_PATH
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_env() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert!(config.session_file.is_none());
        assert!(config.ab_test_group.is_none());
    }

    #[test]
    fn test_values_from_env() {
        let vars = vec![
            ("BACKEND_URL".to_string(), "https://recs.example.com".to_string()),
            ("SESSION_FILE".to_string(), "/tmp/occam/session.json".to_string()),
            ("AB_TEST_GROUP".to_string(), "b".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.backend_url, "https://recs.example.com");
        assert_eq!(
            config.session_file,
            Some(PathBuf::from("/tmp/occam/session.json"))
        );
        assert_eq!(config.ab_test_group.as_deref(), Some("b"));
    }

    #[test]
    fn test_conversation_url_trims_trailing_slash() {
        let config = Config {
            backend_url: "http://localhost:8000/".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.conversation_url(),
            "http://localhost:8000/api/conversation"
        );
    }
}
