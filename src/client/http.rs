//! HTTP client for the recommendation backend's conversation endpoint

use reqwest::Client as HttpClient;
use uuid::Uuid;

use crate::{
    client::{validate_history, ConversationClient, REQUEST_ID_HEADER},
    config::Config,
    error::{AppError, AppResult},
    models::{ClientReply, ConversationRequest, ConversationResponse, WireMessage},
};

#[derive(Clone)]
pub struct HttpConversationClient {
    http_client: HttpClient,
    endpoint: String,
    ab_test_group: Option<String>,
}

impl HttpConversationClient {
    /// Creates a client posting to the given conversation endpoint URL
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            endpoint: endpoint.into(),
            ab_test_group: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.conversation_url()).with_ab_test_group(config.ab_test_group.clone())
    }

    /// Forwards an A/B test group with every request
    pub fn with_ab_test_group(mut self, group: Option<String>) -> Self {
        self.ab_test_group = group;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ConversationClient for HttpConversationClient {
    #[tracing::instrument(skip(self, history), fields(turns = history.len()))]
    async fn send(&self, history: &[WireMessage], session_id: &str) -> AppResult<ClientReply> {
        validate_history(history)?;

        let request_id = Uuid::new_v4();
        let body = ConversationRequest {
            messages: history,
            session_id,
            ab_test_group: self.ab_test_group.as_deref(),
        };

        tracing::debug!(request_id = %request_id, endpoint = %self.endpoint, "Sending conversation");

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                request_id = %request_id,
                status = %status,
                body = %body,
                "Conversation request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let text = response.text().await?;
        let parsed: ConversationResponse = serde_json::from_str(&text)
            .map_err(|e| AppError::MalformedResponse(format!("Invalid conversation payload: {}", e)))?;

        if let Some(echoed) = parsed.session_id.as_deref() {
            if echoed != session_id {
                tracing::warn!(
                    request_id = %request_id,
                    echoed_session_id = %echoed,
                    "Backend answered for a different session"
                );
            }
        }

        let reply = ClientReply::from(parsed);

        tracing::info!(
            request_id = %request_id,
            recommendations = reply.recommendations.len(),
            "Conversation reply received"
        );

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_from_config() {
        let config = Config {
            backend_url: "http://recs.local/".to_string(),
            session_file: None,
            ab_test_group: Some("control".to_string()),
        };
        let client = HttpConversationClient::from_config(&config);

        assert_eq!(client.endpoint(), "http://recs.local/api/conversation");
        assert_eq!(client.ab_test_group.as_deref(), Some("control"));
    }

    #[tokio::test]
    async fn test_send_rejects_invalid_history_without_network() {
        // Nothing listens on this port; validation must fail first.
        let client = HttpConversationClient::new("http://127.0.0.1:9/api/conversation");
        let history = vec![WireMessage {
            role: Role::Assistant,
            content: "Hi!".to_string(),
        }];

        let result = client.send(&history, "session").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
