//! Conversation backend abstraction
//!
//! The controller only talks to the recommendation service through
//! [`ConversationClient`], so the HTTP implementation can be swapped for a
//! fake in tests.

use crate::{
    error::{AppError, AppResult},
    models::{ClientReply, Role, WireMessage},
};

pub mod http;

pub use http::HttpConversationClient;

/// HTTP header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Trait for conversation backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ConversationClient: Send + Sync {
    /// Sends the full history and session id, returning the assistant reply.
    ///
    /// One call per user submission: implementations must not retry, cache or
    /// coalesce requests. Recommendations come back in backend order.
    async fn send(&self, history: &[WireMessage], session_id: &str) -> AppResult<ClientReply>;
}

/// Checks that the history is non-empty and ends with the user's new turn
pub fn validate_history(history: &[WireMessage]) -> AppResult<()> {
    match history.last() {
        None => Err(AppError::InvalidInput(
            "Conversation history cannot be empty".to_string(),
        )),
        Some(last) if last.role != Role::User => Err(AppError::InvalidInput(
            "Conversation history must end with a user turn".to_string(),
        )),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(role: Role, content: &str) -> WireMessage {
        WireMessage {
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_validate_history_rejects_empty() {
        assert!(matches!(
            validate_history(&[]),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_history_requires_trailing_user_turn() {
        let history = vec![
            message(Role::User, "Something light"),
            message(Role::Assistant, "How about a comedy?"),
        ];
        assert!(validate_history(&history).is_err());
    }

    #[test]
    fn test_validate_history_accepts_user_last() {
        let history = vec![
            message(Role::User, "Something light"),
            message(Role::Assistant, "How about a comedy?"),
            message(Role::User, "Sure, from the 90s"),
        ];
        assert!(validate_history(&history).is_ok());
    }
}
