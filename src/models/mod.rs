use serde::{Deserialize, Serialize};

mod recommendation;
mod turn;

pub use recommendation::{Recommendation, MAX_STARS};
pub use turn::{Role, Turn};

// ============================================================================
// Conversation API Types
// ============================================================================

/// Role and content of a turn, the only fields sent back to the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Turn> for WireMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role(),
            content: turn.content().to_string(),
        }
    }
}

/// Body of `POST /api/conversation`
#[derive(Debug, Serialize)]
pub struct ConversationRequest<'a> {
    pub messages: &'a [WireMessage],
    pub session_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ab_test_group: Option<&'a str>,
}

/// Raw response from the conversation endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationResponse {
    pub response: String,
    #[serde(default)]
    pub recommendations: Option<Vec<Recommendation>>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Parsed assistant reply handed back to the controller
#[derive(Debug, Clone, PartialEq)]
pub struct ClientReply {
    pub response_text: String,
    pub recommendations: Vec<Recommendation>,
}

impl From<ConversationResponse> for ClientReply {
    fn from(response: ConversationResponse) -> Self {
        Self {
            response_text: response.response,
            recommendations: response.recommendations.unwrap_or_default(),
        }
    }
}
