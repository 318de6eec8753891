use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

use super::Recommendation;

/// Author of a turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in the conversation.
///
/// Fields are fixed at creation; there are no setters.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    id: Uuid,
    role: Role,
    content: String,
    recommendations: Option<Vec<Recommendation>>,
    created_at: DateTime<Utc>,
}

impl Turn {
    /// Creates a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), None)
    }

    /// Creates an assistant turn; an empty recommendation list is not attached
    pub fn assistant(content: impl Into<String>, recommendations: Vec<Recommendation>) -> Self {
        let recommendations = if recommendations.is_empty() {
            None
        } else {
            Some(recommendations)
        };
        Self::new(Role::Assistant, content.into(), recommendations)
    }

    fn new(role: Role, content: String, recommendations: Option<Vec<Recommendation>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            recommendations,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn recommendations(&self) -> Option<&[Recommendation]> {
        self.recommendations.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Paragraphs of the content, split on newlines and kept verbatim
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }
}
