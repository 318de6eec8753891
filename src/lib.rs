pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
pub mod view;

pub use client::{ConversationClient, HttpConversationClient};
pub use config::Config;
pub use controller::{ConversationController, ConversationState, SubmitOutcome, FALLBACK_MESSAGE};
pub use error::{AppError, AppResult};
pub use session::SessionIdentity;
