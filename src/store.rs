use tokio::sync::watch;

use crate::models::{Turn, WireMessage};

/// Ordered, append-only log of conversation turns.
///
/// Insertion order is conversation order. There is no capacity limit and no
/// eviction; memory grows with the conversation.
#[derive(Debug)]
pub struct MessageStore {
    turns: Vec<Turn>,
    changes: watch::Sender<usize>,
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageStore {
    /// Creates an empty store
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            turns: Vec::new(),
            changes,
        }
    }

    /// Adds a turn to the end of the log and notifies subscribers
    pub fn append(&mut self, turn: Turn) {
        tracing::trace!(turn_id = %turn.id(), role = %turn.role(), "Appending turn");
        self.turns.push(turn);
        self.changes.send_replace(self.turns.len());
    }

    /// All turns in conversation order
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Role and content of every turn, in order, as sent to the backend
    pub fn history(&self) -> Vec<WireMessage> {
        self.turns.iter().map(WireMessage::from).collect()
    }

    /// Subscribes to appends; the channel carries the current turn count
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.changes.subscribe()
    }
}
