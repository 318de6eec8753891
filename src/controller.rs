use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use crate::{
    client::ConversationClient,
    models::Turn,
    session::SessionIdentity,
    store::MessageStore,
};

/// Assistant text shown in place of any backend failure
pub const FALLBACK_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Controller state; there is no terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    Sending,
}

/// Result of a call to [`ConversationController::submit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend answered; the reply was appended
    Replied,
    /// The backend failed; the fallback turn was appended
    Failed,
    /// Input was empty after trimming; nothing happened
    Empty,
    /// A request was already in flight; nothing happened
    Busy,
}

impl SubmitOutcome {
    /// Whether the submission produced turns
    pub fn accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Replied | SubmitOutcome::Failed)
    }
}

/// Drives a conversation: appends turns, calls the backend, guards the single
/// in-flight request.
///
/// Cloning is cheap and every clone shares the same conversation. Dropping a
/// `submit` future while its request is in flight (a timeout, a losing
/// `select!` branch, an aborted task) settles the turn with the fallback reply
/// and returns the controller to `Idle`.
#[derive(Clone)]
pub struct ConversationController {
    inner: Arc<RwLock<ControllerInner>>,
    state_tx: Arc<watch::Sender<ConversationState>>,
    client: Arc<dyn ConversationClient>,
    session_id: Arc<str>,
}

struct ControllerInner {
    store: MessageStore,
    state: ConversationState,
}

impl ConversationController {
    /// Creates an idle controller with an empty conversation
    pub fn new(client: Arc<dyn ConversationClient>, identity: &SessionIdentity) -> Self {
        let (state_tx, _) = watch::channel(ConversationState::Idle);
        Self {
            inner: Arc::new(RwLock::new(ControllerInner {
                store: MessageStore::new(),
                state: ConversationState::Idle,
            })),
            state_tx: Arc::new(state_tx),
            client,
            session_id: identity.get_or_create_session_id().into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Submits user input.
    ///
    /// Empty or whitespace-only input and input arriving while a request is in
    /// flight are ignored. Otherwise the text is appended verbatim as a user
    /// turn, the whole history is sent, and exactly one assistant turn (reply
    /// or fallback) is appended before returning to `Idle`.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring empty submission");
            return SubmitOutcome::Empty;
        }

        let (history, sent_at) = {
            let mut inner = self.inner.write().await;
            if inner.state == ConversationState::Sending {
                tracing::debug!("Ignoring submission while a request is in flight");
                return SubmitOutcome::Busy;
            }

            let turn = Turn::user(text);
            let sent_at = turn.created_at();
            inner.store.append(turn);
            self.transition(&mut inner, ConversationState::Sending);
            (inner.store.history(), sent_at)
        };

        tracing::info!(
            session_id = %self.session_id,
            turns = history.len(),
            "Submitting conversation turn"
        );

        let mut in_flight = InFlight {
            controller: self,
            settled: false,
        };

        let result = self.client.send(&history, &self.session_id).await;

        let mut inner = self.inner.write().await;
        let outcome = match result {
            Ok(reply) => {
                inner
                    .store
                    .append(Turn::assistant(reply.response_text, reply.recommendations));
                SubmitOutcome::Replied
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    network_failure = e.is_network_failure(),
                    session_id = %self.session_id,
                    "Error sending message"
                );
                inner.store.append(Turn::assistant(FALLBACK_MESSAGE, Vec::new()));
                SubmitOutcome::Failed
            }
        };
        if let Some(turn) = inner.store.last() {
            tracing::debug!(
                turn_id = %turn.id(),
                outcome = ?outcome,
                elapsed_ms = (turn.created_at() - sent_at).num_milliseconds(),
                "Assistant turn appended"
            );
        }
        self.transition(&mut inner, ConversationState::Idle);
        in_flight.settled = true;

        outcome
    }

    /// Settles a submission whose future was dropped mid-flight
    fn abandon(&self, inner: &mut ControllerInner) {
        if inner.state != ConversationState::Sending {
            return;
        }
        inner.store.append(Turn::assistant(FALLBACK_MESSAGE, Vec::new()));
        self.transition(inner, ConversationState::Idle);
    }

    fn transition(&self, inner: &mut ControllerInner, next: ConversationState) {
        tracing::trace!(from = ?inner.state, to = ?next, "State transition");
        inner.state = next;
        self.state_tx.send_replace(next);
    }

    pub async fn state(&self) -> ConversationState {
        self.inner.read().await.state
    }

    /// Snapshot of every turn in conversation order
    pub async fn turns(&self) -> Vec<Turn> {
        self.inner.read().await.store.all().to_vec()
    }

    /// Snapshot of the turns from index `start` onwards
    pub async fn turns_from(&self, start: usize) -> Vec<Turn> {
        let inner = self.inner.read().await;
        inner
            .store
            .all()
            .get(start..)
            .map(<[Turn]>::to_vec)
            .unwrap_or_default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.store.is_empty()
    }

    /// Notifies on every state transition
    pub fn subscribe_state(&self) -> watch::Receiver<ConversationState> {
        self.state_tx.subscribe()
    }

    /// Notifies on every appended turn with the new turn count
    pub async fn subscribe_turns(&self) -> watch::Receiver<usize> {
        self.inner.read().await.store.subscribe()
    }
}

/// Returns the controller to `Idle` if a `submit` future is dropped before
/// its reply is recorded
struct InFlight<'a> {
    controller: &'a ConversationController,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        tracing::warn!(
            session_id = %self.controller.session_id,
            "Submission dropped while in flight"
        );

        if let Ok(mut inner) = self.controller.inner.try_write() {
            self.controller.abandon(&mut inner);
            return;
        }

        // The lock is busy; finish the cleanup once it frees up
        let controller = self.controller.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let mut inner = controller.inner.write().await;
                    controller.abandon(&mut inner);
                });
            }
            Err(e) => tracing::error!(error = %e, "No runtime to settle dropped submission"),
        }
    }
}
