//! Chat transcript controller for the natural-language analytics backend.

use std::{sync::Arc, time::Duration};

use shared::protocol::{HistoryEntry, QueryRequest};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

use crate::{
    error::{ClientError, Result},
    QueryApi,
};

/// Shown in place of any transport or server failure.
pub const FALLBACK_ANSWER: &str = "I'm having trouble understanding that question. Could you rephrase it or ask something about members, bookings, coaches, or revenue?";

pub const EXAMPLE_QUESTIONS: [&str; 5] = [
    "Which members have the highest cancellation rate?",
    "How much revenue did we lose to weather cancellations in December?",
    "Which coaches generate the most revenue?",
    "Show me the top 5 members by total bookings",
    "What's the average revenue per booking?",
];

pub const DEFAULT_FOCUS_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub turns: Vec<Turn>,
    pub input: String,
    pub pending: bool,
}

impl ConversationState {
    /// Whether the send action should be enabled for the current input.
    pub fn can_submit(&self) -> bool {
        !self.pending && !self.input.trim().is_empty()
    }
}

/// Pairs each user turn with the assistant reply that follows it, oldest first.
pub fn history_from_turns(turns: &[Turn]) -> Vec<HistoryEntry> {
    let mut history = Vec::with_capacity(turns.len() / 2 + 1);
    let mut turns = turns.iter().peekable();
    while let Some(turn) = turns.next() {
        let entry = match turn.role {
            TurnRole::User => HistoryEntry {
                question: Some(turn.text.clone()),
                answer: turns
                    .next_if(|next| next.role == TurnRole::Assistant)
                    .map(|reply| reply.text.clone()),
            },
            TurnRole::Assistant => HistoryEntry {
                question: None,
                answer: Some(turn.text.clone()),
            },
        };
        history.push(entry);
    }
    history
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    TranscriptUpdated { turns: usize },
    PendingChanged(bool),
    InputChanged,
    /// The view should move focus back to the input control.
    FocusInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyQuestion,
    RequestPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored(IgnoreReason),
    Answered,
    Fallback,
}

pub struct ConversationController {
    api: Arc<dyn QueryApi>,
    inner: Mutex<ConversationState>,
    focus_delay: Duration,
    events: broadcast::Sender<ConversationEvent>,
}

impl ConversationController {
    pub fn new(api: Arc<dyn QueryApi>) -> Arc<Self> {
        Self::with_focus_delay(api, DEFAULT_FOCUS_DELAY)
    }

    pub fn with_focus_delay(api: Arc<dyn QueryApi>, focus_delay: Duration) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            inner: Mutex::new(ConversationState::default()),
            focus_delay,
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ConversationEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ConversationState {
        self.inner.lock().await.clone()
    }

    fn emit(&self, event: ConversationEvent) {
        let _ = self.events.send(event);
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        self.inner.lock().await.input = text.into();
        self.emit(ConversationEvent::InputChanged);
    }

    /// Pre-fills the input with a sample question without sending it.
    pub async fn select_example(&self, index: usize) -> Result<&'static str> {
        let example = EXAMPLE_QUESTIONS
            .get(index)
            .copied()
            .ok_or(ClientError::UnknownExample(index))?;
        self.set_input(example).await;
        Ok(example)
    }

    /// Sends whatever is currently in the input.
    pub async fn submit_input(&self) -> SubmitOutcome {
        let text = self.inner.lock().await.input.clone();
        self.submit_question(&text).await
    }

    /// Sends `text` with the prior transcript as context.
    ///
    /// Blank text, or a request already in flight, is rejected without
    /// touching state. Failures never reach the transcript verbatim; the
    /// fixed fallback answer is appended instead.
    pub async fn submit_question(&self, text: &str) -> SubmitOutcome {
        let (request, turns) = {
            let mut state = self.inner.lock().await;
            if text.trim().is_empty() {
                return SubmitOutcome::Ignored(IgnoreReason::EmptyQuestion);
            }
            if state.pending {
                debug!("conversation: submit ignored while a request is pending");
                return SubmitOutcome::Ignored(IgnoreReason::RequestPending);
            }
            let history = history_from_turns(&state.turns);
            state.turns.push(Turn::user(text));
            state.input.clear();
            state.pending = true;
            (
                QueryRequest {
                    question: text.to_string(),
                    history,
                },
                state.turns.len(),
            )
        };
        self.emit(ConversationEvent::TranscriptUpdated { turns });
        self.emit(ConversationEvent::PendingChanged(true));

        let (answer, outcome) = match self.api.ask(&request).await {
            Ok(response) => (response.answer, SubmitOutcome::Answered),
            Err(err) => {
                warn!(
                    history = request.history.len(),
                    "conversation: query failed, using fallback answer: {err}"
                );
                (FALLBACK_ANSWER.to_string(), SubmitOutcome::Fallback)
            }
        };

        let turns = {
            let mut state = self.inner.lock().await;
            state.turns.push(Turn::assistant(answer));
            state.pending = false;
            state.turns.len()
        };
        self.emit(ConversationEvent::TranscriptUpdated { turns });
        self.emit(ConversationEvent::PendingChanged(false));
        self.schedule_focus();
        outcome
    }

    // Delayed so the view re-renders the new turn before focus moves.
    fn schedule_focus(&self) {
        let events = self.events.clone();
        let delay = self.focus_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(ConversationEvent::FocusInput);
        });
    }
}

#[cfg(test)]
#[path = "tests/conversation_tests.rs"]
mod tests;
