use std::time::Duration;

use tracing::{debug, info, warn};

use super::catalog;
use super::domain::{CandidateField, ConversationState, ConversationStep, Message};
use super::privacy;
use super::questions::generate_questions;
use super::store::{SessionStore, StoreError};
use super::validators;

const EXIT_KEYWORDS: &[&str] = &[
    "exit",
    "quit",
    "bye",
    "goodbye",
    "good bye",
    "bye bye",
    "stop",
    "end",
    "thank you",
    "thanks bye",
];

const DEFAULT_THINKING_DELAY: Duration = Duration::from_millis(750);
const DEFAULT_GENERATION_DELAY: Duration = Duration::from_millis(2000);

/// True when the whole input is one of the exit keywords, ignoring case and trailing punctuation.
pub fn is_exit_keyword(input: &str) -> bool {
    let lowered = input.to_lowercase();
    let stripped = lowered.trim().trim_end_matches(['.', '!', '?', ',']);
    let normalized = stripped
        .split_whitespace()
        .map(|word| word.trim_matches(','))
        .collect::<Vec<_>>()
        .join(" ");
    EXIT_KEYWORDS.contains(&normalized.as_str())
}

/// Simulated processing intervals. Zero durations skip the pause entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub thinking: Duration,
    pub generation: Duration,
}

impl Pacing {
    pub const fn immediate() -> Self {
        Self {
            thinking: Duration::ZERO,
            generation: Duration::ZERO,
        }
    }

    pub const fn from_millis(thinking_ms: u64, generation_ms: u64) -> Self {
        Self {
            thinking: Duration::from_millis(thinking_ms),
            generation: Duration::from_millis(generation_ms),
        }
    }

    async fn pause(duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            thinking: DEFAULT_THINKING_DELAY,
            generation: DEFAULT_GENERATION_DELAY,
        }
    }
}

/// What a single call to [`IntakeConversation::handle_user_input`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Advanced {
        accepted: CandidateField,
        next: CandidateField,
    },
    Rejected {
        field: CandidateField,
    },
    QuestionsReady {
        count: usize,
    },
    Acknowledged,
    Exited,
    Closed,
    Fallback,
}

#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("a turn is already in progress for session '{0}'")]
    TurnInProgress(String),
}

/// State machine driving one candidate through intake. Owns its [`ConversationState`]
/// exclusively and writes it through to the store after every mutation.
pub struct IntakeConversation<S> {
    session_key: String,
    state: ConversationState,
    store: S,
    pacing: Pacing,
}

impl<S: SessionStore> IntakeConversation<S> {
    /// Restore the session under `session_key`, or begin a fresh one when nothing usable
    /// is stored.
    pub fn start(store: S, session_key: impl Into<String>, pacing: Pacing) -> Self {
        let session_key = session_key.into();
        let state = match store.load(&session_key) {
            Ok(Some(state)) => {
                info!(session = %session_key, step = ?state.step, "restored intake session");
                state
            }
            Ok(None) => ConversationState::default(),
            Err(StoreError::Malformed { source, .. }) => {
                warn!(session = %session_key, error = %source, "discarding malformed session");
                if let Err(err) = store.delete(&session_key) {
                    warn!(session = %session_key, error = %err, "failed to delete malformed session");
                }
                ConversationState::default()
            }
            Err(err) => {
                warn!(session = %session_key, error = %err, "session store unavailable; starting fresh");
                ConversationState::default()
            }
        };

        Self::from_parts(store, session_key, state, pacing)
    }

    /// Load an existing session, returning `None` when the store has no record of it.
    pub fn resume(
        store: S,
        session_key: impl Into<String>,
        pacing: Pacing,
    ) -> Result<Option<Self>, StoreError> {
        let session_key = session_key.into();
        let state = store.load(&session_key)?;
        Ok(state.map(|state| Self::from_parts(store, session_key, state, pacing)))
    }

    fn from_parts(store: S, session_key: String, state: ConversationState, pacing: Pacing) -> Self {
        let mut conversation = Self {
            session_key,
            state,
            store,
            pacing,
        };
        conversation.recover_interrupted_turn();
        conversation.ensure_greeting();
        conversation.persist();
        conversation
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Process one line of candidate input.
    pub async fn handle_user_input(&mut self, input: &str) -> Result<TurnOutcome, ConversationError> {
        if self.state.is_loading {
            return Err(ConversationError::TurnInProgress(self.session_key.clone()));
        }

        self.state.messages.push(Message::user(input));
        self.state.is_loading = true;
        self.persist();

        Pacing::pause(self.pacing.thinking).await;

        let outcome = self.apply_input(input).await;
        self.state.is_loading = false;
        self.persist();

        debug!(session = %self.session_key, step = ?self.state.step, ?outcome, "turn complete");
        Ok(outcome)
    }

    /// Discard everything collected, drop the persisted copy, and greet again.
    pub fn reset(&mut self) {
        if let Err(err) = self.store.delete(&self.session_key) {
            warn!(session = %self.session_key, error = %err, "failed to delete persisted session");
        }
        self.state = ConversationState::default();
        self.ensure_greeting();
        self.persist();
        info!(session = %self.session_key, "intake session reset");
    }

    async fn apply_input(&mut self, input: &str) -> TurnOutcome {
        let step = self.state.step;

        if !step.is_terminal() && is_exit_keyword(input) {
            self.push_assistant(catalog::exit_message());
            self.state.step = ConversationStep::Completed;
            self.state.is_completed = true;
            info!(session = %self.session_key, from = ?step, "candidate ended the conversation");
            return TurnOutcome::Exited;
        }

        if let Some(field) = step.field() {
            return self.collect_field(field, input).await;
        }

        match step {
            ConversationStep::Questions => {
                self.push_assistant(catalog::post_questions_ack());
                TurnOutcome::Acknowledged
            }
            ConversationStep::Completed => {
                self.push_assistant(catalog::closing_message());
                TurnOutcome::Closed
            }
            _ => {
                self.push_assistant(catalog::fallback_message());
                TurnOutcome::Fallback
            }
        }
    }

    async fn collect_field(&mut self, field: CandidateField, input: &str) -> TurnOutcome {
        if !validators::validate(field, input) {
            debug!(session = %self.session_key, field = field.key(), "rejected field input");
            self.push_assistant(catalog::validation_error(field));
            return TurnOutcome::Rejected { field };
        }

        let value = input.trim().to_string();
        info!(
            session = %self.session_key,
            field = field.key(),
            value = %privacy::redact_field(field, &value),
            "accepted field"
        );
        self.state.candidate_info.set(field, value.clone());

        match field.next() {
            Some(next) => {
                let reply = format!(
                    "{}{}",
                    catalog::confirmation(field, &value),
                    catalog::field_prompt(next)
                );
                self.push_assistant(reply);
                self.state.step = next.step();
                TurnOutcome::Advanced {
                    accepted: field,
                    next,
                }
            }
            None => {
                self.push_assistant(catalog::summary(&self.state.candidate_info));
                self.state.step = ConversationStep::Generating;
                self.persist();

                Pacing::pause(self.pacing.generation).await;

                let count = self.finish_generation();
                TurnOutcome::QuestionsReady { count }
            }
        }
    }

    fn finish_generation(&mut self) -> usize {
        let questions = generate_questions(&self.state.candidate_info.tech_stack);
        self.push_assistant(catalog::questions_message(&questions));
        self.push_assistant(catalog::questions_follow_up());
        let count = questions.len();
        self.state.generated_questions = questions;
        self.state.step = ConversationStep::Questions;
        self.state.is_loading = false;
        info!(session = %self.session_key, count, "screening questions ready");
        count
    }

    fn recover_interrupted_turn(&mut self) {
        if self.state.step == ConversationStep::Generating {
            warn!(session = %self.session_key, "completing interrupted question generation");
            self.finish_generation();
        } else if self.state.is_loading {
            warn!(session = %self.session_key, "clearing interrupted turn");
        }
        self.state.is_loading = false;
    }

    fn ensure_greeting(&mut self) {
        if self.state.step == ConversationStep::Greeting && self.state.messages.is_empty() {
            self.push_assistant(catalog::greeting());
            self.state.step = ConversationStep::FullName;
        }
    }

    fn push_assistant(&mut self, content: String) {
        self.state.messages.push(Message::assistant(content));
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.session_key, &self.state) {
            warn!(session = %self.session_key, error = %err, "failed to persist intake session");
        }
    }
}
