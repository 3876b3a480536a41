use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

use super::conversation::{ConversationError, IntakeConversation, Pacing, TurnOutcome};
use super::domain::{CandidateField, MessageRole};
use super::questions::generate_questions;
use super::remote::mapping::{candidate_info_to_wire, missing_field_names, stage_for_step};
use super::remote::wire::{MessageReply, SessionSnapshot, WireQuestion};
use super::store::{SessionStore, StoreError};

/// Server side of the remote session boundary. Each session is an
/// [`IntakeConversation`] persisted in the store under its session id; turns on the
/// same session are serialized.
pub struct IntakeSessionService<S> {
    store: Arc<S>,
    pacing: Pacing,
    turn_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl<S> IntakeSessionService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(store: Arc<S>, pacing: Pacing) -> Self {
        Self {
            store,
            pacing,
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Open a new greeted session under a fresh identifier.
    pub fn create_session(&self) -> SessionSnapshot {
        let session_id = Uuid::new_v4().to_string();
        let conversation = IntakeConversation::start(Arc::clone(&self.store), &session_id, self.pacing);
        info!(session = %session_id, "created intake session");
        SessionSnapshot::from_state(&session_id, conversation.state())
    }

    pub async fn get_session(&self, session_id: &str) -> Result<SessionSnapshot, SessionServiceError> {
        let _turn = self.acquire_turn(session_id).await;

        let conversation = self.resume(session_id)?;
        Ok(SessionSnapshot::from_state(session_id, conversation.state()))
    }

    /// Run one candidate turn. The reply's `response` joins every assistant message the
    /// turn produced with a blank line.
    pub async fn send_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<MessageReply, SessionServiceError> {
        let _turn = self.acquire_turn(session_id).await;

        let mut conversation = self.resume(session_id)?;
        let before = conversation.state().messages.len();
        let outcome = conversation.handle_user_input(message).await?;

        let state = conversation.state();
        let response = state.messages[before..]
            .iter()
            .filter(|message| message.role == MessageRole::Assistant)
            .map(|message| message.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let questions = match outcome {
            TurnOutcome::QuestionsReady { .. } => Some(
                state
                    .generated_questions
                    .iter()
                    .map(|question| WireQuestion::from_encoded(question))
                    .collect(),
            ),
            _ => None,
        };

        Ok(MessageReply {
            response,
            conversation_stage: stage_for_step(state.step).to_string(),
            fields_collected: candidate_info_to_wire(&state.candidate_info),
            missing_fields: missing_field_names(&state.candidate_info),
            questions,
        })
    }

    /// Generate questions for the session's declared stack without touching its state.
    pub async fn generate_questions(
        &self,
        session_id: &str,
    ) -> Result<Vec<WireQuestion>, SessionServiceError> {
        let _turn = self.acquire_turn(session_id).await;

        let conversation = self.resume(session_id)?;
        let tech_stack = conversation.state().candidate_info.get(CandidateField::TechStack);
        if tech_stack.trim().is_empty() {
            return Err(SessionServiceError::MissingTechStack(session_id.to_string()));
        }

        Ok(generate_questions(tech_stack)
            .iter()
            .map(|question| WireQuestion::from_encoded(question))
            .collect())
    }

    fn resume(
        &self,
        session_id: &str,
    ) -> Result<IntakeConversation<Arc<S>>, SessionServiceError> {
        match IntakeConversation::resume(Arc::clone(&self.store), session_id, self.pacing) {
            Ok(Some(conversation)) => Ok(conversation),
            Ok(None) | Err(StoreError::InvalidKey(_)) => {
                Err(SessionServiceError::NotFound(session_id.to_string()))
            }
            Err(StoreError::Malformed { source, .. }) => {
                warn!(session = %session_id, error = %source, "discarding malformed session");
                self.store.delete(session_id)?;
                Err(SessionServiceError::NotFound(session_id.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn acquire_turn(&self, session_id: &str) -> TurnGuard<'_> {
        let lock = {
            let mut locks = self
                .turn_locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(session_id.to_string()).or_default())
        };
        let guard = lock.lock_owned().await;
        TurnGuard {
            locks: &self.turn_locks,
            session_id: session_id.to_string(),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    pub(crate) fn active_turn_locks(&self) -> usize {
        self.turn_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Holds a session's turn lock. The map entry is dropped once no other turn is
/// holding or waiting on it.
struct TurnGuard<'a> {
    locks: &'a Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
    session_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.session_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.session_id);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionServiceError {
    #[error("session '{0}' not found")]
    NotFound(String),
    #[error("session '{0}' has no tech stack to generate questions from")]
    MissingTechStack(String),
    #[error(transparent)]
    Conversation(#[from] ConversationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
