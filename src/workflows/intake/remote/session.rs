use tracing::{info, warn};

use super::super::catalog;
use super::super::conversation::ConversationError;
use super::super::domain::{ConversationState, Message};
use super::client::{RemoteError, SessionClient};
use super::mapping::{
    candidate_info_from_wire, step_for_stage, validate_mapping, MappingError, FIELD_MAPPING,
    STAGE_EXIT,
};
use super::wire::{MessageReply, SessionSnapshot, WireQuestion};

/// How a remote turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteTurn {
    Replied,
    /// The session expired past the point the input answered; a fresh session was opened
    /// and the candidate told to start over.
    Restarted,
    Apologized,
}

/// Client-side mirror of a conversation that is driven by the session service.
pub struct RemoteConversation<C> {
    client: C,
    session_id: Option<String>,
    state: ConversationState,
}

impl<C: SessionClient> RemoteConversation<C> {
    /// Attach to `saved_session_id` when the service still knows it, otherwise open a new
    /// session. Service failures leave an apology in the transcript instead of an error.
    pub async fn connect(client: C, saved_session_id: Option<String>) -> Result<Self, MappingError> {
        validate_mapping(FIELD_MAPPING)?;

        let mut conversation = Self {
            client,
            session_id: None,
            state: ConversationState::default(),
        };

        let snapshot = match saved_session_id {
            Some(id) => match conversation.client.get_session(&id).await {
                Err(RemoteError::SessionNotFound(_)) => {
                    info!(session = %id, "saved session expired; creating a new one");
                    conversation.client.create_session().await
                }
                other => other,
            },
            None => conversation.client.create_session().await,
        };

        match snapshot {
            Ok(snapshot) => conversation.apply_snapshot(snapshot),
            Err(err) => {
                warn!(error = %err, "session service unreachable");
                conversation.apologize();
            }
        }

        Ok(conversation)
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Forward one line of candidate input. An expired session is replaced by a new one;
    /// the input is retried there only when it answers the same question.
    pub async fn handle_user_input(&mut self, input: &str) -> Result<RemoteTurn, ConversationError> {
        if self.state.is_loading {
            let id = self.session_id.clone().unwrap_or_default();
            return Err(ConversationError::TurnInProgress(id));
        }

        self.state.messages.push(Message::user(input));
        self.state.is_loading = true;

        let result = self.deliver(input).await;
        self.state.is_loading = false;

        match result {
            Ok(Some(reply)) => {
                self.apply_reply(reply);
                Ok(RemoteTurn::Replied)
            }
            Ok(None) => Ok(RemoteTurn::Restarted),
            Err(err) => {
                warn!(session = ?self.session_id, error = %err, "remote turn failed");
                self.apologize();
                Ok(RemoteTurn::Apologized)
            }
        }
    }

    /// Abandon the current session and open a new one.
    pub async fn reset(&mut self) {
        match self.client.create_session().await {
            Ok(snapshot) => self.apply_snapshot(snapshot),
            Err(err) => {
                warn!(error = %err, "failed to open a new remote session");
                self.apologize();
            }
        }
    }

    /// `Ok(None)` means the input was not sent because the replacement session is
    /// waiting on a different answer.
    async fn deliver(&mut self, input: &str) -> Result<Option<MessageReply>, RemoteError> {
        let had_session = match self.session_id.clone() {
            Some(id) => match self.client.send_message(&id, input).await {
                Err(RemoteError::SessionNotFound(_)) => {
                    info!(session = %id, "session vanished; opening a new one");
                    true
                }
                other => return other.map(Some),
            },
            None => false,
        };

        let pending = self.state.current_field();
        let snapshot = self.client.create_session().await?;
        let id = snapshot.session_id.clone();
        self.apply_snapshot(snapshot);

        if !had_session || (pending.is_some() && pending == self.state.current_field()) {
            self.state.messages.push(Message::user(input));
            self.state.is_loading = true;
            return self.client.send_message(&id, input).await.map(Some);
        }

        self.state
            .messages
            .push(Message::assistant(catalog::session_restarted()));
        Ok(None)
    }

    fn apply_snapshot(&mut self, snapshot: SessionSnapshot) {
        let candidate_info = candidate_info_from_wire(&snapshot.collected_fields);
        let step = step_for_stage(&snapshot.conversation_stage, &candidate_info);
        self.state = ConversationState {
            step,
            candidate_info,
            messages: snapshot
                .chat_history
                .into_iter()
                .map(|message| message.into_message())
                .collect(),
            generated_questions: Vec::new(),
            is_loading: false,
            is_completed: snapshot.conversation_stage == STAGE_EXIT,
        };
        self.session_id = Some(snapshot.session_id);
    }

    fn apply_reply(&mut self, reply: MessageReply) {
        self.state.candidate_info = candidate_info_from_wire(&reply.fields_collected);
        self.state.step = step_for_stage(&reply.conversation_stage, &self.state.candidate_info);
        self.state.is_completed = reply.conversation_stage == STAGE_EXIT;
        if let Some(questions) = reply.questions.filter(|questions| !questions.is_empty()) {
            self.state.generated_questions =
                questions.iter().map(WireQuestion::to_encoded).collect();
        }
        self.state.messages.push(Message::assistant(reply.response));
    }

    fn apologize(&mut self) {
        self.state
            .messages
            .push(Message::assistant(catalog::collaborator_apology()));
    }
}
