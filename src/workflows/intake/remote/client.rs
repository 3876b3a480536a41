use std::sync::Arc;

use async_trait::async_trait;

use super::wire::{MessageReply, SessionSnapshot};

/// The remote session service as seen by the client-side conversation.
#[async_trait]
pub trait SessionClient: Send + Sync {
    async fn create_session(&self) -> Result<SessionSnapshot, RemoteError>;
    async fn get_session(&self, session_id: &str) -> Result<SessionSnapshot, RemoteError>;
    async fn send_message(&self, session_id: &str, message: &str)
        -> Result<MessageReply, RemoteError>;
}

#[async_trait]
impl<C: SessionClient + ?Sized> SessionClient for Arc<C> {
    async fn create_session(&self) -> Result<SessionSnapshot, RemoteError> {
        (**self).create_session().await
    }

    async fn get_session(&self, session_id: &str) -> Result<SessionSnapshot, RemoteError> {
        (**self).get_session(session_id).await
    }

    async fn send_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<MessageReply, RemoteError> {
        (**self).send_message(session_id, message).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("session '{0}' not found")]
    SessionNotFound(String),
    #[error("session service unavailable: {0}")]
    Unavailable(String),
    #[error("unexpected response from session service: {0}")]
    InvalidResponse(String),
}
