use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::workflows::intake::domain::ConversationState;
use crate::workflows::intake::remote::{
    MessageReply, RemoteError, SessionClient, SessionSnapshot,
};
use crate::workflows::intake::store::{InMemorySessionStore, SessionStore, StoreError};
use crate::workflows::intake::{
    session_router, IntakeConversation, IntakeSessionService, Pacing, SessionServiceError,
    DEFAULT_SESSION_KEY,
};

pub(super) const JANE_DOE: [&str; 7] = [
    "Jane Doe",
    "jane@x.com",
    "+1 415 555 0100",
    "3",
    "Backend Engineer",
    "Remote",
    "Python, Go",
];

pub(super) fn local_conversation(
    store: &InMemorySessionStore,
) -> IntakeConversation<InMemorySessionStore> {
    IntakeConversation::start(store.clone(), DEFAULT_SESSION_KEY, Pacing::immediate())
}

pub(super) async fn answer_all(
    conversation: &mut IntakeConversation<InMemorySessionStore>,
    answers: &[&str],
) {
    for answer in answers {
        conversation
            .handle_user_input(answer)
            .await
            .expect("turn completes");
    }
}

pub(super) fn persisted(store: &InMemorySessionStore) -> ConversationState {
    store
        .load(DEFAULT_SESSION_KEY)
        .expect("store readable")
        .expect("session persisted")
}

pub(super) fn build_service() -> (
    Arc<IntakeSessionService<InMemorySessionStore>>,
    Arc<InMemorySessionStore>,
) {
    let store = Arc::new(InMemorySessionStore::default());
    let service = Arc::new(IntakeSessionService::new(
        Arc::clone(&store),
        Pacing::immediate(),
    ));
    (service, store)
}

pub(super) fn session_router_with_service(
    service: Arc<IntakeSessionService<InMemorySessionStore>>,
) -> Router {
    session_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store whose every operation fails.
pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn load(&self, _key: &str) -> Result<Option<ConversationState>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn save(&self, _key: &str, _state: &ConversationState) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}

/// Client that talks to an in-process session service, with a switch to simulate an
/// unreachable backend.
pub(super) struct InProcessClient {
    pub(super) service: Arc<IntakeSessionService<InMemorySessionStore>>,
    pub(super) store: Arc<InMemorySessionStore>,
    offline: AtomicBool,
    created: AtomicUsize,
}

impl InProcessClient {
    pub(super) fn new() -> Arc<Self> {
        let (service, store) = build_service();
        Arc::new(Self {
            service,
            store,
            offline: AtomicBool::new(false),
            created: AtomicUsize::new(0),
        })
    }

    pub(super) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub(super) fn sessions_created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Drop a session server-side, as if it had expired.
    pub(super) fn expire(&self, session_id: &str) {
        self.store.delete(session_id).expect("delete session");
    }

    fn check(&self) -> Result<(), RemoteError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

fn remote_error(error: SessionServiceError) -> RemoteError {
    match error {
        SessionServiceError::NotFound(id) => RemoteError::SessionNotFound(id),
        other => RemoteError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl SessionClient for InProcessClient {
    async fn create_session(&self) -> Result<SessionSnapshot, RemoteError> {
        self.check()?;
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(self.service.create_session())
    }

    async fn get_session(&self, session_id: &str) -> Result<SessionSnapshot, RemoteError> {
        self.check()?;
        self.service.get_session(session_id).await.map_err(remote_error)
    }

    async fn send_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<MessageReply, RemoteError> {
        self.check()?;
        self.service
            .send_message(session_id, message)
            .await
            .map_err(remote_error)
    }
}
