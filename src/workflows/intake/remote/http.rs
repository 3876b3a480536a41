use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::client::{RemoteError, SessionClient};
use super::wire::{MessageReply, MessageRequest, SessionSnapshot};

/// [`SessionClient`] backed by the HTTP session service.
#[derive(Debug, Clone)]
pub struct HttpSessionClient {
    base_url: String,
    client: Client,
}

impl HttpSessionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    RemoteError::Unavailable(err.to_string())
}

async fn decode_response<T: DeserializeOwned>(
    response: Response,
    session_id: Option<&str>,
) -> Result<T, RemoteError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = session_id {
            return Err(RemoteError::SessionNotFound(id.to_string()));
        }
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RemoteError::Unavailable(format!("status {status}: {body}")));
    }

    response
        .json::<T>()
        .await
        .map_err(|err| RemoteError::InvalidResponse(err.to_string()))
}

#[async_trait]
impl SessionClient for HttpSessionClient {
    async fn create_session(&self) -> Result<SessionSnapshot, RemoteError> {
        debug!(base_url = %self.base_url, "creating remote session");
        let response = self
            .client
            .post(self.url("/api/sessions"))
            .send()
            .await
            .map_err(transport_error)?;
        decode_response(response, None).await
    }

    async fn get_session(&self, session_id: &str) -> Result<SessionSnapshot, RemoteError> {
        let response = self
            .client
            .get(self.url(&format!("/api/sessions/{session_id}")))
            .send()
            .await
            .map_err(transport_error)?;
        decode_response(response, Some(session_id)).await
    }

    async fn send_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<MessageReply, RemoteError> {
        let request = MessageRequest {
            session_id: session_id.to_string(),
            message: message.to_string(),
        };
        let response = self
            .client
            .post(self.url("/api/message"))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;
        decode_response(response, Some(session_id)).await
    }
}
