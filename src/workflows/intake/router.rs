use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use crate::error::AppError;

use super::remote::wire::{GenerateQuestionsRequest, GeneratedQuestions, MessageRequest};
use super::service::IntakeSessionService;
use super::store::SessionStore;

/// Router exposing the session service over HTTP.
pub fn session_router<S>(service: Arc<IntakeSessionService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/sessions", post(create_session_handler::<S>))
        .route("/api/sessions/:session_id", get(session_handler::<S>))
        .route("/api/message", post(message_handler::<S>))
        .route("/api/generate-questions", post(generate_questions_handler::<S>))
        .with_state(service)
}

pub(crate) async fn create_session_handler<S>(
    State(service): State<Arc<IntakeSessionService<S>>>,
) -> Response
where
    S: SessionStore + 'static,
{
    let snapshot = service.create_session();
    (StatusCode::OK, axum::Json(snapshot)).into_response()
}

pub(crate) async fn session_handler<S>(
    State(service): State<Arc<IntakeSessionService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.get_session(&session_id).await {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn message_handler<S>(
    State(service): State<Arc<IntakeSessionService<S>>>,
    axum::Json(request): axum::Json<MessageRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service
        .send_message(&request.session_id, &request.message)
        .await
    {
        Ok(reply) => (StatusCode::OK, axum::Json(reply)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn generate_questions_handler<S>(
    State(service): State<Arc<IntakeSessionService<S>>>,
    axum::Json(request): axum::Json<GenerateQuestionsRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.generate_questions(&request.session_id).await {
        Ok(questions) => {
            let payload = GeneratedQuestions {
                session_id: request.session_id,
                questions,
            };
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}
