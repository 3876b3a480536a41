//! Guided candidate intake: a scripted conversation that collects a fixed profile one
//! field at a time, validates each answer, and closes with technical questions drawn
//! from the candidate's declared stack.

pub mod catalog;
pub mod conversation;
pub mod domain;
pub mod privacy;
pub mod questions;
pub mod remote;
pub mod router;
pub mod service;
pub mod store;
pub mod validators;

#[cfg(test)]
mod tests;

pub use conversation::{
    is_exit_keyword, ConversationError, IntakeConversation, Pacing, TurnOutcome,
};
pub use domain::{
    CandidateField, CandidateInfo, ConversationState, ConversationStep, Message, MessageRole,
};
pub use questions::{generate_questions, normalize_tech_stack, Difficulty};
pub use router::session_router;
pub use service::{IntakeSessionService, SessionServiceError};
pub use store::{
    FileSessionStore, InMemorySessionStore, SessionStore, StoreError, DEFAULT_SESSION_KEY,
};
