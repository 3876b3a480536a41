//! Client side of the remote session boundary: wire types, field mapping, and the
//! conversation mirror that delegates every turn to the session service.

pub mod client;
pub mod http;
pub mod mapping;
pub mod saved;
pub mod session;
pub mod wire;

pub use client::{RemoteError, SessionClient};
pub use http::HttpSessionClient;
pub use mapping::{validate_mapping, MappingError, FIELD_MAPPING};
pub use saved::{SavedSessionId, SAVED_SESSION_ID_FILE};
pub use session::{RemoteConversation, RemoteTurn};
pub use wire::{MessageReply, SessionSnapshot, WireMessage, WireQuestion};
