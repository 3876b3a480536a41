use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::super::domain::{ConversationState, Message, MessageRole};
use super::super::questions::{decode, encode, Difficulty};
use super::mapping::{candidate_info_to_wire, missing_field_names, stage_for_step};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

impl WireMessage {
    pub fn from_message(message: &Message) -> Self {
        Self {
            role: message.role.label().to_string(),
            content: message.content.clone(),
        }
    }

    pub fn into_message(self) -> Message {
        let role = if self.role.eq_ignore_ascii_case("user") {
            MessageRole::User
        } else {
            MessageRole::Assistant
        };
        Message::new(role, self.content)
    }
}

/// A technical question as carried over the wire: plain text plus a star count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireQuestion {
    pub text: String,
    pub difficulty: u8,
}

impl WireQuestion {
    pub fn from_encoded(encoded: &str) -> Self {
        let decoded = decode(encoded);
        Self {
            text: decoded.text,
            difficulty: decoded.difficulty.stars(),
        }
    }

    pub fn to_encoded(&self) -> String {
        encode(&self.text, Difficulty::from_stars(usize::from(self.difficulty)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub conversation_stage: String,
    #[serde(default)]
    pub collected_fields: BTreeMap<String, Value>,
    #[serde(default)]
    pub missing_fields: Vec<String>,
    #[serde(default)]
    pub chat_history: Vec<WireMessage>,
}

impl SessionSnapshot {
    pub fn from_state(session_id: &str, state: &ConversationState) -> Self {
        Self {
            session_id: session_id.to_string(),
            conversation_stage: stage_for_step(state.step).to_string(),
            collected_fields: candidate_info_to_wire(&state.candidate_info),
            missing_fields: missing_field_names(&state.candidate_info),
            chat_history: state.messages.iter().map(WireMessage::from_message).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageReply {
    pub response: String,
    pub conversation_stage: String,
    #[serde(default)]
    pub fields_collected: BTreeMap<String, Value>,
    #[serde(default)]
    pub missing_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<WireQuestion>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuestions {
    pub session_id: String,
    pub questions: Vec<WireQuestion>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::intake::domain::{CandidateInfo, ConversationStep};
    use serde_json::json;

    #[test]
    fn snapshot_reports_stage_fields_and_history() {
        let mut state = ConversationState {
            step: ConversationStep::Phone,
            candidate_info: CandidateInfo {
                full_name: "Jane Doe".to_string(),
                email: "jane@x.com".to_string(),
                ..CandidateInfo::default()
            },
            ..ConversationState::default()
        };
        state.messages.push(Message::assistant("hello"));
        state.messages.push(Message::user("Jane Doe"));

        let snapshot = SessionSnapshot::from_state("abc", &state);
        assert_eq!(snapshot.conversation_stage, "collection");
        assert_eq!(snapshot.collected_fields.get("full_name"), Some(&json!("Jane Doe")));
        assert_eq!(snapshot.missing_fields.first().map(String::as_str), Some("phone"));
        assert_eq!(snapshot.chat_history[1].role, "user");
    }

    #[test]
    fn reply_omits_absent_questions() {
        let reply = MessageReply {
            response: "ok".to_string(),
            conversation_stage: "collection".to_string(),
            fields_collected: BTreeMap::new(),
            missing_fields: Vec::new(),
            questions: None,
        };
        let value = serde_json::to_value(&reply).unwrap();
        assert!(value.get("questions").is_none());
    }

    #[test]
    fn wire_questions_keep_difficulty_markers() {
        let question = WireQuestion::from_encoded("[★★] Explain goroutines.");
        assert_eq!(question.text, "Explain goroutines.");
        assert_eq!(question.difficulty, 2);
        assert_eq!(question.to_encoded(), "[★★] Explain goroutines.");
    }
}
