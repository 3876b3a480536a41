use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile fields collected from the candidate, in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CandidateField {
    FullName,
    Email,
    Phone,
    YearsOfExperience,
    DesiredPositions,
    CurrentLocation,
    TechStack,
}

impl CandidateField {
    pub const ORDER: [CandidateField; 7] = [
        CandidateField::FullName,
        CandidateField::Email,
        CandidateField::Phone,
        CandidateField::YearsOfExperience,
        CandidateField::DesiredPositions,
        CandidateField::CurrentLocation,
        CandidateField::TechStack,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            CandidateField::FullName => "fullName",
            CandidateField::Email => "email",
            CandidateField::Phone => "phone",
            CandidateField::YearsOfExperience => "yearsOfExperience",
            CandidateField::DesiredPositions => "desiredPositions",
            CandidateField::CurrentLocation => "currentLocation",
            CandidateField::TechStack => "techStack",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CandidateField::FullName => "Full Name",
            CandidateField::Email => "Email",
            CandidateField::Phone => "Phone",
            CandidateField::YearsOfExperience => "Years of Experience",
            CandidateField::DesiredPositions => "Desired Position(s)",
            CandidateField::CurrentLocation => "Current Location",
            CandidateField::TechStack => "Tech Stack",
        }
    }

    pub const fn step(self) -> ConversationStep {
        match self {
            CandidateField::FullName => ConversationStep::FullName,
            CandidateField::Email => ConversationStep::Email,
            CandidateField::Phone => ConversationStep::Phone,
            CandidateField::YearsOfExperience => ConversationStep::YearsOfExperience,
            CandidateField::DesiredPositions => ConversationStep::DesiredPositions,
            CandidateField::CurrentLocation => ConversationStep::CurrentLocation,
            CandidateField::TechStack => ConversationStep::TechStack,
        }
    }

    /// Field that follows this one, or `None` for the last field.
    pub fn next(self) -> Option<CandidateField> {
        let index = Self::ORDER.iter().position(|field| *field == self)?;
        Self::ORDER.get(index + 1).copied()
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

/// Candidate profile accumulated during intake. Empty strings mean "not yet collected".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub years_of_experience: String,
    pub desired_positions: String,
    pub current_location: String,
    pub tech_stack: String,
}

impl CandidateInfo {
    pub fn get(&self, field: CandidateField) -> &str {
        match field {
            CandidateField::FullName => &self.full_name,
            CandidateField::Email => &self.email,
            CandidateField::Phone => &self.phone,
            CandidateField::YearsOfExperience => &self.years_of_experience,
            CandidateField::DesiredPositions => &self.desired_positions,
            CandidateField::CurrentLocation => &self.current_location,
            CandidateField::TechStack => &self.tech_stack,
        }
    }

    pub(crate) fn set(&mut self, field: CandidateField, value: String) {
        let slot = match field {
            CandidateField::FullName => &mut self.full_name,
            CandidateField::Email => &mut self.email,
            CandidateField::Phone => &mut self.phone,
            CandidateField::YearsOfExperience => &mut self.years_of_experience,
            CandidateField::DesiredPositions => &mut self.desired_positions,
            CandidateField::CurrentLocation => &mut self.current_location,
            CandidateField::TechStack => &mut self.tech_stack,
        };
        *slot = value;
    }

    pub fn is_collected(&self, field: CandidateField) -> bool {
        !self.get(field).trim().is_empty()
    }

    pub fn missing_fields(&self) -> Vec<CandidateField> {
        CandidateField::ORDER
            .into_iter()
            .filter(|field| !self.is_collected(*field))
            .collect()
    }

    /// First field in collection order that is still empty.
    pub fn pending_field(&self) -> Option<CandidateField> {
        CandidateField::ORDER
            .into_iter()
            .find(|field| !self.is_collected(*field))
    }
}

/// Position in the intake flow. Declaration order is the flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConversationStep {
    Greeting,
    FullName,
    Email,
    Phone,
    YearsOfExperience,
    DesiredPositions,
    CurrentLocation,
    TechStack,
    Generating,
    Questions,
    Completed,
}

impl ConversationStep {
    pub const ORDER: [ConversationStep; 11] = [
        ConversationStep::Greeting,
        ConversationStep::FullName,
        ConversationStep::Email,
        ConversationStep::Phone,
        ConversationStep::YearsOfExperience,
        ConversationStep::DesiredPositions,
        ConversationStep::CurrentLocation,
        ConversationStep::TechStack,
        ConversationStep::Generating,
        ConversationStep::Questions,
        ConversationStep::Completed,
    ];

    /// Field collected while in this step, if it is a field-collection step.
    pub const fn field(self) -> Option<CandidateField> {
        match self {
            ConversationStep::FullName => Some(CandidateField::FullName),
            ConversationStep::Email => Some(CandidateField::Email),
            ConversationStep::Phone => Some(CandidateField::Phone),
            ConversationStep::YearsOfExperience => Some(CandidateField::YearsOfExperience),
            ConversationStep::DesiredPositions => Some(CandidateField::DesiredPositions),
            ConversationStep::CurrentLocation => Some(CandidateField::CurrentLocation),
            ConversationStep::TechStack => Some(CandidateField::TechStack),
            ConversationStep::Greeting
            | ConversationStep::Generating
            | ConversationStep::Questions
            | ConversationStep::Completed => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ConversationStep::Greeting => "Welcome",
            ConversationStep::FullName => "Full Name",
            ConversationStep::Email => "Email",
            ConversationStep::Phone => "Phone",
            ConversationStep::YearsOfExperience => "Experience",
            ConversationStep::DesiredPositions => "Position",
            ConversationStep::CurrentLocation => "Location",
            ConversationStep::TechStack => "Tech Stack",
            ConversationStep::Generating => "Generating",
            ConversationStep::Questions => "Questions",
            ConversationStep::Completed => "Complete",
        }
    }

    pub fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|step| *step == self)
            .unwrap_or_default()
    }

    /// Share of the flow already covered, from 0.0 at greeting to 1.0 at completion.
    pub fn progress(self) -> f32 {
        self.index() as f32 / (Self::ORDER.len() - 1) as f32
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ConversationStep::Completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub const fn label(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single transcript entry. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Aggregate owned by the conversation state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    pub step: ConversationStep,
    pub candidate_info: CandidateInfo,
    pub messages: Vec<Message>,
    pub generated_questions: Vec<String>,
    pub is_loading: bool,
    pub is_completed: bool,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            step: ConversationStep::Greeting,
            candidate_info: CandidateInfo::default(),
            messages: Vec::new(),
            generated_questions: Vec::new(),
            is_loading: false,
            is_completed: false,
        }
    }
}

impl ConversationState {
    pub fn current_field(&self) -> Option<CandidateField> {
        self.step.field()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
