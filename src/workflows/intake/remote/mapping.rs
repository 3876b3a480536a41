use std::collections::BTreeMap;

use serde_json::Value;

use super::super::domain::{CandidateField, CandidateInfo, ConversationStep};
use super::super::questions::normalize_tech_stack;

/// Internal field identifier paired with the session service's field name.
pub const FIELD_MAPPING: &[(CandidateField, &str)] = &[
    (CandidateField::FullName, "full_name"),
    (CandidateField::Email, "email"),
    (CandidateField::Phone, "phone"),
    (CandidateField::YearsOfExperience, "years_experience"),
    (CandidateField::DesiredPositions, "desired_position"),
    (CandidateField::CurrentLocation, "current_location"),
    (CandidateField::TechStack, "tech_stack"),
];

pub const STAGE_GREETING: &str = "greeting";
pub const STAGE_COLLECTION: &str = "collection";
pub const STAGE_QUESTIONS: &str = "questions";
pub const STAGE_EXIT: &str = "exit";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("field {field:?} has {count} external names; expected exactly one")]
    InternalArity { field: CandidateField, count: usize },
    #[error("external field '{name}' is mapped {count} times; expected exactly one")]
    ExternalArity { name: String, count: usize },
}

/// Check that `table` pairs every internal field with exactly one external name and
/// vice versa.
pub fn validate_mapping(table: &[(CandidateField, &str)]) -> Result<(), MappingError> {
    for field in CandidateField::ORDER {
        let count = table.iter().filter(|(internal, _)| *internal == field).count();
        if count != 1 {
            return Err(MappingError::InternalArity { field, count });
        }
    }

    for (_, name) in table {
        let count = table.iter().filter(|(_, other)| other == name).count();
        if count != 1 {
            return Err(MappingError::ExternalArity {
                name: (*name).to_string(),
                count,
            });
        }
    }

    Ok(())
}

pub fn external_name(field: CandidateField) -> &'static str {
    FIELD_MAPPING
        .iter()
        .find(|(internal, _)| *internal == field)
        .map(|(_, name)| *name)
        .unwrap_or_else(|| field.key())
}

pub fn internal_field(name: &str) -> Option<CandidateField> {
    FIELD_MAPPING
        .iter()
        .find(|(_, external)| *external == name)
        .map(|(field, _)| *field)
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(render_value).collect();
            Some(parts.join(", "))
        }
        Value::Object(_) => None,
    }
}

/// Build a profile from the service's collected fields. Unknown names are ignored;
/// list values are joined into one display string.
pub fn candidate_info_from_wire(fields: &BTreeMap<String, Value>) -> CandidateInfo {
    let mut info = CandidateInfo::default();
    for (name, value) in fields {
        if let (Some(field), Some(text)) = (internal_field(name), render_value(value)) {
            info.set(field, text);
        }
    }
    info
}

/// Collected fields keyed by external name. The tech stack is sent as a list.
pub fn candidate_info_to_wire(info: &CandidateInfo) -> BTreeMap<String, Value> {
    CandidateField::ORDER
        .into_iter()
        .filter(|field| info.is_collected(*field))
        .map(|field| {
            let raw = info.get(field);
            let value = match field {
                CandidateField::TechStack => Value::Array(
                    normalize_tech_stack(raw)
                        .into_iter()
                        .map(Value::String)
                        .collect(),
                ),
                _ => Value::String(raw.to_string()),
            };
            (external_name(field).to_string(), value)
        })
        .collect()
}

pub fn missing_field_names(info: &CandidateInfo) -> Vec<String> {
    info.missing_fields()
        .into_iter()
        .map(|field| external_name(field).to_string())
        .collect()
}

pub fn stage_for_step(step: ConversationStep) -> &'static str {
    match step {
        ConversationStep::Greeting => STAGE_GREETING,
        ConversationStep::Questions => STAGE_QUESTIONS,
        ConversationStep::Completed => STAGE_EXIT,
        _ => STAGE_COLLECTION,
    }
}

/// Map a service stage onto a local step. For the collection stage the pending field is
/// the first empty one in collection order.
pub fn step_for_stage(stage: &str, info: &CandidateInfo) -> ConversationStep {
    match stage {
        STAGE_COLLECTION => info
            .pending_field()
            .map(CandidateField::step)
            .unwrap_or(ConversationStep::Generating),
        STAGE_QUESTIONS => ConversationStep::Questions,
        STAGE_EXIT => ConversationStep::Completed,
        _ => ConversationStep::Greeting,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shipped_mapping_is_a_bijection() {
        assert_eq!(validate_mapping(FIELD_MAPPING), Ok(()));
        for field in CandidateField::ORDER {
            assert_eq!(internal_field(external_name(field)), Some(field));
        }
    }

    #[test]
    fn mapping_validation_fails_fast_on_gaps_and_duplicates() {
        let missing = &FIELD_MAPPING[..6];
        assert_eq!(
            validate_mapping(missing),
            Err(MappingError::InternalArity {
                field: CandidateField::TechStack,
                count: 0
            })
        );

        let mut duplicated = FIELD_MAPPING.to_vec();
        duplicated[1] = (CandidateField::Email, "full_name");
        assert!(matches!(
            validate_mapping(&duplicated),
            Err(MappingError::ExternalArity { .. })
        ));
    }

    #[test]
    fn wire_fields_join_lists_and_render_numbers() {
        let mut fields = BTreeMap::new();
        fields.insert("full_name".to_string(), json!("Jane Doe"));
        fields.insert("years_experience".to_string(), json!(3.5));
        fields.insert("tech_stack".to_string(), json!(["Python", "Go"]));
        fields.insert("phone".to_string(), Value::Null);
        fields.insert("favourite_colour".to_string(), json!("teal"));

        let info = candidate_info_from_wire(&fields);
        assert_eq!(info.full_name, "Jane Doe");
        assert_eq!(info.years_of_experience, "3.5");
        assert_eq!(info.tech_stack, "Python, Go");
        assert_eq!(info.phone, "");
    }

    #[test]
    fn collection_stage_resolves_to_first_empty_field() {
        let mut info = CandidateInfo::default();
        assert_eq!(step_for_stage("collection", &info), ConversationStep::FullName);

        info.full_name = "Jane Doe".to_string();
        info.email = "jane@x.com".to_string();
        assert_eq!(step_for_stage("collection", &info), ConversationStep::Phone);

        assert_eq!(step_for_stage("exit", &info), ConversationStep::Completed);
        assert_eq!(step_for_stage("mystery", &info), ConversationStep::Greeting);
    }

    #[test]
    fn outbound_fields_send_tech_stack_as_list() {
        let info = CandidateInfo {
            full_name: "Jane Doe".to_string(),
            tech_stack: "Python, Go".to_string(),
            ..CandidateInfo::default()
        };
        let wire = candidate_info_to_wire(&info);
        assert_eq!(wire.get("tech_stack"), Some(&json!(["Python", "Go"])));
        assert_eq!(wire.len(), 2);
        assert_eq!(missing_field_names(&info).len(), 5);
    }
}
