//! Masking helpers so candidate PII never reaches logs verbatim.

use super::domain::CandidateField;

pub fn mask_email(email: &str) -> String {
    match email.trim().split_once('@') {
        Some((local, domain)) => {
            let mut chars = local.chars();
            match chars.next() {
                Some(first) => format!("{first}{}@{domain}", "*".repeat(chars.count())),
                None => format!("*@{domain}"),
            }
        }
        None => "*".repeat(email.trim().chars().count()),
    }
}

/// Keep only the last four characters.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.trim().chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{visible}", "*".repeat(chars.len() - 4))
}

pub fn mask_name(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => format!("{first}{}", "*".repeat(chars.count())),
        None => String::new(),
    }
}

/// Log-safe rendering of a collected value.
pub fn redact_field(field: CandidateField, value: &str) -> String {
    match field {
        CandidateField::FullName => mask_name(value),
        CandidateField::Email => mask_email(value),
        CandidateField::Phone => mask_phone(value),
        _ => value.trim().to_string(),
    }
}
