//! Format rules applied to each candidate field. Every predicate is total: any string,
//! including empty or malformed text, yields a boolean.

use std::sync::OnceLock;

use regex::Regex;

use super::domain::CandidateField;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;
const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;
const MAX_YEARS_OF_EXPERIENCE: f64 = 60.0;
const FREE_TEXT_MIN_CHARS: usize = 2;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@.]+(?:\.[^\s@.]+)+$").expect("email pattern compiles")
    })
}

/// Run the validator registered for `field`.
pub fn validate(field: CandidateField, raw: &str) -> bool {
    match field {
        CandidateField::FullName => validate_name(raw),
        CandidateField::Email => validate_email(raw),
        CandidateField::Phone => validate_phone(raw),
        CandidateField::YearsOfExperience => validate_years_of_experience(raw),
        CandidateField::DesiredPositions => validate_position(raw),
        CandidateField::CurrentLocation => validate_location(raw),
        CandidateField::TechStack => validate_tech_stack(raw),
    }
}

pub fn validate_name(raw: &str) -> bool {
    let name = raw.trim();
    let length = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&length) {
        return false;
    }

    name.chars().any(char::is_alphabetic)
        && name
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '-' | '\'' | '.'))
}

pub fn validate_email(raw: &str) -> bool {
    email_pattern().is_match(raw.trim())
}

pub fn validate_phone(raw: &str) -> bool {
    let trimmed = raw.trim();
    let without_plus = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = without_plus
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len())
}

pub fn validate_years_of_experience(raw: &str) -> bool {
    let value = raw.trim();
    // Only plain decimals: no signs, exponents, or "inf"/"nan" spellings.
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return false;
    }

    match value.parse::<f64>() {
        Ok(years) => years.is_finite() && (0.0..=MAX_YEARS_OF_EXPERIENCE).contains(&years),
        Err(_) => false,
    }
}

pub fn validate_position(raw: &str) -> bool {
    meaningful_text(raw)
}

pub fn validate_location(raw: &str) -> bool {
    meaningful_text(raw)
}

pub fn validate_tech_stack(raw: &str) -> bool {
    meaningful_text(raw)
}

fn meaningful_text(raw: &str) -> bool {
    let text = raw.trim();
    text.chars().count() >= FREE_TEXT_MIN_CHARS && text.chars().any(char::is_alphanumeric)
}
