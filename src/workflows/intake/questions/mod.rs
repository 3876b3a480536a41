//! Deterministic interview-question selection keyed on the declared tech stack.

mod bank;
pub mod codec;

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

pub use codec::{decode, encode, DecodedQuestion, Difficulty};

use bank::{TechnologyEntry, GENERIC_QUESTIONS, UNKNOWN_TECHNOLOGY_TEMPLATES};

/// Upper bound on questions returned for a single stack.
pub const QUESTION_CAP: usize = 5;
/// Generic questions pad the list up to this count.
pub const MIN_QUESTIONS: usize = 3;

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\s*(?:[,;/&|\n]|\band\b)\s*").expect("separator pattern compiles")
    })
}

/// Split a free-text stack into trimmed entries, dropping case-insensitive duplicates.
pub fn normalize_tech_stack(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    separator_pattern()
        .split(raw)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter(|token| seen.insert(token.to_lowercase()))
        .map(str::to_string)
        .collect()
}

enum QuestionSource {
    Known(&'static TechnologyEntry),
    Unknown(String),
}

impl QuestionSource {
    fn identity(&self) -> String {
        match self {
            QuestionSource::Known(entry) => entry.key.to_string(),
            QuestionSource::Unknown(name) => name.to_lowercase(),
        }
    }

    fn candidates(&self) -> Vec<(Difficulty, String)> {
        match self {
            QuestionSource::Known(entry) => entry
                .questions
                .iter()
                .map(|(difficulty, text)| (*difficulty, (*text).to_string()))
                .collect(),
            QuestionSource::Unknown(name) => UNKNOWN_TECHNOLOGY_TEMPLATES
                .iter()
                .map(|template| (Difficulty::Starter, template.replace("{}", name)))
                .collect(),
        }
    }
}

fn resolve_sources(tech_stack: &str) -> Vec<QuestionSource> {
    let mut sources = Vec::new();
    let mut seen = HashSet::new();

    for token in normalize_tech_stack(tech_stack) {
        let lowered = token.to_lowercase();
        let resolved = match bank::lookup(&lowered) {
            Some(entry) => vec![QuestionSource::Known(entry)],
            None => {
                let known: Vec<_> = lowered
                    .split_whitespace()
                    .filter_map(bank::lookup)
                    .map(QuestionSource::Known)
                    .collect();
                if known.is_empty() {
                    vec![QuestionSource::Unknown(token.clone())]
                } else {
                    known
                }
            }
        };

        for source in resolved {
            if seen.insert(source.identity()) {
                sources.push(source);
            }
        }
    }

    sources
}

/// Produce up to [`QUESTION_CAP`] encoded questions, easiest first.
///
/// Technologies are visited round-robin so every declared entry contributes before any
/// single one contributes twice. Identical input always yields identical output.
pub fn generate_questions(tech_stack: &str) -> Vec<String> {
    let sources = resolve_sources(tech_stack);
    let pools: Vec<Vec<(Difficulty, String)>> =
        sources.iter().map(QuestionSource::candidates).collect();

    let mut seen = HashSet::new();
    let mut picked: Vec<(Difficulty, String)> = Vec::new();
    let deepest = pools.iter().map(Vec::len).max().unwrap_or(0);

    'rounds: for round in 0..deepest {
        for pool in &pools {
            if picked.len() == QUESTION_CAP {
                break 'rounds;
            }
            if let Some((difficulty, text)) = pool.get(round) {
                if seen.insert(text.to_lowercase()) {
                    picked.push((*difficulty, text.clone()));
                }
            }
        }
    }

    for (difficulty, text) in GENERIC_QUESTIONS {
        if picked.len() >= MIN_QUESTIONS {
            break;
        }
        if seen.insert(text.to_lowercase()) {
            picked.push((*difficulty, (*text).to_string()));
        }
    }

    picked.sort_by_key(|(difficulty, _)| *difficulty);

    debug!(
        technologies = sources.len(),
        questions = picked.len(),
        "generated screening questions"
    );

    picked
        .into_iter()
        .map(|(difficulty, text)| encode(&text, difficulty))
        .collect()
}
