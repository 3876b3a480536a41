use serde::{Deserialize, Serialize};

const STAR: char = '★';

/// Difficulty tier carried by a generated question as a bracketed run of stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Starter,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const fn stars(self) -> u8 {
        match self {
            Difficulty::Starter => 1,
            Difficulty::Intermediate => 2,
            Difficulty::Advanced => 3,
        }
    }

    /// Clamp any star count into the 1–3 range.
    pub const fn from_stars(stars: usize) -> Self {
        match stars {
            0 | 1 => Difficulty::Starter,
            2 => Difficulty::Intermediate,
            _ => Difficulty::Advanced,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Starter => "Starter",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    pub fn marker(self) -> String {
        let stars: String = std::iter::repeat(STAR).take(self.stars() as usize).collect();
        format!("[{stars}]")
    }
}

/// Plain question text recovered from an encoded entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedQuestion {
    pub text: String,
    pub difficulty: Difficulty,
}

pub fn encode(text: &str, difficulty: Difficulty) -> String {
    format!("{} {}", difficulty.marker(), text.trim())
}

/// Strip a leading `[★..]` marker. Entries without one decode as starter questions.
pub fn decode(encoded: &str) -> DecodedQuestion {
    let trimmed = encoded.trim_start();
    let parsed = trimmed.strip_prefix('[').and_then(|rest| {
        let close = rest.find(']')?;
        let run = &rest[..close];
        if run.is_empty() || !run.chars().all(|c| c == STAR) {
            return None;
        }
        let stars = run.chars().count();
        let text = rest[close + ']'.len_utf8()..].trim();
        Some((stars, text))
    });

    match parsed {
        Some((stars, text)) => DecodedQuestion {
            text: text.to_string(),
            difficulty: Difficulty::from_stars(stars),
        },
        None => DecodedQuestion {
            text: encoded.trim().to_string(),
            difficulty: Difficulty::Starter,
        },
    }
}
