//! Fixed assistant prose. Every function is pure text construction.

use super::domain::{CandidateField, CandidateInfo};

pub fn greeting() -> String {
    "Hello! I'm TalentScout, your hiring assistant. I'll guide you through a short screening.\n\n\
     I'll collect a few details from you:\n\
     - Full Name\n\
     - Email\n\
     - Phone Number\n\
     - Years of Experience\n\
     - Desired Position(s)\n\
     - Current Location\n\
     - Tech Stack (languages, frameworks, databases, tools)\n\n\
     Once I have them, I'll prepare technical questions tailored to your tech stack. \
     You can type **\"exit\"** at any time to end the conversation.\n\n\
     Let's get started! What's your full name?"
        .to_string()
}

pub fn field_prompt(field: CandidateField) -> String {
    let prompt = match field {
        CandidateField::FullName => "What's your full name?",
        CandidateField::Email => "What's the best email address to reach you?",
        CandidateField::Phone => "What's your phone number? Include the country code if you're outside the US.",
        CandidateField::YearsOfExperience => "How many years of professional experience do you have?",
        CandidateField::DesiredPositions => "Which position(s) are you interested in?",
        CandidateField::CurrentLocation => "Where are you currently located? (City, country, or \"Remote\")",
        CandidateField::TechStack => {
            "Finally, what's your tech stack? List the languages, frameworks, databases, and tools \
             you work with (e.g., Python, Django, PostgreSQL, Docker)."
        }
    };
    prompt.to_string()
}

pub fn validation_error(field: CandidateField) -> String {
    let message = match field {
        CandidateField::FullName => {
            "That doesn't look like a full name. Please enter your name using letters \
             (between 2 and 100 characters)."
        }
        CandidateField::Email => {
            "That email address doesn't look right. Please use the format name@example.com."
        }
        CandidateField::Phone => {
            "I couldn't read that phone number. Please enter 7 to 15 digits; spaces, dashes, \
             parentheses, and a leading + are fine."
        }
        CandidateField::YearsOfExperience => {
            "Please enter your years of experience as a number between 0 and 60 (for example 3 or 2.5)."
        }
        CandidateField::DesiredPositions => {
            "Please tell me which position(s) you're interested in (for example \"Backend Engineer\")."
        }
        CandidateField::CurrentLocation => {
            "Please share your current location, such as a city and country, or \"Remote\"."
        }
        CandidateField::TechStack => {
            "Please list at least one technology you work with, separated by commas \
             (for example \"Python, React, PostgreSQL\")."
        }
    };
    message.to_string()
}

/// Acknowledgment opening the assistant's next turn. Ends with a blank line so the next
/// prompt can be appended directly.
pub fn confirmation(field: CandidateField, value: &str) -> String {
    let value = value.trim();
    match field {
        CandidateField::FullName => format!("Nice to meet you, {value}!\n\n"),
        CandidateField::Email => format!("Thanks! I've recorded your email as {value}.\n\n"),
        CandidateField::Phone => format!("Got it, your phone number is {value}.\n\n"),
        CandidateField::YearsOfExperience => {
            format!("Great, {value} year(s) of experience noted.\n\n")
        }
        CandidateField::DesiredPositions => format!("{value} sounds like a great fit to explore.\n\n"),
        CandidateField::CurrentLocation => format!("Thanks, location noted: {value}.\n\n"),
        CandidateField::TechStack => format!("Tech stack recorded: {value}.\n\n"),
    }
}

pub fn summary(info: &CandidateInfo) -> String {
    let lines: Vec<String> = CandidateField::ORDER
        .iter()
        .map(|field| format!("- **{}:** {}", field.label(), info.get(*field)))
        .collect();
    format!(
        "Thank you! Here's a summary of your information:\n\n{}\n\n\
         I'm now preparing technical questions based on your tech stack...",
        lines.join("\n")
    )
}

pub fn questions_intro() -> String {
    "Here are your tailored technical questions:".to_string()
}

/// Intro followed by the numbered questions, blank-line separated.
pub fn questions_message(questions: &[String]) -> String {
    let numbered: Vec<String> = questions
        .iter()
        .enumerate()
        .map(|(index, question)| format!("{}. {}", index + 1, question))
        .collect();
    format!("{}\n\n{}", questions_intro(), numbered.join("\n\n"))
}

pub fn questions_follow_up() -> String {
    "These questions are designed to assess your proficiency in your declared tech stack. \
     Take your time to think through each one.\n\n\
     **What would you like to do next?**\n\
     - Share your thoughts or questions about any of the above\n\
     - Type **\"exit\"** or **\"bye\"** to complete your screening"
        .to_string()
}

pub fn post_questions_ack() -> String {
    "Thank you for sharing! If you have other questions or would like to discuss further, \
     feel free to ask. Otherwise, type **\"exit\"** or **\"bye\"** to complete your screening \
     and we'll be in touch soon."
        .to_string()
}

pub fn exit_message() -> String {
    "Thank you for your time! Our recruitment team will review your information and \
     contact you with next steps. Have a great day!"
        .to_string()
}

/// Reply for input that arrives after the conversation has ended.
pub fn closing_message() -> String {
    "This screening session has ended. Start a new session if you'd like to go again.".to_string()
}

pub fn fallback_message() -> String {
    "I'm sorry, I didn't quite catch that. Could you please provide the requested information?"
        .to_string()
}

pub fn session_restarted() -> String {
    "Sorry, your previous session expired and the answers you gave so far could not be \
     recovered. Let's start again from your full name."
        .to_string()
}

pub fn collaborator_apology() -> String {
    "I apologize, but I encountered an error processing your request. Please try again."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_exist_for_every_field() {
        for field in CandidateField::ORDER {
            assert!(!field_prompt(field).is_empty());
            assert!(!validation_error(field).is_empty());
        }
        assert_ne!(
            validation_error(CandidateField::Email),
            validation_error(CandidateField::Phone)
        );
    }

    #[test]
    fn restart_notice_differs_from_apology() {
        assert_ne!(session_restarted(), collaborator_apology());
        assert!(session_restarted().contains("full name"));
    }

    #[test]
    fn confirmation_embeds_trimmed_value() {
        let text = confirmation(CandidateField::FullName, "  Jane Doe ");
        assert!(text.contains("Jane Doe!"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn summary_lists_all_fields() {
        let info = CandidateInfo {
            full_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: "+1 415 555 0100".to_string(),
            years_of_experience: "3".to_string(),
            desired_positions: "Backend Engineer".to_string(),
            current_location: "Remote".to_string(),
            tech_stack: "Python, Go".to_string(),
        };
        let text = summary(&info);
        for field in CandidateField::ORDER {
            assert!(text.contains(field.label()));
            assert!(text.contains(info.get(field)));
        }
    }

    #[test]
    fn questions_are_numbered() {
        let text = questions_message(&["[★] One".to_string(), "[★★] Two".to_string()]);
        assert!(text.contains("1. [★] One"));
        assert!(text.contains("2. [★★] Two"));
    }
}
