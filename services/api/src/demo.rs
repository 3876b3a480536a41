use clap::Args;
use std::sync::Arc;
use talent_intake::error::AppError;
use talent_intake::workflows::intake::questions::Difficulty;
use talent_intake::workflows::intake::remote::{SessionSnapshot, WireQuestion};
use talent_intake::workflows::intake::{InMemorySessionStore, IntakeSessionService, Pacing};

const DEMO_ANSWERS: [&str; 7] = [
    "Jane Doe",
    "jane@x.com",
    "+1 415 555 0100",
    "3",
    "Backend Engineer",
    "Remote",
    "Python, Go",
];

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Replace the scripted tech stack answer.
    #[arg(long)]
    pub(crate) stack: Option<String>,
    /// Send one invalid phone number first to show the re-prompt.
    #[arg(long)]
    pub(crate) with_invalid_phone: bool,
    /// End the session with an exit keyword after the questions.
    #[arg(long)]
    pub(crate) exit: bool,
}

pub(crate) fn demo_script(args: &DemoArgs) -> Vec<String> {
    let mut script: Vec<String> = DEMO_ANSWERS.iter().map(|answer| answer.to_string()).collect();
    if let Some(stack) = &args.stack {
        script[6] = stack.clone();
    }
    if args.with_invalid_phone {
        script.insert(2, "abc".to_string());
    }
    if args.exit {
        script.push("exit".to_string());
    }
    script
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = IntakeSessionService::new(
        Arc::new(InMemorySessionStore::default()),
        Pacing::immediate(),
    );

    let snapshot = service.create_session();
    print_opening(&snapshot);

    let mut questions = Vec::new();
    for line in demo_script(&args) {
        println!("candidate > {line}");
        let reply = service
            .send_message(&snapshot.session_id, &line)
            .await?;
        println!("assistant [{}] > {}\n", reply.conversation_stage, reply.response);
        if let Some(generated) = reply.questions {
            questions = generated;
        }
    }

    print_questions(&questions);
    Ok(())
}

fn print_opening(snapshot: &SessionSnapshot) {
    println!("Session {}", snapshot.session_id);
    println!("======================================");
    for message in &snapshot.chat_history {
        println!("{} > {}\n", message.role, message.content);
    }
}

fn print_questions(questions: &[WireQuestion]) {
    if questions.is_empty() {
        println!("No screening questions were generated.");
        return;
    }

    println!("Screening questions");
    println!("--------------------------------------");
    for (index, question) in questions.iter().enumerate() {
        let difficulty = Difficulty::from_stars(usize::from(question.difficulty));
        println!("{}. [{}] {}", index + 1, difficulty.label(), question.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_applies_overrides() {
        let args = DemoArgs {
            stack: Some("Rust, Kubernetes".to_string()),
            with_invalid_phone: true,
            exit: true,
        };
        let script = demo_script(&args);
        assert_eq!(script.len(), 9);
        assert_eq!(script[2], "abc");
        assert_eq!(script[7], "Rust, Kubernetes");
        assert_eq!(script.last().map(String::as_str), Some("exit"));
    }

    #[tokio::test]
    async fn demo_runs_to_completion() {
        run_demo(DemoArgs::default()).await.expect("demo completes");
    }
}
