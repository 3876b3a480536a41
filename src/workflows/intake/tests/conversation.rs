use std::time::Duration;

use tokio::time::{timeout, Instant};

use super::common::*;

use crate::workflows::intake::catalog;
use crate::workflows::intake::domain::{CandidateField, ConversationState, ConversationStep};
use crate::workflows::intake::store::{InMemorySessionStore, SessionStore};
use crate::workflows::intake::{
    ConversationError, IntakeConversation, MessageRole, Pacing, TurnOutcome,
    DEFAULT_SESSION_KEY,
};

#[tokio::test]
async fn fresh_session_greets_and_asks_for_name() {
    let store = InMemorySessionStore::default();
    let conversation = local_conversation(&store);

    let state = conversation.state();
    assert_eq!(state.step, ConversationStep::FullName);
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].role, MessageRole::Assistant);
    assert_eq!(state.messages[0].content, catalog::greeting());
    assert_eq!(persisted(&store).step, ConversationStep::FullName);
}

#[tokio::test]
async fn jane_doe_reaches_questions_with_tailored_output() {
    let store = InMemorySessionStore::default();
    let mut conversation = local_conversation(&store);
    answer_all(&mut conversation, &JANE_DOE).await;

    let state = conversation.state();
    assert_eq!(state.step, ConversationStep::Questions);
    assert!(!state.is_loading);
    assert!(!state.is_completed);
    for (field, expected) in CandidateField::ORDER.into_iter().zip(JANE_DOE) {
        assert_eq!(state.candidate_info.get(field), expected);
    }

    let question_messages = state
        .messages
        .iter()
        .filter(|message| message.content.starts_with(&catalog::questions_intro()))
        .count();
    assert_eq!(question_messages, 1);

    assert!(!state.generated_questions.is_empty());
    assert!(state.generated_questions.len() <= 5);
    assert!(state
        .generated_questions
        .iter()
        .any(|question| question.contains("Python")));
    assert!(state
        .generated_questions
        .iter()
        .any(|question| question.starts_with("[★] In Go,")));

    assert_eq!(persisted(&store), *state);
}

#[tokio::test]
async fn accepted_values_are_trimmed() {
    let store = InMemorySessionStore::default();
    let mut conversation = local_conversation(&store);

    let outcome = conversation
        .handle_user_input("   Jane Doe  ")
        .await
        .expect("turn completes");

    assert_eq!(
        outcome,
        TurnOutcome::Advanced {
            accepted: CandidateField::FullName,
            next: CandidateField::Email,
        }
    );
    assert_eq!(conversation.state().candidate_info.full_name, "Jane Doe");
    let reply = conversation.state().last_message().expect("assistant reply");
    assert!(reply.content.starts_with("Nice to meet you, Jane Doe!"));
    assert!(reply.content.ends_with(&catalog::field_prompt(CandidateField::Email)));
}

#[tokio::test]
async fn exit_keyword_ends_the_conversation_from_any_field() {
    for answered in 0..JANE_DOE.len() {
        let store = InMemorySessionStore::default();
        let mut conversation = local_conversation(&store);
        answer_all(&mut conversation, &JANE_DOE[..answered]).await;

        let outcome = conversation
            .handle_user_input("Bye!")
            .await
            .expect("turn completes");

        let state = conversation.state();
        assert_eq!(outcome, TurnOutcome::Exited, "after {answered} answers");
        assert_eq!(state.step, ConversationStep::Completed);
        assert!(state.is_completed);
        assert_eq!(
            state.last_message().map(|message| message.content.clone()),
            Some(catalog::exit_message())
        );
        assert!(state.generated_questions.is_empty());
    }
}

#[tokio::test]
async fn invalid_phone_is_reprompted_then_accepted() {
    let store = InMemorySessionStore::default();
    let mut conversation = local_conversation(&store);
    answer_all(&mut conversation, &JANE_DOE[..2]).await;

    let rejected = conversation
        .handle_user_input("abc")
        .await
        .expect("turn completes");
    assert_eq!(
        rejected,
        TurnOutcome::Rejected {
            field: CandidateField::Phone
        }
    );
    assert_eq!(conversation.state().step, ConversationStep::Phone);
    assert_eq!(conversation.state().candidate_info.phone, "");
    assert_eq!(
        conversation.state().last_message().map(|m| m.content.clone()),
        Some(catalog::validation_error(CandidateField::Phone))
    );

    conversation
        .handle_user_input("+1 415 555 0100")
        .await
        .expect("turn completes");
    assert_eq!(conversation.state().step, ConversationStep::YearsOfExperience);
    assert_eq!(conversation.state().candidate_info.phone, "+1 415 555 0100");
}

#[tokio::test]
async fn input_after_questions_and_after_exit_gets_fixed_replies() {
    let store = InMemorySessionStore::default();
    let mut conversation = local_conversation(&store);
    answer_all(&mut conversation, &JANE_DOE).await;

    let ack = conversation
        .handle_user_input("Could you clarify the second one?")
        .await
        .expect("turn completes");
    assert_eq!(ack, TurnOutcome::Acknowledged);
    assert_eq!(conversation.state().step, ConversationStep::Questions);

    conversation.handle_user_input("exit").await.expect("turn completes");
    let closed = conversation
        .handle_user_input("hello again")
        .await
        .expect("turn completes");
    assert_eq!(closed, TurnOutcome::Closed);
    assert_eq!(
        conversation.state().last_message().map(|m| m.content.clone()),
        Some(catalog::closing_message())
    );
}

#[tokio::test]
async fn session_is_restored_from_the_store() {
    let store = InMemorySessionStore::default();
    {
        let mut conversation = local_conversation(&store);
        answer_all(&mut conversation, &JANE_DOE[..3]).await;
    }

    let restored = local_conversation(&store);
    let state = restored.state();
    assert_eq!(state.step, ConversationStep::YearsOfExperience);
    assert_eq!(state.candidate_info.email, "jane@x.com");
    assert_eq!(state.messages.len(), 7);
}

#[tokio::test]
async fn reset_clears_persisted_progress() {
    let store = InMemorySessionStore::default();
    let mut conversation = local_conversation(&store);
    answer_all(&mut conversation, &JANE_DOE[..4]).await;

    conversation.reset();

    let state = persisted(&store);
    assert_eq!(state.step, ConversationStep::FullName);
    assert_eq!(state.candidate_info, Default::default());
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].content, catalog::greeting());
    assert_eq!(*conversation.state(), state);
}

#[tokio::test]
async fn malformed_blob_is_discarded() {
    let store = InMemorySessionStore::default();
    store
        .insert_raw(DEFAULT_SESSION_KEY, "{\"step\": \"nowhere\"")
        .expect("raw insert");

    let conversation = local_conversation(&store);

    assert_eq!(conversation.state().step, ConversationStep::FullName);
    assert_eq!(persisted(&store).messages.len(), 1);
}

#[tokio::test]
async fn interrupted_generation_completes_on_load() {
    let store = InMemorySessionStore::default();
    let mut state = ConversationState::default();
    for (field, value) in CandidateField::ORDER.into_iter().zip(JANE_DOE) {
        state.candidate_info.set(field, value.to_string());
    }
    state.step = ConversationStep::Generating;
    state.is_loading = true;
    store.save(DEFAULT_SESSION_KEY, &state).expect("save");

    let conversation = local_conversation(&store);

    let state = conversation.state();
    assert_eq!(state.step, ConversationStep::Questions);
    assert!(!state.is_loading);
    assert!(!state.generated_questions.is_empty());
}

#[tokio::test]
async fn store_failures_do_not_abort_turns() {
    let mut conversation =
        IntakeConversation::start(UnavailableStore, DEFAULT_SESSION_KEY, Pacing::immediate());

    conversation
        .handle_user_input("Jane Doe")
        .await
        .expect("turn completes");

    assert_eq!(conversation.state().step, ConversationStep::Email);
}

fn paced_conversation(
    store: &InMemorySessionStore,
    pacing: Pacing,
) -> IntakeConversation<InMemorySessionStore> {
    IntakeConversation::start(store.clone(), DEFAULT_SESSION_KEY, pacing)
}

#[tokio::test(start_paused = true)]
async fn thinking_pause_is_persisted_as_loading() {
    let store = InMemorySessionStore::default();
    let mut conversation = paced_conversation(&store, Pacing::default());
    let started = Instant::now();

    let outcome = {
        let turn = conversation.handle_user_input("Jane Doe");
        tokio::pin!(turn);
        assert!(timeout(Duration::from_millis(100), &mut turn).await.is_err());

        let mid_turn = persisted(&store);
        assert!(mid_turn.is_loading);
        assert_eq!(mid_turn.step, ConversationStep::FullName);
        let last = mid_turn.last_message().expect("user message");
        assert_eq!(last.role, MessageRole::User);
        assert_eq!(last.content, "Jane Doe");

        turn.await.expect("turn completes")
    };
    assert!(matches!(outcome, TurnOutcome::Advanced { .. }));
    assert!(started.elapsed() >= Duration::from_millis(750));
    assert!(!persisted(&store).is_loading);
    assert!(!conversation.state().is_loading);
}

#[tokio::test(start_paused = true)]
async fn generation_pause_is_persisted_as_generating() {
    let store = InMemorySessionStore::default();
    let mut conversation = paced_conversation(&store, Pacing::from_millis(0, 2000));
    answer_all(&mut conversation, &JANE_DOE[..6]).await;
    let started = Instant::now();

    let turn = conversation.handle_user_input(JANE_DOE[6]);
    tokio::pin!(turn);
    assert!(timeout(Duration::from_millis(500), &mut turn).await.is_err());

    let mid_turn = persisted(&store);
    assert_eq!(mid_turn.step, ConversationStep::Generating);
    assert!(mid_turn.is_loading);
    assert!(mid_turn.generated_questions.is_empty());
    assert_eq!(
        mid_turn.last_message().map(|m| m.content.clone()),
        Some(catalog::summary(&mid_turn.candidate_info))
    );

    let outcome = turn.await.expect("turn completes");
    assert!(matches!(outcome, TurnOutcome::QuestionsReady { .. }));
    assert!(started.elapsed() >= Duration::from_millis(2000));
    let done = persisted(&store);
    assert_eq!(done.step, ConversationStep::Questions);
    assert!(!done.is_loading);
}

#[tokio::test(start_paused = true)]
async fn abandoned_turn_blocks_reentry_until_reloaded() {
    let store = InMemorySessionStore::default();
    let mut conversation = paced_conversation(&store, Pacing::default());

    let abandoned = timeout(
        Duration::from_millis(100),
        conversation.handle_user_input("Jane Doe"),
    )
    .await;
    assert!(abandoned.is_err());
    assert!(conversation.state().is_loading);

    let err = conversation
        .handle_user_input("Jane Doe")
        .await
        .expect_err("turn still marked in progress");
    assert!(matches!(err, ConversationError::TurnInProgress(key) if key == DEFAULT_SESSION_KEY));

    let reloaded = paced_conversation(&store, Pacing::immediate());
    assert!(!reloaded.state().is_loading);
    assert_eq!(reloaded.state().step, ConversationStep::FullName);
    assert!(!persisted(&store).is_loading);
}
