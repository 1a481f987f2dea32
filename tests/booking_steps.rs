use chrono::{NaiveDate, TimeZone, Utc};
use taskCalendarBot::models::conversation::{ConversationState, Step};
use taskCalendarBot::service::booking_flow::{
    advance, start_booking, StepOutcome, DATE_PROMPT, DESCRIPTION_PROMPT, INVALID_DATE_MESSAGE,
    INVALID_TIME_MESSAGE, TITLE_PROMPT,
};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn expect_advanced(outcome: StepOutcome) -> ConversationState {
    match outcome {
        StepOutcome::Advanced { state, .. } => state,
        other => panic!("expected advance, got {:?}", other),
    }
}

fn state_at(step: Step) -> ConversationState {
    let mut state = ConversationState::new(now());
    state.step = step;
    state.draft.title = Some("Release review".to_string());
    state.draft.description = Some("Walk through the changelog".to_string());
    state.draft.assignee = Some("Robin".to_string());
    if step == Step::AwaitingTime {
        state.draft.date = NaiveDate::from_ymd_opt(2024, 3, 20);
    }
    state
}

#[test]
fn each_valid_input_moves_exactly_one_step() {
    let (state, prompt) = start_booking(now());
    assert_eq!(state.step, Step::AwaitingTitle);
    assert!(state.draft.is_empty());
    assert_eq!(prompt, TITLE_PROMPT);

    let inputs = [
        ("Release review", Step::AwaitingDescription),
        ("Walk through the changelog", Step::AwaitingAssignee),
        ("Robin", Step::AwaitingDate),
        ("2024-03-20", Step::AwaitingTime),
    ];
    let mut state = state;
    for (input, expected) in inputs {
        state = expect_advanced(advance(state, input, now()).unwrap());
        assert_eq!(state.step, expected);
    }

    match advance(state, "09:00", now()).unwrap() {
        StepOutcome::Completed { task, reply } => {
            assert_eq!(task.title, "Release review");
            assert_eq!(task.description, "Walk through the changelog");
            assert_eq!(task.assignee, "Robin");
            assert_eq!(task.date, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
            assert_eq!(task.time_slot, "09:00");
            assert!(!task.id.is_empty());
            assert!(reply.contains("📅 Date: 2024-03-20"));
            assert!(reply.contains("🕒 Time: 09:00"));
        }
        other => panic!("expected completion, got {:?}", other),
    }
}

#[test]
fn title_reply_asks_for_description() {
    let (state, _) = start_booking(now());
    match advance(state, "Standup", now()).unwrap() {
        StepOutcome::Advanced { state, reply } => {
            assert_eq!(reply, DESCRIPTION_PROMPT);
            assert_eq!(state.draft.title.as_deref(), Some("Standup"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn free_text_is_kept_verbatim() {
    let state = state_at(Step::AwaitingAssignee);
    match advance(state, "<b>Robin</b> & co", now()).unwrap() {
        StepOutcome::Advanced { state, reply } => {
            assert_eq!(state.draft.assignee.as_deref(), Some("<b>Robin</b> & co"));
            assert_eq!(reply, DATE_PROMPT);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn valid_date_is_stored() {
    let state = expect_advanced(advance(state_at(Step::AwaitingDate), "2024-03-20", now()).unwrap());
    assert_eq!(state.draft.date, NaiveDate::from_ymd_opt(2024, 3, 20));
    assert_eq!(state.step, Step::AwaitingTime);
}

#[test]
fn impossible_date_is_rejected() {
    for input in ["2024-13-40", "2024-02-30", "03/20/2024", ""] {
        let outcome = advance(state_at(Step::AwaitingDate), input, now()).unwrap();
        assert_eq!(
            outcome,
            StepOutcome::Rejected {
                step: Step::AwaitingDate,
                reply: INVALID_DATE_MESSAGE.to_string(),
            },
            "input {:?}",
            input
        );
    }
}

#[test]
fn out_of_range_time_is_rejected() {
    for input in ["25:99", "24:00", "9am", "09:0"] {
        let outcome = advance(state_at(Step::AwaitingTime), input, now()).unwrap();
        assert_eq!(
            outcome,
            StepOutcome::Rejected {
                step: Step::AwaitingTime,
                reply: INVALID_TIME_MESSAGE.to_string(),
            },
            "input {:?}",
            input
        );
    }
}

#[test]
fn advancing_refreshes_activity_time() {
    let later = now() + chrono::Duration::minutes(3);
    let state = expect_advanced(advance(state_at(Step::AwaitingTitle), "x", later).unwrap());
    assert_eq!(state.last_activity_at, later);
}

#[test]
fn completing_with_missing_fields_is_an_error() {
    let mut state = ConversationState::new(now());
    state.step = Step::AwaitingTime;
    assert!(advance(state, "09:00", now()).is_err());
}
