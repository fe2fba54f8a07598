//! Property tests for the ordered validation rules.
//!
//! Uses proptest to verify:
//! 1. Payloads built inside every limit always validate.
//! 2. With violations spread over several fields, the reported error is the
//!    one belonging to the earliest field in rule order.
//! 3. Validation never panics on arbitrary input.

use proptest::prelude::*;
use taskboard_proto::task::TaskPayload;
use taskboard_proto::validate::{Field, ValidationError, validate_fields, validate_payload};

/// Strategy for a title inside the 3..=100 character limit.
fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 äöü]{3,100}".prop_filter("no surrounding blanks", |t| t.trim() == t)
}

/// Strategy for a list of 1..=10 distinct tags of 2..=20 characters.
fn arb_tags() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z0-9-]{2,20}", 1..=10).prop_map(|s| s.into_iter().collect())
}

/// Strategy for a due date that is always a real calendar day.
fn arb_due_date() -> impl Strategy<Value = String> {
    (2000u32..2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}"))
}

/// Strategy for a payload satisfying every rule.
fn arb_valid_payload() -> impl Strategy<Value = TaskPayload> {
    (
        arb_title(),
        "[a-z ]{0,500}",
        prop::sample::select(vec!["low", "medium", "high"]),
        prop::sample::select(vec!["pending", "in-progress", "completed"]),
        arb_due_date(),
        arb_tags(),
    )
        .prop_map(
            |(title, description, priority, status, due_date, tags)| TaskPayload {
                title,
                description,
                priority: priority.to_string(),
                status: status.to_string(),
                due_date,
                tags,
            },
        )
}

/// A breakage applied to one field group, with the error it must produce.
type Breakage = (fn(&mut TaskPayload), ValidationError);

fn title_breakages() -> Vec<Breakage> {
    let breakages: [Breakage; 3] = [
        (|p| p.title.clear(), ValidationError::TitleRequired),
        (|p| p.title = "ab".to_string(), ValidationError::TitleTooShort),
        (|p| p.title = "x".repeat(101), ValidationError::TitleTooLong),
    ];
    breakages.to_vec()
}

fn due_date_breakages() -> Vec<Breakage> {
    let breakages: [Breakage; 2] = [
        (|p| p.due_date.clear(), ValidationError::DueDateRequired),
        (|p| p.due_date = "2026-02-31".to_string(), ValidationError::DueDateInvalid),
    ];
    breakages.to_vec()
}

fn tag_breakages() -> Vec<Breakage> {
    let breakages: [Breakage; 4] = [
        (|p| p.tags.clear(), ValidationError::TagsRequired),
        (
            |p| p.tags = (0..11).map(|i| format!("tag{i}")).collect(),
            ValidationError::TooManyTags,
        ),
        (
            |p| {
                p.tags.truncate(9);
                p.tags.push("x".to_string());
            },
            ValidationError::TagLength,
        ),
        (
            |p| {
                let first = p.tags.first().cloned().unwrap_or_else(|| "aa".to_string());
                p.tags.truncate(9);
                p.tags.push(first);
            },
            ValidationError::DuplicateTag,
        ),
    ];
    breakages.to_vec()
}

fn arb_breakage(choices: Vec<Breakage>) -> impl Strategy<Value = Option<Breakage>> {
    prop::option::of(prop::sample::select(choices))
}

proptest! {
    #[test]
    fn valid_payloads_always_pass(payload in arb_valid_payload()) {
        prop_assert_eq!(validate_payload(&payload), Ok(()));
    }

    #[test]
    fn earliest_violated_field_wins(
        mut payload in arb_valid_payload(),
        title in arb_breakage(title_breakages()),
        description in prop::bool::ANY,
        priority in prop::bool::ANY,
        status in prop::bool::ANY,
        due_date in arb_breakage(due_date_breakages()),
        tags in arb_breakage(tag_breakages()),
    ) {
        let mut expected: Option<ValidationError> = None;
        let mut note = |err: ValidationError| {
            expected.get_or_insert(err);
        };

        if let Some((apply, err)) = title {
            apply(&mut payload);
            note(err);
        }
        if description {
            payload.description = "d".repeat(501);
            note(ValidationError::DescriptionTooLong);
        }
        if priority {
            payload.priority = "urgent".to_string();
            note(ValidationError::InvalidPriority);
        }
        if status {
            payload.status = "done".to_string();
            note(ValidationError::InvalidStatus);
        }
        if let Some((apply, err)) = due_date {
            apply(&mut payload);
            note(err);
        }
        if let Some((apply, err)) = tags {
            apply(&mut payload);
            note(err);
        }

        prop_assert_eq!(validate_payload(&payload), expected.map_or(Ok(()), Err));
    }

    #[test]
    fn restricted_validation_only_reports_requested_fields(
        payload in any::<(String, String, String, String, String, Vec<String>)>()
    ) {
        let (title, description, priority, status, due_date, tags) = payload;
        let payload = TaskPayload { title, description, priority, status, due_date, tags };
        if let Err(err) = validate_fields(&payload, &[Field::Status, Field::DueDate]) {
            prop_assert!(matches!(err.field(), Field::Status | Field::DueDate));
        }
    }

    #[test]
    fn never_panics_on_arbitrary_input(
        title in ".*",
        description in ".*",
        priority in ".*",
        status in ".*",
        due_date in ".*",
        tags in prop::collection::vec(".*", 0..16),
    ) {
        let payload = TaskPayload { title, description, priority, status, due_date, tags };
        let _ = validate_payload(&payload);
    }
}
