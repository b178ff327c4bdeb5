//! Property-based tests for the decision table and record lifecycle
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{
    ActionKind, ContentType, ModerationAction, ModerationRecord, ModerationStatus, Reviewer,
    ReviewerRole, Severity, UserId,
};
use proptest::prelude::*;

fn severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::all().to_vec())
}

fn terminal_status() -> impl Strategy<Value = ModerationStatus> {
    prop::sample::select(vec![
        ModerationStatus::Approved,
        ModerationStatus::Rejected,
        ModerationStatus::Flagged,
    ])
}

fn role() -> impl Strategy<Value = ReviewerRole> {
    prop::sample::select(vec![
        ReviewerRole::Teacher,
        ReviewerRole::Moderator,
        ReviewerRole::Administrator,
    ])
}

// ============================================================================
// Decision Table Property Tests
// ============================================================================

mod decision_table_tests {
    use super::*;

    proptest! {
        #[test]
        fn action_order_follows_severity_order(a in severity(), b in severity()) {
            let da = ModerationAction::decide(a);
            let db = ModerationAction::decide(b);
            prop_assert_eq!(a.cmp(&b), da.action().cmp(&db.action()));
        }

        #[test]
        fn notify_flags_are_monotonic(a in severity(), b in severity()) {
            prop_assume!(a <= b);
            let da = ModerationAction::decide(a);
            let db = ModerationAction::decide(b);
            prop_assert!(!da.notify_guardian() || db.notify_guardian());
            prop_assert!(!da.notify_admin() || db.notify_admin());
        }

        #[test]
        fn admin_notification_implies_rejection(s in severity()) {
            let decision = ModerationAction::decide(s);
            if decision.notify_admin() {
                prop_assert!(decision.action().rejects_write());
                prop_assert!(decision.notify_guardian());
            }
        }
    }

    #[test]
    fn every_severity_maps_to_distinct_action() {
        let actions: Vec<ActionKind> = Severity::all()
            .iter()
            .map(|s| ModerationAction::decide(*s).action())
            .collect();
        let mut sorted = actions.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(actions, sorted);
        assert_eq!(actions.len(), Severity::all().len());
    }
}

// ============================================================================
// Moderation Record Property Tests
// ============================================================================

mod record_lifecycle_tests {
    use super::*;

    fn pending() -> ModerationRecord {
        ModerationRecord::new(
            ContentType::Message,
            "msg-1",
            UserId::new(),
            Severity::Critical,
            ActionKind::Flag,
            true,
        )
    }

    proptest! {
        #[test]
        fn first_review_always_sticks(
            first in terminal_status(),
            second in terminal_status(),
            r1 in role(),
            r2 in role(),
        ) {
            let mut record = pending();
            prop_assert!(record.review(Reviewer::new(UserId::new(), r1), first, None).is_ok());
            prop_assert!(record.review(Reviewer::new(UserId::new(), r2), second, None).is_err());
            prop_assert_eq!(record.status, first);
        }

        #[test]
        fn amend_never_changes_status(
            status in terminal_status(),
            original in role(),
            amender in role(),
            notes in ".{0,40}",
        ) {
            let mut record = pending();
            record.review(Reviewer::new(UserId::new(), original), status, None).unwrap();
            let allowed = amender > original;
            let result = record.amend_notes(&Reviewer::new(UserId::new(), amender), notes);
            prop_assert_eq!(result.is_ok(), allowed);
            prop_assert_eq!(record.status, status);
        }
    }
}
