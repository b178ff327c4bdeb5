//! Property-based tests for the in-memory record store
//!
//! The store is async; each case drives it with `tokio_test::block_on`.

#![allow(clippy::unwrap_used)]

use application::ports::{ModerationRecordStore, Page, RecordFilter, ReviewUpdate};
use chrono::Utc;
use domain::{
    ActionKind, ContentType, ModerationRecord, ModerationStatus, Reviewer, ReviewerRole, Severity,
    UserId,
};
use infrastructure::InMemoryModerationRecordStore;
use proptest::prelude::*;

fn record(flagged: bool) -> ModerationRecord {
    ModerationRecord::new(
        ContentType::Comment,
        "c-1",
        UserId::new(),
        Severity::Severe,
        ActionKind::Block,
        flagged,
    )
}

fn terminal_status() -> impl Strategy<Value = ModerationStatus> {
    prop::sample::select(vec![
        ModerationStatus::Approved,
        ModerationStatus::Rejected,
        ModerationStatus::Flagged,
    ])
}

proptest! {
    #[test]
    fn pages_partition_the_pending_queue(count in 0usize..40, limit in 1u32..10) {
        tokio_test::block_on(async {
            let store = InMemoryModerationRecordStore::new();
            let mut ids = Vec::new();
            for i in 0..count {
                let r = record(i % 3 == 0);
                ids.push(r.id);
                store.put(&r).await.unwrap();
            }

            let mut seen = Vec::new();
            let mut offset = 0;
            loop {
                let page = store
                    .list_by_status(ModerationStatus::Pending, RecordFilter::new(), Page::new(limit, offset))
                    .await
                    .unwrap();
                if page.is_empty() {
                    break;
                }
                offset += limit;
                seen.extend(page.into_iter().map(|r| r.id));
            }

            prop_assert_eq!(seen, ids);
            Ok(())
        })?;
    }

    #[test]
    fn only_the_first_review_takes_effect(statuses in prop::collection::vec(terminal_status(), 1..8)) {
        tokio_test::block_on(async {
            let store = InMemoryModerationRecordStore::new();
            let r = record(true);
            store.put(&r).await.unwrap();

            let mut wins = 0;
            for status in &statuses {
                let update = ReviewUpdate {
                    status: *status,
                    reviewer: Reviewer::new(UserId::new(), ReviewerRole::Moderator),
                    notes: None,
                    reviewed_at: Utc::now(),
                };
                if store
                    .compare_and_set_status(&r.id, ModerationStatus::Pending, update)
                    .await
                    .unwrap()
                {
                    wins += 1;
                }
            }

            let stored = store.get_by_id(&r.id).await.unwrap().unwrap();
            prop_assert_eq!(wins, 1);
            prop_assert_eq!(stored.status, statuses[0]);
            Ok(())
        })?;
    }
}
