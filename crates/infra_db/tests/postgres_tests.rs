//! PostgreSQL adapter tests
//!
//! These start a PostgreSQL container and need a Docker daemon:
//! `cargo test -p infra_db -- --ignored`

use core_kernel::{CaseId, PortError};
use domain_cases::{
    CaseNote, CasePort, Communication, CommunicationChannel, Direction, Document,
    DocumentCategory, NoteKind, NotificationKind, Stakeholder, StakeholderRole,
};
use infra_db::PostgresCaseAdapter;
use test_utils::{
    assert_no_children, create_isolated_test_database, ProfileFixtures, TestCaseBuilder, TestPlanBuilder,
};

async fn adapter_with_manager() -> (test_utils::TestDatabase, PostgresCaseAdapter, domain_cases::Profile) {
    let db = create_isolated_test_database().await.expect("test database");
    let adapter = PostgresCaseAdapter::new(db.pool().clone());
    let manager = ProfileFixtures::case_manager();
    adapter.upsert_profile(&manager).await.unwrap();
    (db, adapter, manager)
}

// ============================================================================
// Cases
// ============================================================================

mod case_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_create_and_get_round_trip() {
        let (_db, adapter, manager) = adapter_with_manager().await;
        let case = TestCaseBuilder::new().with_case_manager(manager.id).build();

        adapter.create_case(&case).await.unwrap();
        let fetched = adapter.get_case(case.id).await.unwrap();

        assert_eq!(fetched.claim_number, case.claim_number);
        assert_eq!(fetched.worker.full_name(), case.worker.full_name());
        assert_eq!(fetched.injury.date, case.injury.date);
        assert_no_children(&fetched);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_duplicate_claim_number_is_conflict() {
        let (_db, adapter, manager) = adapter_with_manager().await;
        let first = TestCaseBuilder::new().with_claim_number("WC-DUP").with_case_manager(manager.id).build();
        let second = TestCaseBuilder::new().with_claim_number("WC-DUP").with_case_manager(manager.id).build();

        adapter.create_case(&first).await.unwrap();
        let err = adapter.create_case(&second).await.unwrap_err();
        assert!(matches!(err, PortError::Conflict { .. }));
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_missing_case_is_not_found() {
        let (_db, adapter, _manager) = adapter_with_manager().await;
        assert!(adapter.get_case(CaseId::new()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_plan_upsert_replaces_existing() {
        let (_db, adapter, manager) = adapter_with_manager().await;
        let case = TestCaseBuilder::new().with_case_manager(manager.id).build();
        adapter.create_case(&case).await.unwrap();

        adapter.save_rtw_plan(&TestPlanBuilder::draft_for(&case).build()).await.unwrap();
        let complete = TestPlanBuilder::complete_for(&case).build();
        adapter.save_rtw_plan(&complete).await.unwrap();

        let fetched = adapter.get_case(case.id).await.unwrap();
        assert_eq!(fetched.rtw_plan.unwrap().goal, complete.goal);
        assert_eq!(adapter.repository().child_count(*case.id.as_uuid()).await.unwrap(), 1);
    }
}

// ============================================================================
// Cascade deletion
// ============================================================================

mod deletion_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_delete_cascades_to_all_children() {
        let (_db, adapter, manager) = adapter_with_manager().await;
        let case = TestCaseBuilder::new().with_case_manager(manager.id).build();
        adapter.create_case(&case).await.unwrap();

        for i in 0..4 {
            let doc = Document::new(
                case.id,
                format!("report-{i}.pdf"),
                "application/pdf",
                2048,
                DocumentCategory::MedicalCertificate,
                manager.id,
            )
            .unwrap();
            adapter.add_document(&doc).await.unwrap();
        }
        adapter
            .add_communication(&Communication::new(
                case.id,
                CommunicationChannel::Phone,
                Direction::Inbound,
                "Worker",
                "Check-in",
                "Feeling better",
                manager.id,
            ))
            .await
            .unwrap();
        adapter
            .add_note(&CaseNote::new(case.id, NoteKind::General, manager.id, "Called employer"))
            .await
            .unwrap();
        adapter
            .add_stakeholder(&Stakeholder::new(case.id, StakeholderRole::TreatingDoctor, "Dr Chen"))
            .await
            .unwrap();
        adapter.save_rtw_plan(&TestPlanBuilder::complete_for(&case).build()).await.unwrap();

        let summary = adapter.delete_case(case.id).await.unwrap();

        assert_eq!(summary.documents, 4);
        assert_eq!(summary.total(), 8);
        assert_eq!(adapter.repository().child_count(*case.id.as_uuid()).await.unwrap(), 0);
        assert!(adapter.delete_case(case.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_notifications_survive_case_deletion() {
        let (_db, adapter, manager) = adapter_with_manager().await;
        let case = TestCaseBuilder::new().with_case_manager(manager.id).build();
        adapter.create_case(&case).await.unwrap();
        let notification = domain_cases::Notification::new(
            manager.id,
            Some(case.id),
            NotificationKind::CaseAssigned,
            "Assigned",
        );
        adapter.create_notification(&notification).await.unwrap();

        adapter.delete_case(case.id).await.unwrap();

        let remaining = adapter.list_notifications(manager.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].case_id, None);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_document_for_missing_case_is_not_found() {
        let (_db, adapter, manager) = adapter_with_manager().await;
        let doc = Document::new(
            CaseId::new(),
            "orphan.pdf",
            "application/pdf",
            1,
            DocumentCategory::Other,
            manager.id,
        )
        .unwrap();
        assert!(adapter.add_document(&doc).await.unwrap_err().is_not_found());
    }
}
