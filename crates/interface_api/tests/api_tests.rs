//! HTTP API tests against the in-memory case adapter

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use domain_assist::{AssistError, AssistService, ChatMessage, CompletionClient, SettingsStore};
use domain_cases::{Case, CasePort, InMemoryCaseAdapter, Profile};
use interface_api::auth::create_token;
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState};
use test_utils::{CompletionFixtures, DateFixtures, ProfileFixtures, TestCaseBuilder, TestPlanBuilder};

const SECRET: &str = "api-test-secret";

/// Answers plan prompts with the plan fixture and everything else with the
/// insights fixture
struct FixtureClient;

#[async_trait]
impl CompletionClient for FixtureClient {
    async fn complete(&self, messages: &[ChatMessage], _model: &str) -> Result<String, AssistError> {
        let prompt = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
        if prompt.contains("Suitable duties") {
            Ok(CompletionFixtures::plan_response().to_string())
        } else {
            Ok(CompletionFixtures::insights_response().to_string())
        }
    }

    async fn check_connection(&self) -> Result<(), AssistError> {
        Ok(())
    }
}

struct Harness {
    server: TestServer,
    adapter: Arc<InMemoryCaseAdapter>,
    manager: Profile,
    admin: Profile,
}

impl Harness {
    async fn new(assist: AssistService) -> Self {
        let adapter = Arc::new(InMemoryCaseAdapter::new());
        let manager = ProfileFixtures::case_manager();
        let admin = ProfileFixtures::admin();
        adapter.upsert_profile(&manager).await.unwrap();
        adapter.upsert_profile(&admin).await.unwrap();

        let config = ApiConfig {
            jwt_secret: SECRET.to_string(),
            ..ApiConfig::default()
        };
        let state = AppState::new(adapter.clone(), Arc::new(assist), config);
        let server = TestServer::new(create_router(state)).unwrap();

        Self { server, adapter, manager, admin }
    }

    async fn without_ai() -> Self {
        Self::new(AssistService::disabled(Arc::new(SettingsStore::in_memory("gpt-4o-mini")))).await
    }

    async fn with_ai() -> Self {
        let settings = Arc::new(SettingsStore::in_memory("gpt-4o-mini"));
        Self::new(AssistService::with_client(Arc::new(FixtureClient), settings)).await
    }

    /// Seeds a case directly through the port
    async fn seed_case(&self) -> Case {
        let case = TestCaseBuilder::new().with_case_manager(self.manager.id).build();
        self.adapter.create_case(&case).await.unwrap()
    }
}

fn token(profile: &Profile) -> String {
    create_token(profile.id, vec![profile.role.as_str().to_string()], SECRET, 3600).unwrap()
}

fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

fn create_case_body(claim_number: &str) -> Value {
    json!({
        "claim_number": claim_number,
        "worker": { "first_name": "Sam", "last_name": "Okafor", "occupation": "Storeperson" },
        "employer": { "name": "Northside Logistics" },
        "injury": { "date": "2024-03-04", "description": "Lower back strain", "body_part": "Lumbar spine" }
    })
}

// ============================================================================
// Authentication
// ============================================================================

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_is_public() {
        let h = Harness::without_ai().await;
        let response = h.server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_readiness_reports_storage() {
        let h = Harness::without_ai().await;
        let response = h.server.get("/health/ready").await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["status"], "ready");
        assert_eq!(body["ai"], "not_configured");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let h = Harness::without_ai().await;
        let response = h.server.get("/api/v1/cases").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["error"], "unauthorized");
    }

    #[tokio::test]
    async fn test_token_without_profile_is_forbidden() {
        let h = Harness::without_ai().await;
        let stranger = ProfileFixtures::supervisor();

        let response = h
            .server
            .get("/api/v1/cases")
            .authorization_bearer(token(&stranger))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        let me = h.server.get("/api/v1/me").authorization_bearer(token(&stranger)).await;
        me.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_me_returns_profile() {
        let h = Harness::without_ai().await;
        let response = h.server.get("/api/v1/me").authorization_bearer(token(&h.manager)).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["role"], "case_manager");
    }

    #[tokio::test]
    async fn test_new_user_provisions_own_profile() {
        let h = Harness::without_ai().await;
        let bearer = token(&ProfileFixtures::supervisor());

        let response = h
            .server
            .put("/api/v1/me")
            .authorization_bearer(&bearer)
            .json(&json!({ "full_name": "Priya Nair", "email": "priya.nair@example.com" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["role"], "case_manager");

        h.server
            .get("/api/v1/cases")
            .authorization_bearer(&bearer)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_provision_rejects_bad_email() {
        let h = Harness::without_ai().await;
        let response = h
            .server
            .put("/api/v1/me")
            .authorization_bearer(token(&ProfileFixtures::supervisor()))
            .json(&json!({ "full_name": "Priya Nair", "email": "priya" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_only_admin_changes_roles() {
        let h = Harness::without_ai().await;
        let path = format!("/api/v1/profiles/{}/role", h.manager.id.as_uuid());

        let denied = h
            .server
            .put(&path)
            .authorization_bearer(token(&h.manager))
            .json(&json!({ "role": "supervisor" }))
            .await;
        denied.assert_status(StatusCode::FORBIDDEN);

        let granted = h
            .server
            .put(&path)
            .authorization_bearer(token(&h.admin))
            .json(&json!({ "role": "supervisor" }))
            .await;
        granted.assert_status_ok();
        assert_eq!(granted.json::<Value>()["role"], "supervisor");

        let me = h.server.get("/api/v1/me").authorization_bearer(token(&h.manager)).await;
        assert_eq!(me.json::<Value>()["role"], "supervisor");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let h = Harness::without_ai().await;
        let response = h
            .server
            .get("/health")
            .add_header(
                axum::http::header::ORIGIN,
                axum::http::HeaderValue::from_static("https://rtw.example.com"),
            )
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}

// ============================================================================
// Cases
// ============================================================================

mod case_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_list_and_get() {
        let h = Harness::without_ai().await;
        let bearer = token(&h.manager);

        let created = h
            .server
            .post("/api/v1/cases")
            .authorization_bearer(&bearer)
            .json(&create_case_body("WC-7001"))
            .await;
        created.assert_status(StatusCode::CREATED);
        let case = created.json::<Value>();
        assert_eq!(case["status"], "new");
        assert_eq!(case["case_manager_id"], json!(h.manager.id));

        let list = h.server.get("/api/v1/cases").authorization_bearer(&bearer).await;
        list.assert_status_ok();
        let body = list.json::<Value>();
        assert_eq!(body["stale"], false);
        assert_eq!(body["cases"][0]["claim_number"], "WC-7001");
        assert_eq!(body["cases"][0]["worker_name"], "Sam Okafor");

        let id = case["id"].as_str().unwrap();
        let detail = h.server.get(&format!("/api/v1/cases/{id}")).authorization_bearer(&bearer).await;
        detail.assert_status_ok();
        assert_eq!(detail.json::<Value>()["employer"]["name"], "Northside Logistics");
    }

    #[tokio::test]
    async fn test_create_validates_nested_fields() {
        let h = Harness::without_ai().await;
        let mut body = create_case_body("WC-7002");
        body["worker"]["first_name"] = json!("");
        body["employer"]["email"] = json!("not-an-email");

        let response = h
            .server
            .post("/api/v1/cases")
            .authorization_bearer(token(&h.manager))
            .json(&body)
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let details = response.json::<Value>()["details"].clone();
        let details: Vec<String> = serde_json::from_value(details).unwrap();
        assert!(details.iter().any(|d| d.starts_with("worker.first_name")));
        assert!(details.iter().any(|d| d.starts_with("employer.email")));
    }

    #[tokio::test]
    async fn test_duplicate_claim_number_conflicts() {
        let h = Harness::without_ai().await;
        let bearer = token(&h.manager);
        h.server
            .post("/api/v1/cases")
            .authorization_bearer(&bearer)
            .json(&create_case_body("WC-7003"))
            .await
            .assert_status(StatusCode::CREATED);

        let again = h
            .server
            .post("/api/v1/cases")
            .authorization_bearer(&bearer)
            .json(&create_case_body("WC-7003"))
            .await;
        again.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_invalid_status_transition_conflicts() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;
        let url = format!("/api/v1/cases/{}/status", case.id.as_uuid());

        let response = h
            .server
            .put(&url)
            .authorization_bearer(token(&h.manager))
            .json(&json!({ "status": "returned_to_work" }))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let response = h
            .server
            .put(&url)
            .authorization_bearer(token(&h.manager))
            .json(&json!({ "status": "active" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "active");
    }

    #[tokio::test]
    async fn test_update_rejects_future_injury_date() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;

        let response = h
            .server
            .put(&format!("/api/v1/cases/{}", case.id.as_uuid()))
            .authorization_bearer(token(&h.manager))
            .json(&json!({ "injury": { "date": "2999-01-01", "description": "Strain" } }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_case_manager_cannot_delete() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;

        let response = h
            .server
            .delete(&format!("/api/v1/cases/{}", case.id.as_uuid()))
            .authorization_bearer(token(&h.manager))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_delete_cascades_children() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;
        let base = format!("/api/v1/cases/{}", case.id.as_uuid());
        let bearer = token(&h.manager);

        h.server
            .post(&format!("{base}/documents"))
            .authorization_bearer(&bearer)
            .json(&json!({
                "file_name": "certificate.pdf",
                "content_type": "application/pdf",
                "size_bytes": 2048,
                "category": "medical_certificate"
            }))
            .await
            .assert_status(StatusCode::CREATED);
        h.server
            .post(&format!("{base}/notes"))
            .authorization_bearer(&bearer)
            .json(&json!({ "body": "Spoke with worker" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = h.server.delete(&base).authorization_bearer(token(&h.admin)).await;
        response.assert_status_ok();
        let summary = response.json::<Value>();
        assert_eq!(summary["documents"], 1);
        assert_eq!(summary["notes"], 1);
        assert_eq!(h.adapter.child_record_count(case.id).await, 0);

        let gone = h.server.get(&base).authorization_bearer(&bearer).await;
        gone.assert_status(StatusCode::NOT_FOUND);
    }
}

// ============================================================================
// Child records
// ============================================================================

mod record_tests {
    use super::*;

    #[tokio::test]
    async fn test_documents_listed_after_upload() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;
        let url = format!("/api/v1/cases/{}/documents", case.id.as_uuid());
        let bearer = token(&h.manager);

        h.server
            .post(&url)
            .authorization_bearer(&bearer)
            .json(&json!({
                "file_name": "wage records.xlsx",
                "content_type": "application/vnd.ms-excel",
                "size_bytes": 10,
                "category": "wage_records"
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let docs = h.server.get(&url).authorization_bearer(&bearer).await.json::<Value>();
        assert_eq!(docs.as_array().unwrap().len(), 1);
        assert_eq!(docs[0]["file_name"], "wage records.xlsx");
    }

    #[tokio::test]
    async fn test_document_for_unknown_case_is_not_found() {
        let h = Harness::without_ai().await;
        let response = h
            .server
            .post(&format!("/api/v1/cases/{}/documents", uuid::Uuid::new_v4()))
            .authorization_bearer(token(&h.manager))
            .json(&json!({
                "file_name": "cert.pdf",
                "content_type": "application/pdf",
                "size_bytes": 1,
                "category": "medical_certificate"
            }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_case_manager_cannot_write_supervisor_note() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;
        let url = format!("/api/v1/cases/{}/notes", case.id.as_uuid());
        let note = json!({ "kind": "supervisor", "body": "Escalate" });

        h.server
            .post(&url)
            .authorization_bearer(token(&h.manager))
            .json(&note)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        h.server
            .post(&url)
            .authorization_bearer(token(&h.admin))
            .json(&note)
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_add_and_remove_stakeholder() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;
        let base = format!("/api/v1/cases/{}/stakeholders", case.id.as_uuid());
        let bearer = token(&h.manager);

        let added = h
            .server
            .post(&base)
            .authorization_bearer(&bearer)
            .json(&json!({ "role": "treating_doctor", "name": "Dr Ana Silva" }))
            .await;
        added.assert_status(StatusCode::CREATED);
        let sid = added.json::<Value>()["id"].as_str().unwrap().to_string();

        h.server
            .delete(&format!("{base}/{sid}"))
            .authorization_bearer(&bearer)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        assert_eq!(h.adapter.child_record_count(case.id).await, 0);
    }

    #[tokio::test]
    async fn test_communication_logged() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;

        let response = h
            .server
            .post(&format!("/api/v1/cases/{}/communications", case.id.as_uuid()))
            .authorization_bearer(token(&h.manager))
            .json(&json!({
                "channel": "phone",
                "direction": "outbound",
                "contact": "Sam Okafor",
                "subject": "Week 2 check-in",
                "summary": "Managing four hour shifts"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Value>()["channel"], "phone");
    }
}

// ============================================================================
// RTW plans and compensation
// ============================================================================

mod plan_tests {
    use super::*;

    #[tokio::test]
    async fn test_print_blocked_until_plan_complete() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;
        let base = format!("/api/v1/cases/{}/rtw-plan", case.id.as_uuid());
        let bearer = token(&h.manager);

        h.server
            .put(&base)
            .authorization_bearer(&bearer)
            .json(&json!({ "goal": "Return to full duties", "base_daily_hours": "6" }))
            .await
            .assert_status_ok();

        let validation = h
            .server
            .get(&format!("{base}/validation"))
            .authorization_bearer(&bearer)
            .await
            .json::<Value>();
        assert_eq!(validation["complete"], false);
        assert!(validation["missing"].as_array().unwrap().contains(&json!("treating_practitioner")));

        let print = h.server.get(&format!("{base}/print")).authorization_bearer(&bearer).await;
        print.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(print.json::<Value>()["details"].as_array().unwrap().contains(&json!("start_date")));
    }

    #[tokio::test]
    async fn test_complete_plan_prints_as_text() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;
        let plan = TestPlanBuilder::complete_for(&case).build();
        h.adapter.save_rtw_plan(&plan).await.unwrap();

        let response = h
            .server
            .get(&format!("/api/v1/cases/{}/rtw-plan/print", case.id.as_uuid()))
            .authorization_bearer(token(&h.manager))
            .await;
        response.assert_status_ok();
        assert!(response.text().contains(&case.claim_number));
        assert!(response.text().contains("Maximum lift 5kg"));
    }

    #[tokio::test]
    async fn test_plan_hours_out_of_range_rejected() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;

        let response = h
            .server
            .put(&format!("/api/v1/cases/{}/rtw-plan", case.id.as_uuid()))
            .authorization_bearer(token(&h.manager))
            .json(&json!({ "base_daily_hours": "30" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_review_date_checked_against_saved_start_date() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;
        let base = format!("/api/v1/cases/{}/rtw-plan", case.id.as_uuid());
        let bearer = token(&h.manager);

        h.server
            .put(&base)
            .authorization_bearer(&bearer)
            .json(&json!({ "start_date": "2024-04-08" }))
            .await
            .assert_status_ok();

        let response = h
            .server
            .put(&base)
            .authorization_bearer(&bearer)
            .json(&json!({ "review_date": "2024-04-01" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let stored = h.adapter.get_case(case.id).await.unwrap().rtw_plan.unwrap();
        assert_eq!(stored.review_date, None);
    }

    #[tokio::test]
    async fn test_compensation_calculates_piawe() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;

        let response = h
            .server
            .put(&format!("/api/v1/cases/{}/compensation", case.id.as_uuid()))
            .authorization_bearer(token(&h.manager))
            .json(&json!({ "weekly_earnings": ["1000", "1200", "1100"] }))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(decimal(&body["piawe"]), dec!(1100));
        assert!(body["weekly_entitlement"].is_string());
    }

    #[tokio::test]
    async fn test_entitlement_steps_down_after_thirteen_weeks() {
        let h = Harness::without_ai().await;
        let case = TestCaseBuilder::new()
            .with_case_manager(h.manager.id)
            .with_injury_date(DateFixtures::older_injury())
            .build();
        h.adapter.create_case(&case).await.unwrap();

        let response = h
            .server
            .put(&format!("/api/v1/cases/{}/compensation", case.id.as_uuid()))
            .authorization_bearer(token(&h.manager))
            .json(&json!({ "weekly_earnings": ["1000", "1200", "1100"] }))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["weeks_since_injury"], 21);
        assert_eq!(decimal(&body["weekly_entitlement"]), dec!(880));
    }

    #[tokio::test]
    async fn test_negative_earnings_rejected() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;

        let response = h
            .server
            .put(&format!("/api/v1/cases/{}/compensation", case.id.as_uuid()))
            .authorization_bearer(token(&h.manager))
            .json(&json!({ "weekly_earnings": ["1000", "-5"] }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

// ============================================================================
// AI assistance and settings
// ============================================================================

mod assist_tests {
    use super::*;

    #[tokio::test]
    async fn test_ai_disabled_without_key() {
        let h = Harness::without_ai().await;
        let case = h.seed_case().await;

        let response = h
            .server
            .post(&format!("/api/v1/cases/{}/assist/plan", case.id.as_uuid()))
            .authorization_bearer(token(&h.manager))
            .await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.json::<Value>()["message"].as_str().unwrap().contains("RTW_AI_API_KEY"));
    }

    #[tokio::test]
    async fn test_suggest_plan_without_apply_leaves_case_untouched() {
        let h = Harness::with_ai().await;
        let case = h.seed_case().await;

        let response = h
            .server
            .post(&format!("/api/v1/cases/{}/assist/plan", case.id.as_uuid()))
            .authorization_bearer(token(&h.manager))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(decimal(&body["suggestion"]["base_daily_hours"]), dec!(6));
        assert!(body.get("plan").is_none());
        assert!(h.adapter.get_case(case.id).await.unwrap().rtw_plan.is_none());
    }

    #[tokio::test]
    async fn test_suggest_plan_with_apply_writes_plan() {
        let h = Harness::with_ai().await;
        let case = h.seed_case().await;

        let response = h
            .server
            .post(&format!("/api/v1/cases/{}/assist/plan", case.id.as_uuid()))
            .add_query_param("apply", "true")
            .authorization_bearer(token(&h.manager))
            .await;
        response.assert_status_ok();

        let stored = h.adapter.get_case(case.id).await.unwrap().rtw_plan.unwrap();
        assert_eq!(stored.restrictions.len(), 2);
        assert_eq!(stored.schedule.week_total(4), dec!(30));
    }

    #[tokio::test]
    async fn test_insights_and_chat() {
        let h = Harness::with_ai().await;
        let case = h.seed_case().await;
        let base = format!("/api/v1/cases/{}/assist", case.id.as_uuid());
        let bearer = token(&h.manager);

        let insights = h
            .server
            .post(&format!("{base}/insights"))
            .authorization_bearer(&bearer)
            .await
            .json::<Value>();
        assert_eq!(insights["key_points"].as_array().unwrap().len(), 2);

        let chat = h
            .server
            .post(&format!("{base}/chat"))
            .authorization_bearer(&bearer)
            .json(&json!({
                "message": "What should the next review cover?",
                "history": [{ "role": "user", "content": "Hi" }, { "role": "assistant", "content": "Hello" }]
            }))
            .await;
        chat.assert_status_ok();
        assert_eq!(chat.json::<Value>()["model"], "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_select_model() {
        let h = Harness::with_ai().await;
        let bearer = token(&h.manager);

        let status = h.server.get("/api/v1/settings/ai").authorization_bearer(&bearer).await.json::<Value>();
        assert_eq!(status["configured"], true);
        assert_eq!(status["model"], "gpt-4o-mini");

        let updated = h
            .server
            .put("/api/v1/settings/ai/model")
            .authorization_bearer(&bearer)
            .json(&json!({ "model": "gpt-4o" }))
            .await;
        updated.assert_status_ok();
        assert_eq!(updated.json::<Value>()["model"], "gpt-4o");

        let unknown = h
            .server
            .put("/api/v1/settings/ai/model")
            .authorization_bearer(&bearer)
            .json(&json!({ "model": "gpt-9" }))
            .await;
        unknown.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

// ============================================================================
// Notifications
// ============================================================================

mod notification_tests {
    use super::*;

    #[tokio::test]
    async fn test_new_case_notifies_and_can_be_marked_read() {
        let h = Harness::without_ai().await;
        let bearer = token(&h.manager);
        h.server
            .post("/api/v1/cases")
            .authorization_bearer(&bearer)
            .json(&create_case_body("WC-7100"))
            .await
            .assert_status(StatusCode::CREATED);

        let list = h
            .server
            .get("/api/v1/me/notifications")
            .authorization_bearer(&bearer)
            .await
            .json::<Value>();
        assert_eq!(list.as_array().unwrap().len(), 1);
        let nid = list[0]["id"].as_str().unwrap().to_string();

        h.server
            .post(&format!("/api/v1/me/notifications/{nid}/read"))
            .authorization_bearer(&bearer)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let after = h
            .server
            .get("/api/v1/me/notifications")
            .authorization_bearer(&bearer)
            .await
            .json::<Value>();
        assert!(!after[0]["read_at"].is_null());
    }
}
