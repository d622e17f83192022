//! HTTP API Layer
//!
//! This crate provides the REST API for RTW case management using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for cases, their records, RTW plans and AI assistance
//! - **Middleware**: Authentication, request ids, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(case_port, assist, config);
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put, delete},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use domain_assist::AssistService;
use domain_cases::{CasePort, CaseStore, ProfileStore};

use crate::config::ApiConfig;
use crate::middleware::{auth_middleware, audit_middleware};
use crate::handlers::{assist, cases, health, plans, records, users};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub cases: Arc<CaseStore>,
    pub profiles: Arc<ProfileStore>,
    pub assist: Arc<AssistService>,
    pub config: ApiConfig,
}

impl AppState {
    /// Builds both stores over the same case port
    pub fn new(port: Arc<dyn CasePort>, assist: Arc<AssistService>, config: ApiConfig) -> Self {
        Self {
            cases: Arc::new(CaseStore::new(port.clone())),
            profiles: Arc::new(ProfileStore::new(port)),
            assist,
            config,
        }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Stores, AI service and configuration shared by every handler
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Case routes
    let case_routes = Router::new()
        .route("/", get(cases::list_cases).post(cases::create_case))
        .route("/:id", get(cases::get_case).put(cases::update_case).delete(cases::delete_case))
        .route("/:id/status", put(cases::update_status))
        .route("/:id/case-manager", put(cases::assign_case_manager))
        .route("/:id/documents", get(records::list_documents).post(records::add_document))
        .route("/:id/communications", post(records::add_communication))
        .route("/:id/notes", post(records::add_note))
        .route("/:id/stakeholders", post(records::add_stakeholder))
        .route("/:id/stakeholders/:sid", delete(records::remove_stakeholder))
        .route("/:id/rtw-plan", put(plans::save_plan))
        .route("/:id/rtw-plan/validation", get(plans::validate_plan))
        .route("/:id/rtw-plan/print", get(plans::print_plan))
        .route("/:id/compensation", put(plans::set_compensation))
        .route("/:id/assist/plan", post(assist::suggest_plan))
        .route("/:id/assist/insights", post(assist::generate_insights))
        .route("/:id/assist/chat", post(assist::chat));

    // Settings routes
    let settings_routes = Router::new()
        .route("/ai", get(assist::ai_settings))
        .route("/ai/model", put(assist::select_model));

    // Current user routes
    let me_routes = Router::new()
        .route("/", get(users::me).put(users::provision_me))
        .route("/notifications", get(users::notifications))
        .route("/notifications/:nid/read", post(users::mark_notification_read));

    // Profile administration
    let profile_routes = Router::new()
        .route("/:id/role", put(users::set_role));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/cases", case_routes)
        .nest("/settings", settings_routes)
        .nest("/me", me_routes)
        .nest("/profiles", profile_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            // Outermost first: the id is set before anything else sees the request
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
