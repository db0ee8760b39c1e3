pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:sid",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:sid/job-description",
            put(handlers::handle_set_job_description),
        )
        .route("/api/v1/sessions/:sid/analyze", post(handlers::handle_analyze))
        // Resumes
        .route("/api/v1/sessions/:sid/resumes", post(handlers::handle_add_resume))
        .route(
            "/api/v1/sessions/:sid/resumes/:rid",
            axum::routing::delete(handlers::handle_remove_resume),
        )
        .route(
            "/api/v1/sessions/:sid/resumes/:rid/select",
            post(handlers::handle_select_resume),
        )
        .route(
            "/api/v1/sessions/:sid/resumes/:rid/text",
            put(handlers::handle_set_text),
        )
        .route(
            "/api/v1/sessions/:sid/resumes/:rid/label",
            put(handlers::handle_set_label),
        )
        .route(
            "/api/v1/sessions/:sid/resumes/:rid/upload",
            post(handlers::handle_upload),
        )
        // Results
        .route(
            "/api/v1/sessions/:sid/resumes/:rid/summary",
            get(handlers::handle_summary),
        )
        .route(
            "/api/v1/sessions/:sid/resumes/:rid/report",
            get(handlers::handle_report),
        )
        .with_state(state)
}
