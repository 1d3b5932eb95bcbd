//! API routes for the assistant server

pub mod ask;
pub mod jobmatch;
pub mod tabs;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Headroom above the file cap for multipart boundaries and the non-file
/// form fields, so an oversized file reaches the loader's own size check
/// instead of dying at the transport layer.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Question answering
        .route("/ask", post(ask::ask))
        // Upload variant with a body limit sized for files
        .route(
            "/ask/upload",
            post(upload::ask_upload)
                .layer(DefaultBodyLimit::max(max_upload_size + MULTIPART_OVERHEAD)),
        )
        // Job description vs candidate profile
        .route("/job-match", post(jobmatch::job_match))
        // Catalog
        .route("/tabs", get(tabs::list_tabs))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "askdesk",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Multi-tab assistant with document-grounded answers",
        "endpoints": {
            "POST /api/ask": "Answer a question over pasted notes",
            "POST /api/ask/upload": "Answer a question over an uploaded document",
            "POST /api/job-match": "Score a candidate profile against a job description",
            "GET /api/tabs": "List tabs, answer styles and the detail range",
        },
    }))
}
