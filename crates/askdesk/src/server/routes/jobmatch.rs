//! Job description vs candidate profile endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::tabs::{self, TabKind};
use crate::types::{AskResponse, JobMatchRequest};

/// POST /api/job-match - Score a candidate profile against a job
/// description. The whole body is rendered up front, so only the hard
/// limit applies; no chunking is involved.
pub async fn job_match(
    State(state): State<AppState>,
    Json(request): Json<JobMatchRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();

    if request.job_description.trim().is_empty() || request.candidate_profile.trim().is_empty() {
        return Err(Error::bad_request(
            "job_description and candidate_profile are both required",
        ));
    }

    let provider_config = state
        .config()
        .providers
        .get(&request.provider)
        .ok_or_else(|| Error::UnknownProvider {
            name: request.provider.clone(),
            registered: state.dispatcher().provider_names().join(", "),
        })?;

    let body = tabs::render_job_match(&request.job_description, &request.candidate_profile);
    let prompt = state.assembler().assemble_direct(
        TabKind::JobMatch.system_prompt(),
        body,
        &request.provider,
        provider_config.hard_limit(),
    )?;

    let outcome = state
        .dispatcher()
        .dispatch(&request.provider, request.model.as_deref(), &prompt)
        .await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        provider = %request.provider,
        attempts = outcome.attempts,
        elapsed_ms = processing_time_ms,
        "job match completed"
    );

    Ok(Json(AskResponse::new(
        outcome.response,
        outcome.attempts,
        0,
        0,
        processing_time_ms,
    )))
}
