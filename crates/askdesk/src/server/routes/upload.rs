//! Upload-and-ask endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::routes::ask;
use crate::server::state::AppState;
use crate::tabs::TabKind;
use crate::types::{AnswerStyle, AskRequest, AskResponse, NormalizedText, SourceDocument};

/// POST /api/ask/upload - Answer a question over an uploaded document.
///
/// Multipart form: a `file` part plus text parts mirroring the JSON
/// request (`question`, `tab`, `style`, `detail_level`, `provider`,
/// `model`).
pub async fn ask_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();

    let mut request = AskRequest::new("");
    let mut source: Option<NormalizedText> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::bad_request(format!("failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        if let Some(filename) = field.file_name().map(|s| s.to_string()) {
            let data = field
                .bytes()
                .await
                .map_err(|e| Error::bad_request(format!("failed to read upload: {}", e)))?;
            tracing::info!(filename = %filename, bytes = data.len(), "received upload");
            let document = SourceDocument::new(filename, data.to_vec());
            source = Some(state.loader().load(&document)?);
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| Error::bad_request(format!("failed to read field '{}': {}", name, e)))?;

        match name.as_str() {
            "question" => request.question = value,
            "tab" => request.tab = TabKind::from_name(&value)?,
            "style" => {
                request.style = AnswerStyle::from_name(&value).ok_or_else(|| {
                    Error::bad_request(format!("unknown answer style '{}'", value))
                })?;
            }
            "detail_level" => {
                request.detail_level = value.parse().map_err(|_| {
                    Error::bad_request(format!("detail_level must be a number, got '{}'", value))
                })?;
            }
            "provider" => request.provider = value,
            "model" => request.model = Some(value),
            other => {
                tracing::debug!(field = other, "ignoring unknown multipart field");
            }
        }
    }

    if source.is_none() {
        return Err(Error::bad_request("upload requires a file part"));
    }

    ask::answer(&state, &request, source, start).await
}
