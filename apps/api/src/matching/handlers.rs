//! Axum route handlers for the Matching API.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::extract::RawDocument;
use crate::matching::pipeline::{MatchReport, MatchRequest};
use crate::state::AppState;

/// JSON body for pasted-text-only matching.
#[derive(Debug, Deserialize)]
pub struct TextMatchRequest {
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub resumes_text: String,
}

/// POST /api/v1/matches
///
/// Multipart form: `job_description`, optional `resumes_text`, and any number
/// of `resumes` file parts. Runs the full match pipeline.
pub async fn handle_find_matches(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MatchReport>, AppError> {
    let request = read_match_form(&state, &mut multipart).await?;
    let report = state.pipeline.run(request).await?;
    Ok(Json(report))
}

/// POST /api/v1/matches/text
///
/// Same pipeline for callers that only paste resume text.
pub async fn handle_find_matches_text(
    State(state): State<AppState>,
    Json(body): Json<TextMatchRequest>,
) -> Result<Json<MatchReport>, AppError> {
    let request = MatchRequest {
        job_description: body.job_description,
        documents: Vec::new(),
        pasted_text: body.resumes_text,
    };
    let report = state.pipeline.run(request).await?;
    Ok(Json(report))
}

async fn read_match_form(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<MatchRequest, AppError> {
    let mut request = MatchRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => request.job_description = field.text().await.map_err(malformed)?,
            "resumes_text" => request.pasted_text = field.text().await.map_err(malformed)?,
            "resumes" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(malformed)?;
                // browsers send an empty, unnamed part when no file was picked
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                let document = RawDocument::new(file_name, bytes);
                if !document
                    .extension()
                    .is_some_and(|ext| state.pipeline.extractors().supports(&ext))
                {
                    debug!("Upload '{}' has no extractor; it yields no text", document.name);
                }
                request.documents.push(document);
            }
            other => debug!("Ignoring unknown form field '{other}'"),
        }
    }

    Ok(request)
}

fn malformed(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed upload: {e}"))
}
