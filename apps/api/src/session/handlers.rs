//! Axum route handlers for sessions, resumes, and evaluation.

use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::arms::Arm;
use crate::evaluation::evaluator::{evaluate, Evaluation};
use crate::evaluation::models::EvaluationResult;
use crate::evaluation::progression::{
    next_arm, progress, record_completion, summarize, ArmSummary, Progress,
};
use crate::evaluation::report::{render_report, report_file_name};
use crate::extraction::{extract_text, mime_from_file_name};
use crate::session::{ResumeId, ResumeRecord, SessionError, SessionState};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct LabelRequest {
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeView {
    pub id: ResumeId,
    pub label: String,
    pub file_name: String,
    pub text_chars: usize,
    pub progress: Progress,
    pub arm_scores: BTreeMap<Arm, f64>,
    pub arm_results: BTreeMap<Arm, EvaluationResult>,
}

impl From<&ResumeRecord> for ResumeView {
    fn from(resume: &ResumeRecord) -> Self {
        Self {
            id: resume.id,
            label: resume.label.clone(),
            file_name: resume.file_name.clone(),
            text_chars: resume.raw_text.trim().chars().count(),
            progress: progress(resume),
            arm_scores: resume.arm_scores.clone(),
            arm_results: resume.arm_results.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub active_resume_id: ResumeId,
    pub resume_counter: u32,
    pub job_description: String,
    pub resumes: Vec<ResumeView>,
}

impl SessionView {
    fn new(session_id: Uuid, session: &SessionState) -> Self {
        Self {
            session_id,
            active_resume_id: session.active_resume_id(),
            resume_counter: session.resume_counter(),
            job_description: session.job_description().to_string(),
            resumes: session.resumes().map(ResumeView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RemoveResumeResponse {
    pub removed: bool,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub resume_id: ResumeId,
    pub evaluation: Evaluation,
    pub progress: Progress,
}

// ────────────────────────────────────────────────────────────────────────────
// Session lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let session_id = state.sessions.create().await;
    let view = state
        .sessions
        .with(session_id, |s| SessionView::new(session_id, s))
        .await?;
    info!("Created session {session_id}");
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/sessions/:sid
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with(session_id, |s| SessionView::new(session_id, s))
        .await?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:sid
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(session_id).await {
        return Err(SessionError::SessionNotFound(session_id).into());
    }
    info!("Ended session {session_id}");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:sid/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<TextRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with(session_id, |s| {
            s.set_job_description(request.text);
            SessionView::new(session_id, s)
        })
        .await?;
    Ok(Json(view))
}

// ────────────────────────────────────────────────────────────────────────────
// Resumes
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:sid/resumes
///
/// Adds an empty resume and makes it active.
pub async fn handle_add_resume(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ResumeView>), AppError> {
    let view = state
        .sessions
        .with(session_id, |s| {
            let id = s.add_resume();
            s.resume(id).map(ResumeView::from)
        })
        .await??;
    info!("Added resume {} to session {session_id}", view.id);
    Ok((StatusCode::CREATED, Json(view)))
}

/// DELETE /api/v1/sessions/:sid/resumes/:rid
///
/// Silently keeps the first resume and the last remaining one.
pub async fn handle_remove_resume(
    State(state): State<AppState>,
    Path((session_id, resume_id)): Path<(Uuid, ResumeId)>,
) -> Result<Json<RemoveResumeResponse>, AppError> {
    let response = state
        .sessions
        .with(session_id, |s| RemoveResumeResponse {
            removed: s.remove_resume(resume_id),
            session: SessionView::new(session_id, s),
        })
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/sessions/:sid/resumes/:rid/select
pub async fn handle_select_resume(
    State(state): State<AppState>,
    Path((session_id, resume_id)): Path<(Uuid, ResumeId)>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with(session_id, |s| {
            s.select_active(resume_id)
                .map(|_| SessionView::new(session_id, s))
        })
        .await??;
    Ok(Json(view))
}

/// PUT /api/v1/sessions/:sid/resumes/:rid/text
pub async fn handle_set_text(
    State(state): State<AppState>,
    Path((session_id, resume_id)): Path<(Uuid, ResumeId)>,
    Json(request): Json<TextRequest>,
) -> Result<Json<ResumeView>, AppError> {
    let view = state
        .sessions
        .with(session_id, |s| {
            s.set_text(resume_id, request.text)?;
            s.resume(resume_id).map(ResumeView::from)
        })
        .await??;
    Ok(Json(view))
}

/// PUT /api/v1/sessions/:sid/resumes/:rid/label
pub async fn handle_set_label(
    State(state): State<AppState>,
    Path((session_id, resume_id)): Path<(Uuid, ResumeId)>,
    Json(request): Json<LabelRequest>,
) -> Result<Json<ResumeView>, AppError> {
    let label = request.label.trim().to_string();
    if label.is_empty() {
        return Err(AppError::Validation("label cannot be empty".to_string()));
    }
    let view = state
        .sessions
        .with(session_id, |s| {
            s.set_label(resume_id, label)?;
            s.resume(resume_id).map(ResumeView::from)
        })
        .await??;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:sid/resumes/:rid/upload
///
/// Multipart field `file`: a PDF or DOCX resume. The extracted text replaces the
/// resume's text. A failed extraction leaves the session untouched.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path((session_id, resume_id)): Path<(Uuid, ResumeId)>,
    mut multipart: Multipart,
) -> Result<Json<ResumeView>, AppError> {
    let mut upload: Option<(String, Option<String>, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some((file_name, content_type, bytes));
        break;
    }

    let (file_name, content_type, bytes) =
        upload.ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;

    let mime = match content_type.as_deref() {
        None | Some("application/octet-stream") => mime_from_file_name(&file_name)
            .map(str::to_string)
            .unwrap_or_else(|| content_type.clone().unwrap_or_default()),
        Some(mime) => mime.to_string(),
    };

    let text = tokio::task::spawn_blocking(move || extract_text(&bytes, &mime))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Extraction task failed: {e}")))??;

    info!(
        "Extracted {} characters from {file_name} for resume {resume_id}",
        text.chars().count()
    );

    let view = state
        .sessions
        .with(session_id, |s| {
            s.set_document(resume_id, file_name, text)?;
            s.resume(resume_id).map(ResumeView::from)
        })
        .await??;
    Ok(Json(view))
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluation
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:sid/analyze
///
/// Runs the active resume's next arm. Model failures still succeed with a fallback
/// result and a warning; only too-short inputs are rejected.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let (resume_id, arm, resume_text, job_description) = state
        .sessions
        .with(session_id, |s| {
            let resume = s.active();
            (
                resume.id,
                next_arm(&resume.completed_arms),
                resume.raw_text.clone(),
                s.job_description().to_string(),
            )
        })
        .await?;

    // The store lock is released for the duration of the model call.
    let evaluation = evaluate(
        state.model.as_ref(),
        state.validation_mode,
        arm,
        &resume_text,
        &job_description,
    )
    .await?;

    let result = evaluation.result.clone();
    let progress = state
        .sessions
        .with(session_id, |s| {
            let resume = s.resume_mut(resume_id)?;
            record_completion(resume, arm, result);
            Ok::<_, SessionError>(progress(resume))
        })
        .await??;

    info!(
        "Resume {resume_id} completed {arm}: fit_score={:.2}, fallback={}",
        evaluation.result.fit_score(),
        evaluation.is_fallback()
    );

    Ok(Json(AnalyzeResponse {
        resume_id,
        evaluation,
        progress,
    }))
}

/// GET /api/v1/sessions/:sid/resumes/:rid/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Path((session_id, resume_id)): Path<(Uuid, ResumeId)>,
) -> Result<Json<ArmSummary>, AppError> {
    let summary = state
        .sessions
        .with(session_id, |s| {
            let resume = s.resume(resume_id)?;
            summarize(resume).ok_or(SessionError::NotFullyEvaluated(resume_id))
        })
        .await??;
    Ok(Json(summary))
}

/// GET /api/v1/sessions/:sid/resumes/:rid/report
///
/// Downloads the self-contained HTML evaluation summary.
pub async fn handle_report(
    State(state): State<AppState>,
    Path((session_id, resume_id)): Path<(Uuid, ResumeId)>,
) -> Result<impl IntoResponse, AppError> {
    let (file_name, html) = state
        .sessions
        .with(session_id, |s| {
            let resume = s.resume(resume_id)?;
            render_report(resume, chrono::Utc::now()).map(|html| (report_file_name(resume), html))
        })
        .await??;

    let headers = [
        (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];
    Ok((headers, html))
}
