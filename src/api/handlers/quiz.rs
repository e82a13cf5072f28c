use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use digiskill_assessment::{Language, QuizResult, QuizSubmission, localized, question_bank, score_submission};

use crate::api::{AppState, extract};
use crate::api::error::{ApiError, ApiResult};

/// The full bilingual bank, answer key included
pub async fn questions() -> Json<Value> {
    let questions = question_bank();
    Json(json!({ "questions": questions, "total": questions.len() }))
}

pub async fn questions_by_language(Path(language): Path<String>) -> ApiResult<Json<Value>> {
    let language: Language = language.parse()?;
    let questions = localized(language);

    Ok(Json(json!({ "questions": questions, "total": questions.len() })))
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    extract::Json(submission): extract::Json<QuizSubmission>,
) -> ApiResult<Json<Value>> {
    if !state.store.has_profile(&submission.user_id)? {
        return Err(ApiError::NotFound("User profile not found".to_string()));
    }

    let result = score_submission(&submission)?;
    let summary = result.summary.clone();
    state.store.record_result(&submission.user_id, result)?;

    info!(
        user_id = %submission.user_id,
        score = summary.score,
        total = summary.total,
        "quiz submitted"
    );

    Ok(Json(json!({
        "user_id": submission.user_id,
        "score": summary.score,
        "total": summary.total,
        "percentage": summary.percentage,
        "skill_analysis": summary.skill_analysis,
        "difficulty_analysis": summary.difficulty_analysis,
        "time_taken": summary.time_taken,
    })))
}

pub async fn results(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<QuizResult>> {
    state
        .store
        .result(&user_id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Quiz results not found".to_string()))
}
