use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use digiskill_assessment::UserProfile;

use crate::api::{AppState, extract};
use crate::api::error::{ApiError, ApiResult};

pub async fn save(
    State(state): State<Arc<AppState>>,
    extract::Json(profile): extract::Json<UserProfile>,
) -> ApiResult<Json<Value>> {
    let user_id = state.store.save_profile(profile.clone())?;
    info!(user_id = %user_id, "profile saved");

    Ok(Json(json!({
        "message": "Profile saved successfully!",
        "user_id": user_id,
        "profile": profile,
    })))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let profile = state
        .store
        .profile(&user_id)?
        .ok_or_else(|| ApiError::NotFound("User profile not found".to_string()))?;

    Ok(Json(json!({ "user_id": user_id, "profile": profile })))
}
