// handlers/protected/profile.rs - /api/profile and /api/profile/photo

use axum::extract::{Extension, Json, State};
use serde::Deserialize;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::reconcile::{DeleteReport, ProfileReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PhotoRequest {
    /// Data URI, fetchable URL or an already hosted URL
    pub photo: String,
}

/// PUT /api/profile/photo
pub async fn photo_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<PhotoRequest>,
) -> ApiResult<ProfileReport> {
    let report = state.reconciler.replace_profile_photo(user.user_id, &body.photo).await?;
    Ok(ApiResponse::success(report))
}

/// DELETE /api/profile/photo
pub async fn photo_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<ProfileReport> {
    let report = state.reconciler.remove_profile_photo(user.user_id).await?;
    Ok(ApiResponse::success(report))
}

/// DELETE /api/profile - removes the account, its posts and every hosted image they used
pub async fn account_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<DeleteReport> {
    tracing::info!("Account deletion requested by {}", user.user_id);
    let report = state.reconciler.delete_account(user.user_id).await?;
    Ok(ApiResponse::success(report))
}
