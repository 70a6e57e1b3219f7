// handlers/protected/media.rs - POST /api/media/signature

use axum::extract::{Extension, State};

use crate::media::{author_folder, SignedUpload};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// Signed parameters for uploading straight from the browser into the caller's folder
pub async fn signature_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<SignedUpload> {
    let folder = author_folder(&state.config.media.upload_folder, user.user_id);
    let signed = SignedUpload::new(&state.config.media, &folder, chrono::Utc::now().timestamp())?;
    Ok(ApiResponse::success(signed))
}
