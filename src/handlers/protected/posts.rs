// handlers/protected/posts.rs - /api/posts[/:id]
//
// Create and update run the full save reconciliation and answer with the
// save report, so editors can see which images failed to upload.

use axum::extract::{Extension, Json, Path, State};
use uuid::Uuid;

use crate::database::{Post, PostDraft};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::reconcile::{DeleteReport, SaveReport};
use crate::state::AppState;

/// GET /api/posts - posts of the authenticated author, oldest first
pub async fn post_list(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Post>> {
    let posts = state.store.list_posts(user.user_id).await?;
    Ok(ApiResponse::success(posts))
}

/// POST /api/posts
pub async fn post_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(draft): Json<PostDraft>,
) -> ApiResult<SaveReport> {
    validate_draft(&draft)?;
    let report = state.reconciler.create_post(user.user_id, draft).await?;
    Ok(ApiResponse::created(report))
}

/// GET /api/posts/:id
pub async fn post_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Post> {
    let post = state
        .store
        .find_post(id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("post {} not found", id)))?;
    Ok(ApiResponse::success(post))
}

/// PUT /api/posts/:id
pub async fn post_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(draft): Json<PostDraft>,
) -> ApiResult<SaveReport> {
    validate_draft(&draft)?;
    let report = state.reconciler.update_post(id, user.user_id, draft).await?;
    Ok(ApiResponse::success(report))
}

/// DELETE /api/posts/:id
pub async fn post_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<DeleteReport> {
    let report = state.reconciler.delete_post(id, user.user_id).await?;
    Ok(ApiResponse::success(report))
}

fn validate_draft(draft: &PostDraft) -> Result<(), ApiError> {
    if draft.title.trim().is_empty() {
        return Err(ApiError::bad_request("Post title must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_is_rejected() {
        let draft = PostDraft {
            title: "   ".to_string(),
            ..PostDraft::default()
        };
        let err = validate_draft(&draft).unwrap_err();
        assert_eq!(err.error_code(), "BAD_REQUEST");
    }

    #[test]
    fn empty_content_is_allowed() {
        let draft = PostDraft {
            title: "Hello".to_string(),
            ..PostDraft::default()
        };
        assert!(validate_draft(&draft).is_ok());
    }
}
