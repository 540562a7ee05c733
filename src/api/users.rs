use crate::api::AppState;
use crate::api::middleware::AuthUser;
use crate::api::schemas::users::{UserSearchQuery, UserSummary};
use crate::error::Result;
use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

/// Thin directory lookup for peer discovery.
///
/// # Errors
/// Returns `AppError::Database` if the query fails.
pub async fn list_users(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> Result<impl IntoResponse> {
    let users = state.directory_service.list_users(query.q.as_deref(), query.limit).await?;

    let body: Vec<UserSummary> = users.into_iter().map(Into::into).collect();
    Ok(Json(body))
}
