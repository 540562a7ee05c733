use crate::api::AppState;
use crate::api::middleware::AuthUser;
use crate::api::schemas::PageQuery;
use crate::api::schemas::messages::{MessageResponse, SendMessageRequest};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// Lists a conversation's messages in chronological order.
///
/// # Errors
/// Returns `AppError::NotFound` if the conversation is absent or the caller
/// is not a participant.
pub async fn list_messages(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let messages = state
        .message_service
        .list(conversation_id, auth_user.user_id, page.limit, page.offset)
        .await?;

    let body: Vec<MessageResponse> = messages.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// Sends a message into a conversation the caller participates in.
///
/// # Errors
/// Returns `AppError::NotFound` for non-participants and
/// `AppError::BadRequest` for empty content.
pub async fn send_message(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse> {
    let message =
        state.message_service.send(conversation_id, auth_user.user_id, &payload.content).await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(message))))
}

/// Deletes a message the caller sent.
///
/// # Errors
/// Returns `AppError::Forbidden` if the caller is a participant but not the
/// sender, `AppError::NotFound` otherwise.
pub async fn delete_message(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.message_service.delete(message_id, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
