use crate::api::AppState;
use crate::api::middleware::AuthUser;
use crate::api::schemas::PageQuery;
use crate::api::schemas::conversations::{
    ConversationResponse, CreateConversationRequest, MemberUpdateRequest,
};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// Lists the caller's conversations, most recently active first.
///
/// # Errors
/// Returns `AppError::Database` if the listing fails.
pub async fn list_conversations(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let conversations =
        state.conversation_service.list_for_user(auth_user.user_id, page.limit, page.offset).await?;

    let body: Vec<ConversationResponse> = conversations
        .into_iter()
        .map(|c| ConversationResponse::for_viewer(c, auth_user.user_id))
        .collect();

    Ok(Json(body))
}

/// Creates a direct or group conversation depending on the tagged payload.
///
/// # Errors
/// Returns `AppError::BadRequest` on validation failures and
/// `AppError::Conflict` when the direct pair already has a conversation.
pub async fn create_conversation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateConversationRequest>,
) -> Result<impl IntoResponse> {
    let conversation = match payload {
        CreateConversationRequest::Direct { participants } => {
            state.conversation_service.create_direct(auth_user.user_id, &participants).await?
        }
        CreateConversationRequest::Group { name, participants } => {
            state.conversation_service.create_group(auth_user.user_id, name, &participants).await?
        }
    };

    Ok((StatusCode::CREATED, Json(ConversationResponse::for_viewer(conversation, auth_user.user_id))))
}

/// Adds members to a group conversation (creator only).
///
/// # Errors
/// Returns `AppError::Forbidden` for non-creators and `AppError::NotAGroup`
/// for direct conversations.
pub async fn add_members(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Json(payload): Json<MemberUpdateRequest>,
) -> Result<impl IntoResponse> {
    let conversation = state
        .membership_service
        .add_members(conversation_id, auth_user.user_id, &payload.member_ids)
        .await?;

    Ok(Json(ConversationResponse::for_viewer(conversation, auth_user.user_id)))
}

/// Removes members from a group conversation (creator only; the creator
/// cannot be removed).
///
/// # Errors
/// Same taxonomy as `add_members`, plus `AppError::BadRequest` when the
/// creator is listed.
pub async fn remove_members(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Json(payload): Json<MemberUpdateRequest>,
) -> Result<impl IntoResponse> {
    let conversation = state
        .membership_service
        .remove_members(conversation_id, auth_user.user_id, &payload.member_ids)
        .await?;

    Ok(Json(ConversationResponse::for_viewer(conversation, auth_user.user_id)))
}
