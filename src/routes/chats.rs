use crate::auth::Identity;
use crate::models::{Chat, CreateChatRequest, MessagesResponse, SendMessageRequest};
use crate::routes::{ApiError, AppState};
use crate::services::{ChatStore, ProfileStore};
use actix_web::{web, HttpResponse};
use validator::Validate;

/// Configure chat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/chats", web::post().to(create_chat))
        .route("/chats/{chat_id}/messages", web::post().to(send_message))
        .route("/chats/{chat_id}/messages", web::get().to(list_messages));
}

/// Open a chat with another user, reusing the existing one if present
///
/// POST /api/v1/chats
///
/// Request body:
/// ```json
/// { "participantId": "string" }
/// ```
async fn create_chat(
    state: web::Data<AppState>,
    identity: Identity,
    req: web::Json<CreateChatRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let other = req.into_inner().participant_id;
    if other == identity.user_id {
        return Err(ApiError::Validation("Cannot start a chat with yourself".to_string()));
    }

    if state.store().get_profile(&other).await?.is_none() {
        return Err(ApiError::NotFound(format!("Profile not found for user {}", other)));
    }

    let mut participants = vec![identity.user_id.clone(), other];
    participants.sort();
    let chat_id = Chat::id_for(&participants);

    let chat = state.store().ensure_chat(&chat_id, &participants).await?;

    tracing::debug!("Chat {} ready for {}", chat.id, identity.user_id);

    Ok(HttpResponse::Ok().json(chat))
}

/// Load a chat the caller takes part in
async fn participant_chat(
    state: &AppState,
    identity: &Identity,
    chat_id: &str,
) -> Result<Chat, ApiError> {
    let chat = state
        .store()
        .get_chat(chat_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Chat {} not found", chat_id)))?;

    if !chat.has_participant(&identity.user_id) {
        tracing::info!("User {} denied access to chat {}", identity.user_id, chat_id);
        return Err(ApiError::Forbidden("Not a participant of this chat".to_string()));
    }

    Ok(chat)
}

/// Send a message
///
/// POST /api/v1/chats/{chat_id}/messages
///
/// Request body:
/// ```json
/// { "text": "string" }
/// ```
async fn send_message(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    req: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let chat_id = path.into_inner();
    let chat = participant_chat(&state, &identity, &chat_id).await?;

    let message = state
        .store()
        .send_message(&chat.id, &identity.user_id, &req.text)
        .await?;

    Ok(HttpResponse::Created().json(message))
}

/// Chat history, oldest first
///
/// GET /api/v1/chats/{chat_id}/messages
async fn list_messages(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let chat_id = path.into_inner();
    let chat = participant_chat(&state, &identity, &chat_id).await?;

    let messages = state
        .store()
        .list_messages(&chat.id, state.chat_history_limit)
        .await?;

    Ok(HttpResponse::Ok().json(MessagesResponse { chat, messages }))
}
