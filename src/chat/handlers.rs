use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{jwt::AuthUser, repo::User},
    chat::{
        dto::{ChatRequest, ChatResponse, ChatTurnView},
        extractor::extract_meal_plan,
        gateway::ChatTurn,
        repo::{ChatMessage, SENDER_ASSISTANT, SENDER_USER},
    },
    error::AppError,
    state::AppState,
};

pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat/:conversation_id", get(history))
}

#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = payload.user_message.trim();
    let conversation_id = payload.conversation_id.trim();
    if message.is_empty() {
        return Err(AppError::Validation("user_message is required".into()));
    }
    if conversation_id.is_empty() {
        return Err(AppError::Validation("conversation_id is required".into()));
    }

    ChatMessage::append(&state.db, user.user_id, SENDER_USER, message, conversation_id).await?;
    // Separate statement from the append above; a failure in between can
    // leave the counter one behind the log. The counter is advisory only,
    // so the drift is tolerated rather than wrapped in a transaction.
    User::bump_message_count(&state.db, user.user_id).await?;

    let history = ChatMessage::history(&state.db, user.user_id, conversation_id).await?;
    let turns: Vec<ChatTurn> = history
        .iter()
        .map(|m| {
            if m.sender == SENDER_ASSISTANT {
                ChatTurn::assistant(m.body.clone())
            } else {
                ChatTurn::user(m.body.clone())
            }
        })
        .collect();

    let reply = state.model.complete(&turns).await?;

    ChatMessage::append(
        &state.db,
        user.user_id,
        SENDER_ASSISTANT,
        &reply,
        conversation_id,
    )
    .await?;

    let meal_plan = extract_meal_plan(&reply);
    info!(
        user_id = %user.user_id,
        conversation_id,
        plan_extracted = meal_plan.is_some(),
        "chat turn completed"
    );

    Ok(Json(ChatResponse {
        message: reply,
        meal_plan,
    }))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    user: AuthUser,
    Path(conversation_id): Path<String>,
) -> Result<Json<Vec<ChatTurnView>>, AppError> {
    let rows = ChatMessage::history(&state.db, user.user_id, &conversation_id).await?;
    let turns = rows
        .into_iter()
        .map(|m| ChatTurnView {
            id: m.id,
            sender: m.sender,
            body: m.body,
            created_at: m.created_at,
        })
        .collect();
    Ok(Json(turns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use uuid::Uuid;

    fn caller() -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: "cook@example.com".into(),
        }
    }

    // Field validation runs before anything is written, so the fake state's
    // lazily connecting pool is never touched.

    #[tokio::test]
    async fn empty_user_message_returns_400() {
        let state = crate::state::AppState::fake();
        let err = chat(
            State(state),
            caller(),
            Json(ChatRequest {
                user_message: "   ".into(),
                conversation_id: "week-1".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_conversation_id_returns_400() {
        let state = crate::state::AppState::fake();
        let err = chat(
            State(state),
            caller(),
            Json(ChatRequest {
                user_message: "plan my week".into(),
                conversation_id: "".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
