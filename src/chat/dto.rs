use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_message: String,
    pub conversation_id: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_plan: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ChatTurnView {
    pub id: Uuid,
    pub sender: String,
    pub body: String,
    pub created_at: OffsetDateTime,
}
