use crate::models::domain::{Chat, Message, Profile};
use serde::{Deserialize, Serialize};

/// Directory result with its compatibility score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredProfile {
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(rename = "matchPercentage")]
    pub match_percentage: u8,
}

/// Response for the search endpoint
///
/// On a failed directory query `profiles` is empty and `error` carries the
/// store message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub profiles: Vec<ScoredProfile>,
    pub total: usize,
    pub error: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Chat history response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub chat: Chat,
    pub messages: Vec<Message>,
}
