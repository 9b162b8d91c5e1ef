use crate::core::query::{DirectoryQuery, Predicate, SortOrder};
use crate::models::{Chat, Message, NewProfile, Profile, ProfileUpdate};
use crate::services::store::{ChatStore, ProfileStore};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error(transparent)]
    RequestError(#[from] reqwest::Error),

    /// Non-success answer; `message` is Appwrite's own error message
    #[error("{message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl AppwriteError {
    /// HTTP status returned by Appwrite, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            AppwriteError::ApiError { status, .. } => Some(*status),
            AppwriteError::RequestError(e) => e.status().map(|s| s.as_u16()),
            AppwriteError::InvalidResponse(_) => None,
        }
    }
}

/// Appwrite document store client
///
/// Handles all communication with the Appwrite backend including:
/// - Directory queries over the profiles collection
/// - Profile document reads and writes
/// - Chats and chat messages
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub profiles: String,
    pub chats: String,
    pub messages: String,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    fn document_url(&self, collection: &str, document_id: &str) -> String {
        format!(
            "{}/{}",
            self.documents_url(collection),
            urlencoding::encode(document_id)
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
    }

    /// List documents of a collection matching the given query strings
    async fn list_documents<T: DeserializeOwned>(
        &self,
        collection: &str,
        queries: &[String],
    ) -> Result<Vec<T>, AppwriteError> {
        let url = with_queries(&self.documents_url(collection), queries);

        tracing::debug!("Listing documents from: {}", url);

        let response = self.request(Method::GET, &url).send().await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let json: Value = response.json().await?;

        let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0);

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

        let parsed: Vec<T> = documents
            .iter()
            .filter_map(|doc| match serde_json::from_value(doc.clone()) {
                Ok(item) => Some(item),
                Err(e) => {
                    let id = doc.get("$id").and_then(|v| v.as_str()).unwrap_or("?");
                    tracing::warn!("Skipping malformed document {} in {}: {}", id, collection, e);
                    None
                }
            })
            .collect();

        tracing::debug!("Listed {} documents from {} (total: {})", parsed.len(), collection, total);

        Ok(parsed)
    }

    /// Fetch one document, `None` on 404
    async fn get_document<T: DeserializeOwned>(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<T>, AppwriteError> {
        let url = self.document_url(collection, document_id);
        let response = self.request(Method::GET, &url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        parse_document(response).await.map(Some)
    }

    async fn create_document<T: DeserializeOwned>(
        &self,
        collection: &str,
        document_id: &str,
        data: Value,
    ) -> Result<T, AppwriteError> {
        let url = self.documents_url(collection);
        let payload = json!({
            "documentId": document_id,
            "data": data,
        });

        let response = self.request(Method::POST, &url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        parse_document(response).await
    }

    /// Patch one document, `None` on 404
    async fn update_document<T: DeserializeOwned>(
        &self,
        collection: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Option<T>, AppwriteError> {
        let url = self.document_url(collection, document_id);
        let response = self
            .request(Method::PATCH, &url)
            .json(&json!({ "data": data }))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        parse_document(response).await.map(Some)
    }

    /// Health check: the profiles collection answers a one-row listing
    pub async fn health_check(&self) -> Result<bool, AppwriteError> {
        let queries = vec!["limit(1)".to_string()];
        self.list_documents::<Value>(&self.collections.profiles, &queries)
            .await
            .map(|_| true)
    }
}

impl ProfileStore for AppwriteClient {
    type Error = AppwriteError;

    async fn query_profiles(&self, query: &DirectoryQuery) -> Result<Vec<Profile>, AppwriteError> {
        let queries = render_queries(query);
        self.list_documents(&self.collections.profiles, &queries).await
    }

    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, AppwriteError> {
        tracing::debug!("Fetching profile for user: {}", id);
        self.get_document(&self.collections.profiles, id).await
    }

    async fn create_profile(&self, id: &str, profile: &NewProfile) -> Result<Profile, AppwriteError> {
        let data = serde_json::to_value(profile)
            .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to encode profile: {}", e)))?;

        let created = self.create_document(&self.collections.profiles, id, data).await?;
        tracing::debug!("Created profile document {}", id);
        Ok(created)
    }

    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<Profile>, AppwriteError> {
        let data = serde_json::to_value(update)
            .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to encode update: {}", e)))?;

        self.update_document(&self.collections.profiles, id, data).await
    }
}

impl ChatStore for AppwriteClient {
    type Error = AppwriteError;

    async fn ensure_chat(&self, chat_id: &str, participants: &[String]) -> Result<Chat, AppwriteError> {
        if let Some(chat) = self.get_chat(chat_id).await? {
            return Ok(chat);
        }

        let data = json!({
            "participants": participants,
            "lastMessage": null,
            "lastMessageTime": null,
        });

        match self.create_document(&self.collections.chats, chat_id, data).await {
            Ok(chat) => Ok(chat),
            // Lost a creation race with the other participant
            Err(AppwriteError::ApiError { status: 409, .. }) => self
                .get_chat(chat_id)
                .await?
                .ok_or_else(|| AppwriteError::InvalidResponse(format!("Chat {} vanished after conflict", chat_id))),
            Err(e) => Err(e),
        }
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>, AppwriteError> {
        self.get_document(&self.collections.chats, chat_id).await
    }

    async fn send_message(
        &self,
        chat_id: &str,
        sender_id: &str,
        text: &str,
    ) -> Result<Message, AppwriteError> {
        let message_id = uuid::Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now();

        let data = json!({
            "chatId": chat_id,
            "senderId": sender_id,
            "text": text,
            "timestamp": timestamp,
            "read": false,
        });

        let message: Message = self
            .create_document(&self.collections.messages, &message_id, data)
            .await?;

        let preview = json!({
            "lastMessage": text,
            "lastMessageTime": timestamp,
        });
        if let Err(e) = self
            .update_document::<Value>(&self.collections.chats, chat_id, preview)
            .await
        {
            tracing::warn!("Message {} stored but chat {} preview update failed: {}", message.id, chat_id, e);
        }

        Ok(message)
    }

    async fn list_messages(&self, chat_id: &str, limit: usize) -> Result<Vec<Message>, AppwriteError> {
        let queries = recent_message_queries(chat_id, limit);
        let mut messages: Vec<Message> = self.list_documents(&self.collections.messages, &queries).await?;

        // Fetched newest first so the limit keeps the latest ones
        messages.reverse();
        Ok(messages)
    }
}

/// Render a directory query as Appwrite query strings
pub fn render_queries(query: &DirectoryQuery) -> Vec<String> {
    let mut queries: Vec<String> = query
        .predicates
        .iter()
        .map(|predicate| match predicate {
            Predicate::Equal { field, value } => format!("equal(\"{}\", {})", field, quoted(value)),
            Predicate::AtLeast { field, value } => format!("greaterThanEqual(\"{}\", {})", field, value),
            Predicate::AtMost { field, value } => format!("lessThanEqual(\"{}\", {})", field, value),
        })
        .collect();

    // Exclude self
    queries.push(format!("notEqual(\"$id\", {})", quoted(&query.exclude_id)));

    match query.order {
        SortOrder::CreatedAtDesc => queries.push("orderDesc(\"$createdAt\")".to_string()),
    }

    queries.push(format!("limit({})", query.limit));
    queries
}

/// Newest `limit` messages of a chat, newest first
pub fn recent_message_queries(chat_id: &str, limit: usize) -> Vec<String> {
    vec![
        format!("equal(\"chatId\", {})", quoted(chat_id)),
        "orderDesc(\"timestamp\")".to_string(),
        format!("limit({})", limit),
    ]
}

/// JSON string literal, so quotes inside values cannot break the query syntax
fn quoted(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

fn with_queries(url: &str, queries: &[String]) -> String {
    if queries.is_empty() {
        return url.to_string();
    }

    let params = queries
        .iter()
        .map(|q| format!("queries[]={}", urlencoding::encode(q)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", url, params)
}

async fn parse_document<T: DeserializeOwned>(response: Response) -> Result<T, AppwriteError> {
    let json: Value = response.json().await?;
    serde_json::from_value(json)
        .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to parse document: {}", e)))
}

/// Turn an unsuccessful response into an error carrying Appwrite's message
async fn api_error(response: Response) -> AppwriteError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body
            }
        });

    tracing::error!("Appwrite returned {}: {}", status, message);

    AppwriteError::ApiError {
        status: status.as_u16(),
        message,
    }
}
