// Service exports
pub mod appwrite;
pub mod postgres;
pub mod store;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use postgres::{PostgresClient, PostgresError};
pub use store::{ChatStore, ProfileStore};

use crate::core::query::DirectoryQuery;
use crate::models::{Chat, Message, NewProfile, Profile, ProfileUpdate};
use thiserror::Error;

/// Error from whichever backend is configured; displays the backend's message as-is
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Appwrite(#[from] AppwriteError),

    #[error(transparent)]
    Postgres(#[from] PostgresError),
}

impl StoreError {
    /// The document being created already exists
    pub fn is_conflict(&self) -> bool {
        match self {
            StoreError::Appwrite(e) => e.status() == Some(409),
            StoreError::Postgres(e) => e.is_conflict(),
        }
    }
}

/// Configured storage backend
pub enum Backend {
    Appwrite(AppwriteClient),
    Postgres(PostgresClient),
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Appwrite(_) => "appwrite",
            Backend::Postgres(_) => "postgres",
        }
    }

    pub async fn health_check(&self) -> Result<bool, StoreError> {
        match self {
            Backend::Appwrite(client) => Ok(client.health_check().await?),
            Backend::Postgres(client) => Ok(client.health_check().await?),
        }
    }
}

impl ProfileStore for Backend {
    type Error = StoreError;

    async fn query_profiles(&self, query: &DirectoryQuery) -> Result<Vec<Profile>, StoreError> {
        match self {
            Backend::Appwrite(client) => Ok(client.query_profiles(query).await?),
            Backend::Postgres(client) => Ok(client.query_profiles(query).await?),
        }
    }

    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        match self {
            Backend::Appwrite(client) => Ok(client.get_profile(id).await?),
            Backend::Postgres(client) => Ok(client.get_profile(id).await?),
        }
    }

    async fn create_profile(&self, id: &str, profile: &NewProfile) -> Result<Profile, StoreError> {
        match self {
            Backend::Appwrite(client) => Ok(client.create_profile(id, profile).await?),
            Backend::Postgres(client) => Ok(client.create_profile(id, profile).await?),
        }
    }

    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<Profile>, StoreError> {
        match self {
            Backend::Appwrite(client) => Ok(client.update_profile(id, update).await?),
            Backend::Postgres(client) => Ok(client.update_profile(id, update).await?),
        }
    }
}

impl ChatStore for Backend {
    type Error = StoreError;

    async fn ensure_chat(&self, chat_id: &str, participants: &[String]) -> Result<Chat, StoreError> {
        match self {
            Backend::Appwrite(client) => Ok(client.ensure_chat(chat_id, participants).await?),
            Backend::Postgres(client) => Ok(client.ensure_chat(chat_id, participants).await?),
        }
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>, StoreError> {
        match self {
            Backend::Appwrite(client) => Ok(client.get_chat(chat_id).await?),
            Backend::Postgres(client) => Ok(client.get_chat(chat_id).await?),
        }
    }

    async fn send_message(&self, chat_id: &str, sender_id: &str, text: &str) -> Result<Message, StoreError> {
        match self {
            Backend::Appwrite(client) => Ok(client.send_message(chat_id, sender_id, text).await?),
            Backend::Postgres(client) => Ok(client.send_message(chat_id, sender_id, text).await?),
        }
    }

    async fn list_messages(&self, chat_id: &str, limit: usize) -> Result<Vec<Message>, StoreError> {
        match self {
            Backend::Appwrite(client) => Ok(client.list_messages(chat_id, limit).await?),
            Backend::Postgres(client) => Ok(client.list_messages(chat_id, limit).await?),
        }
    }
}
