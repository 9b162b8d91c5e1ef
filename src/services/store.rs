use crate::core::query::DirectoryQuery;
use crate::models::{Chat, Message, NewProfile, Profile, ProfileUpdate};
use std::future::Future;

/// Document store holding dating profiles
///
/// `query_profiles` is the only read path the directory search uses; the
/// write methods back profile completion and editing.
pub trait ProfileStore {
    type Error: std::error::Error;

    /// Run a composed directory query: predicates, requester exclusion,
    /// newest-first ordering and the result cap.
    fn query_profiles(
        &self,
        query: &DirectoryQuery,
    ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>>;

    /// Fetch a profile by id, `None` when it does not exist
    fn get_profile(&self, id: &str) -> impl Future<Output = Result<Option<Profile>, Self::Error>>;

    /// Create the profile document for `id`
    fn create_profile(
        &self,
        id: &str,
        profile: &NewProfile,
    ) -> impl Future<Output = Result<Profile, Self::Error>>;

    /// Apply a partial update, `None` when the profile does not exist
    fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<Option<Profile>, Self::Error>>;
}

/// Store holding chats and their messages
pub trait ChatStore {
    type Error: std::error::Error;

    /// Return the chat with this id, creating it for `participants` if missing
    fn ensure_chat(
        &self,
        chat_id: &str,
        participants: &[String],
    ) -> impl Future<Output = Result<Chat, Self::Error>>;

    fn get_chat(&self, chat_id: &str) -> impl Future<Output = Result<Option<Chat>, Self::Error>>;

    /// Append a message and update the chat's last-message preview
    fn send_message(
        &self,
        chat_id: &str,
        sender_id: &str,
        text: &str,
    ) -> impl Future<Output = Result<Message, Self::Error>>;

    /// Messages of a chat, oldest first, at most `limit`
    fn list_messages(
        &self,
        chat_id: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Message>, Self::Error>>;
}
