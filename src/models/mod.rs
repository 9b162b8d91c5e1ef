// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Chat, Message, NewProfile, Profile, ProfileUpdate, RelationshipIntent};
pub use requests::{CreateChatRequest, CreateProfileRequest, SendMessageRequest, UpdateProfileRequest};
pub use responses::{ErrorResponse, HealthResponse, MessagesResponse, ScoredProfile, SearchResponse};
