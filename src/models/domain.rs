use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Known religion values accepted on profile writes
pub const RELIGIONS: &[&str] = &[
    "christianity", "islam", "hinduism", "buddhism", "judaism", "other", "none",
];

/// Known education levels accepted on profile writes
pub const EDUCATION_LEVELS: &[&str] = &["high-school", "bachelors", "masters", "phd", "other"];

/// Known gender values accepted on profile writes
pub const GENDERS: &[&str] = &["male", "female", "other"];

/// Dating profile as stored in the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "id", alias = "$id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hobbies: Vec<String>,
    #[serde(rename = "lookingFor", default)]
    pub looking_for: Option<RelationshipIntent>,
    #[serde(rename = "isVerified", default, deserialize_with = "null_as_default")]
    pub is_verified: bool,
    #[serde(rename = "isPremium", default, deserialize_with = "null_as_default")]
    pub is_premium: bool,
    #[serde(rename = "profilePicture", default)]
    pub profile_picture: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pictures: Vec<String>,
    #[serde(rename = "createdAt", alias = "$createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", alias = "$updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Empty profile with only an identifier, mostly useful for tests and fixtures
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            age: None,
            gender: None,
            location: None,
            religion: None,
            education: None,
            profession: None,
            bio: None,
            hobbies: Vec::new(),
            looking_for: None,
            is_verified: false,
            is_premium: false,
            profile_picture: None,
            pictures: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// What the user is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipIntent {
    SeriousRelationship,
    Marriage,
    Friendship,
    CasualDating,
}

impl RelationshipIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipIntent::SeriousRelationship => "serious-relationship",
            RelationshipIntent::Marriage => "marriage",
            RelationshipIntent::Friendship => "friendship",
            RelationshipIntent::CasualDating => "casual-dating",
        }
    }
}

impl fmt::Display for RelationshipIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "serious-relationship" => Ok(RelationshipIntent::SeriousRelationship),
            "marriage" => Ok(RelationshipIntent::Marriage),
            "friendship" => Ok(RelationshipIntent::Friendship),
            "casual-dating" => Ok(RelationshipIntent::CasualDating),
            other => Err(format!("unknown relationship intent: {}", other)),
        }
    }
}

/// Fields written when a user completes their profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: u32,
    pub gender: String,
    pub location: String,
    pub religion: String,
    pub education: String,
    pub profession: Option<String>,
    pub bio: Option<String>,
    pub hobbies: Vec<String>,
    #[serde(rename = "lookingFor")]
    pub looking_for: Option<RelationshipIntent>,
    #[serde(rename = "isVerified")]
    pub is_verified: bool,
    #[serde(rename = "isPremium")]
    pub is_premium: bool,
    #[serde(rename = "profilePicture")]
    pub profile_picture: Option<String>,
    pub pictures: Vec<String>,
}

/// Partial profile update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub religion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hobbies: Option<Vec<String>>,
    #[serde(rename = "lookingFor", skip_serializing_if = "Option::is_none")]
    pub looking_for: Option<RelationshipIntent>,
    #[serde(rename = "profilePicture", skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pictures: Option<Vec<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ProfileUpdate::default()
    }
}

/// Namespace for chat ids derived from participant ids
const CHAT_NAMESPACE: Uuid = Uuid::from_u128(0x6d61_7463_686d_6500_8000_0000_0000_6368);

/// Conversation between two users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    #[serde(rename = "id", alias = "$id")]
    pub id: String,
    pub participants: Vec<String>,
    #[serde(rename = "createdAt", alias = "$createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "lastMessage", default)]
    pub last_message: Option<String>,
    #[serde(rename = "lastMessageTime", default)]
    pub last_message_time: Option<DateTime<Utc>>,
}

impl Chat {
    /// Deterministic chat id for a set of participants, independent of order
    ///
    /// A UUID v5 over the sorted, length-prefixed ids: 32 characters whatever
    /// the id lengths, so it fits Appwrite's 36-character custom id limit and
    /// ids containing `_` cannot collide.
    pub fn id_for(participants: &[String]) -> String {
        let mut sorted: Vec<&str> = participants.iter().map(String::as_str).collect();
        sorted.sort_unstable();

        let key: String = sorted
            .iter()
            .map(|id| format!("{}:{}", id.len(), id))
            .collect();

        Uuid::new_v5(&CHAT_NAMESPACE, key.as_bytes()).simple().to_string()
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }
}

/// Single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "id", alias = "$id")]
    pub id: String,
    #[serde(rename = "chatId")]
    pub chat_id: String,
    #[serde(rename = "senderId")]
    pub sender_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub read: bool,
}

/// Treat `""` the same as a missing value
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Appwrite sends `null` for unset attributes without a default
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_from_appwrite_document() {
        let doc = json!({
            "$id": "u42",
            "$createdAt": "2026-03-01T10:00:00.000+00:00",
            "$collectionId": "users",
            "name": "Amira",
            "age": 29,
            "location": "Dubai",
            "religion": "islam",
            "education": "masters",
            "hobbies": ["reading", "hiking"],
            "lookingFor": "marriage",
            "isVerified": true
        });

        let profile: Profile = serde_json::from_value(doc).unwrap();

        assert_eq!(profile.id, "u42");
        assert_eq!(profile.age, Some(29));
        assert_eq!(profile.looking_for, Some(RelationshipIntent::Marriage));
        assert!(profile.is_verified);
        assert!(!profile.is_premium);
        assert!(profile.created_at.is_some());
        assert!(profile.pictures.is_empty());
    }

    #[test]
    fn test_null_attributes_read_as_defaults() {
        let doc = json!({
            "$id": "u43",
            "age": 31,
            "hobbies": null,
            "pictures": null,
            "isVerified": null,
            "isPremium": null,
            "lookingFor": null
        });

        let profile: Profile = serde_json::from_value(doc).unwrap();

        assert!(profile.hobbies.is_empty());
        assert!(profile.pictures.is_empty());
        assert!(!profile.is_verified);
        assert!(!profile.is_premium);
        assert_eq!(profile.looking_for, None);
    }

    #[test]
    fn test_profile_serializes_camel_case() {
        let mut profile = Profile::with_id("u1");
        profile.is_premium = true;

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["id"], "u1");
        assert_eq!(value["isPremium"], true);
        assert!(value.get("is_premium").is_none());
    }

    #[test]
    fn test_chat_id_is_order_independent() {
        let a = Chat::id_for(&["zed".to_string(), "amy".to_string()]);
        let b = Chat::id_for(&["amy".to_string(), "zed".to_string()]);
        assert_eq!(a, b);
        assert_ne!(a, Chat::id_for(&["amy".to_string(), "bob".to_string()]));
    }

    #[test]
    fn test_chat_id_fits_appwrite_limit() {
        let appwrite_ids = ["65f1c2d3e4a5b6c7d8e9".to_string(), "65f1c2d3e4a5b6c7d8f0".to_string()];
        let firebase_uids = [
            "Xq3vL9aB2cD4eF6gH8iJ0kL1mN2o".to_string(),
            "Zr5tY7uI9oP1aS3dF5gH7jK9lZ2x".to_string(),
        ];

        for pair in [&appwrite_ids, &firebase_uids] {
            let id = Chat::id_for(pair);
            assert!(id.len() <= 36, "{} is {} chars", id, id.len());
            assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_chat_id_underscores_do_not_collide() {
        let a = Chat::id_for(&["a_b".to_string(), "c".to_string()]);
        let b = Chat::id_for(&["a".to_string(), "b_c".to_string()]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_relationship_intent_round_trip_str() {
        for intent in [
            RelationshipIntent::SeriousRelationship,
            RelationshipIntent::Marriage,
            RelationshipIntent::Friendship,
            RelationshipIntent::CasualDating,
        ] {
            assert_eq!(intent.as_str().parse::<RelationshipIntent>(), Ok(intent));
        }
        assert!("situationship".parse::<RelationshipIntent>().is_err());
    }

    #[test]
    fn test_empty_update_detection() {
        assert!(ProfileUpdate::default().is_empty());
        let update = ProfileUpdate { bio: Some("hi".into()), ..Default::default() };
        assert!(!update.is_empty());
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, json!({ "bio": "hi" }));
    }
}
