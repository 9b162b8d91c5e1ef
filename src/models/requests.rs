use crate::models::domain::{
    NewProfile, ProfileUpdate, RelationshipIntent, EDUCATION_LEVELS, GENDERS, RELIGIONS,
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request to create the caller's profile at profile completion
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(range(min = 18, max = 100))]
    pub age: u32,
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(custom(function = "validate_religion"))]
    pub religion: String,
    #[validate(custom(function = "validate_education"))]
    pub education: String,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    /// Comma-separated list or JSON array
    #[serde(default, deserialize_with = "hobbies_list")]
    pub hobbies: Vec<String>,
    #[serde(rename = "lookingFor", default)]
    pub looking_for: Option<RelationshipIntent>,
}

impl CreateProfileRequest {
    /// Build the stored document; name and email come from the caller's identity
    pub fn into_new_profile(self, name: Option<String>, email: Option<String>) -> NewProfile {
        NewProfile {
            name,
            email,
            age: self.age,
            gender: self.gender,
            location: self.location,
            religion: self.religion,
            education: self.education,
            profession: self.profession,
            bio: self.bio,
            hobbies: self.hobbies,
            looking_for: self.looking_for,
            is_verified: false,
            is_premium: false,
            profile_picture: None,
            pictures: Vec::new(),
        }
    }
}

/// Partial update of the caller's profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_categories"))]
pub struct UpdateProfileRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(range(min = 18, max = 100))]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[serde(default)]
    pub hobbies: Option<Vec<String>>,
    #[serde(rename = "lookingFor", default)]
    pub looking_for: Option<RelationshipIntent>,
    #[serde(rename = "profilePicture", default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub pictures: Option<Vec<String>>,
}

impl UpdateProfileRequest {
    pub fn into_update(self) -> ProfileUpdate {
        ProfileUpdate {
            name: self.name,
            age: self.age,
            gender: self.gender,
            location: self.location,
            religion: self.religion,
            education: self.education,
            profession: self.profession,
            bio: self.bio,
            hobbies: self
                .hobbies
                .map(|h| h.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()),
            looking_for: self.looking_for,
            profile_picture: self.profile_picture,
            pictures: self.pictures,
        }
    }
}

fn validate_update_categories(req: &UpdateProfileRequest) -> Result<(), ValidationError> {
    if let Some(gender) = &req.gender {
        validate_gender(gender)?;
    }
    if let Some(religion) = &req.religion {
        validate_religion(religion)?;
    }
    if let Some(education) = &req.education {
        validate_education(education)?;
    }
    Ok(())
}

/// Request to open (or reopen) a chat with another user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateChatRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "participant_id", rename = "participantId")]
    pub participant_id: String,
}

/// Request to send a chat message
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
}

fn validate_gender(value: &str) -> Result<(), ValidationError> {
    one_of("gender", value, GENDERS)
}

fn validate_religion(value: &str) -> Result<(), ValidationError> {
    one_of("religion", value, RELIGIONS)
}

fn validate_education(value: &str) -> Result<(), ValidationError> {
    one_of("education", value, EDUCATION_LEVELS)
}

fn one_of(code: &'static str, value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(message(code, &format!("must be one of: {}", allowed.join(", "))))
    }
}

fn message(code: &'static str, text: &str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(text.to_string().into());
    err
}

fn hobbies_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Hobbies {
        Text(String),
        List(Vec<String>),
    }

    let items = match Hobbies::deserialize(deserializer)? {
        Hobbies::Text(text) => text.split(',').map(str::to_string).collect(),
        Hobbies::List(list) => list,
    };

    Ok(items
        .into_iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_profile_parses_comma_separated_hobbies() {
        let req: CreateProfileRequest = serde_json::from_value(json!({
            "age": 27,
            "gender": "female",
            "location": "New York, NY",
            "religion": "christianity",
            "education": "masters",
            "hobbies": "hiking, cooking , ,chess",
            "lookingFor": "serious-relationship"
        }))
        .unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.hobbies, vec!["hiking", "cooking", "chess"]);

        let profile = req.into_new_profile(Some("Dana".into()), None);
        assert!(!profile.is_verified);
        assert!(!profile.is_premium);
        assert!(profile.pictures.is_empty());
    }

    #[test]
    fn test_create_profile_rejects_unknown_education() {
        let req: CreateProfileRequest = serde_json::from_value(json!({
            "age": 27,
            "gender": "female",
            "location": "Lagos",
            "religion": "christianity",
            "education": "Bachelors"
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_profile_rejects_minor() {
        let req: CreateProfileRequest = serde_json::from_value(json!({
            "age": 16,
            "gender": "male",
            "location": "Lagos",
            "religion": "none",
            "education": "high-school"
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_validates_categories_only_when_present() {
        let req = UpdateProfileRequest { bio: Some("hello".into()), ..Default::default() };
        assert!(req.validate().is_ok());

        let req = UpdateProfileRequest { religion: Some("Islam".into()), ..Default::default() };
        assert!(req.validate().is_err());
    }
}
