use crate::models::domain::empty_string_as_none;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Lower bound of the default age range
pub const DEFAULT_MIN_AGE: u32 = 18;
/// Upper bound of the default age range
pub const DEFAULT_MAX_AGE: u32 = 50;

/// Inclusive age range, `[min, max]` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// `min <= max`; anything else is a caller error
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    #[inline]
    pub fn contains(&self, age: u32) -> bool {
        self.min <= age && age <= self.max
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_AGE, DEFAULT_MAX_AGE)
    }
}

impl From<[u32; 2]> for AgeRange {
    fn from(bounds: [u32; 2]) -> Self {
        Self::new(bounds[0], bounds[1])
    }
}

impl From<AgeRange> for [u32; 2] {
    fn from(range: AgeRange) -> Self {
        [range.min, range.max]
    }
}

/// Constraints a searcher applies to narrow candidate profiles
///
/// Optional fields that are absent (or sent as `""`) mean "any". This is
/// also the body of a search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_age_range"))]
pub struct FilterCriteria {
    #[serde(rename = "ageRange", default)]
    pub age_range: AgeRange,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub religion: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub education: Option<String>,
}

impl FilterCriteria {
    pub fn with_age_range(mut self, min: u32, max: u32) -> Self {
        self.age_range = AgeRange::new(min, max);
        self
    }

    pub fn with_religion(mut self, religion: impl Into<String>) -> Self {
        self.religion = non_empty(religion.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = non_empty(location.into());
        self
    }

    pub fn with_education(mut self, education: impl Into<String>) -> Self {
        self.education = non_empty(education.into());
        self
    }

    pub fn religion(&self) -> Option<&str> {
        self.religion.as_deref().filter(|s| !s.is_empty())
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|s| !s.is_empty())
    }

    pub fn education(&self) -> Option<&str> {
        self.education.as_deref().filter(|s| !s.is_empty())
    }

    /// Number of optional filters (religion, location, education) that are set
    pub fn active_optional_filters(&self) -> u32 {
        [self.religion(), self.location(), self.education()]
            .iter()
            .filter(|f| f.is_some())
            .count() as u32
    }

    /// Merge a partial update into these filters, keeping unspecified fields
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(range) = update.age_range {
            self.age_range = range;
        }
        if let Some(religion) = update.religion {
            self.religion = non_empty(religion);
        }
        if let Some(location) = update.location {
            self.location = non_empty(location);
        }
        if let Some(education) = update.education {
            self.education = non_empty(education);
        }
    }
}

/// Partial filter change; `Some("")` clears a filter back to "any"
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterUpdate {
    #[serde(rename = "ageRange", default)]
    pub age_range: Option<AgeRange>,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
}

/// How the score denominator is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    /// Always out of 100, blank optional filters still count against the profile
    #[default]
    Fixed100,
    /// Out of the age criterion plus each optional filter that is set
    RescaleToActiveFilters,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn validate_age_range(filters: &FilterCriteria) -> Result<(), ValidationError> {
    if filters.age_range.is_valid() {
        return Ok(());
    }

    let mut err = ValidationError::new("age_range");
    err.message = Some("ageRange minimum must not exceed maximum".into());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_criteria() {
        let filters = FilterCriteria::default();
        assert_eq!(filters.age_range, AgeRange::new(18, 50));
        assert_eq!(filters.active_optional_filters(), 0);
    }

    #[test]
    fn test_inverted_age_range_rejected() {
        let filters: FilterCriteria = serde_json::from_value(json!({ "ageRange": [40, 30] })).unwrap();
        assert!(filters.validate().is_err());

        let filters: FilterCriteria = serde_json::from_value(json!({ "ageRange": [30, 30] })).unwrap();
        assert!(filters.validate().is_ok());
    }

    #[test]
    fn test_deserialize_wire_format() {
        let filters: FilterCriteria = serde_json::from_value(json!({
            "ageRange": [25, 35],
            "religion": "islam",
            "location": "",
            "education": ""
        }))
        .unwrap();

        assert_eq!(filters.age_range, AgeRange::new(25, 35));
        assert_eq!(filters.religion(), Some("islam"));
        assert_eq!(filters.location, None);
        assert_eq!(filters.education, None);
        assert_eq!(filters.active_optional_filters(), 1);
    }

    #[test]
    fn test_missing_age_range_uses_default() {
        let filters: FilterCriteria = serde_json::from_value(json!({})).unwrap();
        assert_eq!(filters.age_range, AgeRange::default());
    }

    #[test]
    fn test_age_range_bounds_are_inclusive() {
        let range = AgeRange::new(25, 35);
        assert!(range.contains(25));
        assert!(range.contains(35));
        assert!(!range.contains(24));
        assert!(!range.contains(36));
        assert!(!AgeRange::new(40, 30).is_valid());
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let mut filters = FilterCriteria::default()
            .with_religion("islam")
            .with_location("Dubai");

        filters.merge(FilterUpdate {
            age_range: Some(AgeRange::new(30, 40)),
            location: Some(String::new()),
            ..Default::default()
        });

        assert_eq!(filters.age_range, AgeRange::new(30, 40));
        assert_eq!(filters.religion(), Some("islam"));
        assert_eq!(filters.location(), None);
    }

    #[test]
    fn test_score_mode_names() {
        let mode: ScoreMode = serde_json::from_value(json!("rescale_to_active_filters")).unwrap();
        assert_eq!(mode, ScoreMode::RescaleToActiveFilters);
        assert_eq!(serde_json::to_value(ScoreMode::Fixed100).unwrap(), json!("fixed100"));
    }
}
