use crate::core::criteria::FilterCriteria;
use crate::models::Profile;
use std::fmt;

/// Hard cap on directory results per search
pub const MAX_PAGE_SIZE: usize = 20;

/// Profile attribute a predicate applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    Religion,
    Location,
    Education,
}

impl Field {
    /// Attribute name in the document store
    pub fn attribute(&self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Religion => "religion",
            Field::Location => "location",
            Field::Education => "education",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// Single retrieval constraint pushed down to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Exact, case-sensitive string equality
    Equal { field: Field, value: String },
    /// `field >= value`
    AtLeast { field: Field, value: i64 },
    /// `field <= value`
    AtMost { field: Field, value: i64 },
}

impl Predicate {
    /// Evaluate against an in-memory profile; absent attributes never match
    pub fn matches(&self, profile: &Profile) -> bool {
        match self {
            Predicate::Equal { field, value } => {
                text_attribute(profile, *field) == Some(value.as_str())
            }
            Predicate::AtLeast { field, value } => {
                numeric_attribute(profile, *field).map_or(false, |v| v >= *value)
            }
            Predicate::AtMost { field, value } => {
                numeric_attribute(profile, *field).map_or(false, |v| v <= *value)
            }
        }
    }
}

fn text_attribute(profile: &Profile, field: Field) -> Option<&str> {
    match field {
        Field::Religion => profile.religion.as_deref(),
        Field::Location => profile.location.as_deref(),
        Field::Education => profile.education.as_deref(),
        Field::Age => None,
    }
}

fn numeric_attribute(profile: &Profile, field: Field) -> Option<i64> {
    match field {
        Field::Age => profile.age.map(i64::from),
        _ => None,
    }
}

/// Result ordering requested from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest profiles first
    #[default]
    CreatedAtDesc,
}

/// Composed retrieval for one directory search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryQuery {
    pub predicates: Vec<Predicate>,
    /// Profile id that must never appear in the results (the requester)
    pub exclude_id: String,
    pub order: SortOrder,
    pub limit: usize,
}

impl DirectoryQuery {
    /// Build the store query for `requester` searching with `filters`
    ///
    /// The age range is always pushed down. Religion, location and education
    /// become exact-equality predicates only when set. `limit` is clamped to
    /// [`MAX_PAGE_SIZE`].
    pub fn build(requester: &str, filters: &FilterCriteria, limit: usize) -> Self {
        let mut predicates = vec![
            Predicate::AtLeast {
                field: Field::Age,
                value: i64::from(filters.age_range.min),
            },
            Predicate::AtMost {
                field: Field::Age,
                value: i64::from(filters.age_range.max),
            },
        ];

        if let Some(religion) = filters.religion() {
            predicates.push(Predicate::Equal {
                field: Field::Religion,
                value: religion.to_string(),
            });
        }
        if let Some(location) = filters.location() {
            predicates.push(Predicate::Equal {
                field: Field::Location,
                value: location.to_string(),
            });
        }
        if let Some(education) = filters.education() {
            predicates.push(Predicate::Equal {
                field: Field::Education,
                value: education.to_string(),
            });
        }

        Self {
            predicates,
            exclude_id: requester.to_string(),
            order: SortOrder::CreatedAtDesc,
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Whether a profile satisfies every predicate and is not the excluded id
    pub fn matches(&self, profile: &Profile) -> bool {
        profile.id != self.exclude_id && self.predicates.iter().all(|p| p.matches(profile))
    }

    /// Re-assert the structural guarantees on whatever the store returned:
    /// the requester is dropped and the page is capped at `limit`.
    pub fn enforce(&self, mut profiles: Vec<Profile>) -> Vec<Profile> {
        profiles.retain(|p| p.id != self.exclude_id);
        profiles.truncate(self.limit);
        profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_profile(id: &str, age: u32) -> Profile {
        let mut profile = Profile::with_id(id);
        profile.age = Some(age);
        profile.religion = Some("islam".to_string());
        profile.location = Some("Dubai".to_string());
        profile.education = Some("bachelors".to_string());
        profile
    }

    #[test]
    fn test_default_filters_only_push_age() {
        let query = DirectoryQuery::build("u1", &FilterCriteria::default(), 20);

        assert_eq!(
            query.predicates,
            vec![
                Predicate::AtLeast { field: Field::Age, value: 18 },
                Predicate::AtMost { field: Field::Age, value: 50 },
            ]
        );
        assert_eq!(query.exclude_id, "u1");
        assert_eq!(query.order, SortOrder::CreatedAtDesc);
        assert_eq!(query.limit, 20);
    }

    #[test]
    fn test_set_filters_become_equality_predicates() {
        let filters = FilterCriteria::default()
            .with_religion("islam")
            .with_location("Dubai")
            .with_education("bachelors");
        let query = DirectoryQuery::build("u1", &filters, 20);

        assert_eq!(query.predicates.len(), 5);
        assert!(query.predicates.contains(&Predicate::Equal {
            field: Field::Location,
            value: "Dubai".to_string(),
        }));
    }

    #[test]
    fn test_limit_is_capped() {
        let query = DirectoryQuery::build("u1", &FilterCriteria::default(), 500);
        assert_eq!(query.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_location_predicate_is_exact() {
        let filters = FilterCriteria::default().with_location("dubai");
        let query = DirectoryQuery::build("u1", &filters, 20);

        assert!(!query.matches(&create_test_profile("u2", 30)));
    }

    #[test]
    fn test_matches_excludes_requester_and_out_of_range() {
        let query = DirectoryQuery::build("u1", &FilterCriteria::default().with_age_range(25, 35), 20);

        assert!(query.matches(&create_test_profile("u2", 30)));
        assert!(!query.matches(&create_test_profile("u1", 30)));
        assert!(!query.matches(&create_test_profile("u3", 40)));
        assert!(!query.matches(&Profile::with_id("u4")));
    }

    #[test]
    fn test_enforce_drops_requester_and_truncates() {
        let query = DirectoryQuery::build("u1", &FilterCriteria::default(), 20);
        let profiles: Vec<Profile> = (0..30)
            .map(|i| create_test_profile(&format!("u{}", i), 30))
            .collect();

        let result = query.enforce(profiles);

        assert_eq!(result.len(), 20);
        assert!(result.iter().all(|p| p.id != "u1"));
    }
}
