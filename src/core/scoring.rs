use crate::core::criteria::{FilterCriteria, ScoreMode};
use crate::models::Profile;

/// Points awarded for each satisfied criterion
pub const CRITERION_POINTS: u32 = 25;

/// Number of criteria the scorer evaluates (age, religion, location, education)
pub const CRITERIA_COUNT: u32 = 4;

/// Compatibility score (0-100) using the fixed 100-point denominator
///
/// Criteria, 25 points each:
/// - age within the filter range (always evaluated)
/// - religion equal to the filter religion, if one is set
/// - location containing the filter location, case-insensitively, if one is set
/// - education equal to the filter education, if one is set
///
/// Leaving optional filters blank still counts them in the denominator, so
/// with only the age range in play the best a profile can score is 25.
pub fn score(profile: &Profile, filters: &FilterCriteria) -> u8 {
    compatibility_score(profile, filters, ScoreMode::Fixed100)
}

/// Compatibility score (0-100) with an explicit denominator policy
pub fn compatibility_score(profile: &Profile, filters: &FilterCriteria, mode: ScoreMode) -> u8 {
    let awarded = awarded_points(profile, filters);

    let possible = match mode {
        ScoreMode::Fixed100 => CRITERION_POINTS * CRITERIA_COUNT,
        ScoreMode::RescaleToActiveFilters => {
            CRITERION_POINTS * (1 + filters.active_optional_filters())
        }
    };

    let percentage = (f64::from(awarded) / f64::from(possible) * 100.0).round();
    percentage.clamp(0.0, 100.0) as u8
}

fn awarded_points(profile: &Profile, filters: &FilterCriteria) -> u32 {
    let mut points = 0;

    if age_matches(profile, filters) {
        points += CRITERION_POINTS;
    }
    if religion_matches(profile, filters) {
        points += CRITERION_POINTS;
    }
    if location_matches(profile, filters) {
        points += CRITERION_POINTS;
    }
    if education_matches(profile, filters) {
        points += CRITERION_POINTS;
    }

    points
}

#[inline]
fn age_matches(profile: &Profile, filters: &FilterCriteria) -> bool {
    profile
        .age
        .map(|age| filters.age_range.contains(age))
        .unwrap_or(false)
}

#[inline]
fn religion_matches(profile: &Profile, filters: &FilterCriteria) -> bool {
    match filters.religion() {
        Some(wanted) => profile.religion.as_deref() == Some(wanted),
        None => false,
    }
}

#[inline]
fn location_matches(profile: &Profile, filters: &FilterCriteria) -> bool {
    match (filters.location(), profile.location.as_deref()) {
        (Some(wanted), Some(actual)) => actual.to_lowercase().contains(&wanted.to_lowercase()),
        _ => false,
    }
}

#[inline]
fn education_matches(profile: &Profile, filters: &FilterCriteria) -> bool {
    match filters.education() {
        Some(wanted) => profile.education.as_deref() == Some(wanted),
        None => false,
    }
}

/// Scores profiles with a configured denominator policy
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    mode: ScoreMode,
}

impl Scorer {
    pub fn new(mode: ScoreMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ScoreMode {
        self.mode
    }

    #[inline]
    pub fn score(&self, profile: &Profile, filters: &FilterCriteria) -> u8 {
        compatibility_score(profile, filters, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_profile(age: u32, religion: &str, location: &str, education: &str) -> Profile {
        let mut profile = Profile::with_id("candidate");
        profile.age = Some(age);
        profile.religion = Some(religion.to_string());
        profile.location = Some(location.to_string());
        profile.education = Some(education.to_string());
        profile
    }

    #[test]
    fn test_age_only() {
        let profile = create_test_profile(30, "islam", "Dubai", "bachelors");
        let filters = FilterCriteria::default().with_age_range(30, 30);

        assert_eq!(score(&profile, &filters), 25);
    }

    #[test]
    fn test_all_criteria_match() {
        let profile = create_test_profile(30, "islam", "Dubai, UAE", "bachelors");
        let filters = FilterCriteria::default()
            .with_age_range(25, 35)
            .with_religion("islam")
            .with_location("dubai")
            .with_education("bachelors");

        assert_eq!(score(&profile, &filters), 100);
    }

    #[test]
    fn test_missing_fields_do_not_match() {
        let profile = Profile::with_id("blank");
        let filters = FilterCriteria::default()
            .with_religion("islam")
            .with_location("Dubai")
            .with_education("phd");

        assert_eq!(score(&profile, &filters), 0);
    }

    #[test]
    fn test_rescale_mode() {
        let profile = create_test_profile(30, "islam", "Dubai", "bachelors");
        let scorer = Scorer::new(ScoreMode::RescaleToActiveFilters);

        // Age only: full marks against a 25-point denominator
        let filters = FilterCriteria::default();
        assert_eq!(scorer.score(&profile, &filters), 100);

        // Age + religion matched, location missed: 50 / 75
        let filters = filters.with_religion("islam").with_location("Paris");
        assert_eq!(scorer.score(&profile, &filters), 67);

        // Age missed, religion matched, location missed: 25 / 75
        let filters = filters.with_age_range(40, 50);
        assert_eq!(scorer.score(&profile, &filters), 33);
    }

    #[test]
    fn test_default_scorer_is_fixed() {
        assert_eq!(Scorer::default().mode(), ScoreMode::Fixed100);
    }
}
