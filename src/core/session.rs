use crate::core::criteria::{FilterCriteria, FilterUpdate};
use crate::core::directory::QueryFailure;
use crate::models::Profile;

/// State of one search flow: active filters, loading flag, results, error
///
/// Overlapping searches are neither deduplicated nor cancelled. Every
/// resolution is applied in the order it arrives, so the last one to resolve
/// wins, and each one clears the loading flag.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    filters: FilterCriteria,
    profiles: Vec<Profile>,
    loading: bool,
    error: Option<String>,
}

impl SearchSession {
    pub fn new(filters: FilterCriteria) -> Self {
        Self {
            filters,
            ..Default::default()
        }
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_filters(&mut self, update: FilterUpdate) {
        self.filters.merge(update);
    }

    /// Mark a search as issued
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Apply a search outcome. A failure empties the result set and records
    /// the store message for the user.
    pub fn resolve(&mut self, outcome: Result<Vec<Profile>, QueryFailure>) {
        self.loading = false;
        match outcome {
            Ok(profiles) => {
                self.profiles = profiles;
                self.error = None;
            }
            Err(failure) => {
                self.profiles.clear();
                self.error = Some(failure.message);
            }
        }
    }

    pub fn clear_profiles(&mut self) {
        self.profiles.clear();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Take the results out of a finished session
    pub fn into_parts(self) -> (FilterCriteria, Vec<Profile>, Option<String>) {
        (self.filters, self.profiles, self.error)
    }
}
