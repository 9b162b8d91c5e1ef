use crate::core::criteria::FilterCriteria;
use crate::core::query::{DirectoryQuery, MAX_PAGE_SIZE};
use crate::models::Profile;
use crate::services::store::ProfileStore;
use thiserror::Error;

/// Directory search failed at the store
///
/// The store's message is carried through untouched; network, validation and
/// permission failures are not told apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct QueryFailure {
    pub message: String,
}

impl QueryFailure {
    pub fn from_store<E: std::error::Error>(err: E) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Profile directory: filtered, newest-first retrieval of candidate profiles
///
/// Every call goes to the store; nothing is cached between searches.
#[derive(Debug, Clone)]
pub struct Directory<S> {
    store: S,
    page_size: usize,
}

impl<S: ProfileStore> Directory<S> {
    pub fn new(store: S) -> Self {
        Self::with_page_size(store, MAX_PAGE_SIZE)
    }

    /// Page sizes above [`MAX_PAGE_SIZE`] are clamped
    pub fn with_page_size(store: S, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Search candidate profiles for `requester`
    ///
    /// Results satisfy every equality/range constraint in `filters`, never
    /// include the requester, are ordered by descending creation time and
    /// hold at most `page_size` records.
    pub async fn search(
        &self,
        requester: &str,
        filters: &FilterCriteria,
    ) -> Result<Vec<Profile>, QueryFailure> {
        let query = DirectoryQuery::build(requester, filters, self.page_size);

        tracing::debug!(
            "Directory query for {}: {} predicates, limit {}",
            requester,
            query.predicates.len(),
            query.limit
        );

        let profiles = self
            .store
            .query_profiles(&query)
            .await
            .map_err(|e| {
                tracing::error!("Directory query failed for {}: {}", requester, e);
                QueryFailure::from_store(e)
            })?;

        Ok(query.enforce(profiles))
    }
}
