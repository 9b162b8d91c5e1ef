// Core search and scoring exports
pub mod criteria;
pub mod directory;
pub mod query;
pub mod scoring;
pub mod session;

pub use criteria::{AgeRange, FilterCriteria, FilterUpdate, ScoreMode};
pub use directory::{Directory, QueryFailure};
pub use query::{DirectoryQuery, Field, Predicate, SortOrder, MAX_PAGE_SIZE};
pub use scoring::{compatibility_score, score, Scorer};
pub use session::SearchSession;
