//! MatchMe Directory - profile search and compatibility scoring for the MatchMe dating app
//!
//! This library provides the filtered profile directory query, the
//! compatibility score shown next to each result, and the profile and chat
//! records the app reads and writes alongside them.

pub mod auth;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    compatibility_score, score, AgeRange, Directory, DirectoryQuery, FilterCriteria, QueryFailure,
    ScoreMode, Scorer, SearchSession,
};
pub use models::{Chat, Message, Profile, ScoredProfile, SearchResponse};
