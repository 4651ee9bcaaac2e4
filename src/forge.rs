//! Pull request providers for the environment repository.
//!
//! Protocol clients live behind the [`traits::Forge`] trait; the bundled
//! implementation is a local dry-run provider that logs intended actions.

/// Dry-run provider for offline development and testing.
pub mod local;

/// Common traits for pull request provider abstraction.
pub mod traits;

/// Shared data types for pull request creation and reuse.
pub mod types;
