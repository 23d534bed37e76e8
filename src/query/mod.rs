//! Query layer over the package manager's repository metadata.
//!
//! The core never parses repodata itself; everything comes through the
//! [`RepoQuery`] trait, which is substitutable by a mock returning fixed
//! records in tests. The production implementation drives `dnf`.

mod dnf;

use thiserror::Error;

pub use dnf::DnfQuery;

/// A package record exactly as the query backend reported it.
///
/// Transient: raw records are consumed by normalization and not retained.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawPackage {
    pub name: String,
    pub epoch: String,
    pub version: String,
    pub release: String,
    pub arch: String,
    /// Build timestamp in seconds since the epoch, as dnf prints it.
    pub buildtime: String,
    pub summary: String,
    pub description: String,
}

/// A package group as declared in the repository's comps metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawGroup {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Declared member package names; may reference packages outside the
    /// current repository view.
    pub members: Vec<String>,
}

/// Everything the backend knows about one repository, fetched in one shot.
#[derive(Debug, Clone, Default)]
pub struct RepoSnapshot {
    pub packages: Vec<RawPackage>,
    pub groups: Vec<RawGroup>,
}

/// Failures surfaced by a query backend.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The identifier is unknown to the underlying package manager.
    #[error("unknown repository '{repo_id}'")]
    RepositoryNotFound { repo_id: String },

    /// Any lower-level backend failure, with repository context attached.
    #[error("query backend failed for repository '{repo_id}': {message}")]
    Backend {
        repo_id: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl QueryError {
    pub fn backend(repo_id: &str, message: impl Into<String>) -> Self {
        QueryError::Backend {
            repo_id: repo_id.to_string(),
            message: message.into(),
            source: None,
        }
    }

    pub fn backend_with_source(
        repo_id: &str,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        QueryError::Backend {
            repo_id: repo_id.to_string(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Trait for repository metadata backends.
///
/// One-shot contract: no retries here; retry policy, if any, belongs to the
/// caller.
#[cfg_attr(test, mockall::automock)]
pub trait RepoQuery {
    /// Fetch all package and group records for a repository.
    fn fetch(&self, repo_id: &str) -> Result<RepoSnapshot, QueryError>;
}
