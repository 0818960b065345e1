//! Git operations abstraction layer
//!
//! Every interaction with the version-control tool goes through the
//! [RepositoryBackend] trait so the tag state machine in [crate::manager]
//! can be tested without a real repository.
//!
//! Implementations:
//!
//! - [repository::Git2Backend]: the real implementation using the `git2` crate
//! - [mock::MockBackend]: a scripted implementation for testing

pub mod mock;
pub mod repository;

pub use mock::MockBackend;
pub use repository::Git2Backend;

use crate::error::Result;

/// Operations the tag manager needs from the version-control tool.
///
/// A backend is bound to one repository (and one push remote) at
/// construction time; the tool is single-threaded and runs one invocation
/// against one repository, so implementations are not required to be
/// `Send` or `Sync`.
pub trait RepositoryBackend {
    /// Whether the backend's path is a version-controlled working tree
    fn is_working_tree(&self) -> Result<bool>;

    /// Whether the push remote (normally "origin") is configured
    fn has_remote_origin(&self) -> Result<bool>;

    /// Whether the repository has at least one tag.
    ///
    /// An empty tag set is `Ok(false)`, never an error, at this layer.
    fn has_any_tags(&self) -> Result<bool>;

    /// The tag whose commit is last by commit time.
    ///
    /// Primary ordering source. Returns `Ok(None)` when there are no tags.
    /// When more than one tag points at the single most recent commit, the
    /// first tag in the backend's listing order wins; see the manager tests
    /// for the known divergence from the fallback query in that case.
    fn most_recent_tag_by_commit_time(&self) -> Result<Option<String>>;

    /// Degraded-mode ordering source: the nearest tag reachable from HEAD,
    /// in the style of `git describe --tags --abbrev=0`.
    ///
    /// Used only when the commit-time query is unavailable. Can disagree
    /// with commit-time ordering when a commit carries more than one tag.
    fn most_recent_tag_fallback(&self) -> Result<Option<String>>;

    /// Create a lightweight tag on the current HEAD commit
    fn create_tag(&self, tag: &str) -> Result<()>;

    /// Push an existing local tag to the remote
    fn push_tag(&self, tag: &str) -> Result<()>;

    /// Delete a tag from the local repository
    fn delete_tag_local(&self, tag: &str) -> Result<()>;

    /// Delete a tag from the remote
    fn delete_tag_remote(&self, tag: &str) -> Result<()>;
}
