//! Git operations abstraction layer
//!
//! The [Repository] trait covers the handful of read-only queries the tagger
//! needs from the local checkout. Implementations:
//!
//! - [repository::Git2Repository]: real repository through the `git2` crate
//! - [mock::MockRepository]: canned answers for tests
//!
//! ```rust
//! # use gitlab_autotag::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> gitlab_autotag::Result<()> {
//! let described = repo.describe("v[0-9]*")?;
//! let commits = repo.first_parent_log("v1.2.3")?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Read-side git queries used by the tag resolver and release notes.
///
/// All methods return [crate::error::Result]; implementations map a failed
/// describe to [crate::error::AutotagError::TagNotFound].
pub trait Repository {
    /// Most recent tag matching `pattern` reachable from HEAD, in
    /// `git describe --tags` format (`TAG` or `TAG-N-gSHA`).
    ///
    /// # Returns
    /// * `Ok(String)` - The described tag
    /// * `Err(TagNotFound)` - If no tag matches
    fn describe(&self, pattern: &str) -> Result<String>;

    /// Short SHAs of first-parent commits in `since_tag..HEAD`, newest first
    /// (the order `git log --first-parent` prints them).
    fn first_parent_log(&self, since_tag: &str) -> Result<Vec<String>>;

    /// Abbreviated SHA of HEAD
    fn head_short_sha(&self) -> Result<String>;

    /// Tag names matching an optional glob, oldest creation date first.
    fn tags_by_creation(&self, pattern: Option<&str>) -> Result<Vec<String>>;

    /// Names of the configured remotes
    fn remotes(&self) -> Result<Vec<String>>;

    /// Fetch all tags from a remote.
    fn fetch_tags(&self, remote: &str) -> Result<()>;
}
