use std::path::PathBuf;

use crate::error::{Result, SemtagError};
use crate::git::RepositoryBackend;
use crate::version::{SemanticVersion, VersionBump};

/// Repository facts discovered over the course of one invocation.
///
/// One instance is owned by one [TagVersionManager]; nothing survives past
/// the invocation and nothing is shared between invocations.
#[derive(Debug)]
pub struct RepositoryTagState {
    /// Filesystem location of the repository, set once at start
    pub working_path: PathBuf,
    /// Whether the push remote exists, discovered by preflight
    pub has_remote: bool,
    /// Whether the repository has at least one tag, discovered lazily
    pub has_any_tag: bool,
    /// The most recently created tag; empty until resolved
    pub current_tag: String,
    /// Frozen prefix convention: Some(true) once a 'v'-prefixed current tag
    /// has been seen, Some(false) for a bare one, None before any tag was
    /// parsed. Never changes again within the invocation.
    pub uses_prefix: Option<bool>,
    /// Whether the degraded describe-style ordering had to be used
    pub used_fallback_ordering: bool,
    resolved: bool,
}

impl RepositoryTagState {
    fn new(working_path: PathBuf) -> Self {
        RepositoryTagState {
            working_path,
            has_remote: false,
            has_any_tag: false,
            current_tag: String::new(),
            uses_prefix: None,
            used_fallback_ordering: false,
            resolved: false,
        }
    }
}

/// Outcome of an initialization request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// The seed tag that was created and pushed
    Created(String),
    /// The repository already had tags; the existing current tag
    AlreadyInitialized(String),
}

/// State machine over one repository's tag set.
///
/// Sequences every operation through the [RepositoryBackend] collaborator:
/// preflight checks, current-tag resolution, successor computation, and the
/// create/push and delete-local/delete-remote pairs. Multi-step operations
/// never roll back; a failure of the second step surfaces an error naming
/// which side is left inconsistent.
pub struct TagVersionManager<B: RepositoryBackend> {
    backend: B,
    state: RepositoryTagState,
}

impl<B: RepositoryBackend> TagVersionManager<B> {
    pub fn new(backend: B, working_path: PathBuf) -> Self {
        TagVersionManager {
            backend,
            state: RepositoryTagState::new(working_path),
        }
    }

    /// Repository facts discovered so far
    pub fn state(&self) -> &RepositoryTagState {
        &self.state
    }

    /// The resolved current tag; empty when the repository has no tags
    pub fn current_tag(&self) -> &str {
        &self.state.current_tag
    }

    /// Confirm the path is a working tree with the expected remote.
    ///
    /// Both failures are structural for this invocation; nothing retries
    /// them.
    pub fn preflight(&mut self) -> Result<()> {
        if !self.backend.is_working_tree()? {
            return Err(SemtagError::NotARepository(
                self.state.working_path.display().to_string(),
            ));
        }

        if !self.backend.has_remote_origin()? {
            return Err(SemtagError::NoRemote("origin".to_string()));
        }
        self.state.has_remote = true;

        Ok(())
    }

    /// Determine the most recently created tag, or empty if there are none.
    ///
    /// An empty tag set is the valid "uninitialized" state, not an error.
    /// Prefers commit-time ordering; when that query is unavailable in the
    /// current environment the describe-style fallback is used and recorded
    /// in the state so the caller can surface the degraded mode. Freezes the
    /// prefix convention from the resolved tag's first character.
    pub fn resolve_current_tag(&mut self) -> Result<String> {
        self.state.has_any_tag = self.backend.has_any_tags()?;
        if !self.state.has_any_tag {
            self.state.current_tag.clear();
            self.state.resolved = true;
            return Ok(String::new());
        }

        let tag = match self.backend.most_recent_tag_by_commit_time() {
            Ok(Some(tag)) => tag,
            Ok(None) => String::new(),
            Err(_) => {
                self.state.used_fallback_ordering = true;
                self.backend.most_recent_tag_fallback()?.unwrap_or_default()
            }
        };

        if !tag.is_empty() && self.state.uses_prefix.is_none() {
            self.state.uses_prefix = Some(tag.starts_with('v'));
        }

        self.state.current_tag = tag.clone();
        self.state.resolved = true;
        Ok(tag)
    }

    fn require_current_tag(&self) -> Result<&str> {
        if !self.state.resolved || self.state.current_tag.is_empty() {
            return Err(SemtagError::NotInitialized);
        }
        Ok(&self.state.current_tag)
    }

    fn format_tag(&self, version: &SemanticVersion) -> String {
        if self.state.uses_prefix == Some(true) {
            format!("v{}", version)
        } else {
            version.to_string()
        }
    }

    /// Compute the successor tag for a major/minor/patch bump.
    ///
    /// Requires a resolved, non-empty current tag. The result is a normal
    /// release formatted with the frozen prefix convention.
    pub fn compute_bump(&self, kind: VersionBump) -> Result<String> {
        let current = self.require_current_tag()?;
        let version = SemanticVersion::parse(current)?;
        Ok(self.format_tag(&version.bump(kind)))
    }

    /// Compute a pre-release tag for the current version line.
    ///
    /// The numeric components are taken from the current tag unchanged; only
    /// the label is appended.
    pub fn compute_pre_release(&self, label: &str) -> Result<String> {
        if label.is_empty() {
            return Err(SemtagError::invalid_label("label must not be empty"));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        {
            return Err(SemtagError::invalid_label(format!(
                "'{}' may only contain ASCII letters, digits, '-' and '.'",
                label
            )));
        }

        let current = self.require_current_tag()?;
        let version = SemanticVersion::parse(current)?;
        Ok(self.format_tag(&version.with_pre_release(label)))
    }

    /// Validate an explicit user-supplied tag, then create and push it.
    ///
    /// The tag is trusted verbatim once it is well-formed; it neither
    /// consults nor alters the prefix convention.
    pub fn apply_explicit_tag(&self, tag: &str) -> Result<()> {
        SemanticVersion::validate_format(tag)?;
        self.commit(tag)
    }

    /// Create a tag and push it to the remote, in that order.
    ///
    /// If the push fails after the tag was created, the local tag is left in
    /// place and the error says so; re-running the push or deleting the tag
    /// is up to the caller.
    pub fn commit(&self, tag: &str) -> Result<()> {
        self.backend.create_tag(tag)?;
        self.backend.push_tag(tag).map_err(|e| {
            note_partial(
                e,
                &format!("tag '{}' was created locally and is left in place", tag),
            )
        })?;
        Ok(())
    }

    /// Delete the current tag locally, then on the remote.
    ///
    /// If the remote deletion fails after the local one succeeded, the tag
    /// is not re-created locally; the error names the remote side.
    pub fn delete_last(&mut self) -> Result<String> {
        let tag = self.require_current_tag()?.to_string();

        self.backend.delete_tag_local(&tag)?;
        self.backend.delete_tag_remote(&tag).map_err(|e| {
            note_partial(
                e,
                &format!(
                    "tag '{}' was deleted locally but may still exist on the remote",
                    tag
                ),
            )
        })?;

        // The previous tag is unknown now; force re-resolution before any
        // further computation.
        self.state.current_tag.clear();
        self.state.resolved = false;
        Ok(tag)
    }

    /// Seed an uninitialized repository with tag 0.0.0.
    ///
    /// The seed establishes the prefix convention for all future
    /// invocations. Idempotent: a repository that already has tags is
    /// reported as-is and nothing is created.
    pub fn initialize(&mut self, no_prefix: bool) -> Result<InitOutcome> {
        if self.backend.has_any_tags()? {
            let existing = self.resolve_current_tag()?;
            return Ok(InitOutcome::AlreadyInitialized(existing));
        }

        let seed = if no_prefix { "0.0.0" } else { "v0.0.0" };
        self.commit(seed)?;

        self.state.has_any_tag = true;
        self.state.current_tag = seed.to_string();
        self.state.uses_prefix = Some(!no_prefix);
        self.state.resolved = true;
        Ok(InitOutcome::Created(seed.to_string()))
    }
}

/// Extend a backend error's operation text with what partial state remains
fn note_partial(err: SemtagError, note: &str) -> SemtagError {
    match err {
        SemtagError::Backend { operation, source } => SemtagError::Backend {
            operation: format!("{} ({})", operation, note),
            source,
        },
        other => other,
    }
}
