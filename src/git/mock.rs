use std::cell::RefCell;

use crate::error::{Result, SemtagError};
use crate::git::RepositoryBackend;

/// Scripted backend for testing the tag state machine without git.
///
/// Tags are held newest-last in commit-time order. Every mutating call is
/// recorded so tests can assert on call order (create before push, local
/// delete before remote delete).
pub struct MockBackend {
    working_tree: bool,
    has_origin: bool,
    primary_unavailable: bool,
    fallback_tag: Option<String>,
    fail_create: bool,
    fail_push: bool,
    fail_delete_local: bool,
    fail_delete_remote: bool,
    tags: RefCell<Vec<String>>,
    calls: RefCell<Vec<String>>,
}

impl MockBackend {
    /// Create a mock for a healthy repository with no tags
    pub fn new() -> Self {
        MockBackend {
            working_tree: true,
            has_origin: true,
            primary_unavailable: false,
            fallback_tag: None,
            fail_create: false,
            fail_push: false,
            fail_delete_local: false,
            fail_delete_remote: false,
            tags: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Script the existing tags, newest last in commit-time order
    pub fn set_tags(&mut self, tags: &[&str]) {
        *self.tags.borrow_mut() = tags.iter().map(|t| t.to_string()).collect();
    }

    pub fn set_working_tree(&mut self, value: bool) {
        self.working_tree = value;
    }

    pub fn set_has_origin(&mut self, value: bool) {
        self.has_origin = value;
    }

    /// Make the commit-time ordering query error, forcing the degraded mode
    pub fn set_primary_unavailable(&mut self, value: bool) {
        self.primary_unavailable = value;
    }

    /// Script what the describe-style fallback query returns
    pub fn set_fallback_tag(&mut self, tag: &str) {
        self.fallback_tag = Some(tag.to_string());
    }

    pub fn set_fail_create(&mut self, value: bool) {
        self.fail_create = value;
    }

    pub fn set_fail_push(&mut self, value: bool) {
        self.fail_push = value;
    }

    pub fn set_fail_delete_local(&mut self, value: bool) {
        self.fail_delete_local = value;
    }

    pub fn set_fail_delete_remote(&mut self, value: bool) {
        self.fail_delete_remote = value;
    }

    /// Calls recorded so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Tags currently present in the scripted repository
    pub fn tags(&self) -> Vec<String> {
        self.tags.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn scripted_failure(operation: String) -> SemtagError {
        SemtagError::backend(operation, git2::Error::from_str("scripted failure"))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryBackend for MockBackend {
    fn is_working_tree(&self) -> Result<bool> {
        Ok(self.working_tree)
    }

    fn has_remote_origin(&self) -> Result<bool> {
        Ok(self.has_origin)
    }

    fn has_any_tags(&self) -> Result<bool> {
        Ok(!self.tags.borrow().is_empty())
    }

    fn most_recent_tag_by_commit_time(&self) -> Result<Option<String>> {
        if self.primary_unavailable {
            return Err(Self::scripted_failure("commit-time tag listing".to_string()));
        }
        Ok(self.tags.borrow().last().cloned())
    }

    fn most_recent_tag_fallback(&self) -> Result<Option<String>> {
        if let Some(tag) = &self.fallback_tag {
            return Ok(Some(tag.clone()));
        }
        Ok(self.tags.borrow().last().cloned())
    }

    fn create_tag(&self, tag: &str) -> Result<()> {
        self.record(format!("create {}", tag));
        if self.fail_create {
            return Err(Self::scripted_failure(format!("creation of tag '{}'", tag)));
        }
        self.tags.borrow_mut().push(tag.to_string());
        Ok(())
    }

    fn push_tag(&self, tag: &str) -> Result<()> {
        self.record(format!("push {}", tag));
        if self.fail_push {
            return Err(Self::scripted_failure(format!("push of tag '{}'", tag)));
        }
        Ok(())
    }

    fn delete_tag_local(&self, tag: &str) -> Result<()> {
        self.record(format!("delete-local {}", tag));
        if self.fail_delete_local {
            return Err(Self::scripted_failure(format!(
                "local deletion of tag '{}'",
                tag
            )));
        }
        self.tags.borrow_mut().retain(|t| t != tag);
        Ok(())
    }

    fn delete_tag_remote(&self, tag: &str) -> Result<()> {
        self.record(format!("delete-remote {}", tag));
        if self.fail_delete_remote {
            return Err(Self::scripted_failure(format!(
                "remote deletion of tag '{}'",
                tag
            )));
        }
        Ok(())
    }
}
