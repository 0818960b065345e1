use std::collections::HashMap;
use std::path::Path;

use git2::Repository;

use crate::error::{Result, SemtagError};
use crate::git::RepositoryBackend;

/// Real backend over a git2 repository.
///
/// Bound to one repository and one push remote for the lifetime of the
/// invocation.
pub struct Git2Backend {
    repo: Repository,
    remote: String,
}

impl Git2Backend {
    /// Open the repository at (or above) the given path.
    ///
    /// # Arguments
    /// * `path` - Where to start repository discovery
    /// * `remote` - Name of the push remote (normally "origin")
    ///
    /// # Returns
    /// * `Ok(Git2Backend)` - Successfully opened repository
    /// * `Err(SemtagError::NotARepository)` - If no repository is found
    pub fn open<P: AsRef<Path>>(path: P, remote: impl Into<String>) -> Result<Self> {
        let repo = Repository::discover(path.as_ref())
            .map_err(|_| SemtagError::NotARepository(path.as_ref().display().to_string()))?;

        Ok(Git2Backend {
            repo,
            remote: remote.into(),
        })
    }

    /// Open the repository containing the process working directory
    pub fn from_current_dir(remote: impl Into<String>) -> Result<Self> {
        Self::open(".", remote)
    }

    fn remote_callbacks() -> git2::RemoteCallbacks<'static> {
        let mut callbacks = git2::RemoteCallbacks::new();

        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                let key_paths = [
                    format!("{}/.ssh/id_ed25519", home),
                    format!("{}/.ssh/id_rsa", home),
                    format!("{}/.ssh/id_ecdsa", home),
                ];

                for key_path in &key_paths {
                    let path = std::path::Path::new(key_path);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(
                            username_from_url.unwrap_or("git"),
                            None,
                            path,
                            None,
                        ) {
                            return Ok(cred);
                        }
                    }
                }

                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });

        // Surface per-reference rejections as push failures
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                Err(git2::Error::from_str(&format!(
                    "push rejected for {}: {}",
                    refname, status
                )))
            } else {
                Ok(())
            }
        });

        callbacks
    }

    fn push_refspec(&self, refspec: &str, operation: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(&self.remote)
            .map_err(|e| SemtagError::backend(operation.to_string(), e))?;

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(Self::remote_callbacks());

        remote
            .push(&[refspec], Some(&mut push_options))
            .map_err(|e| SemtagError::backend(operation.to_string(), e))
    }

    /// Commit time of the commit a tag reference points at.
    ///
    /// Annotated tags are peeled through to their target commit. Tags that
    /// do not resolve to a commit are skipped by returning None.
    fn tag_commit_time(&self, tag_name: &str) -> Option<i64> {
        let reference = self
            .repo
            .find_reference(&format!("refs/tags/{}", tag_name))
            .ok()?;
        let commit = reference.peel_to_commit().ok()?;
        Some(commit.time().seconds())
    }
}

impl RepositoryBackend for Git2Backend {
    fn is_working_tree(&self) -> Result<bool> {
        Ok(!self.repo.is_bare())
    }

    fn has_remote_origin(&self) -> Result<bool> {
        match self.repo.find_remote(&self.remote) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(SemtagError::backend(
                format!("lookup of remote '{}'", self.remote),
                e,
            )),
        }
    }

    fn has_any_tags(&self) -> Result<bool> {
        let tags = self
            .repo
            .tag_names(None)
            .map_err(|e| SemtagError::backend("tag listing", e))?;
        Ok(tags.iter().flatten().next().is_some())
    }

    fn most_recent_tag_by_commit_time(&self) -> Result<Option<String>> {
        let tags = self
            .repo
            .tag_names(None)
            .map_err(|e| SemtagError::backend("tag listing", e))?;

        let mut best: Option<(i64, String)> = None;
        for name in tags.iter().flatten() {
            let Some(time) = self.tag_commit_time(name) else {
                continue;
            };
            // Strict comparison: when several tags share the most recent
            // commit, the first one in listing order wins.
            let newer = match &best {
                Some((best_time, _)) => time > *best_time,
                None => true,
            };
            if newer {
                best = Some((time, name.to_string()));
            }
        }

        Ok(best.map(|(_, name)| name))
    }

    fn most_recent_tag_fallback(&self) -> Result<Option<String>> {
        // Nearest tagged commit reachable from HEAD, like
        // `git describe --tags --abbrev=0`
        let head = self
            .repo
            .head()
            .map_err(|e| SemtagError::backend("HEAD lookup", e))?;
        let head_oid = match head.target() {
            Some(oid) => oid,
            None => return Ok(None),
        };

        let tags = self
            .repo
            .tag_names(None)
            .map_err(|e| SemtagError::backend("tag listing", e))?;

        let mut tagged_commits = HashMap::new();
        for name in tags.iter().flatten() {
            if let Ok(reference) = self.repo.find_reference(&format!("refs/tags/{}", name)) {
                if let Ok(commit) = reference.peel_to_commit() {
                    tagged_commits.entry(commit.id()).or_insert_with(|| name.to_string());
                }
            }
        }

        let mut revwalk = self
            .repo
            .revwalk()
            .map_err(|e| SemtagError::backend("history walk", e))?;
        revwalk
            .push(head_oid)
            .map_err(|e| SemtagError::backend("history walk", e))?;

        for oid in revwalk.flatten() {
            if let Some(name) = tagged_commits.get(&oid) {
                return Ok(Some(name.clone()));
            }
        }

        Ok(None)
    }

    fn create_tag(&self, tag: &str) -> Result<()> {
        let operation = format!("creation of tag '{}'", tag);
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| SemtagError::backend(operation.clone(), e))?;

        self.repo
            .tag_lightweight(tag, head.as_object(), false)
            .map_err(|e| SemtagError::backend(operation, e))?;
        Ok(())
    }

    fn push_tag(&self, tag: &str) -> Result<()> {
        self.push_refspec(
            &format!("refs/tags/{}:refs/tags/{}", tag, tag),
            &format!("push of tag '{}'", tag),
        )
    }

    fn delete_tag_local(&self, tag: &str) -> Result<()> {
        self.repo
            .tag_delete(tag)
            .map_err(|e| SemtagError::backend(format!("local deletion of tag '{}'", tag), e))
    }

    fn delete_tag_remote(&self, tag: &str) -> Result<()> {
        // An empty source side of the refspec deletes the remote reference
        self.push_refspec(
            &format!(":refs/tags/{}", tag),
            &format!("remote deletion of tag '{}'", tag),
        )
    }
}
