//! Operation selection, decoupled from argument parsing
//!
//! The flag set is validated in one explicit pass: requesting more than one
//! operation is rejected up front with a ConflictingOperation error, before
//! any git call is made, instead of letting evaluation order pick a winner.

use crate::error::{Result, SemtagError};
use crate::version::VersionBump;

/// The raw flag set, mirroring the CLI arguments without depending on clap
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationRequest {
    pub tag: Option<String>,
    pub major: bool,
    pub minor: bool,
    pub patch: bool,
    pub pre_release: Option<String>,
    pub delete: bool,
    pub init: bool,
    pub init_no_prefix: bool,
}

/// Exactly one operation per invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Default action when no flag is given
    ShowCurrent,
    /// Create and push a user-supplied tag verbatim
    Explicit(String),
    /// Bump one version component
    Bump(VersionBump),
    /// Qualify the current version with a pre-release label
    PreRelease(String),
    /// Delete the last tag locally and on the remote
    DeleteLast,
    /// Seed an empty repository with tag 0.0.0
    Initialize { no_prefix: bool },
}

impl OperationRequest {
    /// Resolve the flag set into the single requested operation.
    ///
    /// # Returns
    /// * `Ok(Operation)` - The one operation to run; `ShowCurrent` when no
    ///   flag was given
    /// * `Err(SemtagError::ConflictingOperation)` - More than one operation
    ///   was requested
    pub fn resolve(&self) -> Result<Operation> {
        let mut requested: Vec<(&str, Operation)> = Vec::new();

        if let Some(tag) = &self.tag {
            requested.push(("--tag", Operation::Explicit(tag.clone())));
        }
        if self.major {
            requested.push(("--major", Operation::Bump(VersionBump::Major)));
        }
        if self.minor {
            requested.push(("--minor", Operation::Bump(VersionBump::Minor)));
        }
        if self.patch {
            requested.push(("--patch", Operation::Bump(VersionBump::Patch)));
        }
        if let Some(label) = &self.pre_release {
            requested.push(("--pre-release", Operation::PreRelease(label.clone())));
        }
        if self.delete {
            requested.push(("--delete", Operation::DeleteLast));
        }
        if self.init {
            requested.push(("--init", Operation::Initialize { no_prefix: false }));
        }
        if self.init_no_prefix {
            requested.push((
                "--init-no-prefix",
                Operation::Initialize { no_prefix: true },
            ));
        }

        match requested.len() {
            0 => Ok(Operation::ShowCurrent),
            1 => Ok(requested.remove(0).1),
            _ => {
                let flags: Vec<&str> = requested.iter().map(|(flag, _)| *flag).collect();
                Err(SemtagError::conflicting(format!(
                    "{} are mutually exclusive, pick one",
                    flags.join(" and ")
                )))
            }
        }
    }
}
