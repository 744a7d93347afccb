//! Core types for resource reconciliation

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a resource kind reacts to a change in desired state
///
/// Fixed per kind at design time, never detected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutability {
    /// The remote API accepts a partial update against the existing identifier
    InPlace,
    /// Any change requires delete-then-create, producing a new identifier
    ReplaceOnly,
    /// Replace-only, but gated on a content digest of a local artifact
    ContentGated,
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InPlace => write!(f, "in-place"),
            Self::ReplaceOnly => write!(f, "replace-only"),
            Self::ContentGated => write!(f, "content-gated"),
        }
    }
}

/// Where a resource instance sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Desired state known, no remote identifier
    Planned,
    /// Remote identifier known, observed state may be stale
    Bound,
    /// The remote side reported the identifier as not found
    Orphaned,
}

impl LifecycleState {
    /// Derive the state from a held identifier
    pub fn from_id(id: &str) -> Self {
        if id.is_empty() {
            Self::Planned
        } else {
            Self::Bound
        }
    }
}

/// Result of reading a resource by identifier
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<R> {
    /// The resource exists; the model was fully overwritten from the response
    Found(R),
    /// 404: the caller should drop its binding
    NotFound,
}

impl<R> ReadOutcome<R> {
    /// Check if the read reported not-found
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Convert into an `Option`
    pub fn found(self) -> Option<R> {
        match self {
            Self::Found(r) => Some(r),
            Self::NotFound => None,
        }
    }
}

/// What reconciliation would do for one resource instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// No remote counterpart yet
    Create,
    /// Observed and desired agree
    NoChange,
    /// Patch against the existing identifier
    UpdateInPlace,
    /// Delete then create, identifier changes
    Replace,
    /// Artifact digest changed: delete then upload
    Reupload,
    /// Declared nowhere, bound remotely
    Delete,
}

impl Action {
    /// Check if the action issues remote calls
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// Check if the action changes the remote identifier
    pub fn changes_identifier(&self) -> bool {
        matches!(self, Self::Create | Self::Replace | Self::Reupload | Self::Delete)
    }

    /// Symbol used when rendering plans
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Create => "+",
            Self::NoChange => "=",
            Self::UpdateInPlace => "~",
            Self::Replace | Self::Reupload => "-/+",
            Self::Delete => "-",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::NoChange => write!(f, "no change"),
            Self::UpdateInPlace => write!(f, "update in place"),
            Self::Replace => write!(f, "replace"),
            Self::Reupload => write!(f, "re-upload"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Result of applying one resource instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// No changes needed
    NoChange,
    /// Resource was created
    Created,
    /// Resource was patched in place
    Updated,
    /// Resource was deleted and recreated under a new identifier
    Replaced { previous_id: String },
    /// Resource was removed
    Removed,
    /// Apply failed
    Failed { error: String },
    /// Apply was skipped
    Skipped { reason: String },
}

impl ApplyResult {
    /// Check if the result represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Check if the result represents a change
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Self::Created | Self::Updated | Self::Replaced { .. } | Self::Removed
        )
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub created: usize,
    pub updated: usize,
    pub replaced: usize,
    pub removed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub no_change: usize,
}

impl ExecuteSummary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.updated + self.replaced + self.removed
    }

    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of resources processed
    pub fn total(&self) -> usize {
        self.total_changes() + self.skipped + self.failed + self.no_change
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: &ExecuteSummary) {
        self.created += other.created;
        self.updated += other.updated;
        self.replaced += other.replaced;
        self.removed += other.removed;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.no_change += other.no_change;
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::NoChange => self.no_change += 1,
            ApplyResult::Created => self.created += 1,
            ApplyResult::Updated => self.updated += 1,
            ApplyResult::Replaced { .. } => self.replaced += 1,
            ApplyResult::Removed => self.removed += 1,
            ApplyResult::Failed { .. } => self.failed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}
