//! Drift detection between observed and desired models
//!
//! Planning never touches the network. Both models are run through the
//! request mapper and the resulting payloads are compared. The desired
//! payload must equal the one last applied, which catches declared fields
//! that were removed, and must be contained in the observed payload, which
//! catches remote drift without flagging fields the remote fills in.

use crate::checksum::digest;
use crate::error::Result;
use crate::resource::{Payload, Resource};
use crate::types::{Action, Mutability};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A planned change for one resource instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDiff {
    /// Resource kind
    pub kind: String,
    /// Current remote identifier, empty if never created
    pub id: String,
    /// What reconciliation would do
    pub action: Action,
    /// Request payload derived from the observed model
    pub before: Option<serde_json::Value>,
    /// Request payload derived from the desired model
    pub after: Option<serde_json::Value>,
}

impl ResourceDiff {
    /// Compare an observed model (if any) against a desired model
    ///
    /// # Errors
    ///
    /// Fails if either model cannot be request-mapped, including an
    /// unreadable artifact for content-gated kinds.
    pub fn compute<R: Resource>(observed: Option<&R>, desired: &R) -> Result<Self> {
        let after = desired.to_request()?;

        let Some(observed) = observed.filter(|o| !o.id().is_empty()) else {
            return Ok(Self {
                kind: R::KIND.to_string(),
                id: String::new(),
                action: Action::Create,
                before: None,
                after: Some(view(&after, None)),
            });
        };

        let (action, before, after) = match R::MUTABILITY {
            Mutability::ContentGated => {
                let fresh = upload_digest(&after);
                let action = if fresh.is_some() && fresh.as_deref() == observed.checksum() {
                    Action::NoChange
                } else {
                    Action::Reupload
                };
                let before = serde_json::json!({ "checksum": observed.checksum() });
                (action, before, view(&after, fresh.as_deref()))
            }
            mutability => {
                let before = view(&observed.to_request()?, None);
                let after = view(&after, None);
                let unchanged_locally = observed
                    .applied()
                    .is_none_or(|applied| is_subset(applied, &after) && is_subset(&after, applied));
                let action = if unchanged_locally && is_subset(&after, &before) {
                    Action::NoChange
                } else if mutability == Mutability::InPlace {
                    Action::UpdateInPlace
                } else {
                    Action::Replace
                };
                (action, before, after)
            }
        };

        Ok(Self {
            kind: R::KIND.to_string(),
            id: observed.id().to_string(),
            action,
            before: Some(before),
            after: Some(after),
        })
    }

    /// A removal of a bound resource that is no longer declared
    ///
    /// # Errors
    ///
    /// Fails if the observed model cannot be request-mapped.
    pub fn removal<R: Resource>(observed: &R) -> Result<Self> {
        let before = match R::MUTABILITY {
            Mutability::ContentGated => serde_json::json!({ "checksum": observed.checksum() }),
            _ => view(&observed.to_request()?, None),
        };
        Ok(Self {
            kind: R::KIND.to_string(),
            id: observed.id().to_string(),
            action: Action::Delete,
            before: Some(before),
            after: None,
        })
    }

    /// Check if this diff changes anything remotely
    pub fn is_change(&self) -> bool {
        self.action.is_change()
    }
}

/// Decide what reconciliation would do, without remote calls
///
/// # Errors
///
/// Fails if either model cannot be request-mapped.
pub fn plan<R: Resource>(observed: Option<&R>, desired: &R) -> Result<Action> {
    ResourceDiff::compute(observed, desired).map(|d| d.action)
}

fn upload_digest(payload: &Payload) -> Option<String> {
    match payload {
        Payload::Upload(upload) => Some(digest(&upload.content)),
        Payload::Json(_) => None,
    }
}

fn view(payload: &Payload, checksum: Option<&str>) -> serde_json::Value {
    match payload {
        Payload::Json(v) => v.clone(),
        Payload::Upload(upload) => {
            let checksum = checksum
                .map(str::to_string)
                .unwrap_or_else(|| digest(&upload.content));
            serde_json::json!({
                "file": upload.file_name,
                "checksum": checksum,
            })
        }
    }
}

/// Check that every field in `desired` appears in `observed` with the same value
///
/// Fields only the remote side fills in do not count as drift. Arrays are
/// compared element by element and must have the same length, since
/// order is part of the contract.
pub fn is_subset(desired: &serde_json::Value, observed: &serde_json::Value) -> bool {
    use serde_json::Value as J;
    match (desired, observed) {
        (J::Object(d), J::Object(o)) => d
            .iter()
            .all(|(k, dv)| o.get(k).is_some_and(|ov| is_subset(dv, ov))),
        (J::Array(d), J::Array(o)) => {
            d.len() == o.len() && d.iter().zip(o).all(|(dv, ov)| is_subset(dv, ov))
        }
        (J::Number(d), J::Number(o)) => d == o || d.as_f64() == o.as_f64(),
        _ => desired == observed,
    }
}

/// Mark keys that were applied before but are no longer declared
///
/// `update` is the outgoing patch body. Every key present in `applied` and
/// missing from `desired` is sent as `null`, or as an empty list when the
/// applied value was a list, so a partial update clears it remotely.
/// Nested objects are walked the same way.
pub fn mark_removed(
    update: &mut serde_json::Value,
    applied: &serde_json::Value,
    desired: &serde_json::Value,
) {
    use serde_json::Value as J;
    let (Some(update), Some(applied), Some(desired)) =
        (update.as_object_mut(), applied.as_object(), desired.as_object())
    else {
        return;
    };

    for (key, old) in applied {
        match desired.get(key) {
            None => {
                let cleared = if old.is_array() { J::Array(Vec::new()) } else { J::Null };
                update.entry(key.clone()).or_insert(cleared);
            }
            Some(new) => {
                if let Some(target) = update.get_mut(key) {
                    mark_removed(target, old, new);
                }
            }
        }
    }
}

/// Diff summary statistics
#[derive(Debug, Clone, Default)]
pub struct DiffSummary {
    /// Number of resources to create
    pub additions: usize,
    /// Number of resources to delete
    pub removals: usize,
    /// Number of resources to patch in place
    pub updates: usize,
    /// Number of resources to delete and recreate
    pub replacements: usize,
}

impl DiffSummary {
    /// Create a summary from a list of diffs
    pub fn from_diffs(diffs: &[ResourceDiff]) -> Self {
        let mut summary = Self::default();
        for diff in diffs {
            match diff.action {
                Action::Create => summary.additions += 1,
                Action::Delete => summary.removals += 1,
                Action::UpdateInPlace => summary.updates += 1,
                Action::Replace | Action::Reupload => summary.replacements += 1,
                Action::NoChange => {}
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.updates + self.replacements
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

/// Group diffs by resource kind
pub fn group_by_kind(diffs: &[ResourceDiff]) -> BTreeMap<String, Vec<&ResourceDiff>> {
    let mut groups: BTreeMap<String, Vec<&ResourceDiff>> = BTreeMap::new();
    for diff in diffs {
        groups.entry(diff.kind.clone()).or_default().push(diff);
    }
    groups
}
