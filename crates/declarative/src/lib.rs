//! # Declarative
//!
//! A reconciliation engine that keeps remote resources in line with a
//! locally declared desired state.
//!
//! ## Core Concepts
//!
//! - **Value**: a tri-state scalar (unset, null, present) so an explicit zero
//!   never collapses into "not provided"
//! - **Resource**: a typed tree plus its request and response mappers
//! - **Mutability**: in-place, replace-only, or gated on a content digest
//! - **Lifecycle**: the one state machine that drives create, read, update
//!   and delete for every kind
//! - **ExecutionPlan**: declared and observed instances of one kind, paired
//!   by key and executed in parallel
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{Lifecycle, MockClient, Method, ReadOutcome};
//!
//! let client = MockClient::new();
//! client.expect(Method::Post, "note", 201, r#"{"id":"n-1","text":"hi"}"#);
//!
//! let lifecycle = Lifecycle::new(&client);
//! let created = lifecycle.create(&Note::new("hi"))?;
//! assert_eq!(created.id(), "n-1");
//! ```
//!
//! ## Provider Traits
//!
//! - [`RemoteClient`]: sends one logical operation and returns status + body
//! - [`ProgressCallback`]: receives progress updates
//! - [`ConfirmCallback`]: handles user confirmations

pub mod checksum;
pub mod client;
pub mod context;
pub mod diff;
pub mod error;
pub mod executor;
pub mod lifecycle;
pub mod planner;
pub mod resource;
pub mod types;
pub mod value;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use checksum::{digest, digest_file, read_artifact};
pub use client::{Method, MockClient, RecordedCall, RemoteClient, RemoteResponse, Upload};
pub use context::{AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback};
pub use diff::{group_by_kind, is_subset, mark_removed, plan, DiffSummary, ResourceDiff};
pub use error::{Error, ErrorCategory, Result};
pub use executor::{execute, refresh, ExecuteOptions, Outcome, Refreshed};
pub use lifecycle::Lifecycle;
pub use planner::{parse_target, ExecutionPlan, Instance};
pub use resource::{Payload, Resource};
pub use types::{Action, ApplyResult, ExecuteSummary, LifecycleState, Mutability, ReadOutcome};
pub use value::{deserialize_byte_size, list_from_wire, list_to_wire, Value};
