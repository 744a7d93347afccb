//! Execution engine - reconciles instances of one kind in parallel
//!
//! Each instance runs its own lifecycle sequentially. Distinct instances are
//! independent and may run concurrently on a rayon pool.

use crate::client::RemoteClient;
use crate::context::ProgressCallback;
use crate::error::Error;
use crate::lifecycle::Lifecycle;
use crate::planner::{ExecutionPlan, Instance};
use crate::resource::Resource;
use crate::types::{ApplyResult, ReadOutcome};
use log::warn;
use rayon::prelude::*;

/// Options for execution
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Don't make changes, just show what would happen
    pub dry_run: bool,
    /// Number of parallel jobs
    pub jobs: usize,
    /// Re-read bound resources before reconciling
    pub refresh: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: 4,
            refresh: true,
        }
    }
}

/// What happened to one instance, and the state to persist for it
#[derive(Debug, Clone)]
pub struct Outcome<R> {
    pub key: String,
    pub result: ApplyResult,
    /// `None` means the instance has no remote counterpart any more
    pub state: Option<R>,
}

/// Result of refreshing one bound instance
#[derive(Debug, Clone, PartialEq)]
pub enum Refreshed<R> {
    /// Fresh observed state
    Current(R),
    /// Remote side reported not found; drop the binding
    Orphaned,
    /// Read failed; the held state is kept as-is
    Failed { held: R, error: String },
}

/// Reconcile every instance in the plan
///
/// Results come back in plan order.
pub fn execute<R, C, P>(
    client: &C,
    plan: ExecutionPlan<R>,
    opts: &ExecuteOptions,
    progress: &mut P,
) -> Vec<Outcome<R>>
where
    R: Resource,
    C: RemoteClient + ?Sized,
    P: ProgressCallback,
{
    if plan.is_empty() {
        return Vec::new();
    }

    progress.on_batch_start(R::KIND, plan.total_resources());
    let lifecycle = Lifecycle::new(client);
    let outcomes = run_all(opts.jobs, plan.instances, |instance| {
        apply_instance(&lifecycle, instance, opts)
    });

    for outcome in &outcomes {
        progress.on_resource_complete(&outcome.key, &outcome.result);
    }
    progress.on_batch_complete();

    outcomes
}

/// Re-read every held instance
pub fn refresh<R, C>(client: &C, held: Vec<(String, R)>, jobs: usize) -> Vec<(String, Refreshed<R>)>
where
    R: Resource,
    C: RemoteClient + ?Sized,
{
    let lifecycle = Lifecycle::new(client);
    run_all(jobs, held, |(key, resource)| {
        let refreshed = match lifecycle.read(&resource) {
            Ok(ReadOutcome::Found(current)) => Refreshed::Current(current),
            Ok(ReadOutcome::NotFound) => Refreshed::Orphaned,
            Err(e) => {
                warn!("Failed to refresh {} {}: {}", R::KIND, key, e);
                Refreshed::Failed {
                    held: resource,
                    error: e.to_string(),
                }
            }
        };
        (key, refreshed)
    })
}

fn run_all<T, O, F>(jobs: usize, items: Vec<T>, f: F) -> Vec<O>
where
    T: Send,
    O: Send,
    F: Fn(T) -> O + Sync + Send,
{
    if jobs <= 1 || items.len() <= 1 {
        return items.into_iter().map(f).collect();
    }

    match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
        Ok(pool) => pool.install(|| items.into_par_iter().map(&f).collect()),
        Err(e) => {
            warn!("Failed to create thread pool, running sequentially: {}", e);
            items.into_iter().map(f).collect()
        }
    }
}

/// Apply a single instance
fn apply_instance<R, C>(lifecycle: &Lifecycle<'_, C>, instance: Instance<R>, opts: &ExecuteOptions) -> Outcome<R>
where
    R: Resource,
    C: RemoteClient + ?Sized,
{
    let Instance {
        key,
        observed,
        desired,
    } = instance;

    if opts.dry_run {
        return Outcome {
            key,
            result: ApplyResult::Skipped {
                reason: "Dry run".into(),
            },
            state: observed,
        };
    }

    let Some(desired) = desired else {
        let Some(mut observed) = observed else {
            return Outcome {
                key,
                result: ApplyResult::NoChange,
                state: None,
            };
        };
        let result = match lifecycle.delete(&mut observed) {
            Ok(()) => ApplyResult::Removed,
            Err(e) => failed::<R>(&key, &e),
        };
        return Outcome {
            key,
            result,
            state: None,
        };
    };

    let observed = match observed {
        Some(held) if opts.refresh => match lifecycle.read(&held) {
            Ok(ReadOutcome::Found(current)) => Some(current),
            Ok(ReadOutcome::NotFound) => None,
            Err(e) => {
                return Outcome {
                    result: failed::<R>(&key, &e),
                    key,
                    state: Some(held),
                };
            }
        },
        other => other,
    };

    match lifecycle.reconcile(observed.as_ref(), &desired) {
        Ok((state, result)) => Outcome {
            key,
            result,
            state: Some(state),
        },
        Err(e) => {
            let result = failed::<R>(&key, &e);
            let state = match e {
                Error::ReplaceIncomplete { .. } => None,
                _ => observed,
            };
            Outcome { key, result, state }
        }
    }
}

fn failed<R: Resource>(key: &str, error: &Error) -> ApplyResult {
    warn!("Failed to reconcile {} {}: {}", R::KIND, key, error);
    ApplyResult::Failed {
        error: error.to_string(),
    }
}
