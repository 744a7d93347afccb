//! Execution engine - vapi-sync executor with UI integration

use colored::Colorize;
use declarative::{
    ApplyResult, ConfirmCallback, ExecuteOptions, ExecuteSummary, ExecutionPlan, ProgressCallback,
    Refreshed, RemoteClient, Resource, execute, refresh,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::time::Duration;

use super::selects;
use crate::ui;

// ============================================================================
// Per-kind Operations
// ============================================================================

/// Reconcile one kind and fold the outcomes back into held state
///
/// Instances not selected by `target` are left alone. An outcome without
/// state drops its binding; everything else replaces the held model.
pub fn apply_kind<R, C, P>(
    client: &C,
    section: &str,
    declared: &BTreeMap<String, R>,
    held: &mut BTreeMap<String, R>,
    target: Option<&str>,
    opts: &ExecuteOptions,
    progress: &mut P,
) -> ExecuteSummary
where
    R: Resource,
    C: RemoteClient + ?Sized,
    P: ProgressCallback,
{
    let plan = ExecutionPlan::pair(held.clone(), declared.clone()).filter_by_target(section, target);

    let mut summary = ExecuteSummary::default();
    for outcome in execute(client, plan, opts, progress) {
        summary.add_result(&outcome.result);
        match outcome.state {
            Some(state) => {
                held.insert(outcome.key, state);
            }
            None => {
                held.remove(&outcome.key);
            }
        }
    }
    summary
}

/// Counts from refreshing one kind
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RefreshSummary {
    pub current: usize,
    pub orphaned: usize,
    pub failed: usize,
}

impl RefreshSummary {
    pub fn merge(&mut self, other: &RefreshSummary) {
        self.current += other.current;
        self.orphaned += other.orphaned;
        self.failed += other.failed;
    }
}

/// Re-read every bound instance of one kind selected by `target`
///
/// Orphans are dropped from `held`; failed reads keep the held model.
pub fn refresh_kind<R, C>(
    client: &C,
    section: &str,
    held: &mut BTreeMap<String, R>,
    target: Option<&str>,
    jobs: usize,
) -> RefreshSummary
where
    R: Resource,
    C: RemoteClient + ?Sized,
{
    let selected: Vec<(String, R)> = held
        .iter()
        .filter(|(key, r)| !r.id().is_empty() && selects::<R>(section, key, target))
        .map(|(key, r)| (key.clone(), r.clone()))
        .collect();

    let mut summary = RefreshSummary::default();
    for (key, refreshed) in refresh(client, selected, jobs) {
        match refreshed {
            Refreshed::Current(current) => {
                summary.current += 1;
                held.insert(key, current);
            }
            Refreshed::Orphaned => {
                log::warn!("{section}.{key} no longer exists remotely, dropping it from state");
                summary.orphaned += 1;
                held.remove(&key);
            }
            Refreshed::Failed { error, .. } => {
                log::warn!("Could not refresh {section}.{key}: {error}");
                summary.failed += 1;
            }
        }
    }
    summary
}

// ============================================================================
// Progress and Confirmation
// ============================================================================

/// Spinner per kind, one line per finished instance
#[derive(Default)]
pub struct TerminalProgress {
    bar: Option<ProgressBar>,
    section: String,
}

impl ProgressCallback for TerminalProgress {
    fn on_batch_start(&mut self, kind: &str, count: usize) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("  {spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.set_message(format!("Applying {count} {kind} resource(s)..."));
        bar.enable_steady_tick(Duration::from_millis(100));
        self.section = kind.to_string();
        self.bar = Some(bar);
    }

    fn on_resource_complete(&mut self, key: &str, result: &ApplyResult) {
        let line = format!(
            "    {} {}.{} {}",
            ui::result_symbol(result),
            self.section,
            key,
            ui::describe_result(result).dimmed()
        );
        match &self.bar {
            Some(bar) => bar.println(line),
            None => println!("{line}"),
        }
    }

    fn on_batch_complete(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Interactive yes/no prompt
///
/// Declines when stdin is not a terminal, so unattended runs need `--yes`.
pub struct PromptConfirm;

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        if !console::user_attended() {
            ui::warn("Not running in a terminal; pass --yes to proceed");
            return false;
        }

        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Print final summary
pub fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.is_success() {
        println!("  {} Resources are in sync!", "✓".green().bold());
    } else {
        println!("  {} Apply finished with errors", "⚠".yellow().bold());
    }

    if summary.created > 0 {
        println!("    • {} resources created", summary.created);
    }
    if summary.updated > 0 {
        println!("    • {} resources updated in place", summary.updated);
    }
    if summary.replaced > 0 {
        println!("    • {} resources replaced", summary.replaced);
    }
    if summary.removed > 0 {
        println!("    • {} resources deleted", summary.removed);
    }
    if summary.skipped > 0 {
        println!("    • {} resources skipped", summary.skipped);
    }
    if summary.failed > 0 {
        println!("    • {} {} failed", summary.failed, "resources".red());
    }
}
