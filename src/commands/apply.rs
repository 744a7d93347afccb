use anyhow::Result;
use colored::Colorize;
use declarative::{
    ConfirmCallback, ExecuteOptions, ExecuteSummary, ProgressCallback, RemoteClient, Resource,
};
use std::collections::BTreeMap;
use std::path::Path;

use super::plan::{build_plans, report_refresh};
use super::{Globals, REFRESH_JOBS, Session};
use crate::Context;
use crate::cli::ApplyArgs;
use crate::config::Manifest;
use crate::engine::differ;
use crate::engine::executor::{PromptConfirm, TerminalProgress, apply_kind, print_summary};
use crate::engine::{KindVisitor, Order, each_kind, validate_target};
use crate::state::SyncState;
use crate::ui;

/// Options for one reconciliation run
#[derive(Debug, Clone)]
pub struct RunOptions<'a> {
    pub target: Option<&'a str>,
    pub dry_run: bool,
    pub yes: bool,
    pub jobs: usize,
    pub order: Order,
    pub prompt: &'a str,
}

/// Make remote resources match the manifest
pub fn run(ctx: &Context, globals: &Globals, args: ApplyArgs) -> Result<()> {
    validate_target(args.target.as_deref())?;
    let mut session = Session::open(globals)?;
    let client = session.client()?;

    if !ctx.quiet {
        ui::header("vapi-sync apply");
        ui::kv("Manifest", &globals.manifest.display().to_string());
        ui::kv("State", &session.state_path().display().to_string());
        ui::kv(
            "Resources",
            &format!(
                "{} declared, {} held",
                session.manifest.total(),
                session.state.total()
            ),
        );
    }

    let opts = RunOptions {
        target: args.target.as_deref(),
        dry_run: args.dry_run,
        yes: args.yes,
        jobs: args.jobs.max(1),
        order: Order::Dependencies,
        prompt: "Apply these changes?",
    };

    let state_path = session.state_path.clone();
    let summary = reconcile(
        &client,
        &session.manifest,
        &mut session.state,
        &state_path,
        &opts,
        &mut TerminalProgress::default(),
        &mut PromptConfirm,
    )?;

    finish(summary)
}

/// Fail the command when any resource failed
pub fn finish(summary: Option<ExecuteSummary>) -> Result<()> {
    match summary {
        Some(summary) if !summary.is_success() => {
            anyhow::bail!("{} resource(s) failed to apply", summary.failed)
        }
        _ => Ok(()),
    }
}

/// Refresh, plan, confirm, then apply one kind at a time
///
/// State is saved after every kind. Returns `None` when nothing was
/// applied: no changes, a dry run, or a declined prompt.
pub fn reconcile<C, P, F>(
    client: &C,
    manifest: &Manifest,
    state: &mut SyncState,
    state_path: &Path,
    opts: &RunOptions<'_>,
    progress: &mut P,
    confirm: &mut F,
) -> Result<Option<ExecuteSummary>>
where
    C: RemoteClient + ?Sized,
    P: ProgressCallback,
    F: ConfirmCallback,
{
    let (plans, refreshed) = build_plans(
        Some(client),
        manifest,
        state,
        opts.order,
        opts.target,
        REFRESH_JOBS.min(opts.jobs),
    )?;
    report_refresh(&refreshed);

    if refreshed.orphaned > 0 && !opts.dry_run {
        state.touch(state_path)?;
    }

    differ::display_plan(&plans, false);
    if !differ::summarize(&plans).has_changes() {
        return Ok(None);
    }

    if opts.dry_run {
        println!();
        println!("  {} Dry run - no changes made", "ℹ".blue());
        return Ok(None);
    }

    if !opts.yes && !confirm.confirm(opts.prompt) {
        println!();
        println!("  {} Aborted", "✗".red());
        return Ok(None);
    }

    let mut applier = Applier {
        client,
        target: opts.target,
        opts: ExecuteOptions {
            dry_run: false,
            jobs: opts.jobs,
            refresh: false,
        },
        progress,
        state_path,
        summary: ExecuteSummary::default(),
    };
    each_kind(manifest, state, opts.order, &mut applier)?;

    print_summary(&applier.summary);
    Ok(Some(applier.summary))
}

struct Applier<'a, C: ?Sized, P> {
    client: &'a C,
    target: Option<&'a str>,
    opts: ExecuteOptions,
    progress: &'a mut P,
    state_path: &'a Path,
    summary: ExecuteSummary,
}

impl<C, P> KindVisitor for Applier<'_, C, P>
where
    C: RemoteClient + ?Sized,
    P: ProgressCallback,
{
    fn visit<R: Resource>(
        &mut self,
        section: &'static str,
        declared: &BTreeMap<String, R>,
        held: &mut BTreeMap<String, R>,
    ) -> Result<()> {
        let summary = apply_kind(
            self.client,
            section,
            declared,
            held,
            self.target,
            &self.opts,
            &mut *self.progress,
        );
        self.summary.merge(&summary);
        Ok(())
    }

    fn after_kind(&mut self, _section: &'static str, state: &mut SyncState) -> Result<()> {
        state.touch(self.state_path)
    }
}
