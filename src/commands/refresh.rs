use anyhow::Result;
use declarative::{RemoteClient, Resource};
use std::collections::BTreeMap;

use super::{Globals, REFRESH_JOBS, Session};
use crate::Context;
use crate::cli::TargetArgs;
use crate::config::Manifest;
use crate::engine::executor::{RefreshSummary, refresh_kind};
use crate::engine::{KindVisitor, Order, each_kind, validate_target};
use crate::state::SyncState;
use crate::ui;

/// Re-read every resource held in state and save what the remote reports
pub fn run(ctx: &Context, globals: &Globals, args: TargetArgs) -> Result<()> {
    validate_target(args.target.as_deref())?;
    let mut session = Session::open(globals)?;
    let client = session.client()?;

    if !ctx.quiet {
        ui::header("vapi-sync refresh");
        ui::kv("State", &session.state_path().display().to_string());
    }

    let summary = refresh_all(
        &client,
        &session.manifest,
        &mut session.state,
        args.target.as_deref(),
        REFRESH_JOBS,
    )?;
    session.save()?;

    println!();
    ui::success(&format!("{} resource(s) up to date", summary.current));
    if summary.orphaned > 0 {
        ui::warn(&format!(
            "{} resource(s) no longer exist remotely and were dropped from state",
            summary.orphaned
        ));
    }
    if summary.failed > 0 {
        ui::warn(&format!(
            "{} resource(s) could not be read; held state kept (run with -v for details)",
            summary.failed
        ));
    }
    Ok(())
}

/// Refresh every kind in dependency order
pub fn refresh_all<C: RemoteClient + ?Sized>(
    client: &C,
    manifest: &Manifest,
    state: &mut SyncState,
    target: Option<&str>,
    jobs: usize,
) -> Result<RefreshSummary> {
    let mut refresher = Refresher {
        client,
        target,
        jobs,
        summary: RefreshSummary::default(),
    };
    each_kind(manifest, state, Order::Dependencies, &mut refresher)?;
    Ok(refresher.summary)
}

struct Refresher<'a, C: ?Sized> {
    client: &'a C,
    target: Option<&'a str>,
    jobs: usize,
    summary: RefreshSummary,
}

impl<C: RemoteClient + ?Sized> KindVisitor for Refresher<'_, C> {
    fn visit<R: Resource>(
        &mut self,
        section: &'static str,
        _declared: &BTreeMap<String, R>,
        held: &mut BTreeMap<String, R>,
    ) -> Result<()> {
        let summary = refresh_kind(self.client, section, held, self.target, self.jobs);
        self.summary.merge(&summary);
        Ok(())
    }
}
