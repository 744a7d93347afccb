use anyhow::{Context as AnyhowContext, Result};
use declarative::{ExecutionPlan, RemoteClient, Resource};
use std::collections::BTreeMap;

use super::{Globals, REFRESH_JOBS, Session};
use crate::Context;
use crate::cli::PlanArgs;
use crate::config::Manifest;
use crate::engine::differ::{self, KindPlan};
use crate::engine::executor::{RefreshSummary, refresh_kind};
use crate::engine::{KindVisitor, Order, each_kind, validate_target};
use crate::state::SyncState;
use crate::ui;

/// Show what apply would change
///
/// Held state is refreshed in memory only; nothing is written.
pub fn run(ctx: &Context, globals: &Globals, args: PlanArgs) -> Result<()> {
    validate_target(args.target.as_deref())?;
    let mut session = Session::open(globals)?;

    if !ctx.quiet {
        ui::header("vapi-sync plan");
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

    let client = if args.no_refresh {
        None
    } else {
        Some(session.client()?)
    };

    let (plans, refreshed) = build_plans(
        client.as_ref(),
        &session.manifest,
        &mut session.state,
        Order::Dependencies,
        args.target.as_deref(),
        REFRESH_JOBS,
    )?;

    report_refresh(&refreshed);
    differ::display_plan(&plans, args.diff);

    if ctx.verbose > 0 {
        let unchanged: usize = plans
            .iter()
            .map(|p| p.diffs.len() - p.changes().count())
            .sum();
        ui::dim(&format!("{unchanged} resource(s) unchanged"));
    }
    Ok(())
}

/// Refresh held state (when a client is given) and diff every kind
pub fn build_plans<C: RemoteClient + ?Sized>(
    client: Option<&C>,
    manifest: &Manifest,
    state: &mut SyncState,
    order: Order,
    target: Option<&str>,
    jobs: usize,
) -> Result<(Vec<KindPlan>, RefreshSummary)> {
    let mut planner = Planner {
        client,
        target,
        jobs,
        refreshed: RefreshSummary::default(),
        plans: Vec::new(),
    };
    each_kind(manifest, state, order, &mut planner)?;
    Ok((planner.plans, planner.refreshed))
}

struct Planner<'a, C: ?Sized> {
    client: Option<&'a C>,
    target: Option<&'a str>,
    jobs: usize,
    refreshed: RefreshSummary,
    plans: Vec<KindPlan>,
}

impl<C: RemoteClient + ?Sized> KindVisitor for Planner<'_, C> {
    fn visit<R: Resource>(
        &mut self,
        section: &'static str,
        declared: &BTreeMap<String, R>,
        held: &mut BTreeMap<String, R>,
    ) -> Result<()> {
        if let Some(client) = self.client {
            let refreshed = refresh_kind(client, section, held, self.target, self.jobs);
            self.refreshed.merge(&refreshed);
        }

        let diffs = ExecutionPlan::pair(held.clone(), declared.clone())
            .filter_by_target(section, self.target)
            .diffs()
            .with_context(|| format!("Failed to plan {section}"))?;

        self.plans.push(KindPlan { section, diffs });
        Ok(())
    }
}

/// Warn about resources that vanished or could not be read
pub fn report_refresh(refreshed: &RefreshSummary) {
    if refreshed.orphaned > 0 {
        ui::warn(&format!(
            "{} resource(s) no longer exist remotely and were dropped from state",
            refreshed.orphaned
        ));
    }
    if refreshed.failed > 0 {
        ui::warn(&format!(
            "{} resource(s) could not be refreshed; planning from held state",
            refreshed.failed
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{Action, Method, MockClient};
    use std::fs;
    use tempfile::TempDir;

    const TOOLS: &str = r#"
[tools.lookup.function]
name = "lookup"

[assistants.support]
name = "Support"
"#;

    fn action(plans: &[KindPlan], section: &str, key: &str) -> Action {
        plans
            .iter()
            .find(|p| p.section == section)
            .and_then(|p| p.diffs.iter().find(|(k, _)| k == key))
            .map(|(_, d)| d.action)
            .unwrap()
    }

    #[test]
    fn test_offline_plan_creates_everything() {
        let manifest = Manifest::parse(TOOLS).unwrap();
        let mut state = SyncState::default();

        let (plans, refreshed) = build_plans::<MockClient>(
            None,
            &manifest,
            &mut state,
            Order::Dependencies,
            None,
            1,
        )
        .unwrap();

        assert_eq!(refreshed, RefreshSummary::default());
        assert_eq!(plans.len(), 7);
        assert_eq!(plans[0].section, "files");
        assert_eq!(action(&plans, "tools", "lookup"), Action::Create);
        assert_eq!(action(&plans, "assistants", "support"), Action::Create);
    }

    #[test]
    fn test_plan_refreshes_and_detects_drift() {
        let manifest = Manifest::parse(TOOLS).unwrap();
        let mut state = SyncState::default();
        let mut held = manifest.tools["lookup"].clone();
        held.id = "t-1".into();
        state.tools.insert("lookup".into(), held);

        let mock = MockClient::new();
        mock.expect(
            Method::Get,
            "tool/t-1",
            200,
            r#"{"id":"t-1","type":"function","function":{"name":"renamed"}}"#,
        );

        let (plans, refreshed) = build_plans(
            Some(&mock),
            &manifest,
            &mut state,
            Order::Dependencies,
            Some("tools"),
            1,
        )
        .unwrap();

        assert_eq!(refreshed.current, 1);
        assert_eq!(action(&plans, "tools", "lookup"), Action::Replace);
        assert!(plans.iter().find(|p| p.section == "assistants").unwrap().diffs.is_empty());
    }

    #[test]
    fn test_plan_recreates_orphans() {
        let manifest = Manifest::parse(TOOLS).unwrap();
        let mut state = SyncState::default();
        let mut held = manifest.tools["lookup"].clone();
        held.id = "t-1".into();
        state.tools.insert("lookup".into(), held);

        let mock = MockClient::new();
        mock.expect(Method::Get, "tool/t-1", 404, "");

        let (plans, refreshed) = build_plans(
            Some(&mock),
            &manifest,
            &mut state,
            Order::Dependencies,
            Some("tools.lookup"),
            1,
        )
        .unwrap();

        assert_eq!(refreshed.orphaned, 1);
        assert!(state.tools.is_empty());
        assert_eq!(action(&plans, "tools", "lookup"), Action::Create);
    }

    #[test]
    fn test_unreadable_file_fails_the_plan() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.txt");
        let manifest =
            Manifest::parse(&format!("[files.faq]\nfile_path = {:?}\n", missing)).unwrap();

        let err = build_plans::<MockClient>(
            None,
            &manifest,
            &mut SyncState::default(),
            Order::Dependencies,
            None,
            1,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to plan files"));

        fs::write(&missing, "hello").unwrap();
        let (plans, _) = build_plans::<MockClient>(
            None,
            &manifest,
            &mut SyncState::default(),
            Order::Dependencies,
            None,
            1,
        )
        .unwrap();
        assert_eq!(action(&plans, "files", "faq"), Action::Create);
    }
}
