use anyhow::Result;

use super::apply::{RunOptions, finish, reconcile};
use super::{Globals, REFRESH_JOBS, Session};
use crate::Context;
use crate::cli::DestroyArgs;
use crate::config::Manifest;
use crate::engine::executor::{PromptConfirm, TerminalProgress};
use crate::engine::{Order, validate_target};
use crate::ui;

/// Delete every resource held in state, referencing kinds first
///
/// Runs apply against an empty manifest, so the plan, the prompt and
/// per-kind state checkpoints behave exactly like apply.
pub fn run(ctx: &Context, globals: &Globals, args: DestroyArgs) -> Result<()> {
    validate_target(args.target.as_deref())?;
    let mut session = Session::open_for_destroy(globals)?;

    if session.state.total() == 0 {
        ui::info("Nothing to destroy: state is empty");
        return Ok(());
    }
    let client = session.client()?;

    if !ctx.quiet {
        ui::header("vapi-sync destroy");
        ui::kv("State", &session.state_path().display().to_string());
    }

    let opts = RunOptions {
        target: args.target.as_deref(),
        dry_run: false,
        yes: args.yes,
        jobs: REFRESH_JOBS,
        order: Order::Reverse,
        prompt: "Destroy these resources? This cannot be undone",
    };

    let state_path = session.state_path.clone();
    let summary = reconcile(
        &client,
        &Manifest::default(),
        &mut session.state,
        &state_path,
        &opts,
        &mut TerminalProgress::default(),
        &mut PromptConfirm,
    )?;

    finish(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SyncState;
    use declarative::{AutoConfirm, Method, MockClient, NoProgress, Resource};
    use tempfile::TempDir;
    use vapi::{Assistant, File, Tool};

    fn bound<R: Resource>(mut r: R, id: &str) -> R {
        r.set_id(id.to_string());
        r
    }

    fn destroy_opts() -> RunOptions<'static> {
        RunOptions {
            target: None,
            dry_run: false,
            yes: true,
            jobs: 1,
            order: Order::Reverse,
            prompt: "Destroy?",
        }
    }

    #[test]
    fn test_destroy_deletes_referencing_kinds_first() {
        let dir = TempDir::new().unwrap();
        let state_path = dir.path().join("state.json");

        let mut file = File::at(dir.path().join("faq.txt"));
        file.id = "f-1".into();
        file.checksum = Some("abc".into());

        let mut state = SyncState::default();
        state.files.insert("faq".into(), file);
        state.tools.insert("lookup".into(), bound(Tool::default(), "t-1"));
        state
            .assistants
            .insert("support".into(), bound(Assistant::default(), "a-1"));

        let mock = MockClient::new();
        mock.expect(Method::Get, "assistant/a-1", 200, r#"{"id":"a-1"}"#);
        mock.expect(Method::Get, "tool/t-1", 200, r#"{"id":"t-1","type":"function"}"#);
        mock.expect(Method::Get, "file/f-1", 200, r#"{"id":"f-1"}"#);
        mock.expect(Method::Delete, "assistant/a-1", 200, "{}");
        mock.expect(Method::Delete, "tool/t-1", 200, "{}");
        mock.expect(Method::Delete, "file/f-1", 404, "");

        let summary = reconcile(
            &mock,
            &Manifest::default(),
            &mut state,
            &state_path,
            &destroy_opts(),
            &mut NoProgress,
            &mut AutoConfirm,
        )
        .unwrap()
        .unwrap();

        assert_eq!(summary.removed, 3);
        assert_eq!(mock.remaining(), 0);
        assert_eq!(state.total(), 0);
        assert_eq!(SyncState::load(&state_path).unwrap().total(), 0);
    }

    #[test]
    fn test_destroy_single_target() {
        let dir = TempDir::new().unwrap();
        let state_path = dir.path().join("state.json");

        let mut state = SyncState::default();
        state.tools.insert("a".into(), bound(Tool::default(), "t-1"));
        state.tools.insert("b".into(), bound(Tool::default(), "t-2"));

        let mock = MockClient::new();
        mock.expect(Method::Get, "tool/t-2", 200, r#"{"id":"t-2"}"#);
        mock.expect(Method::Delete, "tool/t-2", 200, "{}");

        let opts = RunOptions {
            target: Some("tools.b"),
            ..destroy_opts()
        };
        reconcile(
            &mock,
            &Manifest::default(),
            &mut state,
            &state_path,
            &opts,
            &mut NoProgress,
            &mut AutoConfirm,
        )
        .unwrap();

        assert!(state.tools.contains_key("a"));
        assert!(!state.tools.contains_key("b"));
    }
}
