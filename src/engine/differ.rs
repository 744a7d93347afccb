//! Plan rendering

use colored::Colorize;
use declarative::{Action, DiffSummary, ResourceDiff};
use serde_json::Value as Json;

use crate::ui;

/// Request fields the remote never echoes back
const SENSITIVE_KEYS: &[&str] = &["secret", "authPassword", "twilioAuthToken"];

/// Planned changes for one manifest table
#[derive(Debug, Clone)]
pub struct KindPlan {
    pub section: &'static str,
    pub diffs: Vec<(String, ResourceDiff)>,
}

impl KindPlan {
    /// Diffs that issue remote calls
    pub fn changes(&self) -> impl Iterator<Item = &(String, ResourceDiff)> {
        self.diffs.iter().filter(|(_, d)| d.is_change())
    }
}

/// Summarize planned changes across every kind
pub fn summarize(plans: &[KindPlan]) -> DiffSummary {
    let diffs: Vec<ResourceDiff> = plans
        .iter()
        .flat_map(|p| p.diffs.iter().map(|(_, d)| d.clone()))
        .collect();
    DiffSummary::from_diffs(&diffs)
}

/// Display a plan in a user-friendly format
///
/// With `payloads`, every change is followed by a line diff of the
/// request bodies.
pub fn display_plan(plans: &[KindPlan], payloads: bool) {
    let summary = summarize(plans);
    if !summary.has_changes() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Execution Plan".bold()
    );
    println!("│");

    for plan in plans {
        let changes: Vec<_> = plan.changes().collect();
        if changes.is_empty() {
            continue;
        }
        println!("│ {}", plan.section.bold());

        for (key, diff) in changes {
            let id = if diff.id.is_empty() {
                String::new()
            } else {
                format!("({})", diff.id)
            };
            println!(
                "│   {:<3} {:<30} {} {}",
                ui::action_symbol(diff.action),
                key,
                id.dimmed(),
                describe(diff.action).dimmed()
            );

            if payloads {
                for line in payload_diff(diff.before.as_ref(), diff.after.as_ref()) {
                    match line.chars().next() {
                        Some('-') => println!("│       {}", line.red()),
                        Some('+') => println!("│       {}", line.green()),
                        _ => println!("│       {}", line.dimmed()),
                    }
                }
            }
        }
        println!("│");
    }

    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} to create, {} to update, {} to replace, {} to delete",
        summary.additions.to_string().green(),
        summary.updates.to_string().yellow(),
        summary.replacements.to_string().magenta(),
        summary.removals.to_string().red()
    );
    println!("└─────────────────────────────────────────────────────┘");
}

fn describe(action: Action) -> &'static str {
    match action {
        Action::Create => "will be created",
        Action::NoChange => "",
        Action::UpdateInPlace => "will be updated in place",
        Action::Replace => "will be deleted and recreated",
        Action::Reupload => "content changed, will be re-uploaded",
        Action::Delete => "will be deleted",
    }
}

/// Changed lines between two request payloads, prefixed with `-` or `+`
pub fn payload_diff(before: Option<&Json>, after: Option<&Json>) -> Vec<String> {
    let old = pretty(before);
    let new = pretty(after);

    let diff = similar::TextDiff::from_lines(&old, &new);
    let mut lines = Vec::new();
    for change in diff.iter_all_changes() {
        let text = change.value().trim_end();
        match change.tag() {
            similar::ChangeTag::Delete => lines.push(format!("- {text}")),
            similar::ChangeTag::Insert => lines.push(format!("+ {text}")),
            similar::ChangeTag::Equal => {}
        }
    }
    lines
}

fn pretty(payload: Option<&Json>) -> String {
    let Some(payload) = payload else {
        return String::new();
    };
    let mut payload = payload.clone();
    redact(&mut payload);
    let mut text = serde_json::to_string_pretty(&payload).unwrap_or_default();
    text.push('\n');
    text
}

/// Mask write-only inputs so they never reach the terminal
fn redact(value: &mut Json) {
    match value {
        Json::Object(map) => {
            for (key, v) in map.iter_mut() {
                if SENSITIVE_KEYS.contains(&key.as_str()) && !v.is_null() {
                    *v = Json::String("(sensitive)".into());
                } else {
                    redact(v);
                }
            }
        }
        Json::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}
