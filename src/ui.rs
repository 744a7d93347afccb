use colored::{ColoredString, Colorize};
use declarative::{Action, ApplyResult};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Plan and Result Symbols
// ============================================================================

/// Colored symbol for a planned action
pub fn action_symbol(action: Action) -> ColoredString {
    let symbol = action.symbol();
    match action {
        Action::Create => symbol.green(),
        Action::Delete => symbol.red(),
        Action::UpdateInPlace => symbol.yellow(),
        Action::Replace | Action::Reupload => symbol.magenta(),
        Action::NoChange => symbol.dimmed(),
    }
}

/// Colored symbol for an apply result
pub fn result_symbol(result: &ApplyResult) -> ColoredString {
    match result {
        ApplyResult::NoChange => "○".dimmed(),
        ApplyResult::Created | ApplyResult::Updated | ApplyResult::Replaced { .. } => "✓".green(),
        ApplyResult::Removed => "✓".red(),
        ApplyResult::Failed { .. } => "✗".red(),
        ApplyResult::Skipped { .. } => "⊘".yellow(),
    }
}

/// Short description of an apply result
pub fn describe_result(result: &ApplyResult) -> String {
    match result {
        ApplyResult::NoChange => "unchanged".to_string(),
        ApplyResult::Created => "created".to_string(),
        ApplyResult::Updated => "updated in place".to_string(),
        ApplyResult::Replaced { previous_id } => format!("replaced (was {previous_id})"),
        ApplyResult::Removed => "deleted".to_string(),
        ApplyResult::Failed { error } => format!("failed: {error}"),
        ApplyResult::Skipped { reason } => format!("skipped: {reason}"),
    }
}

// ============================================================================
// Tests
// ============================================================================
