use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vapi-sync")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Keep Vapi resources in sync with a declarative manifest", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Manifest declaring the desired resources
    #[arg(short, long, global = true, default_value = "vapi-sync.toml")]
    pub manifest: PathBuf,

    /// State file (defaults to ~/.local/state/vapi-sync/<manifest>.json)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// API token
    #[arg(long, global = true, env = "VAPI_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// API base URL (overrides the manifest)
    #[arg(long, global = true, env = "VAPI_URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show what apply would change
    Plan(PlanArgs),

    /// Create, update and delete resources to match the manifest
    Apply(ApplyArgs),

    /// Re-read every resource held in state
    Refresh(TargetArgs),

    /// Delete every resource held in state
    Destroy(DestroyArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Args)]
pub struct TargetArgs {
    /// Limit to a kind or one resource (e.g. "assistants" or "tools.weather")
    #[arg(short, long)]
    pub target: Option<String>,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Limit to a kind or one resource (e.g. "assistants" or "tools.weather")
    #[arg(short, long)]
    pub target: Option<String>,

    /// Show request payload diffs
    #[arg(long)]
    pub diff: bool,

    /// Skip re-reading resources before planning
    #[arg(long)]
    pub no_refresh: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Limit to a kind or one resource (e.g. "assistants" or "tools.weather")
    #[arg(short, long)]
    pub target: Option<String>,

    /// Dry run - show what would be done
    #[arg(short, long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Number of parallel jobs per kind
    #[arg(short, long, default_value = "4")]
    pub jobs: usize,
}

#[derive(Args)]
pub struct DestroyArgs {
    /// Limit to a kind or one resource (e.g. "assistants" or "tools.weather")
    #[arg(short, long)]
    pub target: Option<String>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from([
            "vapi-sync",
            "--manifest",
            "prod.toml",
            "apply",
            "--target",
            "tools.weather",
            "-y",
            "-j",
            "8",
        ])
        .unwrap();

        assert_eq!(cli.manifest, PathBuf::from("prod.toml"));
        match cli.command {
            Command::Apply(args) => {
                assert_eq!(args.target.as_deref(), Some("tools.weather"));
                assert!(args.yes);
                assert!(!args.dry_run);
                assert_eq!(args.jobs, 8);
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["vapi-sync", "plan", "--diff", "-vv", "--url", "http://x"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.url.as_deref(), Some("http://x"));
        assert!(matches!(cli.command, Command::Plan(PlanArgs { diff: true, .. })));
    }
}
