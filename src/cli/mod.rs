use clap::{Parser, Subcommand};
use clap_complete::Shell;

pub mod commands;
pub mod i18n;
pub mod interactive;
pub mod tui;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "ccm",
    version,
    about = "Claude Code Manager - launch Claude Code against different model providers",
    long_about = "Manage provider configurations (endpoint, API key, model) for Claude Code and launch it with any of them.\n\nRun without arguments to open the interactive manager."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a provider (preset or custom)
    Add {
        /// Provider name, e.g. deepseek or my-proxy
        name: String,
        /// API key
        #[arg(short = 'k', long = "key")]
        key: String,
        /// Base URL (required for custom providers)
        #[arg(short = 'u', long = "url")]
        url: Option<String>,
        /// Model id (required for custom providers)
        #[arg(short = 'm', long = "model")]
        model: Option<String>,
        /// Human-readable name shown in listings
        #[arg(long = "display-name")]
        display_name: Option<String>,
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Change the key, URL or model of a saved provider
    Edit {
        name: String,
        #[arg(short = 'k', long = "key")]
        key: Option<String>,
        #[arg(short = 'u', long = "url")]
        url: Option<String>,
        #[arg(short = 'm', long = "model")]
        model: Option<String>,
    },

    /// Remove a saved provider and its isolated state
    #[command(alias = "rm")]
    Remove {
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List all providers
    #[command(alias = "ls")]
    List {
        /// Pick a provider and act on it
        #[arg(short, long)]
        interactive: bool,
    },

    /// Show details of one provider
    Show { name: String },

    /// Test connectivity of a provider's endpoint
    Test { name: String },

    /// Show or set the default provider
    Default { name: Option<String> },

    /// Launch Claude Code with a provider (default provider if omitted)
    Run {
        name: Option<String>,
        /// Arguments passed through to claude (after --)
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Pick a configured provider from a menu and launch it
    Switch,

    /// Generate claude-<name> launcher scripts
    Generate,

    /// First-time setup
    Init,

    /// Show version information
    Version,

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Generate shell completions
pub fn generate_completions(shell: Shell) {
    use clap::CommandFactory;
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
