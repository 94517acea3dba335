use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use jeda_core::auth::SocialProvider;
use jeda_core::models::RANKINGS_PAGE_SIZE;

#[derive(Parser)]
#[command(name = "jeda")]
#[command(about = "Manage Jeda timer settings and focus stats from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to the local settings file
    #[arg(long, global = true, value_name = "PATH")]
    pub settings_path: Option<PathBuf>,

    /// CLI profile name for API and auth configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show or change timer settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
    /// Show focus statistics and rankings
    Stats {
        #[command(subcommand)]
        command: StatsCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Sign in, inspect, or remove the account for a profile
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ProviderArg {
    Github,
    Google,
    Discord,
}

impl From<ProviderArg> for SocialProvider {
    fn from(value: ProviderArg) -> Self {
        match value {
            ProviderArg::Github => Self::GitHub,
            ProviderArg::Google => Self::Google,
            ProviderArg::Discord => Self::Discord,
        }
    }
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print the current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit one or more fields: jeda settings set pomodoro-time=50 volume=40%
    Set {
        /// FIELD=VALUE assignments, applied in order
        #[arg(required = true, value_name = "FIELD=VALUE")]
        assignments: Vec<String>,
        /// Keep the change on this machine even when signed in
        #[arg(long)]
        local: bool,
    },
    /// Restore every field to its default value
    Reset {
        /// Keep the change on this machine even when signed in
        #[arg(long)]
        local: bool,
    },
    /// List editable fields and accepted values
    Fields,
    /// Print the settings file location
    Path,
}

#[derive(Subcommand)]
pub enum StatsCommands {
    /// Show the signed-in user's activity summary
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one page of the focus-time leaderboard
    Rankings {
        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Rows per page
        #[arg(short, long, default_value_t = RANKINGS_PAGE_SIZE)]
        limit: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Jeda API base URL (e.g. <https://jeda.example.com>)
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Settings file used by this profile
        #[arg(long, value_name = "PATH")]
        settings_path: Option<PathBuf>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved profile configuration
    Show {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Start a social sign-in and print the URL to open
    Login {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Identity provider
        #[arg(long, value_enum, default_value_t = ProviderArg::Github)]
        provider: ProviderArg,
    },
    /// Finish sign-in with the session token from the browser and sync settings
    Token {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Value of the session cookie
        token: String,
    },
    /// Show auth status for profile
    Status {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
    /// Logout profile and clear stored session
    Logout {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
    /// Permanently delete the signed-in account
    Delete {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Type DELETE to confirm
        #[arg(long, value_name = "TEXT")]
        confirm: String,
    },
}
