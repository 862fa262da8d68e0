//! Clap derive structures for the `wlanctl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wlanctl -- manage WLAN profiles and MPSK pools across AP groups
#[derive(Debug, Parser)]
#[command(
    name = "wlanctl",
    version,
    about = "Manage WLAN profiles and MPSK pools from the command line",
    long_about = "Edits the line-oriented configuration of cloud-managed AP groups.\n\n\
        WLAN profiles can be deployed to many groups at once; MPSK pools are\n\
        edited per group, with the matching gateway roles kept in step.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "WLANCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API gateway URL (overrides profile)
    #[arg(long, env = "WLANCTL_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Bearer access token (overrides profile)
    #[arg(long, env = "WLANCTL_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WLANCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k', env = "WLANCTL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "WLANCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List AP groups and dump their configuration
    #[command(alias = "g")]
    Groups(GroupsArgs),

    /// Manage WLAN profiles across AP groups
    #[command(alias = "w")]
    Wlans(WlansArgs),

    /// Manage AP user roles in a group
    Roles(RolesArgs),

    /// Manage the MPSK pool of a WLAN
    #[command(alias = "m")]
    Mpsk(MpskArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Groups ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List every AP group
    #[command(alias = "ls")]
    List,

    /// Print a group's raw configuration lines
    Show {
        /// Group name
        group: String,
    },

    /// Replace a group's whole configuration from a file
    Push {
        /// Group name
        group: String,

        /// File with the configuration, one CLI line per line
        #[arg(long, short = 'f')]
        file: PathBuf,
    },
}

// ── WLANs ────────────────────────────────────────────────────────────

/// Groups to act on; all groups when omitted.
#[derive(Debug, Args)]
pub struct GroupScope {
    /// Comma-separated group names
    #[arg(long, short = 'g', value_delimiter = ',')]
    pub groups: Vec<String>,
}

#[derive(Debug, Args)]
pub struct WlansArgs {
    #[command(subcommand)]
    pub command: WlansCommand,
}

#[derive(Debug, Subcommand)]
pub enum WlansCommand {
    /// List WLAN profiles, merged across groups
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        scope: GroupScope,

        /// Only WLANs using local MPSK with L2 forwarding
        #[arg(long)]
        mpsk: bool,
    },

    /// Show every variant of one WLAN profile
    Show {
        /// WLAN profile name
        name: String,

        #[command(flatten)]
        scope: GroupScope,
    },

    /// Create or replace a WLAN profile in the given groups
    Deploy {
        /// WLAN profile name
        name: String,

        /// File with the profile body, one CLI line per line
        #[arg(long, short = 'f')]
        file: PathBuf,

        /// Comma-separated target groups
        #[arg(long, short = 'g', value_delimiter = ',', required = true)]
        groups: Vec<String>,
    },

    /// Delete a WLAN profile from the given groups
    #[command(alias = "rm")]
    Remove {
        /// WLAN profile name
        name: String,

        /// Comma-separated target groups
        #[arg(long, short = 'g', value_delimiter = ',', required = true)]
        groups: Vec<String>,
    },

    /// Enable a WLAN profile in every group carrying it
    Enable {
        /// WLAN profile name
        name: String,

        #[command(flatten)]
        scope: GroupScope,
    },

    /// Disable a WLAN profile in every group carrying it
    Disable {
        /// WLAN profile name
        name: String,

        #[command(flatten)]
        scope: GroupScope,
    },

    /// Show the pre-shared key of a WLAN in one group
    Psk {
        /// WLAN profile name
        name: String,

        /// AP group name
        #[arg(long, short = 'g')]
        group: String,
    },

    /// Replace the pre-shared key of a WLAN in one group
    SetPsk {
        /// WLAN profile name
        name: String,

        /// AP group name
        #[arg(long, short = 'g')]
        group: String,

        /// New passphrase; prompted for when omitted
        #[arg(long)]
        passphrase: Option<String>,
    },

    /// Print the Wi-Fi QR payload of a PSK WLAN
    Qr {
        /// WLAN profile name
        name: String,

        /// AP group name
        #[arg(long, short = 'g')]
        group: String,
    },
}

// ── Roles ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RolesArgs {
    #[command(subcommand)]
    pub command: RolesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RolesCommand {
    /// List user roles of a group
    #[command(alias = "ls")]
    List {
        /// AP group name
        #[arg(long, short = 'g')]
        group: String,
    },

    /// Create or update a user role
    Ensure {
        /// Role name
        name: String,

        /// AP group name
        #[arg(long, short = 'g')]
        group: String,

        /// ACL line (repeatable); defaults to a permit-all rule
        #[arg(long = "acl")]
        acls: Vec<String>,
    },
}

// ── MPSK ─────────────────────────────────────────────────────────────

/// The WLAN whose pool is edited.
#[derive(Debug, Args)]
pub struct MpskTarget {
    /// AP group name
    #[arg(long, short = 'g')]
    pub group: String,

    /// MPSK WLAN profile name
    #[arg(long, short = 'w')]
    pub wlan: String,
}

#[derive(Debug, Args)]
pub struct MpskArgs {
    #[command(subcommand)]
    pub command: MpskCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ImportModeArg {
    /// Update entries with matching names, append the rest
    Add,
    /// Replace the whole pool
    Replace,
}

#[derive(Debug, Subcommand)]
pub enum MpskCommand {
    /// List MPSK WLANs of a group, or the entries of one WLAN's pool
    #[command(alias = "ls")]
    List {
        /// AP group name
        #[arg(long, short = 'g')]
        group: String,

        /// MPSK WLAN profile name; lists the WLANs when omitted
        #[arg(long, short = 'w')]
        wlan: Option<String>,
    },

    /// Add an entry to the pool
    Add {
        #[command(flatten)]
        target: MpskTarget,

        /// Entry name (also the gateway role name)
        name: String,

        /// Passphrase; prompted for when omitted
        #[arg(long)]
        passphrase: Option<String>,

        /// AP role assigned to the entry; defaults to the WLAN name
        #[arg(long)]
        role: Option<String>,
    },

    /// Change the passphrase of an entry
    Update {
        #[command(flatten)]
        target: MpskTarget,

        /// Entry name
        name: String,

        /// New passphrase; prompted for when omitted
        #[arg(long)]
        passphrase: Option<String>,
    },

    /// Remove an entry by name or position
    #[command(alias = "rm")]
    Remove {
        #[command(flatten)]
        target: MpskTarget,

        /// Entry name
        #[arg(required_unless_present = "index", conflicts_with = "index")]
        name: Option<String>,

        /// Zero-based position as listed
        #[arg(long)]
        index: Option<usize>,
    },

    /// Import entries from a JSON or YAML file
    Import {
        #[command(flatten)]
        target: MpskTarget,

        /// List of `{name, passphrase, role}` objects
        #[arg(long, short = 'f')]
        file: PathBuf,

        /// How to treat the existing pool
        #[arg(long, default_value = "add")]
        mode: ImportModeArg,
    },

    /// Print the Wi-Fi QR payload for an entry
    Qr {
        #[command(flatten)]
        target: MpskTarget,

        /// Entry name
        name: String,

        /// Passphrase to encode (stored passphrases are redacted)
        #[arg(long)]
        passphrase: Option<String>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an access token in the system keyring
    SetToken {
        /// Profile name; defaults to the active profile
        name: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
