//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pvc_core::MatchPolicy;

/// Inspect persistent volume claims and diagnose why they are not usable.
#[derive(Parser, Debug, Clone)]
#[command(name = "kubectl-pvc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Namespace of the claims.
    #[arg(short, long, global = true, env = "KUBECTL_PVC_NAMESPACE")]
    pub namespace: Option<String>,

    /// Kubeconfig context to use.
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Path to a kubeconfig file.
    #[arg(long, global = true, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Path to the plugin configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Read cluster facts from a JSON snapshot instead of the API server.
    #[arg(long, global = true, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// How node attachment records are matched against a volume handle.
    #[arg(long, global = true, value_enum)]
    pub attach_match: Option<AttachMatchArg>,

    /// Output format.
    #[arg(short = 'o', long = "output", global = true, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Attachment matching policy argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AttachMatchArg {
    /// Attachment record contains the volume handle.
    Substring,
    /// Attachment record names exactly the volume handle.
    Exact,
}

impl From<AttachMatchArg> for MatchPolicy {
    fn from(arg: AttachMatchArg) -> Self {
        match arg {
            AttachMatchArg::Substring => Self::Substring,
            AttachMatchArg::Exact => Self::Exact,
        }
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Diagnose the lifecycle of one claim.
    ///
    /// Reports whether the claim was provisioned and bound, whether its
    /// volume is attached to every node running a pod that uses it, and
    /// whether those pods have mounted it.
    Inspect(InspectArgs),

    /// List claims of the namespace, or of one pod.
    Ls(LsArgs),
}

/// Arguments for the inspect command.
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Claim to inspect.
    pub claim: String,
}

/// Arguments for the ls command.
#[derive(Parser, Debug, Clone, Default)]
pub struct LsArgs {
    /// Only list claims used by this pod.
    #[arg(short, long)]
    pub pod: Option<String>,
}
