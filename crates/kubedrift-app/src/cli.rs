use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "kubedrift", version)]
#[command(about = "Pick the kube context and namespace to deploy to, and catch drift from the last run")]
pub struct Cli {
    /// Config file to use instead of ~/.config/kubedrift/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the target context/namespace and check it against the last run
    Use(UseArgs),
    /// List kube contexts from the kubeconfig
    Contexts {
        /// Do not mark clusters on private addresses
        #[arg(long)]
        allow_private: bool,
    },
    /// Show the target recorded by the last run
    Last,
    /// Write the default config file
    InitConfig,
}

#[derive(Args, Debug, Default)]
pub struct UseArgs {
    /// Kube context to use (defaults to the kubeconfig's current context)
    #[arg(long)]
    pub context: Option<String>,

    /// Namespace to use (defaults to the context's namespace)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Make the chosen context the kubeconfig's current context
    #[arg(long)]
    pub switch_context: bool,

    /// Pick the context interactively
    #[arg(long)]
    pub select: bool,

    /// Allow clusters served from private addresses in --select
    #[arg(long)]
    pub allow_private: bool,

    /// Skip the check against the last run
    #[arg(long)]
    pub no_warn: bool,

    /// Create the namespace if it does not exist
    #[arg(long)]
    pub create_namespace: bool,

    /// Do not record the final target for the next run
    #[arg(long)]
    pub no_record: bool,
}
