use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("No kube context found. Make sure you have a working kubernetes context configured")]
    NoContexts,
    #[error("kubeconfig has no current context and none was requested")]
    NoCurrentContext,
    #[error("kube context '{0}' not found in kubeconfig")]
    UnknownContext(String),
    #[error("kube context '{context}' references unknown cluster '{cluster}'")]
    UnknownCluster { context: String, cluster: String },
    #[error("malformed cluster server url '{server}': {source}")]
    MalformedServerUrl {
        server: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to load kubeconfig: {0}")]
    Load(String),
    #[error("failed to write kubeconfig {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("cannot ask '{0}': input is not interactive")]
    NotInteractive(String),
    #[error("selection cancelled")]
    Cancelled,
    #[error("question '{0}' has no options")]
    NoOptions(String),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("failed to build kube client for context '{context}': {reason}")]
    ClientConstruction { context: String, reason: String },
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error("context check aborted: {0}")]
    ReconciliationAborted(#[source] PromptError),
}

impl SessionError {
    pub(crate) fn client(context: &str, reason: impl ToString) -> Self {
        Self::ClientConstruction { context: context.to_string(), reason: reason.to_string() }
    }
}
