use std::fmt;
use std::path::Path;

use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::PostParams;
use kube::config::KubeConfigOptions;
use kube::{Api, Client, Config};

use crate::catalog::{ContextCatalog, KubeconfigLoader};
use crate::error::{ConfigurationError, SessionError};
use crate::last_target::LastTarget;

pub const DEFAULT_NAMESPACE: &str = "default";
pub const IN_CLUSTER_CONTEXT: &str = "in-cluster";

const SERVICE_ACCOUNT_TOKEN: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";
const LOCAL_CONTEXTS: &[&str] = &["minikube", "docker-desktop", "docker-for-desktop", "rancher-desktop", "orbstack", "colima"];
const LOCAL_CONTEXT_PREFIXES: &[&str] = &["kind-", "k3d-"];

/// A client bound to one context and namespace. Never mutated: switching
/// target means building a new session.
pub struct Session<C = Client> {
    client: C,
    context: String,
    namespace: String,
    in_cluster: bool,
}

impl<C> Session<C> {
    pub fn new(client: C, context: impl Into<String>, namespace: impl Into<String>, in_cluster: bool) -> Self {
        Self { client, context: context.into(), namespace: namespace.into(), in_cluster }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_in_cluster(&self) -> bool {
        self.in_cluster
    }

    pub fn is_local_kubernetes(&self) -> bool {
        is_local_context(&self.context)
    }

    pub fn target(&self) -> LastTarget {
        LastTarget::new(&self.context, &self.namespace)
    }
}

impl<C> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("context", &self.context)
            .field("namespace", &self.namespace)
            .field("in_cluster", &self.in_cluster)
            .finish_non_exhaustive()
    }
}

impl Session<Client> {
    /// Creates the session namespace if the cluster does not have it yet.
    /// Returns whether it was created.
    pub async fn ensure_namespace(&self) -> anyhow::Result<bool> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        if api.get_opt(&self.namespace).await?.is_some() {
            return Ok(false);
        }

        let ns = Namespace {
            metadata: ObjectMeta { name: Some(self.namespace.clone()), ..Default::default() },
            ..Default::default()
        };
        api.create(&PostParams::default(), &ns).await?;
        tracing::info!(namespace = %self.namespace, "created namespace");
        Ok(true)
    }
}

pub fn is_local_context(context: &str) -> bool {
    LOCAL_CONTEXTS.contains(&context) || LOCAL_CONTEXT_PREFIXES.iter().any(|p| context.starts_with(p))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRequest {
    pub context: Option<String>,
    pub namespace: Option<String>,
    pub force_switch: bool,
}

impl SessionRequest {
    /// Empty strings mean "not given".
    pub fn new(context: &str, namespace: &str, force_switch: bool) -> Self {
        let given = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self { context: given(context), namespace: given(namespace), force_switch }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub context: String,
    pub namespace: String,
    /// The kubeconfig's current context must be rewritten.
    pub switch_context: bool,
    /// Namespace to bind to the context entry in the kubeconfig.
    pub bind_namespace: Option<String>,
}

impl ResolvedTarget {
    pub fn needs_write(&self) -> bool {
        self.switch_context || self.bind_namespace.is_some()
    }
}

pub fn resolve_target(catalog: &ContextCatalog, request: &SessionRequest) -> Result<ResolvedTarget, ConfigurationError> {
    let context = match request.context.as_deref().filter(|c| !c.is_empty()) {
        Some(context) => context.to_string(),
        None => catalog.current_context().ok_or(ConfigurationError::NoCurrentContext)?.to_string(),
    };
    let entry = catalog.get(&context).ok_or_else(|| ConfigurationError::UnknownContext(context.clone()))?;

    let explicit_namespace = request.namespace.clone().filter(|ns| !ns.is_empty());
    let namespace = explicit_namespace
        .clone()
        .or_else(|| entry.namespace.clone())
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

    let switch_context = request.force_switch && catalog.current_context() != Some(context.as_str());
    let bind_namespace = explicit_namespace
        .filter(|ns| request.force_switch && entry.namespace.as_deref() != Some(ns.as_str()));

    Ok(ResolvedTarget { context, namespace, switch_context, bind_namespace })
}

#[allow(async_fn_in_trait)]
pub trait SessionFactory {
    type Client;

    async fn build_session(&self, request: &SessionRequest) -> Result<Session<Self::Client>, SessionError>;
}

/// Builds kube clients from the kubeconfig, or from the service account
/// when running inside a cluster.
pub struct KubeSessionFactory {
    loader: KubeconfigLoader,
    in_cluster: bool,
}

impl KubeSessionFactory {
    pub fn new(loader: KubeconfigLoader) -> Self {
        let in_cluster = is_in_cluster_env(
            std::env::var("KUBERNETES_SERVICE_HOST").ok().as_deref(),
            std::env::var("KUBERNETES_SERVICE_PORT").ok().as_deref(),
            Path::new(SERVICE_ACCOUNT_TOKEN),
        );
        Self { loader, in_cluster }
    }

    pub fn with_in_cluster(mut self, in_cluster: bool) -> Self {
        self.in_cluster = in_cluster;
        self
    }

    pub fn loader(&self) -> &KubeconfigLoader {
        &self.loader
    }

    pub async fn build_default(&self) -> Result<Session<Client>, SessionError> {
        self.build_session(&SessionRequest::default()).await
    }

    fn build_in_cluster(&self) -> Result<Session<Client>, SessionError> {
        let config = Config::incluster().map_err(|e| SessionError::client(IN_CLUSTER_CONTEXT, e))?;
        let namespace = config.default_namespace.clone();
        let client = Client::try_from(config).map_err(|e| SessionError::client(IN_CLUSTER_CONTEXT, e))?;
        tracing::debug!(%namespace, "using in-cluster configuration");
        Ok(Session::new(client, IN_CLUSTER_CONTEXT, namespace, true))
    }
}

impl SessionFactory for KubeSessionFactory {
    type Client = Client;

    async fn build_session(&self, request: &SessionRequest) -> Result<Session<Client>, SessionError> {
        if self.in_cluster {
            return self.build_in_cluster();
        }

        let kubeconfig = self.loader.load()?;
        let target = resolve_target(&ContextCatalog::from_kubeconfig(&kubeconfig), request)?;

        let options = KubeConfigOptions { context: Some(target.context.clone()), ..Default::default() };
        let mut config = Config::from_custom_kubeconfig(kubeconfig, &options)
            .await
            .map_err(|e| SessionError::client(&target.context, e))?;
        config.default_namespace = target.namespace.clone();
        let client = Client::try_from(config).map_err(|e| SessionError::client(&target.context, e))?;

        // Only persist once the client exists, so a failed build leaves the kubeconfig untouched.
        if target.needs_write() {
            self.loader.switch_context(&target.context, target.bind_namespace.as_deref())?;
        }

        tracing::debug!(context = %target.context, namespace = %target.namespace, "built kube session");
        Ok(Session::new(client, target.context, target.namespace, false))
    }
}

pub fn is_in_cluster_env(host: Option<&str>, port: Option<&str>, token: &Path) -> bool {
    let set = |v: Option<&str>| v.is_some_and(|v| !v.is_empty());
    set(host) && set(port) && token.exists()
}

#[cfg(test)]
mod tests;
