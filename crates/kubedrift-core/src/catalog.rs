use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use kube::config::Kubeconfig;
use serde_yaml::{Mapping, Value};

use crate::error::ConfigurationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub cluster: String,
    pub namespace: Option<String>,
}

/// Snapshot of the contexts and clusters known to the kubeconfig, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct ContextCatalog {
    contexts: BTreeMap<String, CatalogEntry>,
    clusters: BTreeMap<String, Option<String>>,
    current_context: Option<String>,
}

impl ContextCatalog {
    pub fn new(current_context: Option<&str>) -> Self {
        Self { current_context: current_context.map(str::to_string), ..Default::default() }
    }

    pub fn from_kubeconfig(kubeconfig: &Kubeconfig) -> Self {
        let mut catalog = Self::new(kubeconfig.current_context.as_deref().filter(|c| !c.is_empty()));
        for named in &kubeconfig.clusters {
            let server = named.cluster.as_ref().and_then(|c| c.server.clone());
            catalog.clusters.insert(named.name.clone(), server);
        }
        for named in &kubeconfig.contexts {
            let Some(ctx) = &named.context else { continue };
            let namespace = ctx.namespace.clone().filter(|ns| !ns.is_empty());
            catalog.contexts.insert(named.name.clone(), CatalogEntry { cluster: ctx.cluster.clone(), namespace });
        }
        catalog
    }

    pub fn with_cluster(mut self, name: &str, server: &str) -> Self {
        self.clusters.insert(name.to_string(), Some(server.to_string()));
        self
    }

    pub fn with_context(mut self, name: &str, cluster: &str, namespace: Option<&str>) -> Self {
        let entry = CatalogEntry { cluster: cluster.to_string(), namespace: namespace.map(str::to_string) };
        self.contexts.insert(name.to_string(), entry);
        self
    }

    pub fn names(&self) -> Vec<String> {
        self.contexts.keys().cloned().collect()
    }

    pub fn get(&self, context: &str) -> Option<&CatalogEntry> {
        self.contexts.get(context)
    }

    pub fn contains(&self, context: &str) -> bool {
        self.contexts.contains_key(context)
    }

    pub fn current_context(&self) -> Option<&str> {
        self.current_context.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Server URL of the cluster the context points at. `None` when the
    /// cluster entry carries no server.
    pub fn server(&self, context: &str) -> Result<Option<&str>, ConfigurationError> {
        let entry = self.get(context).ok_or_else(|| ConfigurationError::UnknownContext(context.to_string()))?;
        match self.clusters.get(&entry.cluster) {
            Some(server) => Ok(server.as_deref().filter(|s| !s.is_empty())),
            None => Err(ConfigurationError::UnknownCluster {
                context: context.to_string(),
                cluster: entry.cluster.clone(),
            }),
        }
    }
}

/// Locates, reads and edits kubeconfig files the way kubectl does.
#[derive(Debug, Clone)]
pub struct KubeconfigLoader {
    paths: Vec<PathBuf>,
}

impl KubeconfigLoader {
    pub fn from_env() -> Self {
        if let Some(paths) = std::env::var_os("KUBECONFIG") {
            let paths: Vec<PathBuf> = std::env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()).collect();
            if !paths.is_empty() {
                return Self { paths };
            }
        }

        let paths = dirs::home_dir().map(|home| home.join(".kube").join("config")).into_iter().collect();
        Self { paths }
    }

    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn load(&self) -> Result<Kubeconfig, ConfigurationError> {
        if self.paths.is_empty() {
            return Err(ConfigurationError::Load("no kubeconfig path configured".into()));
        }

        let mut merged: Option<Kubeconfig> = None;
        for path in self.paths.iter().filter(|p| p.exists()) {
            let config = Kubeconfig::read_from(path)
                .map_err(|e| ConfigurationError::Load(format!("{}: {e}", path.display())))?;
            merged = Some(match merged {
                Some(previous) => previous.merge(config).map_err(|e| ConfigurationError::Load(e.to_string()))?,
                None => config,
            });
        }

        tracing::debug!(paths = ?self.paths, found = merged.is_some(), "loaded kubeconfig");
        merged.ok_or_else(|| ConfigurationError::Load(format!("no kubeconfig found at {}", self.display_paths())))
    }

    pub fn catalog(&self) -> Result<ContextCatalog, ConfigurationError> {
        Ok(ContextCatalog::from_kubeconfig(&self.load()?))
    }

    /// Makes `context` the active context and, when given, binds `namespace`
    /// to it. Every touched file is staged next to its target before any of
    /// them is replaced, so a failed edit leaves all files as they were.
    pub fn switch_context(&self, context: &str, namespace: Option<&str>) -> Result<(), ConfigurationError> {
        let existing: Vec<&PathBuf> = self.paths.iter().filter(|p| p.exists()).collect();
        let primary = existing
            .first()
            .copied()
            .or_else(|| self.paths.first())
            .ok_or_else(|| ConfigurationError::Load("no kubeconfig path configured".into()))?;

        let mut doc = read_document(primary)?;
        set_current_context(&mut doc, context);
        let mut edits = vec![(primary.clone(), doc)];

        if let Some(ns) = namespace {
            if !set_context_namespace(&mut edits[0].1, context, ns) {
                let mut bound = false;
                for path in existing.iter().skip(1) {
                    let mut other = read_document(path)?;
                    if set_context_namespace(&mut other, context, ns) {
                        edits.push((path.to_path_buf(), other));
                        bound = true;
                        break;
                    }
                }
                if !bound {
                    return Err(ConfigurationError::UnknownContext(context.to_string()));
                }
            }
        }

        commit_documents(&edits)?;
        tracing::debug!(context, ?namespace, path = %primary.display(), "switched kube context");
        Ok(())
    }

    fn display_paths(&self) -> String {
        self.paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
    }
}

fn read_document(path: &Path) -> Result<Value, ConfigurationError> {
    if !path.exists() {
        return Ok(Value::Mapping(Mapping::new()));
    }
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigurationError::Load(format!("{}: {e}", path.display())))?;
    let doc: Value =
        serde_yaml::from_str(&contents).map_err(|e| ConfigurationError::Load(format!("{}: {e}", path.display())))?;
    Ok(if doc.is_null() { Value::Mapping(Mapping::new()) } else { doc })
}

/// Writes every document to a temp file beside its target, then renames
/// them into place. Nothing is replaced unless all documents were staged.
fn commit_documents(edits: &[(PathBuf, Value)]) -> Result<(), ConfigurationError> {
    let mut staged = Vec::with_capacity(edits.len());
    for (path, doc) in edits {
        staged.push((path, stage_document(path, doc)?));
    }
    for (path, tmp) in staged {
        tmp.persist(path).map_err(|e| ConfigurationError::Write { path: path.to_path_buf(), source: e.error })?;
    }
    Ok(())
}

fn stage_document(path: &Path, doc: &Value) -> Result<tempfile::NamedTempFile, ConfigurationError> {
    let write_err = |source: std::io::Error| ConfigurationError::Write { path: path.to_path_buf(), source };
    let contents = serde_yaml::to_string(doc).map_err(|e| write_err(std::io::Error::other(e)))?;

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(write_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    Ok(tmp)
}

fn set_current_context(doc: &mut Value, context: &str) {
    if let Some(map) = doc.as_mapping_mut() {
        map.insert(Value::from("current-context"), Value::from(context));
    }
}

fn set_context_namespace(doc: &mut Value, context: &str, namespace: &str) -> bool {
    let Some(contexts) = doc.get_mut("contexts").and_then(Value::as_sequence_mut) else { return false };
    let Some(item) = contexts.iter_mut().find(|c| c.get("name").and_then(Value::as_str) == Some(context)) else {
        return false;
    };
    match item.get_mut("context").and_then(Value::as_mapping_mut) {
        Some(ctx) => {
            ctx.insert(Value::from("namespace"), Value::from(namespace));
            true
        }
        None => false,
    }
}
