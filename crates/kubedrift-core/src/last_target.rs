use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Context and namespace used by the previous run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LastTarget {
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<jiff::Timestamp>,
}

impl LastTarget {
    pub fn new(context: &str, namespace: &str) -> Self {
        Self { context: context.to_string(), namespace: namespace.to_string(), recorded_at: None }
    }

    pub fn is_empty(&self) -> bool {
        self.context.is_empty() && self.namespace.is_empty()
    }
}

pub struct LastTargetStore {
    path: PathBuf,
}

impl LastTargetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable state counts as "no previous run".
    pub fn load(&self) -> Option<LastTarget> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<LastTarget>(&contents) {
            Ok(target) if !target.is_empty() => Some(target),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable last target at {}: {e}", self.path.display());
                None
            }
        }
    }

    pub fn save(&self, context: &str, namespace: &str) -> io::Result<LastTarget> {
        let target = LastTarget { recorded_at: Some(jiff::Timestamp::now()), ..LastTarget::new(context, namespace) };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&target).map_err(io::Error::other)?;
        std::fs::write(&self.path, data)?;
        Ok(target)
    }
}
