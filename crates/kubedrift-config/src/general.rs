use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    #[serde(alias = "allow-private")]
    pub allow_private: bool,
    #[serde(alias = "switch-context")]
    pub switch_context: bool,
    #[serde(alias = "log-level")]
    pub log_level: String,
    #[serde(alias = "default-namespace-delay-secs")]
    pub default_namespace_delay_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { allow_private: false, switch_context: false, log_level: "info".into(), default_namespace_delay_secs: 5 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StateConfig {
    #[serde(alias = "last-target-file")]
    pub last_target_file: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self { last_target_file: PathBuf::from(".kubedrift").join("last-target.json") }
    }
}
