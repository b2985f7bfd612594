//! Business config store — the immutable per-tenant configuration snapshot.
//!
//! One subdirectory per business under the configured root, each holding a
//! `config.json`. The whole tree is read once at startup into a
//! [`BusinessStore`]; nothing reloads or mutates it afterwards, so the store
//! is shared behind a plain `Arc` with no locking. Adding a business means
//! restarting the process.
//!
//! Load failures are deliberately soft: a malformed or missing document
//! skips that business with a warning, and a missing root directory yields
//! an empty store (every lookup then misses — degraded, not fatal).

use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Per-business file name inside each business directory.
const CONFIG_FILE: &str = "config.json";

/// Suggested human contact surfaced to the model, not enforced anywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FallbackContact {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// One tenant's stored configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessConfig {
    /// Unique key; must match the name of the directory the file lives in.
    pub business_id: String,
    pub business_name: String,
    /// Instruction text prepended to every chat exchange for this business.
    pub system_prompt: String,
    #[serde(default)]
    pub fallback_contact: FallbackContact,
    /// Upper bound on completion-response length.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    100
}

/// Read-only mapping from business id to its configuration.
#[derive(Debug, Default)]
pub struct BusinessStore {
    configs: HashMap<String, BusinessConfig>,
}

impl BusinessStore {
    /// Scan `root` and load every business config found under it.
    ///
    /// Never fails: problems are logged and the affected entry skipped.
    pub fn load(root: &Path) -> Self {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %root.display(), error = %e,
                    "businesses directory unavailable — starting with an empty store");
                return Self::default();
            }
        };

        let mut configs = HashMap::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy().into_owned();
            match load_one(&path) {
                Ok(config) => {
                    if config.business_id != dir_name {
                        warn!(
                            dir = %dir_name,
                            business_id = %config.business_id,
                            "business_id does not match its directory name — skipping"
                        );
                        continue;
                    }
                    configs.insert(config.business_id.clone(), config);
                }
                Err(e) => {
                    warn!(dir = %dir_name, error = %e, "skipping unloadable business config");
                }
            }
        }

        info!(count = configs.len(), dir = %root.display(), "business store loaded");
        Self { configs }
    }

    pub fn get(&self, business_id: &str) -> Option<&BusinessConfig> {
        self.configs.get(business_id)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Build a store directly from records, bypassing the filesystem.
    pub fn from_configs(configs: impl IntoIterator<Item = BusinessConfig>) -> Self {
        Self {
            configs: configs
                .into_iter()
                .map(|c| (c.business_id.clone(), c))
                .collect(),
        }
    }
}

fn load_one(business_dir: &Path) -> Result<BusinessConfig, String> {
    let path = business_dir.join(CONFIG_FILE);
    let raw = fs::read_to_string(&path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&raw).map_err(|e| format!("invalid JSON in {}: {e}", path.display()))
}
