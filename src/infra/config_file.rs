// ============================================================
// Layer 6 — JSON Config Files
// ============================================================
// `--config <file.json>` replaces the command-line flags with a
// whole config read from disk. Fields missing from the file take
// their Default values (the config structs carry #[serde(default)]).

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::{fs, path::Path};

/// Read and deserialise a JSON config file.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

    let cfg = serde_json::from_str(&json)
        .with_context(|| format!("Invalid config in '{}'", path.display()))?;

    tracing::debug!("Loaded config from '{}'", path.display());
    Ok(cfg)
}
