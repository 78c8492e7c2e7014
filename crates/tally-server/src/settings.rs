//! Server configuration: optional TOML file layered under `TALLY_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, anyhow};
use chrono::FixedOffset;
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Reference timezone for all calendar boundaries, e.g. `+08:00`.
  pub utc_offset: String,
}

impl ServerConfig {
  /// Read `path` (if it exists) and the environment, falling back to
  /// defaults for anything unset.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 5290)?
      .set_default("store_path", "tally.sqlite3")?
      .set_default("utc_offset", "+00:00")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("TALLY"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn offset(&self) -> anyhow::Result<FixedOffset> {
    self
      .utc_offset
      .parse()
      .map_err(|e| anyhow!("invalid utc_offset {:?}: {e}", self.utc_offset))
  }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
