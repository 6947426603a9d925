use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$CHEONMA_HOME`, or `~/.cheonma`.
pub fn cheonma_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CHEONMA_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".cheonma"))
}

pub fn ensure_cheonma_home() -> Result<PathBuf> {
    let dir = cheonma_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
