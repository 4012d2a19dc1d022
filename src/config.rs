// src/config.rs

use crate::types::{ScenarioConfigSet, ScenarioManagerConfig};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

impl ScenarioManagerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read manager config: {}", path.display()))?;
        let config = serde_yaml::from_str(&contents).context("parse manager config yaml")?;
        Ok(config)
    }
}

impl ScenarioConfigSet {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read scenario config: {}", path.display()))?;
        let configs = serde_yaml::from_str(&contents).context("parse scenario config yaml")?;
        Ok(configs)
    }
}
