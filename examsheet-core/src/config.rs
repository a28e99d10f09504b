//! Import configuration

use crate::layout::Layout;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the workbook comes from, where records go, and how sheets are laid out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub workbook: PathBuf,
    pub database: PathBuf,
    pub layout: Layout,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from("./uploads/importSpreadsheet.xlsx"),
            database: PathBuf::from("./examsheet.sqlite3"),
            layout: Layout::default(),
        }
    }
}

impl ImportConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ImportConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workbook.as_os_str().is_empty() {
            anyhow::bail!("Configuration error: 'workbook' must not be empty");
        }
        if self.database.as_os_str().is_empty() {
            anyhow::bail!("Configuration error: 'database' must not be empty");
        }
        self.layout.validate()
    }
}
