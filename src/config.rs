//! Configuration Management
//!
//! Persistent defaults for cdctl (project, region), falling back to the
//! local gcloud configuration when unset.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Last used project ID
    #[serde(default)]
    pub project_id: Option<String>,
    /// Last used region
    #[serde(default)]
    pub region: Option<String>,
}

impl Config {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cdctl").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults on any error.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Effective project (CLI > config > gcloud default). Empty when nothing
    /// is configured anywhere.
    pub fn effective_project(&self) -> Option<String> {
        self.project_id
            .clone()
            .or_else(crate::gcp::auth::default_project)
    }

    /// Effective region hint, if any (CLI > config > gcloud default region,
    /// falling back to the region of the gcloud default zone).
    pub fn effective_region(&self) -> Option<String> {
        region_from_defaults(
            self.region.clone().or_else(crate::gcp::auth::default_region),
            crate::gcp::auth::default_zone(),
        )
    }

    /// Set project and save
    pub fn set_project(&mut self, project_id: &str) -> Result<()> {
        self.project_id = Some(project_id.to_string());
        self.save()
    }

    /// Set region and save
    pub fn set_region(&mut self, region: &str) -> Result<()> {
        self.region = Some(region.to_string());
        self.save()
    }
}

/// Pick a region hint: an explicit region wins, otherwise derive one from a
/// configured default zone.
fn region_from_defaults(region: Option<String>, zone: Option<String>) -> Option<String> {
    region.or_else(|| {
        zone.map(|z| crate::director::model::region_of_zone(&z).to_string())
    })
}
