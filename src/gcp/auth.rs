//! GCP Authentication
//!
//! Access tokens come from Application Default Credentials (gcp_auth); the
//! default project and region are read from the local gcloud configuration
//! so most invocations need no flags at all.

use anyhow::{Context, Result};
use gcp_auth::TokenProvider;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// Scopes requested for control-plane API access.
pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Credential provider backed by Application Default Credentials.
///
/// The token value is opaque to the rest of the crate; gcp_auth handles
/// caching and refresh internally.
#[derive(Clone)]
pub struct GcpCredentials {
    provider: Arc<dyn TokenProvider>,
}

impl GcpCredentials {
    pub async fn new() -> Result<Self> {
        let provider = gcp_auth::provider().await.context(
            "Failed to initialize GCP authentication. Run 'gcloud auth application-default login'",
        )?;

        Ok(Self { provider })
    }

    /// Get a bearer token for API calls.
    pub async fn token(&self) -> Result<String> {
        let token = self
            .provider
            .token(DEFAULT_SCOPES)
            .await
            .context("Failed to get access token")?;

        Ok(token.as_str().to_string())
    }
}

/// Locate the gcloud configuration directory.
pub fn gcloud_config_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CLOUDSDK_CONFIG") {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|p| p.join("gcloud"))
}

/// Validate a GCP project ID: 6-30 chars, lowercase letters, digits and
/// hyphens, starting with a letter and not ending with a hyphen.
fn valid_project_id(project: &str) -> bool {
    if project.len() < 6 || project.len() > 30 {
        return false;
    }
    if !project.starts_with(|c: char| c.is_ascii_lowercase()) || project.ends_with('-') {
        return false;
    }

    project
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Read the default project from the environment or gcloud configuration.
pub fn default_project() -> Option<String> {
    for var in [
        "CLOUDSDK_CORE_PROJECT",
        "GOOGLE_CLOUD_PROJECT",
        "GCLOUD_PROJECT",
    ] {
        if let Ok(project) = std::env::var(var) {
            if valid_project_id(&project) {
                return Some(project);
            }
            tracing::warn!("Invalid project ID format in {}", var);
        }
    }

    let config_dir = gcloud_config_dir()?;
    read_active_config_property(&config_dir, "core", "project").filter(|p| valid_project_id(p))
}

/// Read the default compute region from the environment or gcloud
/// configuration.
pub fn default_region() -> Option<String> {
    if let Ok(region) = std::env::var("CLOUDSDK_COMPUTE_REGION") {
        return Some(region);
    }

    let config_dir = gcloud_config_dir()?;
    read_active_config_property(&config_dir, "compute", "region")
}

/// Read the default compute zone from the environment or gcloud
/// configuration.
pub fn default_zone() -> Option<String> {
    if let Ok(zone) = std::env::var("CLOUDSDK_COMPUTE_ZONE") {
        return Some(zone);
    }

    let config_dir = gcloud_config_dir()?;
    read_active_config_property(&config_dir, "compute", "zone")
}

/// Look up a `key` under `[section]` in the active gcloud configuration
/// file.
fn read_active_config_property(config_dir: &Path, section: &str, key: &str) -> Option<String> {
    let active_config = std::fs::read_to_string(config_dir.join("active_config")).ok()?;
    let config_name = active_config.trim();

    // Reject names that could escape the configurations directory.
    if !config_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        tracing::warn!("Invalid characters in active_config name");
        return None;
    }

    let config_path = config_dir
        .join("configurations")
        .join(format!("config_{config_name}"));
    let content = std::fs::read_to_string(config_path).ok()?;

    let header = format!("[{section}]");
    let mut in_section = false;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line == header {
            in_section = true;
        } else if line.starts_with('[') {
            in_section = false;
        } else if in_section && line.starts_with(key) && line.contains('=') {
            if let Some(value) = line.split('=').nth(1) {
                return Some(value.trim().to_string());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_id_validation() {
        assert!(valid_project_id("hpc-toolkit-dev"));
        assert!(valid_project_id("my-project-123456"));
        assert!(!valid_project_id("short"));
        assert!(!valid_project_id("1starts-with-digit"));
        assert!(!valid_project_id("ends-with-hyphen-"));
        assert!(!valid_project_id("Uppercase-Project"));
    }

    #[test]
    fn active_config_lookup_reads_sectioned_keys() {
        let dir = std::env::temp_dir().join(format!("cdctl-auth-test-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("configurations")).unwrap();
        std::fs::write(dir.join("active_config"), "default\n").unwrap();
        std::fs::write(
            dir.join("configurations").join("config_default"),
            "[core]\nproject = hpc-toolkit-dev\n[compute]\nregion = us-central1\n",
        )
        .unwrap();

        assert_eq!(
            read_active_config_property(&dir, "core", "project").as_deref(),
            Some("hpc-toolkit-dev")
        );
        assert_eq!(
            read_active_config_property(&dir, "compute", "region").as_deref(),
            Some("us-central1")
        );
        assert_eq!(read_active_config_property(&dir, "core", "region"), None);

        std::fs::remove_dir_all(&dir).ok();
    }
}
