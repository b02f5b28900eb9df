//! Location catalog: which regions the control plane supports.
//!
//! The set of supported regions changes far less often than cluster
//! membership within a region, so the [`Inventory`](super::inventory)
//! builds this once per project and keeps it for the process lifetime.

use crate::director::api::DirectorApi;
use crate::error::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationList {
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    /// Full resource name, e.g. `projects/p/locations/us-central1`.
    pub name: String,
    /// Bare region identifier, e.g. `us-central1`.
    pub location_id: String,
}

impl Location {
    /// The region identifier, from `locationId` when present or the tail of
    /// the resource name otherwise.
    pub fn region(&self) -> &str {
        if !self.location_id.is_empty() {
            &self.location_id
        } else {
            self.name.rsplit('/').next().unwrap_or(&self.name)
        }
    }
}

/// Fetch the regions the control plane supports for `project`, in API
/// iteration order.
pub async fn supported_regions(api: &DirectorApi, project: &str) -> Result<Vec<String>> {
    let list = api.list_locations(project).await?;
    let regions: Vec<String> = list
        .locations
        .iter()
        .map(|loc| loc.region().to_string())
        .collect();

    tracing::info!("project {} supports {} region(s)", project, regions.len());
    Ok(regions)
}
