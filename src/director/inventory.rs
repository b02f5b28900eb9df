//! Region cluster cache and name resolver.
//!
//! The control plane has no "list clusters across all regions" endpoint, so
//! the inventory fans a listing out over every supported region and caches
//! the per-region results. Cache discipline:
//!
//! - a region's slot is either absent (never queried) or holds the most
//!   recent successful fetch; an empty list is a valid cached state,
//!   distinct from absent
//! - refreshes stage into a private buffer and swap the slot only on
//!   success, so a transport or parse failure never clears or mixes into a
//!   previously good entry
//! - a failure in one region never alters or blocks another region's slot

use crate::director::api::DirectorApi;
use crate::director::locations;
use crate::director::model::ClusterRecord;
use crate::error::{Error, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A resolved cluster: the record plus the region that owns it.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub region: String,
    pub cluster: ClusterRecord,
}

impl Resolved {
    /// Zone used to target the cluster's login node for SSH.
    pub fn zone(&self) -> Option<&str> {
        self.cluster.first_compute_zone()
    }
}

/// Cluster inventory for one project, shared across calls by reference.
///
/// Readers during a background refresh see either the old complete entry or
/// the new complete entry for a region, never a partial one: slots are
/// replaced wholesale under the write lock.
pub struct Inventory {
    api: DirectorApi,
    regions: RwLock<Option<Vec<String>>>,
    index: RwLock<HashMap<String, Vec<ClusterRecord>>>,
}

impl Inventory {
    pub fn new(api: DirectorApi) -> Self {
        Self {
            api,
            regions: RwLock::new(None),
            index: RwLock::new(HashMap::new()),
        }
    }

    /// Supported regions for `project`, fetched once and cached for the
    /// process lifetime. Use [`Inventory::refresh_regions`] after switching
    /// projects.
    pub async fn regions(&self, project: &str) -> Result<Vec<String>> {
        {
            let cached = self.regions.read().await;
            if let Some(regions) = cached.as_ref() {
                return Ok(regions.clone());
            }
        }

        self.refresh_regions(project).await
    }

    /// Re-query the location catalog, replacing the cached region set.
    pub async fn refresh_regions(&self, project: &str) -> Result<Vec<String>> {
        let fetched = locations::supported_regions(&self.api, project).await?;

        let mut cached = self.regions.write().await;
        *cached = Some(fetched.clone());
        Ok(fetched)
    }

    /// Refresh one region's cluster list, returning how many clusters it
    /// holds. The slot is swapped only after a successful fetch and parse;
    /// on failure the previous entry, if any, is left untouched.
    pub async fn refresh_region(&self, region: &str, project: &str) -> Result<usize> {
        let staged = self.api.list_clusters(project, region).await?.clusters;
        let count = staged.len();

        let mut index = self.index.write().await;
        index.insert(region.to_string(), staged);

        tracing::debug!("region {}: cached {} cluster(s)", region, count);
        Ok(count)
    }

    /// All known clusters tagged with their owning region, in catalog order
    /// and remote-supplied order within a region.
    ///
    /// Regions not yet cached are refreshed first (every region when
    /// `force`), one task per region; a region whose refresh fails keeps its
    /// previous entry and is logged, without blocking its siblings. Only a
    /// failure to obtain the region catalog itself is an error.
    pub async fn list_all(&self, project: &str, force: bool) -> Result<Vec<(String, ClusterRecord)>> {
        let regions = self.regions(project).await?;

        let stale: Vec<String> = if force {
            regions.clone()
        } else {
            let index = self.index.read().await;
            regions
                .iter()
                .filter(|r| !index.contains_key(*r))
                .cloned()
                .collect()
        };

        if !stale.is_empty() {
            // Each task stages its own region privately; the shared index is
            // written only after the join, one complete slot at a time.
            let fetches = stale.iter().map(|region| {
                let api = &self.api;
                async move {
                    let result = api.list_clusters(project, region).await;
                    (region.clone(), result)
                }
            });

            let results = futures::future::join_all(fetches).await;

            let mut index = self.index.write().await;
            for (region, result) in results {
                match result {
                    Ok(list) => {
                        index.insert(region, list.clusters);
                    }
                    Err(e) => {
                        tracing::warn!("region {}: refresh failed, keeping cached entry: {}", region, e);
                    }
                }
            }
        }

        let index = self.index.read().await;
        let mut all = Vec::new();
        for region in &regions {
            if let Some(clusters) = index.get(region) {
                for cluster in clusters {
                    all.push((region.clone(), cluster.clone()));
                }
            }
        }

        Ok(all)
    }

    /// Find a cluster by exact name.
    ///
    /// With a region hint only that region is consulted (refreshed first if
    /// not cached); otherwise every supported region is, in catalog order.
    /// Cluster names are assumed unique per project, so the first match
    /// wins.
    pub async fn resolve(
        &self,
        name: &str,
        region_hint: Option<&str>,
        project: &str,
    ) -> Result<Resolved> {
        if let Some(region) = region_hint {
            if !self.is_cached(region).await {
                self.refresh_region(region, project).await?;
            }

            let index = self.index.read().await;
            return index
                .get(region)
                .and_then(|clusters| clusters.iter().find(|c| c.short_name() == name))
                .map(|cluster| Resolved {
                    region: region.to_string(),
                    cluster: cluster.clone(),
                })
                .ok_or_else(|| Error::NotFound(name.to_string()));
        }

        self.list_all(project, false)
            .await?
            .into_iter()
            .find(|(_, cluster)| cluster.short_name() == name)
            .map(|(region, cluster)| Resolved { region, cluster })
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Whether `region` has been queried successfully at least once. An
    /// empty cached list still counts as cached.
    pub async fn is_cached(&self, region: &str) -> bool {
        self.index.read().await.contains_key(region)
    }

    /// Snapshot of one region's cached entry; `None` means never queried.
    pub async fn cached_entry(&self, region: &str) -> Option<Vec<ClusterRecord>> {
        self.index.read().await.get(region).cloned()
    }
}
