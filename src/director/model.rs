//! JSON mirrors of the Cluster Director cluster resource.
//!
//! Field names follow the wire format (camelCase) exactly; unknown fields
//! are ignored and absent ones default, since the alpha API adds fields
//! without notice. A record is an immutable snapshot: the cache replaces it
//! wholesale on refresh, never field by field.

use serde::{Deserialize, Serialize};

/// One cluster as returned by the control plane.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterRecord {
    pub name: String,
    pub create_time: String,
    pub update_time: String,
    pub networks: Vec<Network>,
    pub storages: Vec<Storage>,
    pub compute: Compute,
    pub orchestrator: Orchestrator,
    pub reconciling: bool,
}

impl ClusterRecord {
    /// The short cluster name, without the `projects/.../clusters/` prefix
    /// the API sometimes uses in the `name` field.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Zone of the first compute resource request, used to target the login
    /// node for SSH.
    pub fn first_compute_zone(&self) -> Option<&str> {
        self.compute
            .resource_requests
            .first()
            .map(|r| r.zone.as_str())
    }

    /// Hostname of the first login node instance. Falls back to the
    /// conventional `{name}-login-001` when the record carries no instance
    /// list yet (clusters still reconciling).
    pub fn login_node_hostname(&self) -> String {
        self.orchestrator
            .slurm
            .login_nodes
            .instances
            .first()
            .map(|i| i.instance.rsplit('/').next().unwrap_or(&i.instance).to_string())
            .unwrap_or_else(|| format!("{}-login-001", self.short_name()))
    }
}

/// Derive the region from a zone name, e.g. `us-central1-c` -> `us-central1`.
pub fn region_of_zone(zone: &str) -> &str {
    match zone.rsplit_once('-') {
        Some((region, _)) => region,
        None => zone,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Network {
    pub network: String,
    pub initialize_params: NetworkParams,
    pub subnetwork: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkParams {
    pub network: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Storage {
    pub storage: String,
    pub initialize_params: StorageParams,
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageParams {
    pub filestore: Filestore,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filestore {
    pub file_shares: Vec<FileShare>,
    pub tier: String,
    pub filestore: String,
    pub protocol: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileShare {
    pub capacity_gb: String,
    pub file_share: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Compute {
    pub resource_requests: Vec<ResourceRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceRequest {
    pub id: String,
    pub zone: String,
    pub machine_type: String,
    pub guest_accelerators: Vec<serde_json::Value>,
    pub disks: Vec<Disk>,
    pub provisioning_model: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Disk {
    #[serde(rename = "type")]
    pub disk_type: String,
    pub size_gb: String,
    pub boot: bool,
    pub source_image: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Orchestrator {
    pub slurm: Slurm,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Slurm {
    pub node_sets: Vec<NodeSet>,
    pub partitions: Vec<Partition>,
    pub default_partition: String,
    pub login_nodes: LoginNodes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeSet {
    pub id: String,
    pub resource_request_id: String,
    pub storage_configs: Vec<StorageConfig>,
    pub static_node_count: String,
    pub enable_os_login: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Partition {
    pub id: String,
    pub node_set_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginNodes {
    pub machine_type: String,
    pub zone: String,
    pub count: String,
    pub disks: Vec<Disk>,
    pub enable_os_login: bool,
    pub enable_public_ips: bool,
    pub instances: Vec<LoginNodeInstance>,
    pub storage_configs: Vec<StorageConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginNodeInstance {
    pub instance: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    pub id: String,
    pub local_mount: String,
}

/// Envelope of the per-region clusters listing. An absent `clusters` array
/// parses as an empty list, which is a valid cached state.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterList {
    pub clusters: Vec<ClusterRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "projects/hpc-toolkit-dev/locations/us-central1/clusters/quadrant",
        "createTime": "2025-06-01T12:00:00Z",
        "updateTime": "2025-06-02T08:30:00Z",
        "networks": [{"network": "net0", "subnetwork": "sub0"}],
        "storages": [{"id": "home", "initializeParams": {"filestore": {"tier": "BASIC_HDD",
            "fileShares": [{"capacityGb": "1024", "fileShare": "nfsshare"}]}}}],
        "compute": {"resourceRequests": [
            {"id": "compute", "zone": "us-central1-c", "machineType": "a3-highgpu-8g",
             "provisioningModel": "SPOT",
             "disks": [{"type": "pd-balanced", "sizeGb": "100", "boot": true}]}
        ]},
        "orchestrator": {"slurm": {
            "defaultPartition": "batch",
            "nodeSets": [{"id": "ns0", "resourceRequestId": "compute", "staticNodeCount": "4"}],
            "partitions": [{"id": "batch", "nodeSetIds": ["ns0"]}],
            "loginNodes": {"machineType": "n2-standard-8", "zone": "us-central1-c",
                "count": "1",
                "instances": [{"instance": "projects/p/zones/us-central1-c/instances/quadrant-login-001"}]}
        }},
        "reconciling": false
    }"#;

    #[test]
    fn parses_full_cluster_record() {
        let cluster: ClusterRecord = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(cluster.short_name(), "quadrant");
        assert_eq!(cluster.first_compute_zone(), Some("us-central1-c"));
        assert_eq!(cluster.orchestrator.slurm.default_partition, "batch");
        assert_eq!(cluster.compute.resource_requests[0].machine_type, "a3-highgpu-8g");
        assert_eq!(cluster.storages[0].initialize_params.filestore.file_shares[0].capacity_gb, "1024");
    }

    #[test]
    fn login_node_hostname_from_instance_url() {
        let cluster: ClusterRecord = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(cluster.login_node_hostname(), "quadrant-login-001");
    }

    #[test]
    fn login_node_hostname_falls_back_to_convention() {
        let cluster = ClusterRecord {
            name: "gizmo".to_string(),
            ..Default::default()
        };
        assert_eq!(cluster.login_node_hostname(), "gizmo-login-001");
    }

    #[test]
    fn cluster_list_tolerates_missing_array() {
        let list: ClusterList = serde_json::from_str("{}").unwrap();
        assert!(list.clusters.is_empty());

        let list: ClusterList = serde_json::from_str(r#"{"clusters": []}"#).unwrap();
        assert!(list.clusters.is_empty());
    }

    #[test]
    fn zone_to_region() {
        assert_eq!(region_of_zone("us-central1-c"), "us-central1");
        assert_eq!(region_of_zone("europe-west4-a"), "europe-west4");
        assert_eq!(region_of_zone("nozone"), "nozone");
    }

    #[test]
    fn first_compute_zone_empty_when_no_requests() {
        let cluster = ClusterRecord::default();
        assert_eq!(cluster.first_compute_zone(), None);
    }
}
