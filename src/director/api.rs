//! Typed access to the Cluster Director v1alpha REST endpoints.
//!
//! Combines the HTTP fetcher with a token source and the endpoint URL
//! scheme. The base URL is overridable so integration tests can point at a
//! mock server.

use crate::director::locations::LocationList;
use crate::director::model::{ClusterList, ClusterRecord};
use crate::error::{Error, Result};
use crate::gcp::auth::GcpCredentials;
use crate::gcp::http::ApiClient;
use serde::de::DeserializeOwned;
use url::Url;

/// Production endpoint of the Cluster Director API.
pub const DEFAULT_BASE_URL: &str = "https://hypercomputecluster.googleapis.com/v1alpha";

/// Where bearer tokens come from. Tests inject a fixed token; everything
/// else goes through Application Default Credentials.
#[derive(Clone)]
enum TokenSource {
    Adc(GcpCredentials),
    Fixed(String),
}

#[derive(Clone)]
pub struct DirectorApi {
    http: ApiClient,
    token_source: TokenSource,
    base_url: String,
}

impl DirectorApi {
    /// Client against the production endpoint, authenticated via ADC.
    pub fn new(credentials: GcpCredentials) -> Result<Self> {
        Ok(Self {
            http: ApiClient::new()?,
            token_source: TokenSource::Adc(credentials),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Client against an alternate endpoint with a fixed token. Used by
    /// tests; also handy against staging environments.
    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| Error::NotConfigured(format!("invalid base URL {base_url:?}: {e}")))?;

        Ok(Self {
            http: ApiClient::new()?,
            token_source: TokenSource::Fixed(token.to_string()),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    async fn token(&self) -> Result<String> {
        match &self.token_source {
            TokenSource::Adc(credentials) => credentials
                .token()
                .await
                .map_err(|e| Error::NotConfigured(format!("no usable credentials: {e}"))),
            TokenSource::Fixed(token) => Ok(token.clone()),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let token = self.token().await?;
        let body = self.http.get(url, &token).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn locations_url(&self, project: &str) -> String {
        format!("{}/projects/{}/locations/", self.base_url, project)
    }

    pub fn clusters_url(&self, project: &str, region: &str) -> String {
        format!(
            "{}/projects/{}/locations/{}/clusters",
            self.base_url, project, region
        )
    }

    pub fn cluster_url(&self, project: &str, region: &str, name: &str) -> String {
        format!("{}/{}", self.clusters_url(project, region), name)
    }

    /// Locations the control plane supports for this project.
    pub async fn list_locations(&self, project: &str) -> Result<LocationList> {
        self.get_json(&self.locations_url(project)).await
    }

    /// All clusters in one region. An envelope without a `clusters` array
    /// parses as an empty, valid listing.
    pub async fn list_clusters(&self, project: &str, region: &str) -> Result<ClusterList> {
        self.get_json(&self.clusters_url(project, region)).await
    }

    /// A single cluster by name, when the region is already known.
    pub async fn get_cluster(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<ClusterRecord> {
        self.get_json(&self.cluster_url(project, region, name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_scheme_matches_the_api() {
        let api = DirectorApi::with_base_url("https://example.test/v1alpha", "t").unwrap();
        assert_eq!(
            api.locations_url("hpc-toolkit-dev"),
            "https://example.test/v1alpha/projects/hpc-toolkit-dev/locations/"
        );
        assert_eq!(
            api.clusters_url("hpc-toolkit-dev", "us-central1"),
            "https://example.test/v1alpha/projects/hpc-toolkit-dev/locations/us-central1/clusters"
        );
        assert_eq!(
            api.cluster_url("hpc-toolkit-dev", "us-central1", "quadrant"),
            "https://example.test/v1alpha/projects/hpc-toolkit-dev/locations/us-central1/clusters/quadrant"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_normalized() {
        let api = DirectorApi::with_base_url("https://example.test/v1alpha/", "t").unwrap();
        assert_eq!(
            api.clusters_url("p-123456", "us-east1"),
            "https://example.test/v1alpha/projects/p-123456/locations/us-east1/clusters"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(DirectorApi::with_base_url("not a url", "t").is_err());
    }
}
