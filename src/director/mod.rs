//! Cluster Director control-plane client
//!
//! The API is partitioned by region and offers no cross-region listing, so
//! cluster discovery is a fan-out problem. Module structure:
//!
//! - [`api`] - endpoint URLs and typed GETs against the v1alpha API
//! - [`model`] - JSON mirrors of the cluster resource
//! - [`locations`] - which regions the control plane supports for a project
//! - [`inventory`] - the per-region cluster cache and name/zone resolver

pub mod api;
pub mod inventory;
pub mod locations;
pub mod model;
