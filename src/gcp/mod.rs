//! GCP plumbing shared by the Cluster Director client
//!
//! - [`auth`] - Application Default Credentials and gcloud config defaults
//! - [`http`] - authenticated GET against REST endpoints

pub mod auth;
pub mod http;
