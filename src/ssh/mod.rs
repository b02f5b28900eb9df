//! Remote command execution on cluster login nodes.
//!
//! The transport is `gcloud compute ssh` with IAP tunneling, the same path
//! an operator would use by hand. The inventory supplies the zone (from the
//! cluster's first compute resource request) and the login node hostname.

use crate::error::{Error, Result};
use tokio::process::Command;

/// Target of a remote command.
#[derive(Debug, Clone)]
pub struct SshTarget {
    /// Login node instance name.
    pub hostname: String,
    pub project: String,
    pub zone: String,
    /// Tunnel through IAP; login nodes usually have no public IP.
    pub use_iap: bool,
}

impl SshTarget {
    pub fn new(hostname: &str, project: &str, zone: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            project: project.to_string(),
            zone: zone.to_string(),
            use_iap: true,
        }
    }
}

/// Run a shell command on the target and capture its stdout.
///
/// Failures (gcloud missing, auth, unreachable host, non-zero exit) are all
/// reported as [`Error::Command`]; stderr is folded into the message.
pub async fn run_command(target: &SshTarget, command: &str) -> Result<String> {
    let mut args = vec![
        "compute".to_string(),
        "ssh".to_string(),
        target.hostname.clone(),
        format!("--project={}", target.project),
        format!("--zone={}", target.zone),
    ];

    if target.use_iap {
        args.push("--tunnel-through-iap".to_string());
    }

    args.push("--command".to_string());
    args.push(command.to_string());

    tracing::info!("executing: gcloud {}", args.join(" "));

    let output = Command::new("gcloud")
        .args(&args)
        .output()
        .await
        .map_err(|e| Error::Command(format!("failed to run gcloud: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Command(format!(
            "gcloud compute ssh exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
