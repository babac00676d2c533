//! In-memory cluster facts.
//!
//! A [`ClusterSnapshot`] answers [`FactSource`] queries from a fixed set of
//! objects, typically loaded from a JSON document:
//!
//! ```json
//! {
//!   "claims":  [{ "name": "data", "namespace": "default", "volume_name": "pv-1" }],
//!   "volumes": [{ "name": "pv-1", "attachment_handle": "vol-1" }],
//!   "pods":    [{ "name": "web-0", "node": "node-a", "state": "Running",
//!                 "claim_volumes": [{ "name": "www", "claim": "data" }] }],
//!   "nodes":   [{ "name": "node-a", "attached_volumes": ["kubernetes.io/csi/x^vol-1"] }]
//! }
//! ```
//!
//! Snapshots carry no namespace for pods; every pod is treated as belonging
//! to whichever namespace is queried.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::source::FactSource;
use crate::types::{Claim, Node, PodRecord, Volume};

/// A fixed set of cluster objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    /// Claims across namespaces.
    #[serde(default)]
    pub claims: Vec<Claim>,

    /// Volumes.
    #[serde(default)]
    pub volumes: Vec<Volume>,

    /// Pods.
    #[serde(default)]
    pub pods: Vec<PodRecord>,

    /// Nodes.
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl ClusterSnapshot {
    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or names a claim twice.
    pub fn from_json(content: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(content).map_err(|e| Error::Snapshot {
            reason: e.to_string(),
        })?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Load a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Snapshot {
            reason: format!("failed to read '{}': {e}", path.display()),
        })?;
        let snapshot = Self::from_json(&content)?;
        debug!(
            path = %path.display(),
            claims = snapshot.claims.len(),
            pods = snapshot.pods.len(),
            nodes = snapshot.nodes.len(),
            "loaded cluster snapshot"
        );
        Ok(snapshot)
    }

    fn validate(&self) -> Result<()> {
        for (i, claim) in self.claims.iter().enumerate() {
            let duplicate = self.claims[..i]
                .iter()
                .any(|c| c.name == claim.name && c.namespace == claim.namespace);
            if duplicate {
                return Err(Error::Snapshot {
                    reason: format!("claim {}/{} appears twice", claim.namespace, claim.name),
                });
            }
        }
        Ok(())
    }
}

impl FactSource for ClusterSnapshot {
    async fn get_claim(&self, namespace: &str, name: &str) -> Result<Claim> {
        self.claims
            .iter()
            .find(|c| c.namespace == namespace && c.name == name)
            .cloned()
            .ok_or_else(|| Error::ClaimNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn get_volume(&self, name: &str) -> Result<Volume> {
        self.volumes
            .iter()
            .find(|v| v.name == name)
            .cloned()
            .ok_or_else(|| Error::VolumeNotFound {
                name: name.to_string(),
            })
    }

    async fn list_claims(&self, namespace: &str) -> Result<Vec<Claim>> {
        Ok(self
            .claims
            .iter()
            .filter(|c| c.namespace == namespace)
            .cloned()
            .collect())
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<PodRecord> {
        self.pods
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| Error::PodNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn list_pods(&self, _namespace: &str) -> Result<Vec<PodRecord>> {
        Ok(self.pods.clone())
    }

    async fn list_nodes(&self) -> Result<Vec<Node>> {
        Ok(self.nodes.clone())
    }
}
