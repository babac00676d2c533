//! Kubernetes API backed fact source.
//!
//! Fetches claims, volumes, pods and nodes through kube-rs and converts them
//! into the plain fact types the diagnosis works on. Each request is bounded
//! by a timeout; nothing is retried.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use k8s_openapi::api::core::v1::{
    Node as KubeNode, PersistentVolume, PersistentVolumeClaim, Pod as KubePod,
};
use kube::api::{Api, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use pvc_core::{Claim, ClaimVolume, Error, FactSource, Node, PodRecord, PodState, Result, Volume};
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::error::CliError;

/// Fact source that queries the Kubernetes API server.
#[derive(Clone)]
pub struct KubeFactSource {
    client: Client,
    default_namespace: String,
    request_timeout: Duration,
}

impl std::fmt::Debug for KubeFactSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeFactSource")
            .field("default_namespace", &self.default_namespace)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl KubeFactSource {
    /// Build a client from a kubeconfig.
    ///
    /// Without an explicit kubeconfig or context, the configuration is
    /// inferred (in-cluster service account, `KUBECONFIG`, `~/.kube/config`).
    ///
    /// # Errors
    ///
    /// Returns an error if no usable configuration is found.
    pub async fn connect(
        kubeconfig: Option<&Path>,
        context: Option<&str>,
        request_timeout: Duration,
    ) -> std::result::Result<Self, CliError> {
        let options = KubeConfigOptions {
            context: context.map(str::to_string),
            ..KubeConfigOptions::default()
        };

        let config = match (kubeconfig, context) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                    CliError::Config(format!(
                        "failed to read kubeconfig '{}': {e}",
                        path.display()
                    ))
                })?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| CliError::Config(format!("invalid kubeconfig: {e}")))?
            }
            (None, Some(_)) => Config::from_kubeconfig(&options)
                .await
                .map_err(|e| CliError::Config(format!("invalid kubeconfig: {e}")))?,
            (None, None) => Config::infer()
                .await
                .map_err(|e| CliError::Config(format!("no cluster configuration found: {e}")))?,
        };

        debug!(
            cluster = %config.cluster_url,
            namespace = %config.default_namespace,
            "connecting to API server"
        );

        let default_namespace = config.default_namespace.clone();
        let client = Client::try_from(config).map_err(|e| CliError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            default_namespace,
            request_timeout,
        })
    }

    /// Namespace of the selected kubeconfig context.
    #[must_use]
    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    /// Run a request under the configured timeout, flattening failures into
    /// a reason string.
    async fn call<T, F>(&self, request: F) -> std::result::Result<T, String>
    where
        F: Future<Output = kube::Result<T>>,
    {
        match timeout(self.request_timeout, request).await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(_) => Err(format!(
                "request timed out after {}s",
                self.request_timeout.as_secs()
            )),
        }
    }
}

impl FactSource for KubeFactSource {
    async fn get_claim(&self, namespace: &str, name: &str) -> Result<Claim> {
        trace!(namespace, name, "get persistentvolumeclaim");
        let api: Api<PersistentVolumeClaim> = Api::namespaced(self.client.clone(), namespace);
        match self.call(api.get_opt(name)).await {
            Ok(Some(pvc)) => Ok(claim_from(pvc, namespace)),
            Ok(None) => Err(Error::ClaimNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            Err(reason) => Err(Error::ClaimFetch {
                namespace: namespace.to_string(),
                name: name.to_string(),
                reason,
            }),
        }
    }

    async fn get_volume(&self, name: &str) -> Result<Volume> {
        trace!(name, "get persistentvolume");
        let api: Api<PersistentVolume> = Api::all(self.client.clone());
        match self.call(api.get_opt(name)).await {
            Ok(Some(pv)) => Ok(volume_from(pv)),
            Ok(None) => Err(Error::VolumeNotFound {
                name: name.to_string(),
            }),
            Err(reason) => Err(Error::VolumeFetch {
                name: name.to_string(),
                reason,
            }),
        }
    }

    async fn list_claims(&self, namespace: &str) -> Result<Vec<Claim>> {
        trace!(namespace, "list persistentvolumeclaims");
        let api: Api<PersistentVolumeClaim> = Api::namespaced(self.client.clone(), namespace);
        let list = self
            .call(api.list(&ListParams::default()))
            .await
            .map_err(|reason| Error::ClaimList {
                namespace: namespace.to_string(),
                reason,
            })?;
        Ok(list
            .items
            .into_iter()
            .map(|pvc| claim_from(pvc, namespace))
            .collect())
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<PodRecord> {
        trace!(namespace, name, "get pod");
        let api: Api<KubePod> = Api::namespaced(self.client.clone(), namespace);
        match self.call(api.get_opt(name)).await {
            Ok(Some(pod)) => Ok(pod_from(pod)),
            Ok(None) => Err(Error::PodNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            Err(reason) => Err(Error::PodFetch {
                namespace: namespace.to_string(),
                name: name.to_string(),
                reason,
            }),
        }
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodRecord>> {
        trace!(namespace, "list pods");
        let api: Api<KubePod> = Api::namespaced(self.client.clone(), namespace);
        let list = self
            .call(api.list(&ListParams::default()))
            .await
            .map_err(|reason| Error::PodList {
                namespace: namespace.to_string(),
                reason,
            })?;
        Ok(list.items.into_iter().map(pod_from).collect())
    }

    async fn list_nodes(&self) -> Result<Vec<Node>> {
        trace!("list nodes");
        let api: Api<KubeNode> = Api::all(self.client.clone());
        let list = self
            .call(api.list(&ListParams::default()))
            .await
            .map_err(|reason| Error::NodeList { reason })?;
        Ok(list.items.into_iter().map(node_from).collect())
    }
}

fn claim_from(pvc: PersistentVolumeClaim, namespace: &str) -> Claim {
    let spec = pvc.spec.unwrap_or_default();
    Claim {
        name: pvc.metadata.name.unwrap_or_default(),
        namespace: pvc
            .metadata
            .namespace
            .unwrap_or_else(|| namespace.to_string()),
        volume_name: spec.volume_name,
        storage_class: spec.storage_class_name,
        phase: pvc.status.and_then(|s| s.phase),
    }
}

fn volume_from(pv: PersistentVolume) -> Volume {
    // Only CSI volumes appear in node attachment records under their handle.
    let csi = pv.spec.and_then(|s| s.csi);
    Volume {
        name: pv.metadata.name.unwrap_or_default(),
        attachment_handle: csi.as_ref().map(|c| c.volume_handle.clone()),
        driver: csi.map(|c| c.driver),
    }
}

fn pod_from(pod: KubePod) -> PodRecord {
    let spec = pod.spec.unwrap_or_default();
    let state = PodState::from_phase(pod.status.as_ref().and_then(|s| s.phase.as_deref()));
    let claim_volumes = spec
        .volumes
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| {
            v.persistent_volume_claim.map(|source| ClaimVolume {
                name: v.name,
                claim: source.claim_name,
            })
        })
        .collect();

    PodRecord {
        name: pod.metadata.name.unwrap_or_default(),
        node: spec.node_name,
        state,
        claim_volumes,
    }
}

fn node_from(node: KubeNode) -> Node {
    let attached_volumes = node
        .status
        .and_then(|s| s.volumes_attached)
        .unwrap_or_default()
        .into_iter()
        .map(|v| v.name)
        .collect();

    Node {
        name: node.metadata.name.unwrap_or_default(),
        attached_volumes,
    }
}
