//! The contract between diagnosis and whatever fetches cluster facts.

use std::future::Future;

use crate::error::Result;
use crate::types::{Claim, Node, PodRecord, Volume};

/// Supplies cluster facts.
///
/// Implementations perform the remote calls; they do not retry. Lookups of a
/// missing object return the matching `*NotFound` error.
pub trait FactSource: Send + Sync {
    /// Fetch a claim.
    fn get_claim(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<Claim>> + Send;

    /// Fetch a volume by name.
    fn get_volume(&self, name: &str) -> impl Future<Output = Result<Volume>> + Send;

    /// List every claim of a namespace.
    fn list_claims(&self, namespace: &str) -> impl Future<Output = Result<Vec<Claim>>> + Send;

    /// Fetch a pod.
    fn get_pod(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<PodRecord>> + Send;

    /// List every pod of a namespace.
    fn list_pods(&self, namespace: &str) -> impl Future<Output = Result<Vec<PodRecord>>> + Send;

    /// List every node of the cluster.
    fn list_nodes(&self) -> impl Future<Output = Result<Vec<Node>>> + Send;
}
