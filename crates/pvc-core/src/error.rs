//! Error types for claim diagnosis.

use thiserror::Error;

use crate::report::StatusReport;

/// Result type alias for diagnosis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while collecting facts or deducing phases.
#[derive(Debug, Error)]
pub enum Error {
    /// The claim does not exist.
    #[error("volume claim not found: {namespace}/{name}")]
    ClaimNotFound {
        /// Namespace that was searched.
        namespace: String,
        /// The claim name.
        name: String,
    },

    /// The claim could not be fetched.
    #[error("get info about pvc [{namespace}/{name}] failed: {reason}")]
    ClaimFetch {
        /// Namespace of the claim.
        namespace: String,
        /// The claim name.
        name: String,
        /// Why the fetch failed.
        reason: String,
    },

    /// Claims of a namespace could not be listed.
    #[error("list pvcs of namespace {namespace} failed: {reason}")]
    ClaimList {
        /// The namespace.
        namespace: String,
        /// Why the listing failed.
        reason: String,
    },

    /// The bound volume does not exist.
    #[error("volume not found: {name}")]
    VolumeNotFound {
        /// The volume name the claim is bound to.
        name: String,
    },

    /// The bound volume could not be fetched.
    #[error("get info about pv [{name}] failed: {reason}")]
    VolumeFetch {
        /// The volume name.
        name: String,
        /// Why the fetch failed.
        reason: String,
    },

    /// The volume carries no attachment handle, so node attachment records
    /// cannot be correlated with it.
    #[error("volume {volume} is not supported: only CSI volumes carry an attachment handle")]
    UnsupportedVolumeType {
        /// The volume name.
        volume: String,
    },

    /// The pod does not exist.
    #[error("pod not found: {namespace}/{name}")]
    PodNotFound {
        /// Namespace that was searched.
        namespace: String,
        /// The pod name.
        name: String,
    },

    /// A single pod could not be fetched.
    #[error("get pod [{namespace}/{name}] failed: {reason}")]
    PodFetch {
        /// Namespace of the pod.
        namespace: String,
        /// The pod name.
        name: String,
        /// Why the fetch failed.
        reason: String,
    },

    /// Pods of a namespace could not be listed.
    #[error("list pods of namespace {namespace} failed: {reason}")]
    PodList {
        /// The namespace.
        namespace: String,
        /// Why the listing failed.
        reason: String,
    },

    /// Nodes could not be listed.
    #[error("list nodes failed: {reason}")]
    NodeList {
        /// Why the listing failed.
        reason: String,
    },

    /// A cluster snapshot could not be read.
    #[error("invalid cluster snapshot: {reason}")]
    Snapshot {
        /// Why the snapshot was rejected.
        reason: String,
    },
}

/// A diagnosis that stopped before every phase could be evaluated.
///
/// Carries whatever the report held when the failing step ran, so callers
/// can still show the phases that were resolved.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Aborted {
    /// The report as far as diagnosis progressed.
    pub partial: Box<StatusReport>,
    /// The error that stopped the diagnosis.
    #[source]
    pub error: Error,
}

impl Aborted {
    /// Wrap an error together with the partial report.
    #[must_use]
    pub fn new(partial: StatusReport, error: Error) -> Self {
        Self {
            partial: Box::new(partial),
            error,
        }
    }

    /// Split into the partial report and the error.
    #[must_use]
    pub fn into_parts(self) -> (StatusReport, Error) {
        (*self.partial, self.error)
    }
}
