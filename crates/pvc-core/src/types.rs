//! Core types for claim diagnosis.
//!
//! This module defines the facts the collector hands to the deducer:
//! - [`Claim`]: A request for storage, possibly bound to a volume
//! - [`Volume`]: The concrete storage that satisfies a claim
//! - [`PodRecord`]: A pod and the claims its volumes reference
//! - [`Node`]: A cluster node and the volumes recorded as attached to it
//!
//! and the lifecycle vocabulary used in reports:
//! - [`Phase`]: Provision, Bind, Attach, Mount
//! - [`PhaseStatus`]: The verdict for one phase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A persistent volume claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Claim name.
    pub name: String,

    /// Namespace the claim lives in.
    pub namespace: String,

    /// Name of the volume the claim is bound to; empty or absent until
    /// provisioning and binding complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_name: Option<String>,

    /// Storage class requested by the claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    /// Phase reported by the cluster for the claim itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
}

impl Claim {
    /// Create an unbound claim.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            volume_name: None,
            storage_class: None,
            phase: None,
        }
    }

    /// Bind the claim to a volume.
    #[must_use]
    pub fn bound_to(mut self, volume: impl Into<String>) -> Self {
        self.volume_name = Some(volume.into());
        self
    }

    /// Set the storage class.
    #[must_use]
    pub fn with_storage_class(mut self, class: impl Into<String>) -> Self {
        self.storage_class = Some(class.into());
        self
    }

    /// The bound volume name, treating an empty reference as unbound.
    #[must_use]
    pub fn bound_volume(&self) -> Option<&str> {
        self.volume_name.as_deref().filter(|v| !v.is_empty())
    }

    /// Whether provisioning and binding have completed.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound_volume().is_some()
    }
}

/// A persistent volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Volume name.
    pub name: String,

    /// Identifier node attachment records use for this volume. Only CSI
    /// volumes have one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_handle: Option<String>,

    /// CSI driver that provisioned the volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
}

impl Volume {
    /// Create a volume without an attachment handle.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attachment_handle: None,
            driver: None,
        }
    }

    /// Set the attachment handle.
    #[must_use]
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.attachment_handle = Some(handle.into());
        self
    }

    /// Set the CSI driver name.
    #[must_use]
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    /// The attachment handle, if the volume has a usable one.
    #[must_use]
    pub fn handle(&self) -> Option<&str> {
        self.attachment_handle.as_deref().filter(|h| !h.is_empty())
    }
}

/// Coarse lifecycle state of a pod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PodState {
    /// Accepted but not all containers have started.
    Pending,

    /// Bound to a node with at least one container running.
    Running,

    /// All containers terminated successfully.
    Succeeded,

    /// All containers terminated, at least one in failure.
    Failed,

    /// State could not be obtained.
    #[default]
    Unknown,
}

impl PodState {
    /// Parse a cluster-reported phase. Absent or unrecognised phases are
    /// [`PodState::Unknown`].
    #[must_use]
    pub fn from_phase(phase: Option<&str>) -> Self {
        phase
            .and_then(|p| p.parse().ok())
            .unwrap_or(Self::Unknown)
    }

    /// Whether the pod is still pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for PodState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Running => write!(f, "Running"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

impl FromStr for PodState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown pod phase: {other}")),
        }
    }
}

/// A pod volume backed by a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimVolume {
    /// Volume name local to the pod spec.
    pub name: String,

    /// The claim the volume references.
    pub claim: String,
}

/// A pod as reported by the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodRecord {
    /// Pod name.
    pub name: String,

    /// Node the pod is scheduled on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,

    /// Coarse lifecycle state.
    #[serde(default)]
    pub state: PodState,

    /// Claim-backed volumes of the pod, in declaration order.
    #[serde(default)]
    pub claim_volumes: Vec<ClaimVolume>,
}

impl PodRecord {
    /// Create a pod with no claim volumes.
    #[must_use]
    pub fn new(name: impl Into<String>, state: PodState) -> Self {
        Self {
            name: name.into(),
            node: None,
            state,
            claim_volumes: Vec::new(),
        }
    }

    /// Schedule the pod on a node.
    #[must_use]
    pub fn on_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// Add a claim-backed volume.
    #[must_use]
    pub fn with_claim(mut self, volume: impl Into<String>, claim: impl Into<String>) -> Self {
        self.claim_volumes.push(ClaimVolume {
            name: volume.into(),
            claim: claim.into(),
        });
        self
    }

    /// The report entry for this pod if one of its volumes references
    /// `claim`.
    #[must_use]
    pub fn referencing(&self, claim: &str) -> Option<Pod> {
        self.claim_volumes
            .iter()
            .find(|v| v.claim == claim)
            .map(|v| Pod {
                name: self.name.clone(),
                node: self.node.clone().filter(|n| !n.is_empty()),
                state: self.state,
                volume: v.name.clone(),
            })
    }
}

/// A pod that references the diagnosed claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    /// Pod name.
    pub name: String,

    /// Node the pod is scheduled on, if any.
    pub node: Option<String>,

    /// Coarse lifecycle state.
    pub state: PodState,

    /// Pod-local volume name that references the claim.
    pub volume: String,
}

/// A cluster node and its attachment records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node name.
    pub name: String,

    /// Identifiers of volumes recorded as attached to the node.
    #[serde(default)]
    pub attached_volumes: Vec<String>,
}

impl Node {
    /// Create a node with no attached volumes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attached_volumes: Vec::new(),
        }
    }

    /// Record an attached volume.
    #[must_use]
    pub fn with_attached(mut self, record: impl Into<String>) -> Self {
        self.attached_volumes.push(record.into());
        self
    }
}

/// Lifecycle stage of a claim being made usable by workloads.
///
/// Ordering follows the lifecycle, so ordered maps iterate Provision first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// A volume is created for the claim.
    Provision,

    /// The claim is bound to the volume.
    Bind,

    /// The volume is attached to every node hosting a referencing pod.
    Attach,

    /// The volume is mounted into every referencing pod.
    Mount,
}

impl Phase {
    /// All phases in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Provision, Self::Bind, Self::Attach, Self::Mount];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provision => write!(f, "Provision"),
            Self::Bind => write!(f, "Bind"),
            Self::Attach => write!(f, "Attach"),
            Self::Mount => write!(f, "Mount"),
        }
    }
}

/// Verdict for a single phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    /// Every expected entity satisfied the phase.
    Success,

    /// No expected entity satisfied the phase.
    Fail,

    /// Some, but not all, expected entities satisfied the phase.
    PartlyFail,

    /// Not evaluated yet.
    #[default]
    Ongoing,
}

impl PhaseStatus {
    /// Whether the phase has not been evaluated.
    #[must_use]
    pub const fn is_ongoing(&self) -> bool {
        matches!(self, Self::Ongoing)
    }

    /// Whether the phase succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Fail => write!(f, "fail"),
            Self::PartlyFail => write!(f, "partly fail"),
            Self::Ongoing => write!(f, "ongoing"),
        }
    }
}
