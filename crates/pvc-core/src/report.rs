//! Structured diagnosis output.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{Phase, PhaseStatus, Pod};

/// Verdict and explanation for one phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseVerdict {
    /// The verdict.
    pub status: PhaseStatus,

    /// Human-readable explanation; empty on success.
    pub detail: String,

    /// Entities that have not satisfied the phase, sorted by name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outstanding: Vec<String>,
}

impl PhaseVerdict {
    /// A successful verdict.
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: PhaseStatus::Success,
            detail: String::new(),
            outstanding: Vec::new(),
        }
    }
}

/// The resolved volume a claim is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeStatus {
    /// Volume name.
    pub name: String,

    /// Handle used to find the volume in node attachment records.
    pub attachment_handle: String,
}

/// Lifecycle status of a single claim.
///
/// The phase map always holds all four phases; phases that diagnosis did not
/// reach stay [`PhaseStatus::Ongoing`] with an empty detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Claim name.
    pub claim: String,

    /// Namespace of the claim.
    pub namespace: String,

    /// The bound volume, once resolved.
    pub volume: Option<VolumeStatus>,

    /// Pods referencing the claim, sorted by name.
    pub pods: Vec<Pod>,

    /// Nodes that have the volume attached, sorted by name.
    pub attached_nodes: Vec<String>,

    #[serde(default = "all_ongoing", deserialize_with = "complete_phases")]
    phases: BTreeMap<Phase, PhaseVerdict>,
}

fn all_ongoing() -> BTreeMap<Phase, PhaseVerdict> {
    Phase::ALL
        .into_iter()
        .map(|p| (p, PhaseVerdict::default()))
        .collect()
}

/// Phases missing from the input are filled in as ongoing.
fn complete_phases<'de, D>(deserializer: D) -> Result<BTreeMap<Phase, PhaseVerdict>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut phases = BTreeMap::<Phase, PhaseVerdict>::deserialize(deserializer)?;
    for phase in Phase::ALL {
        phases.entry(phase).or_default();
    }
    Ok(phases)
}

impl StatusReport {
    /// A report with every phase still ongoing.
    #[must_use]
    pub fn new(namespace: impl Into<String>, claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            namespace: namespace.into(),
            volume: None,
            pods: Vec::new(),
            attached_nodes: Vec::new(),
            phases: all_ongoing(),
        }
    }

    /// The verdict for `phase`.
    #[must_use]
    pub fn phase(&self, phase: Phase) -> &PhaseVerdict {
        // Every constructor fills all four phases.
        static ONGOING: PhaseVerdict = PhaseVerdict {
            status: PhaseStatus::Ongoing,
            detail: String::new(),
            outstanding: Vec::new(),
        };
        self.phases.get(&phase).unwrap_or(&ONGOING)
    }

    /// All phases in lifecycle order.
    pub fn phases(&self) -> impl Iterator<Item = (Phase, &PhaseVerdict)> {
        self.phases.iter().map(|(p, v)| (*p, v))
    }

    /// Record the verdict for `phase`.
    pub fn set_phase(&mut self, phase: Phase, verdict: PhaseVerdict) {
        self.phases.insert(phase, verdict);
    }

    /// Mark provisioning and binding complete.
    pub fn mark_bound(&mut self) {
        self.set_phase(Phase::Provision, PhaseVerdict::success());
        self.set_phase(Phase::Bind, PhaseVerdict::success());
    }

    /// Whether every phase succeeded.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.phases.values().all(|v| v.status.is_success())
    }
}
