//! Phase deduction.
//!
//! Turns an already-collected [`FactBundle`] into a [`StatusReport`]. Nothing
//! here performs I/O; the same bundle always yields the same report.
//!
//! Attach and Mount share one tie-break: a phase is partly failed as soon as
//! any expected entity satisfied it while others did not, regardless of the
//! ratio.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Aborted, Error};
use crate::matcher::{AttachmentMatcher, MatchPolicy};
use crate::report::{PhaseVerdict, StatusReport, VolumeStatus};
use crate::types::{Claim, Node, Phase, PhaseStatus, Pod, PodRecord, Volume};

/// Everything the deducer needs to know about one claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactBundle {
    /// The claim under diagnosis.
    pub claim: Claim,

    /// The volume the claim is bound to, if it was resolved.
    pub volume: Option<Volume>,

    /// Pods of the claim's namespace.
    pub pods: Vec<PodRecord>,

    /// Cluster nodes with their attachment records.
    pub nodes: Vec<Node>,
}

impl FactBundle {
    /// A bundle for a claim with no other facts collected.
    #[must_use]
    pub fn new(claim: Claim) -> Self {
        Self {
            claim,
            volume: None,
            pods: Vec::new(),
            nodes: Vec::new(),
        }
    }
}

/// Deduces phase verdicts from facts.
#[derive(Debug, Clone, Default)]
pub struct PhaseDeducer<M = MatchPolicy> {
    matcher: M,
}

impl PhaseDeducer {
    /// A deducer using the default substring matching policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: AttachmentMatcher> PhaseDeducer<M> {
    /// A deducer using a custom attachment matcher.
    pub fn with_matcher(matcher: M) -> Self {
        Self { matcher }
    }

    /// Deduce the status of the bundle's claim.
    ///
    /// An unbound claim yields a report with every phase ongoing. A bound
    /// claim whose volume is missing or carries no attachment handle aborts
    /// with Provision and Bind already marked successful.
    pub fn deduce(&self, facts: &FactBundle) -> Result<StatusReport, Aborted> {
        let claim = &facts.claim;
        let mut report = StatusReport::new(&claim.namespace, &claim.name);

        let Some(volume_name) = claim.bound_volume() else {
            return Ok(report);
        };
        report.mark_bound();

        let Some(volume) = facts.volume.as_ref() else {
            return Err(Aborted::new(
                report,
                Error::VolumeNotFound {
                    name: volume_name.to_string(),
                },
            ));
        };
        let Some(handle) = volume.handle() else {
            return Err(Aborted::new(
                report,
                Error::UnsupportedVolumeType {
                    volume: volume.name.clone(),
                },
            ));
        };

        report.volume = Some(VolumeStatus {
            name: volume.name.clone(),
            attachment_handle: handle.to_string(),
        });

        let mut pods: Vec<Pod> = facts
            .pods
            .iter()
            .filter_map(|p| p.referencing(&claim.name))
            .collect();
        pods.sort_by(|a, b| a.name.cmp(&b.name));

        let attached = self.attached_nodes(handle, &facts.nodes);
        let desired = desired_nodes(&pods);

        report.set_phase(Phase::Attach, deduce_attach(&desired, &attached));
        report.set_phase(Phase::Mount, deduce_mount(&pods));
        report.attached_nodes = attached.into_iter().collect();
        report.pods = pods;

        Ok(report)
    }

    /// Names of nodes with an attachment record matching `handle`.
    pub fn attached_nodes(&self, handle: &str, nodes: &[Node]) -> BTreeSet<String> {
        nodes
            .iter()
            .filter(|n| {
                n.attached_volumes
                    .iter()
                    .any(|record| self.matcher.matches(handle, record))
            })
            .map(|n| n.name.clone())
            .collect()
    }
}

/// Distinct nodes hosting the given pods. Unscheduled pods contribute none.
pub fn desired_nodes(pods: &[Pod]) -> BTreeSet<String> {
    pods.iter().filter_map(|p| p.node.clone()).collect()
}

/// Reconcile the nodes that should have the volume against the nodes that do.
pub fn deduce_attach(desired: &BTreeSet<String>, attached: &BTreeSet<String>) -> PhaseVerdict {
    let missing: Vec<String> = desired.difference(attached).cloned().collect();
    let any_attached = desired.intersection(attached).next().is_some();

    verdict(missing, any_attached, |names| {
        format!("nodes: [{names}] are still not attached as desired")
    })
}

/// Classify every referencing pod as mounted unless it is still pending.
pub fn deduce_mount(pods: &[Pod]) -> PhaseVerdict {
    let mut unmounted: Vec<String> = pods
        .iter()
        .filter(|p| p.state.is_pending())
        .map(|p| p.name.clone())
        .collect();
    unmounted.sort();
    unmounted.dedup();
    let any_mounted = pods.iter().any(|p| !p.state.is_pending());

    verdict(unmounted, any_mounted, |names| {
        format!("pods: [{names}] are still not mounted as desired")
    })
}

fn verdict(
    outstanding: Vec<String>,
    any_satisfied: bool,
    describe: impl FnOnce(&str) -> String,
) -> PhaseVerdict {
    if outstanding.is_empty() {
        return PhaseVerdict::success();
    }

    let status = if any_satisfied {
        PhaseStatus::PartlyFail
    } else {
        PhaseStatus::Fail
    };

    PhaseVerdict {
        status,
        detail: describe(&outstanding.join(",")),
        outstanding,
    }
}
