//! Diagnosis driver.
//!
//! The [`Diagnoser`] sequences collector calls and hands the result to the
//! [`PhaseDeducer`]:
//! - Fetch the claim; an unbound claim ends diagnosis without error
//! - Fetch the bound volume and check it has an attachment handle
//! - List pods and nodes concurrently
//! - Deduce every phase from the collected facts
//!
//! Any fetch failure aborts with the report as far as it got.

use futures::future::try_join;
use tracing::{debug, info, warn};

use crate::deduce::{FactBundle, PhaseDeducer};
use crate::error::{Aborted, Error, Result};
use crate::matcher::{AttachmentMatcher, MatchPolicy};
use crate::report::StatusReport;
use crate::source::FactSource;
use crate::types::{Claim, Phase};

/// Diagnoses claims using facts from a [`FactSource`].
#[derive(Debug)]
pub struct Diagnoser<S, M = MatchPolicy> {
    source: S,
    deducer: PhaseDeducer<M>,
}

impl<S: FactSource> Diagnoser<S> {
    /// Create a diagnoser with the default matching policy.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            deducer: PhaseDeducer::new(),
        }
    }
}

impl<S: FactSource, M: AttachmentMatcher + Sync> Diagnoser<S, M> {
    /// Create a diagnoser with a custom attachment matcher.
    pub fn with_matcher(source: S, matcher: M) -> Self {
        Self {
            source,
            deducer: PhaseDeducer::with_matcher(matcher),
        }
    }

    /// Diagnose the lifecycle of `claim` in `namespace`.
    pub async fn diagnose(&self, namespace: &str, claim: &str) -> std::result::Result<StatusReport, Aborted> {
        debug!(namespace, claim, "fetching claim");
        let claim = match self.source.get_claim(namespace, claim).await {
            Ok(c) => c,
            Err(e) => {
                warn!(namespace, claim, error = %e, "claim could not be resolved");
                return Err(Aborted::new(StatusReport::new(namespace, claim), e));
            }
        };

        let mut facts = FactBundle::new(claim);
        let Some(volume_name) = facts.claim.bound_volume().map(str::to_string) else {
            info!(namespace, claim = %facts.claim.name, "claim is not bound to a volume yet");
            return self.deducer.deduce(&facts);
        };

        debug!(volume = %volume_name, "fetching bound volume");
        let volume = self
            .source
            .get_volume(&volume_name)
            .await
            .map_err(|e| self.abort_bound(&facts.claim, e))?;

        if volume.handle().is_some() {
            debug!(namespace, "listing pods and nodes");
            let (pods, nodes) = try_join(self.source.list_pods(namespace), self.source.list_nodes())
                .await
                .map_err(|e| self.abort_bound(&facts.claim, e))?;
            facts.pods = pods;
            facts.nodes = nodes;
        }
        facts.volume = Some(volume);

        match self.deducer.deduce(&facts) {
            Ok(report) => {
                info!(
                    namespace,
                    claim = %report.claim,
                    attach = %report.phase(Phase::Attach).status,
                    mount = %report.phase(Phase::Mount).status,
                    pods = report.pods.len(),
                    healthy = report.is_healthy(),
                    "diagnosis complete"
                );
                Ok(report)
            }
            Err(aborted) => {
                warn!(namespace, claim = %facts.claim.name, error = %aborted.error, "diagnosis aborted");
                Err(aborted)
            }
        }
    }

    /// Every claim of `namespace`, sorted by name.
    pub async fn list_claims(&self, namespace: &str) -> Result<Vec<Claim>> {
        let mut claims = self.source.list_claims(namespace).await?;
        claims.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(namespace, count = claims.len(), "listed claims");
        Ok(claims)
    }

    /// The claims referenced by a pod's volumes, in declaration order.
    pub async fn claims_of_pod(&self, namespace: &str, pod: &str) -> Result<Vec<Claim>> {
        let record = self.source.get_pod(namespace, pod).await?;
        let mut claims = Vec::with_capacity(record.claim_volumes.len());
        for volume in &record.claim_volumes {
            let claim = self.source.get_claim(namespace, &volume.claim).await?;
            claims.push(claim);
        }
        debug!(namespace, pod, count = claims.len(), "listed claims of pod");
        Ok(claims)
    }

    fn abort_bound(&self, claim: &Claim, error: Error) -> Aborted {
        warn!(namespace = %claim.namespace, claim = %claim.name, error = %error, "diagnosis aborted");
        let mut report = StatusReport::new(&claim.namespace, &claim.name);
        report.mark_bound();
        Aborted::new(report, error)
    }
}
