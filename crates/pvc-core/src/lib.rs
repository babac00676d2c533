//! # pvc-core
//!
//! Lifecycle diagnosis for persistent volume claims.
//!
//! A claim becomes usable by workloads in four phases: it is provisioned,
//! bound to a volume, the volume is attached to every node that hosts a pod
//! using the claim, and finally mounted into those pods. Given facts about a
//! claim, its volume, the pods referencing it and the cluster's nodes, this
//! crate reconstructs a verdict for each phase.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   FactBundle   ┌──────────────┐   StatusReport
//! │ FactSource  │───────────────►│ PhaseDeducer │──────────────►
//! └─────────────┘  (Diagnoser)   └──────────────┘
//! ```
//!
//! - [`FactSource`] is implemented by anything that can fetch cluster
//!   objects; [`ClusterSnapshot`] serves them from memory.
//! - [`PhaseDeducer`] is a pure function of a [`FactBundle`].
//! - [`Diagnoser`] sequences the fetches and stops at the first failure,
//!   returning the partial report inside [`Aborted`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod deduce;
pub mod diagnose;
pub mod error;
pub mod matcher;
pub mod report;
pub mod snapshot;
pub mod source;
pub mod types;


pub use deduce::{FactBundle, PhaseDeducer, deduce_attach, deduce_mount};
pub use diagnose::Diagnoser;
pub use error::{Aborted, Error, Result};
pub use matcher::{AttachmentMatcher, MatchPolicy};
pub use report::{PhaseVerdict, StatusReport, VolumeStatus};
pub use snapshot::ClusterSnapshot;
pub use source::FactSource;
pub use types::{Claim, ClaimVolume, Node, Phase, PhaseStatus, Pod, PodRecord, PodState, Volume};
