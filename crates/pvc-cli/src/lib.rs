//! # pvc-cli
//!
//! `kubectl pvc` plugin: inspects persistent volume claims and explains why
//! a claim is not usable by its pods.
//!
//! Provides commands for:
//! - Diagnosing the provision, bind, attach and mount phases of a claim
//! - Listing the claims of a namespace or pod
//!
//! # Architecture
//!
//! Facts come either from the API server through [`client::KubeFactSource`]
//! or from a JSON snapshot file; both feed the same
//! [`pvc_core::Diagnoser`].
//!
//! ```text
//! ┌─────────────┐      kube-rs       ┌────────────┐
//! │ kubectl-pvc │◄──────────────────►│ API server │
//! └─────────────┘   (or --snapshot)  └────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, Format, InspectArgs, LsArgs};
pub use client::KubeFactSource;
pub use config::{PluginConfig, Settings};
pub use error::CliError;
pub use output::OutputFormat;
