//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`inspect`] - Lifecycle diagnosis of one claim
//! - [`ls`] - Claim listing for a namespace or pod

pub mod inspect;
pub mod ls;

pub use inspect::InspectCommand;
pub use ls::LsCommand;
