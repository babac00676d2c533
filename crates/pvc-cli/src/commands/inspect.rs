//! Inspect command implementation.
//!
//! Diagnoses one claim and renders its status report. When diagnosis stops
//! early, whatever phases were resolved are still printed before the error
//! is returned.

use std::io::Write;

use pvc_core::{Diagnoser, FactSource, MatchPolicy};
use tracing::debug;

use crate::cli::InspectArgs;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Inspect command executor.
pub struct InspectCommand<S> {
    diagnoser: Diagnoser<S>,
    namespace: String,
}

impl<S: FactSource> InspectCommand<S> {
    /// Create a new inspect command.
    #[must_use]
    pub fn new(source: S, namespace: impl Into<String>, policy: MatchPolicy) -> Self {
        Self {
            diagnoser: Diagnoser::with_matcher(source, policy),
            namespace: namespace.into(),
        }
    }

    /// Execute the inspect command.
    ///
    /// # Errors
    ///
    /// Returns the diagnosis error if any fetch failed, or an error if output
    /// fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &InspectArgs,
    ) -> Result<(), CliError> {
        match self.diagnoser.diagnose(&self.namespace, &args.claim).await {
            Ok(report) => format.write(writer, &report),
            Err(aborted) => {
                let (partial, error) = aborted.into_parts();
                if partial.phases().any(|(_, v)| !v.status.is_ongoing()) {
                    format.write(writer, &partial)?;
                } else {
                    debug!(claim = %args.claim, "nothing resolved, skipping partial report");
                }
                Err(CliError::Diagnosis(error))
            }
        }
    }
}
