//! Claim listing command.

use std::io::Write;

use pvc_core::{Diagnoser, FactSource};

use crate::cli::LsArgs;
use crate::error::CliError;
use crate::output::{ClaimList, OutputFormat};

/// Ls command executor.
pub struct LsCommand<S> {
    diagnoser: Diagnoser<S>,
    namespace: String,
}

impl<S: FactSource> LsCommand<S> {
    /// Create a new ls command.
    #[must_use]
    pub fn new(source: S, namespace: impl Into<String>) -> Self {
        Self {
            diagnoser: Diagnoser::new(source),
            namespace: namespace.into(),
        }
    }

    /// Execute the ls command.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims or the pod cannot be fetched, or if
    /// output fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &LsArgs,
    ) -> Result<(), CliError> {
        let claims = match &args.pod {
            Some(pod) => self.diagnoser.claims_of_pod(&self.namespace, pod).await?,
            None => self.diagnoser.list_claims(&self.namespace).await?,
        };

        let list = ClaimList {
            namespace: self.namespace.clone(),
            pod: args.pod.clone(),
            claims,
        };
        format.write(writer, &list)
    }
}
