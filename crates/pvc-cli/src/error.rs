//! CLI error types.

use std::fmt;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Cluster connection could not be established.
    Connection(String),
    /// Invalid configuration.
    Config(String),
    /// Diagnosis or claim listing failed.
    Diagnosis(pvc_core::Error),
    /// Output formatting error.
    Format(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "connection error: {msg}"),
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Diagnosis(e) => write!(f, "{e}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Diagnosis(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<pvc_core::Error> for CliError {
    fn from(err: pvc_core::Error) -> Self {
        Self::Diagnosis(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_error_display_connection() {
        let err = CliError::Connection("no kubeconfig".into());
        assert_eq!(err.to_string(), "connection error: no kubeconfig");
    }

    #[test]
    fn cli_error_display_diagnosis_is_transparent() {
        let err = CliError::from(pvc_core::Error::ClaimNotFound {
            namespace: "default".into(),
            name: "data".into(),
        });
        assert_eq!(err.to_string(), "volume claim not found: default/data");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err = CliError::from(io_err);
        assert!(matches!(cli_err, CliError::Io(_)));
    }
}
