use std::path::PathBuf;

use reglin_core::KernelError;

/// Errors raised while running, storing or reading benchmarks.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A benchmark name did not match any known naming scheme.
    #[error("cannot parse benchmark name {name:?}: {reason}")]
    NameParse { name: String, reason: String },

    /// The requested combination has no kernel (e.g. vectorized Cramer).
    #[error("unsupported benchmark configuration: {0}")]
    UnsupportedConfig(String),
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn name_parse(name: &str, reason: impl Into<String>) -> Self {
        HarnessError::NameParse {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_error_converts() {
        fn fails() -> Result<()> {
            Err(KernelError::SingularMatrix { step: 2 })?;
            Ok(())
        }
        let err = fails().unwrap_err();
        assert!(matches!(err, HarnessError::Kernel(KernelError::SingularMatrix { step: 2 })));
        assert_eq!(err.to_string(), "singular matrix: zero pivot at step 2");
    }

    #[test]
    fn test_name_parse_message() {
        let err = HarnessError::name_parse("SSE_F32", "missing '/'");
        assert_eq!(
            err.to_string(),
            "cannot parse benchmark name \"SSE_F32\": missing '/'"
        );
    }
}
