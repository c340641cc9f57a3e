//! Error types for flag evaluation

/// Errors raised by flag evaluators and their factories
///
/// Callers resolving a [`FlagSet`](crate::FlagSet) never see these: any error
/// degrades the whole set to all-false.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlagError {
    /// Flag backend could not be reached
    #[error("flag backend unavailable: {0}")]
    Unavailable(String),

    /// Evaluator could not be built for a tenant
    #[error("evaluator construction failed for tenant '{tenant_id}': {message}")]
    Construction {
        /// Tenant the evaluator was requested for
        tenant_id: String,
        /// Backend message
        message: String,
    },

    /// A single flag read failed
    #[error("evaluation of flag '{key}' failed: {message}")]
    Evaluation {
        /// Flag key
        key: String,
        /// Backend message
        message: String,
    },

    /// Evaluator panicked while resolving flags
    #[error("flag evaluation panicked: {0}")]
    Panicked(String),
}

impl FlagError {
    /// Create construction error for tenant
    pub fn construction(tenant_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            tenant_id: tenant_id.into(),
            message: message.into(),
        }
    }

    /// Create evaluation error for key
    pub fn evaluation(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Evaluation {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = FlagError::construction("t1", "timeout");
        assert_eq!(
            err.to_string(),
            "evaluator construction failed for tenant 't1': timeout"
        );

        let err = FlagError::evaluation("catalog-shadow", "bad payload");
        assert!(err.to_string().contains("catalog-shadow"));

        let err = FlagError::Unavailable("dns".into());
        assert!(err.to_string().contains("unavailable"));
    }
}
