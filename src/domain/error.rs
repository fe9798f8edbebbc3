//! Domain error types.

/// Top-level error type for voltrend.
#[derive(Debug, thiserror::Error)]
pub enum VoltrendError {
    #[error("insufficient data for {component}: have {available} observations, need {required}")]
    InsufficientData {
        component: String,
        available: usize,
        required: usize,
    },

    #[error("invalid configuration {key}: {reason}")]
    InvalidConfiguration { key: String, reason: String },

    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl VoltrendError {
    pub(crate) fn invalid_config(key: &str, reason: impl Into<String>) -> Self {
        VoltrendError::InvalidConfiguration {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn insufficient(component: &str, available: usize, required: usize) -> Self {
        VoltrendError::InsufficientData {
            component: component.to_string(),
            available,
            required,
        }
    }
}

impl From<&VoltrendError> for std::process::ExitCode {
    fn from(err: &VoltrendError) -> Self {
        let code: u8 = match err {
            VoltrendError::Io(_) => 1,
            VoltrendError::ConfigParse { .. }
            | VoltrendError::ConfigMissing { .. }
            | VoltrendError::InvalidConfiguration { .. } => 2,
            VoltrendError::Data { .. } | VoltrendError::InvalidSeries { .. } => 3,
            VoltrendError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
