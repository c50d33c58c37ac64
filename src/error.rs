use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{context}: {source}")]
    IoContext {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    YamlParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to serialize config: {source}")]
    YamlSerialize {
        #[source]
        source: serde_yaml::Error,
    },
    #[error("cannot determine the home directory")]
    HomeDirNotFound,
    #[error("unknown provider '{0}'")]
    ProviderNotFound(String),
    #[error("provider '{0}' is not configured")]
    NotConfigured(String),
    #[error("provider '{0}' already exists")]
    AlreadyExists(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("claude executable not found")]
    AgentNotFound,
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("cancelled")]
    Cancelled,
    #[error("{0}")]
    Message(String),
}

impl AppError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Follow-up command shown under the error line, when there is an obvious one.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            AppError::ProviderNotFound(_) => Some("run 'ccm list' to see available providers".into()),
            AppError::NotConfigured(name) => Some(format!("ccm add {name} --key \"your-api-key\"")),
            AppError::AlreadyExists(name) => Some(format!(
                "use 'ccm edit {name}' or 'ccm add {name} --force' to overwrite"
            )),
            AppError::AgentNotFound => {
                Some("npm install -g @anthropic-ai/claude-code".to_string())
            }
            _ => None,
        }
    }
}

impl From<inquire::InquireError> for AppError {
    fn from(err: inquire::InquireError) -> Self {
        match err {
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted => AppError::Cancelled,
            other => AppError::Message(format!("prompt failed: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_configured_suggests_add_command() {
        let err = AppError::NotConfigured("deepseek".into());
        assert_eq!(err.to_string(), "provider 'deepseek' is not configured");
        assert_eq!(
            err.suggestion().as_deref(),
            Some("ccm add deepseek --key \"your-api-key\"")
        );
    }

    #[test]
    fn prompt_cancel_maps_to_cancelled() {
        let err: AppError = inquire::InquireError::OperationCanceled.into();
        assert!(matches!(err, AppError::Cancelled));
    }
}
