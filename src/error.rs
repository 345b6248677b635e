use thiserror::Error;

/// Process status for a run that stopped on missing configuration.
pub const EXIT_CONFIG_MISSING: i32 = 1;
/// Process status for a run whose schema call failed.
pub const EXIT_SCHEMA_FAILED: i32 = 2;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(
        "SUPABASE_URL and SUPABASE_KEY environment variables must be set (missing: {})",
        .missing.join(", ")
    )]
    ConfigurationMissing { missing: Vec<&'static str> },

    #[error(transparent)]
    SchemaExecutionFailure(#[from] RpcError),
}

impl SetupError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SetupError::ConfigurationMissing { .. } => EXIT_CONFIG_MISSING,
            SetupError::SchemaExecutionFailure(_) => EXIT_SCHEMA_FAILED,
        }
    }
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("exec_sql returned status {status}: {message}")]
    Status { status: u16, message: String },
}
