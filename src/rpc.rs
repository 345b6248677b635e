use reqwest::{StatusCode, Url, blocking::Client};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::{config::SupabaseConfig, error::RpcError};

/// Database function that runs arbitrary SQL passed in its `sql` argument.
pub const EXEC_SQL_FUNCTION: &str = "exec_sql";

#[derive(Clone, Debug, PartialEq)]
pub struct RpcResponse {
    pub status: u16,
    pub data: Value,
}

pub trait SqlExecutor {
    fn exec_sql(&self, sql: &str) -> Result<RpcResponse, RpcError>;
}

pub struct SupabaseClient {
    http: Client,
    endpoint: Url,
    key: String,
}

impl SupabaseClient {
    pub fn connect(config: &SupabaseConfig) -> Result<Self, RpcError> {
        let endpoint = rpc_endpoint(&config.url, EXEC_SQL_FUNCTION)?;
        let http = Client::builder()
            .build()
            .map_err(|source| RpcError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        debug!(endpoint = %endpoint, "supabase client ready");
        Ok(Self {
            http,
            endpoint,
            key: config.key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl SqlExecutor for SupabaseClient {
    fn exec_sql(&self, sql: &str) -> Result<RpcResponse, RpcError> {
        let transport = |source: reqwest::Error| RpcError::Transport {
            endpoint: self.endpoint.to_string(),
            source,
        };

        info!(endpoint = %self.endpoint, bytes = sql.len(), "sending exec_sql");
        let response = self
            .http
            .post(self.endpoint.clone())
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .json(&json!({ "sql": sql }))
            .send()
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().map_err(transport)?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "exec_sql rejected");
            return Err(RpcError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        info!(status = status.as_u16(), "exec_sql completed");
        Ok(RpcResponse {
            status: status.as_u16(),
            data: parse_body(&body),
        })
    }
}

/// Resolves `<base>/rest/v1/rpc/<function>`, ignoring trailing slashes on the base.
pub fn rpc_endpoint(base: &str, function: &str) -> Result<Url, RpcError> {
    let invalid = |reason: String| RpcError::InvalidEndpoint {
        url: base.to_owned(),
        reason,
    };
    let raw = format!("{}/rest/v1/rpc/{}", base.trim_end_matches('/'), function);
    let url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}

#[derive(Deserialize)]
struct PostgrestError {
    message: Option<String>,
    hint: Option<String>,
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(PostgrestError {
        message: Some(message),
        hint,
    }) = serde_json::from_str::<PostgrestError>(body)
    {
        return match hint {
            Some(hint) if !hint.is_empty() => format!("{message} (hint: {hint})"),
            _ => message,
        };
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_owned()
    } else {
        body.to_owned()
    }
}

fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_owned()))
}
