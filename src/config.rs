use std::{env, fmt};

use tracing::debug;

use crate::error::SetupError;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const KEY_VAR: &str = "SUPABASE_KEY";

/// Connection settings for the hosted database.
#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl SupabaseConfig {
    pub fn from_env() -> Result<Self, SetupError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Unset, empty and
    /// whitespace-only values all count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SetupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        let url = read(URL_VAR);
        let key = read(KEY_VAR);

        match (url, key) {
            (Some(url), Some(key)) => {
                debug!(url = %url, "supabase config loaded");
                Ok(Self { url, key })
            }
            (url, key) => {
                let mut missing = Vec::with_capacity(2);
                if url.is_none() {
                    missing.push(URL_VAR);
                }
                if key.is_none() {
                    missing.push(KEY_VAR);
                }
                Err(SetupError::ConfigurationMissing { missing })
            }
        }
    }
}
