use serde::Deserialize;

/// API keys protecting the two public surfaces.
///
/// Both are optional in the file, but an unset key makes the corresponding
/// surface reject every request; the server warns about it at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Key expected in the `X-API-Key` header of ingestion requests.
    pub api_key: Option<String>,
    /// Key expected in the `api-key` query parameter of stream subscriptions.
    pub ws_api_key: Option<String>,
}

impl AuthConfig {
    pub fn http_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn ws_configured(&self) -> bool {
        self.ws_api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
