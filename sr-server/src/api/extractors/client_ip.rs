//! Best-effort client address extraction

use crate::state::ServerState;

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};

/// The address a reading was submitted from, when it can be determined.
///
/// Prefers the socket peer address (available when the server is started
/// with connect info), falls back to the first `X-Forwarded-For` entry for
/// deployments behind a proxy. Never rejects the request.
pub struct ClientIp(pub Option<String>);

impl FromRequestParts<ServerState> for ClientIp {
    type Rejection = Infallible;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
                return Ok(ClientIp(Some(addr.ip().to_string())));
            }

            let forwarded = parts
                .headers
                .get("x-forwarded-for")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .map(|ip| ip.trim().to_string())
                .filter(|ip| !ip.is_empty());

            Ok(ClientIp(forwarded))
        }
    }
}
