//! Client provenance: IP address and user agent.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;

use account_entity::DeviceInfo;

/// Header set by reverse proxies; the first hop is the client.
const FORWARDED_FOR: &str = "x-forwarded-for";

/// Where a request came from.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    /// Client IP, from `X-Forwarded-For` or the socket peer address.
    pub ip: Option<String>,
    /// `User-Agent` header value.
    pub user_agent: Option<String>,
}

impl ClientInfo {
    /// Device context for `device_id` carrying this provenance.
    pub fn into_device(self, device_id: impl Into<String>) -> DeviceInfo {
        DeviceInfo {
            device_id: device_id.into(),
            ip: self.ip,
            user_agent: self.user_agent,
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get(FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from);

        let ip = forwarded.or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(Self { ip, user_agent })
    }
}
