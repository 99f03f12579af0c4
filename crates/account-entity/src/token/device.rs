//! Client device context supplied on login.

use serde::{Deserialize, Serialize};

/// Identifies the client a session is bound to, plus provenance metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Opaque caller-chosen device identifier.
    pub device_id: String,
    /// Client IP address as seen by the transport.
    pub ip: Option<String>,
    /// Client `User-Agent` header.
    pub user_agent: Option<String>,
}

impl DeviceInfo {
    /// Device context with no provenance metadata.
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ip: None,
            user_agent: None,
        }
    }

    /// Attach the client IP.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Attach the client user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
