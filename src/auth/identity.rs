use crate::auth::caller::Caller;
use crate::model::employee::EmployeeInfo;
use async_trait::async_trait;
use derive_more::{Display, Error};
use reqwest::header;
use tracing::{debug, warn};

#[derive(Debug, Display, Error)]
pub enum IdentityError {
    /// Credentials were refused (401/403).
    #[display(fmt = "identity service refused the caller (HTTP {})", status)]
    Unauthorized { status: u16 },

    #[display(fmt = "identity service unreachable: {}", source)]
    Unavailable { source: reqwest::Error },

    /// Any other non-2xx answer.
    #[display(fmt = "identity service responded with HTTP {}", status)]
    Rejected { status: u16 },

    #[display(fmt = "malformed identity response: {}", message)]
    Decode { message: String },
}

/// Maps the caller of the current request to an ERP employee id.
/// Resolved once per request, never cached.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve_employee_id(&self, caller: &Caller) -> Result<i64, IdentityError>;
}

/// Asks the employee service's `POST /api/hr/info` on behalf of the caller.
pub struct HttpIdentityResolver {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpIdentityResolver {
    pub fn new(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            endpoint: format!("{}/api/hr/info", base_url.trim_end_matches('/')),
            http,
        }
    }
}

#[async_trait]
impl IdentityResolver for HttpIdentityResolver {
    async fn resolve_employee_id(&self, caller: &Caller) -> Result<i64, IdentityError> {
        let mut request = self.http.post(&self.endpoint);
        if let Some(authorization) = caller.authorization() {
            request = request.header(header::AUTHORIZATION, authorization);
        }
        if let Some(cookie) = caller.cookie() {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request
            .send()
            .await
            .map_err(|source| IdentityError::Unavailable { source })?;

        let status = response.status().as_u16();
        match status {
            200..=299 => {}
            401 | 403 => return Err(IdentityError::Unauthorized { status }),
            _ => {
                warn!(status, endpoint = %self.endpoint, "identity lookup failed");
                return Err(IdentityError::Rejected { status });
            }
        }

        let info: EmployeeInfo = response.json().await.map_err(|e| IdentityError::Decode {
            message: e.to_string(),
        })?;

        debug!(employee_id = info.id, "caller resolved");
        Ok(info.id)
    }
}
