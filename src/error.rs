use crate::auth::identity::IdentityError;
use crate::rpc::error::RpcError;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::{Display, Error};
use serde_json::json;
use tracing::{error, warn};

pub const NO_OPEN_CHECK_IN: &str = "no open check-in found";

/// What a failed attendance operation looks like to the caller.
#[derive(Debug, Display, Error)]
pub enum AttendanceError {
    /// 400: input refused by an upstream, or nothing to act on.
    #[display(fmt = "{}", message)]
    ClientError { message: String },

    /// 401: the request carried no credentials to forward.
    #[display(fmt = "{}", message)]
    Unauthorized { message: String },

    /// An upstream failed; carries the status it reported.
    #[display(fmt = "{}", message)]
    UpstreamError { status: StatusCode, message: String },

    #[display(fmt = "{}", message)]
    InternalError { message: String },
}

impl AttendanceError {
    pub fn client(message: impl Into<String>) -> Self {
        AttendanceError::ClientError {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AttendanceError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn upstream(status: StatusCode, message: impl Into<String>) -> Self {
        AttendanceError::UpstreamError {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AttendanceError::InternalError {
            message: message.into(),
        }
    }
}

/// Keeps a reported status when it is an error status, otherwise `fallback`.
fn reported_status(status: u16, fallback: StatusCode) -> StatusCode {
    StatusCode::from_u16(status)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(fallback)
}

fn transport_status(source: &reqwest::Error) -> StatusCode {
    if source.is_timeout() {
        StatusCode::GATEWAY_TIMEOUT
    } else {
        StatusCode::BAD_GATEWAY
    }
}

impl From<RpcError> for AttendanceError {
    fn from(err: RpcError) -> Self {
        if err.is_client_fault() {
            warn!(error = %err, "ERP rejected the request");
            let message = match err {
                RpcError::Fault { message, .. } => message,
                other => other.to_string(),
            };
            return AttendanceError::client(message);
        }

        error!(error = %err, "ERP call failed");
        match &err {
            RpcError::Transport { source } => {
                AttendanceError::upstream(transport_status(source), "ERP unavailable")
            }
            RpcError::Status { status, .. } => AttendanceError::upstream(
                reported_status(*status, StatusCode::INTERNAL_SERVER_ERROR),
                "ERP request failed",
            ),
            RpcError::Fault { .. } => {
                AttendanceError::upstream(StatusCode::INTERNAL_SERVER_ERROR, "ERP request failed")
            }
            RpcError::Decode { .. } => AttendanceError::internal("Internal Server Error"),
        }
    }
}

impl From<IdentityError> for AttendanceError {
    fn from(err: IdentityError) -> Self {
        warn!(error = %err, "identity resolution failed");
        match &err {
            IdentityError::Rejected { status: 400 } => {
                AttendanceError::client("identity service rejected the request")
            }
            IdentityError::Unauthorized { status } | IdentityError::Rejected { status } => {
                AttendanceError::upstream(
                    reported_status(*status, StatusCode::INTERNAL_SERVER_ERROR),
                    err.to_string(),
                )
            }
            IdentityError::Unavailable { source } => {
                AttendanceError::upstream(transport_status(source), "identity service unavailable")
            }
            IdentityError::Decode { .. } => AttendanceError::internal("Internal Server Error"),
        }
    }
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::ClientError { .. } => StatusCode::BAD_REQUEST,
            AttendanceError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AttendanceError::UpstreamError { status, .. } => *status,
            AttendanceError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
