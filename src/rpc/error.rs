use derive_more::{Display, Error};

/// Exception classes the ERP raises for input it refuses, as opposed to
/// server-side failures.
const CLIENT_FAULT_KINDS: [&str; 3] = ["ValidationError", "UserError", "MissingError"];

#[derive(Debug, Display, Error)]
pub enum RpcError {
    /// The ERP could not be reached or the connection broke mid-call.
    #[display(fmt = "ERP unreachable: {}", source)]
    Transport { source: reqwest::Error },

    /// Non-2xx HTTP status from the RPC endpoint.
    #[display(fmt = "ERP responded with HTTP {}: {}", status, message)]
    Status { status: u16, message: String },

    /// JSON-RPC error object, e.g. `odoo.exceptions.ValidationError`.
    #[display(fmt = "ERP fault {} ({}): {}", code, kind, message)]
    Fault {
        code: i64,
        kind: String,
        message: String,
    },

    #[display(fmt = "malformed ERP response: {}", message)]
    Decode { message: String },
}

impl RpcError {
    pub fn decode(message: impl Into<String>) -> Self {
        RpcError::Decode {
            message: message.into(),
        }
    }

    /// True when the ERP rejected the request's content rather than failing.
    pub fn is_client_fault(&self) -> bool {
        match self {
            RpcError::Status { status, .. } => *status == 400,
            RpcError::Fault { kind, .. } => CLIENT_FAULT_KINDS
                .iter()
                .any(|k| kind.rsplit('.').next() == Some(*k)),
            _ => false,
        }
    }
}
