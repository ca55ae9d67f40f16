use crate::config::OdooSettings;
use crate::rpc::RpcMethod;
use crate::rpc::error::RpcError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    id: u64,
    params: CallParams<'a>,
}

/// `execute_kw(db, uid, password, model, method, args, kwargs)`
#[derive(Serialize)]
struct CallParams<'a> {
    service: &'static str,
    method: &'static str,
    args: (&'a str, i64, &'a str, &'a str, &'static str, &'a Value, &'a Value),
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcFault>,
}

#[derive(Deserialize)]
struct JsonRpcFault {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<FaultData>,
}

#[derive(Deserialize, Default)]
struct FaultData {
    #[serde(default)]
    name: String,
    #[serde(default)]
    message: String,
}

impl From<JsonRpcFault> for RpcError {
    fn from(fault: JsonRpcFault) -> Self {
        let data = fault.data.unwrap_or_default();
        let message = if data.message.is_empty() {
            fault.message
        } else {
            data.message
        };
        RpcError::Fault {
            code: fault.code,
            kind: data.name,
            message,
        }
    }
}

/// Odoo JSON-RPC client bound to one database and service account.
pub struct OdooClient {
    endpoint: String,
    db: String,
    uid: i64,
    password: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl OdooClient {
    pub fn new(settings: &OdooSettings, http: reqwest::Client) -> Self {
        Self {
            endpoint: format!("{}/jsonrpc", settings.url.trim_end_matches('/')),
            db: settings.db.clone(),
            uid: settings.uid,
            password: settings.password.clone(),
            http,
            next_id: AtomicU64::new(1),
        }
    }

    fn envelope<'a>(
        &'a self,
        id: u64,
        model: &'a str,
        method: RpcMethod,
        args: &'a Value,
        kwargs: &'a Value,
    ) -> JsonRpcRequest<'a> {
        JsonRpcRequest {
            jsonrpc: "2.0",
            method: "call",
            id,
            params: CallParams {
                service: "object",
                method: "execute_kw",
                args: (
                    &self.db,
                    self.uid,
                    &self.password,
                    model,
                    method.into(),
                    args,
                    kwargs,
                ),
            },
        }
    }

    /// Runs one ORM method and returns the raw `result` member.
    pub async fn execute_kw(
        &self,
        model: &str,
        method: RpcMethod,
        args: Value,
        kwargs: Value,
    ) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = self.envelope(id, model, method, &args, &kwargs);
        debug!(rpc_id = id, model, %method, args = %args, "execute_kw");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|source| RpcError::Transport { source })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(rpc_id = id, status = status.as_u16(), %method, "ERP returned an error status");
            return Err(RpcError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::decode(format!("invalid JSON-RPC body: {e}")))?;

        decode_body(body)
    }
}

fn decode_body(body: JsonRpcResponse) -> Result<Value, RpcError> {
    match (body.error, body.result) {
        (Some(fault), _) => Err(fault.into()),
        (None, Some(result)) => Ok(result),
        (None, None) => Err(RpcError::decode("JSON-RPC body carries neither result nor error")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> OdooClient {
        let settings = OdooSettings {
            url: "http://erp.local:8069/".to_string(),
            db: "groupbee".to_string(),
            uid: 2,
            password: "secret".to_string(),
            model: "hr.attendance".to_string(),
        };
        OdooClient::new(&settings, reqwest::Client::new())
    }

    #[test]
    fn endpoint_is_the_jsonrpc_route() {
        assert_eq!(client().endpoint, "http://erp.local:8069/jsonrpc");
    }

    #[test]
    fn envelope_carries_positional_execute_kw_arguments() {
        let client = client();
        let args = json!([[["employee_id", "=", 7]]]);
        let kwargs = json!({ "fields": ["check_in"] });
        let request = client.envelope(9, "hr.attendance", RpcMethod::SearchRead, &args, &kwargs);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "method": "call",
                "id": 9,
                "params": {
                    "service": "object",
                    "method": "execute_kw",
                    "args": [
                        "groupbee", 2, "secret", "hr.attendance", "search_read",
                        [[["employee_id", "=", 7]]],
                        { "fields": ["check_in"] }
                    ]
                }
            })
        );
    }

    #[test]
    fn result_member_is_returned() {
        let body: JsonRpcResponse =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 1, "result": [4, 5] })).unwrap();
        assert_eq!(decode_body(body).unwrap(), json!([4, 5]));
    }

    #[test]
    fn fault_prefers_the_exception_message() {
        let body: JsonRpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": 200,
                "message": "Odoo Server Error",
                "data": {
                    "name": "odoo.exceptions.ValidationError",
                    "message": "Cannot create new attendance record"
                }
            }
        }))
        .unwrap();

        match decode_body(body) {
            Err(RpcError::Fault { code, kind, message }) => {
                assert_eq!(code, 200);
                assert_eq!(kind, "odoo.exceptions.ValidationError");
                assert_eq!(message, "Cannot create new attendance record");
            }
            other => panic!("expected a fault, got {other:?}"),
        }
    }

    #[test]
    fn fault_without_data_keeps_the_envelope_message() {
        let body: JsonRpcResponse = serde_json::from_value(json!({
            "error": { "code": 100, "message": "Session expired" }
        }))
        .unwrap();

        let err = decode_body(body).unwrap_err();
        assert_eq!(err.to_string(), "ERP fault 100 (): Session expired");
    }

    #[test]
    fn empty_body_is_a_decode_error() {
        let body: JsonRpcResponse = serde_json::from_value(json!({ "jsonrpc": "2.0" })).unwrap();
        assert!(matches!(decode_body(body), Err(RpcError::Decode { .. })));
    }
}
