use crate::rpc::RpcMethod;
use crate::rpc::client::OdooClient;
use crate::rpc::domain::Domain;
use crate::rpc::error::RpcError;
use async_trait::async_trait;
use serde_json::{Map, Value, json};

/// One row as returned by `search_read`, still loosely typed.
pub type Row = Map<String, Value>;

/// Field values for `create` / `write`.
pub type Values = Map<String, Value>;

/// The ERP attendance model, reduced to the four ORM calls the gateway uses.
///
/// Implementations must be `Send + Sync` so one instance can be shared by
/// every actix worker.
#[async_trait]
pub trait AttendanceModel: Send + Sync {
    /// Rows matching `domain`, in ERP order. `id` is always included.
    async fn search_read(&self, domain: &Domain, fields: &[&str]) -> Result<Vec<Row>, RpcError>;

    /// Ids of the rows matching `domain`, in ERP order.
    async fn search(&self, domain: &Domain) -> Result<Vec<i64>, RpcError>;

    /// Creates one row and returns its id.
    async fn create(&self, values: Values) -> Result<i64, RpcError>;

    /// Applies `values` to every row in `ids`.
    async fn write(&self, ids: &[i64], values: Values) -> Result<(), RpcError>;
}

pub struct OdooAttendanceModel {
    client: OdooClient,
    model: String,
}

impl OdooAttendanceModel {
    pub fn new(client: OdooClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    async fn call(&self, method: RpcMethod, args: Value, kwargs: Value) -> Result<Value, RpcError> {
        self.client.execute_kw(&self.model, method, args, kwargs).await
    }
}

#[async_trait]
impl AttendanceModel for OdooAttendanceModel {
    async fn search_read(&self, domain: &Domain, fields: &[&str]) -> Result<Vec<Row>, RpcError> {
        let result = self
            .call(RpcMethod::SearchRead, json!([domain]), json!({ "fields": fields }))
            .await?;
        serde_json::from_value(result)
            .map_err(|e| RpcError::decode(format!("search_read did not return rows: {e}")))
    }

    async fn search(&self, domain: &Domain) -> Result<Vec<i64>, RpcError> {
        let result = self.call(RpcMethod::Search, json!([domain]), json!({})).await?;
        serde_json::from_value(result)
            .map_err(|e| RpcError::decode(format!("search did not return ids: {e}")))
    }

    async fn create(&self, values: Values) -> Result<i64, RpcError> {
        let result = self.call(RpcMethod::Create, json!([values]), json!({})).await?;
        created_id(&result)
            .ok_or_else(|| RpcError::decode(format!("create returned `{result}` instead of an id")))
    }

    async fn write(&self, ids: &[i64], values: Values) -> Result<(), RpcError> {
        let result = self.call(RpcMethod::Write, json!([ids, values]), json!({})).await?;
        match result {
            Value::Bool(true) => Ok(()),
            other => Err(RpcError::decode(format!("write returned `{other}`"))),
        }
    }
}

/// `create` answers with a bare id, or a one-element list on newer ERP
/// versions that batch-create.
fn created_id(result: &Value) -> Option<i64> {
    match result {
        Value::Array(ids) => ids.first().and_then(Value::as_i64),
        other => other.as_i64(),
    }
}

#[cfg(test)]
mod tests {
    use super::created_id;
    use serde_json::json;

    #[test]
    fn created_id_accepts_scalar_and_list() {
        assert_eq!(created_id(&json!(42)), Some(42));
        assert_eq!(created_id(&json!([43])), Some(43));
        assert_eq!(created_id(&json!([])), None);
        assert_eq!(created_id(&json!(false)), None);
    }
}
