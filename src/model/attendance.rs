use crate::rpc::error::RpcError;
use crate::rpc::model::Row;
use crate::utils::local_time::{LocalZone, parse_erp};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// ERP fields fetched for every attendance row.
pub const RECORD_FIELDS: [&str; 6] = [
    "employee_id",
    "check_in",
    "check_out",
    "worked_hours",
    "create_uid",
    "write_uid",
];

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 118,
        "employeeId": 7,
        "createUid": 2,
        "writeUid": 2,
        "checkIn": "2024-03-11T09:02:11",
        "checkOut": "2024-03-11T18:10:45",
        "workedHours": 9.14
    })
)]
pub struct AttendanceRecord {
    #[schema(example = 118)]
    pub id: i64,

    #[schema(example = 7)]
    pub employee_id: i64,

    #[schema(example = 2, nullable = true)]
    pub create_uid: Option<i64>,

    #[schema(example = 2, nullable = true)]
    pub write_uid: Option<i64>,

    #[schema(value_type = Option<String>, format = DateTime, example = "2024-03-11T09:02:11")]
    pub check_in: Option<NaiveDateTime>,

    #[schema(value_type = Option<String>, format = DateTime, example = "2024-03-11T18:10:45")]
    pub check_out: Option<NaiveDateTime>,

    #[schema(example = 9.14)]
    pub worked_hours: f64,
}

impl AttendanceRecord {
    /// Decodes one `search_read` row.
    ///
    /// Only a missing or non-integer `id` is fatal. Timestamps that are not
    /// ERP datetime strings (the ERP sends `false` for empty fields) become
    /// `None`, and an unset `worked_hours` becomes `0.0`. `employee_id` falls
    /// back to `owner` when the row does not carry it.
    pub fn from_row(row: &Row, owner: i64) -> Result<Self, RpcError> {
        let id = row
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| RpcError::decode("attendance row without an integer id"))?;

        Ok(Self {
            id,
            employee_id: many2one_id(row.get("employee_id")).unwrap_or(owner),
            create_uid: many2one_id(row.get("create_uid")),
            write_uid: many2one_id(row.get("write_uid")),
            check_in: datetime(row.get("check_in")),
            check_out: datetime(row.get("check_out")),
            worked_hours: row
                .get("worked_hours")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
        })
    }

    /// Re-expresses the UTC timestamps in the deployment zone.
    pub fn into_local(self, zone: &LocalZone) -> Self {
        Self {
            check_in: self.check_in.map(|t| zone.to_local(t)),
            check_out: self.check_out.map(|t| zone.to_local(t)),
            ..self
        }
    }
}

fn datetime(value: Option<&Value>) -> Option<NaiveDateTime> {
    value.and_then(Value::as_str).and_then(parse_erp)
}

/// many2one fields arrive as `[id, "display name"]`, or `false` when unset.
fn many2one_id(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Array(pair) => pair.first().and_then(Value::as_i64),
        other => other.as_i64(),
    }
}
