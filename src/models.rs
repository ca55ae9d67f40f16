use crate::utils::local_time::parse_local_input;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, de};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInReq {
    /// Local wall-clock time in the deployment zone, `YYYY-MM-DDTHH:MM[:SS[.fff]]`
    /// (a space may replace `T`). Values carrying `Z` or a UTC offset are
    /// rejected with 400.
    #[serde(deserialize_with = "local_datetime")]
    #[schema(value_type = String, example = "2024-03-11T09:02:11")]
    pub check_in: NaiveDateTime,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutReq {
    /// Local wall-clock time in the deployment zone, `YYYY-MM-DDTHH:MM[:SS[.fff]]`
    /// (a space may replace `T`). Values carrying `Z` or a UTC offset are
    /// rejected with 400.
    #[serde(deserialize_with = "local_datetime")]
    #[schema(value_type = String, example = "2024-03-11T18:10:45")]
    pub check_out: NaiveDateTime,
}

fn local_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_local_input(&raw)
        .ok_or_else(|| de::Error::custom(format!("`{raw}` is not a local timestamp")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_separators() {
        let req: CheckInReq = serde_json::from_str(r#"{"checkIn": "2024-03-11T09:02:11"}"#).unwrap();
        assert_eq!(req.check_in.to_string(), "2024-03-11 09:02:11");

        let req: CheckOutReq = serde_json::from_str(r#"{"checkOut": "2024-03-11 18:10:45"}"#).unwrap();
        assert_eq!(req.check_out.to_string(), "2024-03-11 18:10:45");
    }

    #[test]
    fn rejects_missing_or_garbage_timestamps() {
        assert!(serde_json::from_str::<CheckInReq>(r#"{}"#).is_err());
        assert!(serde_json::from_str::<CheckInReq>(r#"{"checkIn": null}"#).is_err());
        assert!(serde_json::from_str::<CheckOutReq>(r#"{"checkOut": "tomorrow"}"#).is_err());
    }

    #[test]
    fn rejects_utc_marked_timestamps() {
        let err = serde_json::from_str::<CheckInReq>(r#"{"checkIn": "2024-03-11T08:30:00.000Z"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("is not a local timestamp"));
    }
}
