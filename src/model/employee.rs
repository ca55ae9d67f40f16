use serde::Deserialize;

/// The part of the identity service's HR profile this service relies on.
#[derive(Debug, Deserialize)]
pub struct EmployeeInfo {
    pub id: i64,
}
