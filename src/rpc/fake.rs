//! In-memory stand-in for the ERP attendance model.

use crate::rpc::domain::{Domain, DomainValue, Operator};
use crate::rpc::error::RpcError;
use crate::rpc::model::{AttendanceModel, Row, Values};
use crate::utils::local_time::parse_erp;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    rows: Vec<Row>,
    next_id: i64,
    creates: usize,
    writes: usize,
    searches: Vec<Domain>,
}

#[derive(Default)]
pub struct FakeAttendanceModel {
    state: Mutex<State>,
    failure: Option<u16>,
}

impl FakeAttendanceModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            failure: Some(status),
            ..Self::default()
        }
    }

    /// Seeds a row the way the ERP stores it (UTC strings, many2one employee).
    pub fn seed(&self, employee_id: i64, check_in: &str, check_out: Option<&str>) -> i64 {
        let mut values = Values::new();
        values.insert("employee_id".into(), json!(employee_id));
        values.insert("check_in".into(), json!(check_in));
        if let Some(out) = check_out {
            values.insert("check_out".into(), json!(out));
        }
        self.state.lock().unwrap().insert(values)
    }

    pub fn seed_raw(&self, row: Row) {
        self.state.lock().unwrap().rows.push(row);
    }

    pub fn row(&self, id: i64) -> Option<Row> {
        let state = self.state.lock().unwrap();
        state.rows.iter().find(|r| row_id(r) == Some(id)).cloned()
    }

    pub fn creates(&self) -> usize {
        self.state.lock().unwrap().creates
    }

    pub fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    pub fn last_search(&self) -> Option<Domain> {
        self.state.lock().unwrap().searches.last().cloned()
    }

    fn check_failure(&self) -> Result<(), RpcError> {
        match self.failure {
            Some(status) => Err(RpcError::Status {
                status,
                message: "fake ERP failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl State {
    fn insert(&mut self, mut values: Values) -> i64 {
        self.next_id += 1;
        let id = self.next_id;
        if let Some(employee) = values.get("employee_id").and_then(Value::as_i64) {
            values.insert("employee_id".into(), json!([employee, format!("Employee {employee}")]));
        }
        values.insert("id".into(), json!(id));
        values.insert("create_uid".into(), json!([2, "Administrator"]));
        values.insert("write_uid".into(), json!([2, "Administrator"]));
        values.entry("check_out").or_insert(Value::Bool(false));
        recompute_worked_hours(&mut values);
        self.rows.push(values);
        id
    }

    fn matching(&self, domain: &Domain) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(move |row| matches(row, domain))
    }
}

fn row_id(row: &Row) -> Option<i64> {
    row.get("id").and_then(Value::as_i64)
}

fn recompute_worked_hours(row: &mut Row) {
    let hours = match (
        row.get("check_in").and_then(Value::as_str).and_then(parse_erp),
        row.get("check_out").and_then(Value::as_str).and_then(parse_erp),
    ) {
        (Some(check_in), Some(check_out)) => (check_out - check_in).num_seconds() as f64 / 3600.0,
        _ => 0.0,
    };
    row.insert("worked_hours".into(), json!(hours));
}

/// many2one values compare on their id.
fn scalar(value: Option<&Value>) -> Option<&Value> {
    match value {
        Some(Value::Array(pair)) => pair.first(),
        Some(Value::Null) | None => None,
        other => other,
    }
}

fn is_unset(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Bool(false)))
}

fn matches(row: &Row, domain: &Domain) -> bool {
    domain.conditions().iter().all(|condition| {
        let field = scalar(row.get(condition.field()));
        match (condition.operator(), condition.value()) {
            (Operator::Eq, DomainValue::Bool(false)) => is_unset(field),
            (Operator::NotEq, DomainValue::Bool(false)) => !is_unset(field),
            (Operator::Eq, DomainValue::Int(v)) => field.and_then(Value::as_i64) == Some(*v),
            (Operator::Eq, DomainValue::Str(v)) => field.and_then(Value::as_str) == Some(v.as_str()),
            (Operator::Gte, DomainValue::Str(v)) => {
                field.and_then(Value::as_str).is_some_and(|f| f >= v.as_str())
            }
            (Operator::Lte, DomainValue::Str(v)) => {
                field.and_then(Value::as_str).is_some_and(|f| f <= v.as_str())
            }
            (op, value) => panic!("fake ERP does not support {op:?} {value:?}"),
        }
    })
}

#[async_trait]
impl AttendanceModel for FakeAttendanceModel {
    async fn search_read(&self, domain: &Domain, fields: &[&str]) -> Result<Vec<Row>, RpcError> {
        self.check_failure()?;
        let mut state = self.state.lock().unwrap();
        state.searches.push(domain.clone());
        Ok(state
            .matching(domain)
            .map(|row| {
                row.iter()
                    .filter(|(k, _)| k.as_str() == "id" || fields.contains(&k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .collect())
    }

    async fn search(&self, domain: &Domain) -> Result<Vec<i64>, RpcError> {
        self.check_failure()?;
        let mut state = self.state.lock().unwrap();
        state.searches.push(domain.clone());
        Ok(state.matching(domain).filter_map(row_id).collect())
    }

    async fn create(&self, values: Values) -> Result<i64, RpcError> {
        self.check_failure()?;
        let mut state = self.state.lock().unwrap();
        state.creates += 1;
        Ok(state.insert(values))
    }

    async fn write(&self, ids: &[i64], values: Values) -> Result<(), RpcError> {
        self.check_failure()?;
        let mut state = self.state.lock().unwrap();
        let check_out = values.get("check_out").and_then(Value::as_str).and_then(parse_erp);
        let inverted = state
            .rows
            .iter()
            .filter(|row| row_id(row).is_some_and(|id| ids.contains(&id)))
            .filter_map(|row| row.get("check_in").and_then(Value::as_str).and_then(parse_erp))
            .any(|check_in| check_out.is_some_and(|out| out < check_in));
        if inverted {
            return Err(RpcError::Fault {
                code: 200,
                kind: "odoo.exceptions.ValidationError".to_string(),
                message: "\"Check Out\" time cannot be earlier than \"Check In\" time.".to_string(),
            });
        }

        state.writes += 1;
        for row in state.rows.iter_mut() {
            if row_id(row).is_some_and(|id| ids.contains(&id)) {
                row.extend(values.clone());
                recompute_worked_hours(row);
            }
        }
        Ok(())
    }
}
