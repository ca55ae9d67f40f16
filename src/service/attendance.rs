use crate::error::{AttendanceError, NO_OPEN_CHECK_IN};
use crate::model::attendance::{AttendanceRecord, RECORD_FIELDS};
use crate::rpc::domain::{Domain, Operator};
use crate::rpc::model::{AttendanceModel, Row, Values};
use crate::service::window::AttendanceWindow;
use crate::utils::clock::Clock;
use crate::utils::local_time::{LocalZone, format_erp};
use chrono::NaiveDateTime;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Outcome of the "today" query. `NoContent` is not an error; callers
/// answer it with 204.
#[derive(Debug, PartialEq)]
pub enum TodayAttendance {
    Records(Vec<AttendanceRecord>),
    NoContent,
}

/// Attendance operations for one resolved employee, translated into ERP
/// calls. Holds no state between requests; every read goes to the ERP.
pub struct AttendanceGateway {
    model: Arc<dyn AttendanceModel>,
    zone: LocalZone,
    clock: Arc<dyn Clock>,
}

impl AttendanceGateway {
    pub fn new(model: Arc<dyn AttendanceModel>, zone: LocalZone, clock: Arc<dyn Clock>) -> Self {
        Self { model, zone, clock }
    }

    fn decode(rows: &[Row], employee_id: i64) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        rows.iter()
            .map(|row| AttendanceRecord::from_row(row, employee_id))
            .collect::<Result<Vec<_>, _>>()
            .map_err(AttendanceError::from)
    }

    /// Every record of the employee, in ERP order, timestamps in UTC.
    #[instrument(skip(self))]
    pub async fn list_attendance(
        &self,
        employee_id: i64,
    ) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        let domain = Domain::new().and("employee_id", Operator::Eq, employee_id);
        let rows = self.model.search_read(&domain, &RECORD_FIELDS).await?;
        Self::decode(&rows, employee_id)
    }

    /// Opens a new record. Not idempotent: each call creates a record.
    #[instrument(skip(self))]
    pub async fn check_in(
        &self,
        employee_id: i64,
        local_check_in: NaiveDateTime,
    ) -> Result<i64, AttendanceError> {
        let check_in_utc = format_erp(self.zone.to_utc(local_check_in));

        let mut values = Values::new();
        values.insert("employee_id".into(), json!(employee_id));
        values.insert("check_in".into(), json!(check_in_utc));

        let id = self.model.create(values).await?;
        info!(attendance_id = id, check_in_utc = %check_in_utc, "checked in");
        Ok(id)
    }

    /// Closes the open record whose check-in falls on the checkout's local
    /// calendar day.
    #[instrument(skip(self))]
    pub async fn check_out(
        &self,
        employee_id: i64,
        local_check_out: NaiveDateTime,
    ) -> Result<(), AttendanceError> {
        let check_out_utc = format_erp(self.zone.to_utc(local_check_out));
        let (start, end) = self.zone.day_bounds_utc(local_check_out.date());

        let domain = Domain::new()
            .and("employee_id", Operator::Eq, employee_id)
            .and("check_in", Operator::Gte, format_erp(start))
            .and("check_in", Operator::Lte, format_erp(end))
            .and("check_out", Operator::Eq, false);

        let open = self.model.search(&domain).await?;
        let Some(&attendance_id) = open.first() else {
            warn!("no open check-in to close");
            return Err(AttendanceError::client(NO_OPEN_CHECK_IN));
        };
        if open.len() > 1 {
            warn!(candidates = ?open, attendance_id, "several open check-ins today, closing the first");
        }

        let mut values = Values::new();
        values.insert("check_out".into(), json!(check_out_utc));
        self.model.write(&[attendance_id], values).await?;

        info!(attendance_id, check_out_utc = %check_out_utc, "checked out");
        Ok(())
    }

    /// Records relevant to the caller's current day, in local time.
    #[instrument(skip(self))]
    pub async fn today_check_in(&self, employee_id: i64) -> Result<TodayAttendance, AttendanceError> {
        let domain = Domain::new()
            .and("employee_id", Operator::Eq, employee_id)
            .and("check_in", Operator::NotEq, false);
        let rows = self.model.search_read(&domain, &RECORD_FIELDS).await?;

        let window = AttendanceWindow::at(self.zone.now_local(self.clock.now()));
        let records: Vec<_> = Self::decode(&rows, employee_id)?
            .into_iter()
            .map(|record| record.into_local(&self.zone))
            .filter(|record| match record.check_in {
                Some(check_in) => window.includes(check_in, record.check_out),
                None => false,
            })
            .collect();

        if records.is_empty() {
            Ok(TodayAttendance::NoContent)
        } else {
            Ok(TodayAttendance::Records(records))
        }
    }
}
