use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// How long an overnight shift that has just been closed stays visible in
/// "today".
const OVERNIGHT_GRACE_MINUTES: i64 = 60;

/// Decides which attendance records belong to the caller's current day.
/// All values are local wall-clock times in the deployment zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceWindow {
    today: NaiveDate,
    yesterday: NaiveDate,
    now: NaiveDateTime,
}

impl AttendanceWindow {
    pub fn new(today: NaiveDate, yesterday: NaiveDate, now: NaiveDateTime) -> Self {
        Self {
            today,
            yesterday,
            now,
        }
    }

    pub fn at(now: NaiveDateTime) -> Self {
        let today = now.date();
        Self::new(today, today.pred_opt().unwrap_or(today), now)
    }

    /// A record is current when it
    /// 1. was checked in and out today,
    /// 2. was checked in yesterday and checked out within the last hour, or
    /// 3. was checked in today and is still open.
    pub fn includes(&self, check_in: NaiveDateTime, check_out: Option<NaiveDateTime>) -> bool {
        let day = check_in.date();
        match check_out {
            Some(_) if day == self.today => true,
            Some(out) => {
                day == self.yesterday
                    && out > self.now - TimeDelta::minutes(OVERNIGHT_GRACE_MINUTES)
            }
            None => day == self.today,
        }
    }
}
