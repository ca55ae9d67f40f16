use crate::model::attendance::AttendanceRecord;
use crate::models::{CheckInReq, CheckOutReq};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Gateway API",
        version = "1.0.0",
        description = r#"
## Attendance Gateway

Clock-in / clock-out for employees, backed by the ERP's `hr.attendance` model.
This service stores nothing itself: every call resolves the caller through the
employee service and then reads or writes attendance records in the ERP.

### Time zones
- Request bodies carry **local** wall-clock time of the deployment zone.
- `/list` returns timestamps as stored in the ERP (UTC).
- `/todayCheckIn` returns timestamps in the deployment zone.

### "Today"
A record is part of today when it was checked in today, or when it was
checked in yesterday and checked out within the last hour.
`204 No Content` means nothing matched.

### Errors
Failures carry a JSON body `{"message": "..."}`. `400` covers rejected input
and checkouts without an open check-in; other upstream failures keep the
status the upstream reported (`502` when it could not be reached).
"#,
    ),
    paths(
        crate::api::attendance::list_attendance,
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today_check_in
    ),
    components(
        schemas(
            AttendanceRecord,
            CheckInReq,
            CheckOutReq
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;
