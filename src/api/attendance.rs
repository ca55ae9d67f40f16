use crate::auth::caller::Caller;
use crate::auth::identity::IdentityResolver;
use crate::error::AttendanceError;
use crate::models::{CheckInReq, CheckOutReq};
use crate::service::attendance::{AttendanceGateway, TodayAttendance};
use actix_web::{HttpResponse, web};
use tracing::debug;

/// Attendance history of the caller
#[utoipa::path(
    get,
    path = "/api/attendance/list",
    responses(
        (status = 200, description = "Every attendance record of the caller, timestamps in UTC", body = [crate::model::attendance::AttendanceRecord]),
        (status = 400, description = "Rejected by an upstream service"),
        (status = 401, description = "Missing or refused credentials"),
        (status = 502, description = "Upstream service unreachable"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    caller: Caller,
    identity: web::Data<dyn IdentityResolver>,
    gateway: web::Data<AttendanceGateway>,
) -> Result<HttpResponse, AttendanceError> {
    let employee_id = identity.resolve_employee_id(&caller).await?;
    let records = gateway.list_attendance(employee_id).await?;
    debug!(employee_id, count = records.len(), "attendance listed");
    Ok(HttpResponse::Ok().json(records))
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/checkin",
    request_body = CheckInReq,
    responses(
        (status = 200, description = "Id of the created attendance record", body = String, example = json!("118")),
        (status = 400, description = "Malformed timestamp or rejected by the ERP"),
        (status = 401, description = "Missing or refused credentials"),
        (status = 502, description = "Upstream service unreachable"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    caller: Caller,
    identity: web::Data<dyn IdentityResolver>,
    gateway: web::Data<AttendanceGateway>,
    payload: web::Json<CheckInReq>,
) -> Result<HttpResponse, AttendanceError> {
    let employee_id = identity.resolve_employee_id(&caller).await?;
    let id = gateway.check_in(employee_id, payload.check_in).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(id.to_string()))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/checkout",
    request_body = CheckOutReq,
    responses(
        (status = 200, description = "Checked out"),
        (status = 400, description = "No open check-in found for that day", body = Object, example = json!({
            "message": "no open check-in found"
        })),
        (status = 401, description = "Missing or refused credentials"),
        (status = 502, description = "Upstream service unreachable"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    caller: Caller,
    identity: web::Data<dyn IdentityResolver>,
    gateway: web::Data<AttendanceGateway>,
    payload: web::Json<CheckOutReq>,
) -> Result<HttpResponse, AttendanceError> {
    let employee_id = identity.resolve_employee_id(&caller).await?;
    gateway.check_out(employee_id, payload.check_out).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Current attendance of the caller
#[utoipa::path(
    get,
    path = "/api/attendance/todayCheckIn",
    responses(
        (status = 200, description = "Records relevant to today, timestamps in local time", body = [crate::model::attendance::AttendanceRecord]),
        (status = 204, description = "Nothing relevant to today"),
        (status = 400, description = "Rejected by an upstream service"),
        (status = 401, description = "Missing or refused credentials"),
        (status = 502, description = "Upstream service unreachable"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn today_check_in(
    caller: Caller,
    identity: web::Data<dyn IdentityResolver>,
    gateway: web::Data<AttendanceGateway>,
) -> Result<HttpResponse, AttendanceError> {
    let employee_id = identity.resolve_employee_id(&caller).await?;
    match gateway.today_check_in(employee_id).await? {
        TodayAttendance::Records(records) => Ok(HttpResponse::Ok().json(records)),
        TodayAttendance::NoContent => Ok(HttpResponse::NoContent().finish()),
    }
}
