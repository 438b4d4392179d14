use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::attendance::{calculate_attendance, parse_work_date, recalculate_days};
use crate::config::Config;
use crate::error::AttendanceError;
use crate::model::AttendanceDay;
use crate::repository::{AttendanceStore, MySqlRepository};

#[derive(Deserialize, ToSchema)]
pub struct CalculateAttendance {
    #[schema(example = 1001)]
    pub employee_id: u64,

    /// Calendar day, `YYYY-MM-DD`
    #[schema(example = "2026-01-05", format = "date")]
    pub work_date: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RecalculateAttendance {
    /// Employee-days touched by a batch of new punches; duplicates are collapsed.
    pub days: Vec<CalculateAttendance>,
}

/// Calculate one employee-day
#[utoipa::path(
    post,
    path = "/api/attendance/calculate",
    request_body(
        content = CalculateAttendance,
        description = "Employee and calendar day to (re)calculate",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Attendance day calculated", body = AttendanceDay),
        (status = 400, description = "Invalid work date", body = Object, example = json!({
            "message": "invalid work date '05/01/2026', expected YYYY-MM-DD"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn calculate(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CalculateAttendance>,
) -> actix_web::Result<impl Responder> {
    let repo = MySqlRepository::new(pool.get_ref().clone());

    let day = calculate_attendance(
        &repo,
        payload.employee_id,
        &payload.work_date,
        &config.correction_actor,
    )
    .await
    .inspect_err(|e| {
        tracing::warn!(error = %e, employee_id = payload.employee_id, "Attendance calculation failed")
    })?;

    Ok(HttpResponse::Ok().json(day))
}

/// Recalculate a batch of employee-days
#[utoipa::path(
    post,
    path = "/api/attendance/recalculate",
    request_body = RecalculateAttendance,
    responses(
        (status = 200, description = "Recalculated days, ordered by employee and date", body = [AttendanceDay]),
        (status = 400, description = "A work date is invalid; nothing was calculated"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn recalculate(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<RecalculateAttendance>,
) -> actix_web::Result<impl Responder> {
    // Validate every date before touching storage.
    let keys = payload
        .days
        .iter()
        .map(|d| parse_work_date(&d.work_date).map(|date| (d.employee_id, date)))
        .collect::<Result<Vec<_>, _>>()?;

    let repo = MySqlRepository::new(pool.get_ref().clone());
    let days = recalculate_days(&repo, &keys, &config.correction_actor).await?;

    tracing::info!(count = days.len(), "Attendance batch recalculated");

    Ok(HttpResponse::Ok().json(days))
}

/// Fetch a stored employee-day
#[utoipa::path(
    get,
    path = "/api/attendance/{employee_id}/{work_date}",
    params(
        ("employee_id" = u64, Path, description = "Employee ID"),
        ("work_date" = String, Path, description = "Calendar day, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Stored attendance day", body = AttendanceDay),
        (status = 400, description = "Invalid work date"),
        (status = 404, description = "Not calculated yet", body = Object, example = json!({
            "message": "attendance day not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn get_day(
    pool: web::Data<MySqlPool>,
    path: web::Path<(u64, String)>,
) -> actix_web::Result<impl Responder> {
    let (employee_id, work_date) = path.into_inner();
    let date = parse_work_date(&work_date)?;

    let repo = MySqlRepository::new(pool.get_ref().clone());
    let day = repo
        .find_attendance_day(employee_id, date)
        .await?
        .ok_or_else(|| AttendanceError::NotFound("attendance day".into()))?;

    Ok(HttpResponse::Ok().json(day))
}
