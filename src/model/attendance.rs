use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum DayStatus {
    Absent,
    Partial,
    Ok,
    /// Manual punches or corrected directions; needs a human look.
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "employee_id": 1001,
        "work_date": "2026-01-05",
        "start_time": "08:00",
        "first_in": "07:52",
        "last_out": "16:31",
        "worked_seconds": 30600,
        "overtime_seconds": 60,
        "not_working_seconds": 0,
        "had_manual": false,
        "status": "OK",
        "calculated_at": "2026-01-05T18:00:00Z"
    })
)]
pub struct AttendanceDay {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub work_date: NaiveDate,

    /// "HH:MM"; the schedule start when the employee was in on time.
    #[schema(example = "08:00", nullable = true)]
    pub start_time: Option<String>,

    #[schema(example = "07:52", nullable = true)]
    pub first_in: Option<String>,

    #[schema(example = "16:31", nullable = true)]
    pub last_out: Option<String>,

    pub worked_seconds: i64,
    pub overtime_seconds: i64,
    pub not_working_seconds: i64,
    pub had_manual: bool,
    pub status: DayStatus,

    #[schema(value_type = String, format = "date-time")]
    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct AttendanceDayRow {
    pub employee_id: u64,
    pub work_date: NaiveDate,
    pub start_time: Option<String>,
    pub first_in: Option<String>,
    pub last_out: Option<String>,
    pub worked_seconds: i64,
    pub overtime_seconds: i64,
    pub not_working_seconds: i64,
    pub had_manual: bool,
    pub status: String,
    pub calculated_at: DateTime<Utc>,
}

impl TryFrom<AttendanceDayRow> for AttendanceDay {
    type Error = strum::ParseError;

    fn try_from(row: AttendanceDayRow) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_id: row.employee_id,
            work_date: row.work_date,
            start_time: row.start_time,
            first_in: row.first_in,
            last_out: row.last_out,
            worked_seconds: row.worked_seconds,
            overtime_seconds: row.overtime_seconds,
            not_working_seconds: row.not_working_seconds,
            had_manual: row.had_manual,
            status: row.status.parse()?,
            calculated_at: row.calculated_at,
        })
    }
}
