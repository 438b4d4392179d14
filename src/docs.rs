use crate::api::attendance::{CalculateAttendance, RecalculateAttendance};
use crate::model::{AttendanceDay, DayStatus, Direction, PunchEvent, PunchSource, WorkSchedule};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance API",
        version = "1.0.0",
        description = r#"
## Daily attendance calculation

Turns an employee's raw clock-in/clock-out punches for one day into a daily summary.

### 🔹 What happens on each calculation
- Punches are forced into strict **IN → OUT → IN → OUT** order; relabelled punches are written back with an audit note
- IN/OUT pairs become worked periods; a trailing IN is closed at the configured cut-off (20:00 by default)
- Periods are clipped against the work window and the overtime window
- The day is classified as **ABSENT**, **PARTIAL**, **OK** or **MANUAL**

### 📦 Response Format
- JSON `AttendanceDay` records, recalculation is idempotent

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::calculate,
        crate::api::attendance::recalculate,
        crate::api::attendance::get_day
    ),
    components(
        schemas(
            CalculateAttendance,
            RecalculateAttendance,
            AttendanceDay,
            DayStatus,
            PunchEvent,
            Direction,
            PunchSource,
            WorkSchedule
        )
    ),
    tags(
        (name = "Attendance", description = "Daily attendance calculation APIs"),
    )
)]
pub struct ApiDoc;
