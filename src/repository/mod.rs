//! Storage seams the attendance engine talks to.
//!
//! Production runs on [`MySqlRepository`]; [`MemoryRepository`] keeps
//! everything in process and backs the test suite.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::attendance::correction::{CorrectionReport, PunchCorrection};
use crate::error::Result;
use crate::model::{AttendanceDay, PunchEvent, WorkSchedule};

mod memory;
mod mysql;

pub use memory::MemoryRepository;
pub use mysql::MySqlRepository;

#[allow(async_fn_in_trait)]
pub trait PunchStore {
    /// Punches with `day_start <= event_time < day_end`, ordered by time then id.
    async fn find_punches_for_employee_day(
        &self,
        employee_id: u64,
        day_start: NaiveDateTime,
        day_end: NaiveDateTime,
    ) -> Result<Vec<PunchEvent>>;

    /// Writes every correction in one transaction. Collisions are recorded on
    /// the row, not raised; any other failure rolls the whole batch back.
    async fn apply_corrections(
        &self,
        batch: &[PunchCorrection],
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<CorrectionReport>;
}

#[allow(async_fn_in_trait)]
pub trait ScheduleStore {
    /// Most recently updated schedule, if one was ever configured.
    async fn active_work_schedule(&self) -> Result<Option<WorkSchedule>>;
}

#[allow(async_fn_in_trait)]
pub trait AttendanceStore {
    async fn upsert_attendance_day(&self, day: &AttendanceDay) -> Result<()>;

    async fn find_attendance_day(
        &self,
        employee_id: u64,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceDay>>;
}

pub trait AttendanceRepository: PunchStore + ScheduleStore + AttendanceStore {}

impl<T: PunchStore + ScheduleStore + AttendanceStore> AttendanceRepository for T {}
