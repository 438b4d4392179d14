use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::{AttendanceStore, PunchStore, ScheduleStore};
use crate::attendance::correction::{CorrectionReport, PunchCorrection, apply_correction};
use crate::error::{AttendanceError, Result};
use crate::model::{AttendanceDay, Direction, PunchEvent, PunchSource, WorkSchedule};

#[derive(Debug, Default)]
struct MemoryState {
    punches: Vec<PunchEvent>,
    next_punch_id: u64,
    /// (schedule, updated_at); the newest wins.
    schedules: Vec<(WorkSchedule, DateTime<Utc>)>,
    days: BTreeMap<(u64, NaiveDate), AttendanceDay>,
    /// Fail a correction batch once this many rows have been written.
    fail_corrections_after: Option<usize>,
    fail_upserts: bool,
}

/// In-process store with the same transactional behaviour as the MySQL one.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: Mutex<MemoryState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_punch(
        &self,
        employee_id: u64,
        event_time: NaiveDateTime,
        direction: Direction,
        source: PunchSource,
    ) -> PunchEvent {
        let mut state = self.state();
        state.next_punch_id += 1;
        let punch = PunchEvent::new(state.next_punch_id, employee_id, event_time, direction, source);
        state.punches.push(punch.clone());
        punch
    }

    pub fn insert_schedule(&self, schedule: WorkSchedule, updated_at: DateTime<Utc>) {
        self.state().schedules.push((schedule, updated_at));
    }

    pub fn punch(&self, id: u64) -> Option<PunchEvent> {
        self.state().punches.iter().find(|p| p.id == id).cloned()
    }

    pub fn punches(&self) -> Vec<PunchEvent> {
        self.state().punches.clone()
    }

    pub fn attendance_day_count(&self) -> usize {
        self.state().days.len()
    }

    pub fn fail_corrections_after(&self, rows: Option<usize>) {
        self.state().fail_corrections_after = rows;
    }

    pub fn fail_upserts(&self, fail: bool) {
        self.state().fail_upserts = fail;
    }
}

impl PunchStore for MemoryRepository {
    async fn find_punches_for_employee_day(
        &self,
        employee_id: u64,
        day_start: NaiveDateTime,
        day_end: NaiveDateTime,
    ) -> Result<Vec<PunchEvent>> {
        let mut punches: Vec<PunchEvent> = self
            .state()
            .punches
            .iter()
            .filter(|p| {
                p.employee_id == employee_id && p.event_time >= day_start && p.event_time < day_end
            })
            .cloned()
            .collect();
        punches.sort_by_key(|p| (p.event_time, p.id));
        Ok(punches)
    }

    async fn apply_corrections(
        &self,
        batch: &[PunchCorrection],
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<CorrectionReport> {
        let mut state = self.state();
        let mut working = state.punches.clone();
        let mut report = CorrectionReport::default();

        for (written, correction) in batch.iter().enumerate() {
            if state.fail_corrections_after == Some(written) {
                return Err(AttendanceError::Storage(
                    "punch store unavailable during correction".into(),
                ));
            }

            let idx = working
                .iter()
                .position(|p| p.id == correction.punch_id)
                .ok_or_else(|| AttendanceError::NotFound(format!("punch {}", correction.punch_id)))?;
            let collides = working.iter().any(|p| correction.collides_with(p));

            let (updated, outcome) = apply_correction(&working[idx], correction, collides, actor, now);
            working[idx] = updated;
            report.record(outcome);
        }

        state.punches = working;
        Ok(report)
    }
}

impl ScheduleStore for MemoryRepository {
    async fn active_work_schedule(&self) -> Result<Option<WorkSchedule>> {
        Ok(self
            .state()
            .schedules
            .iter()
            .max_by_key(|(_, updated_at)| *updated_at)
            .map(|(schedule, _)| *schedule))
    }
}

impl AttendanceStore for MemoryRepository {
    async fn upsert_attendance_day(&self, day: &AttendanceDay) -> Result<()> {
        let mut state = self.state();
        if state.fail_upserts {
            return Err(AttendanceError::Storage("attendance store unavailable".into()));
        }
        state
            .days
            .insert((day.employee_id, day.work_date), day.clone());
        Ok(())
    }

    async fn find_attendance_day(
        &self,
        employee_id: u64,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceDay>> {
        Ok(self.state().days.get(&(employee_id, work_date)).cloned())
    }
}
