use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::MySqlPool;

use super::{AttendanceStore, PunchStore, ScheduleStore};
use crate::attendance::correction::{CorrectionReport, PunchCorrection, apply_correction};
use crate::error::{AttendanceError, Result};
use crate::model::{
    AttendanceDay, PunchEvent, WorkSchedule, attendance::AttendanceDayRow, punch::PunchRow,
    schedule::WorkScheduleRow,
};

const PUNCH_COLUMNS: &str = r#"
    id, employee_id, event_time, direction, source,
    original_direction, direction_corrected, correction_note,
    corrected_at, corrected_by
"#;

#[derive(Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl PunchStore for MySqlRepository {
    async fn find_punches_for_employee_day(
        &self,
        employee_id: u64,
        day_start: NaiveDateTime,
        day_end: NaiveDateTime,
    ) -> Result<Vec<PunchEvent>> {
        let sql = format!(
            r#"
            SELECT {PUNCH_COLUMNS}
            FROM punches
            WHERE employee_id = ?
            AND event_time >= ?
            AND event_time < ?
            ORDER BY event_time ASC, id ASC
            "#
        );

        let rows = sqlx::query_as::<_, PunchRow>(&sql)
            .bind(employee_id)
            .bind(day_start)
            .bind(day_end)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| PunchEvent::try_from(row).map_err(AttendanceError::from))
            .collect()
    }

    async fn apply_corrections(
        &self,
        batch: &[PunchCorrection],
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<CorrectionReport> {
        let select_sql = format!("SELECT {PUNCH_COLUMNS} FROM punches WHERE id = ? FOR UPDATE");
        let mut report = CorrectionReport::default();

        // Dropping `tx` on an early return rolls back every row written so far.
        let mut tx = self.pool.begin().await?;

        for correction in batch {
            let current: PunchEvent = sqlx::query_as::<_, PunchRow>(&select_sql)
                .bind(correction.punch_id)
                .fetch_one(&mut *tx)
                .await?
                .try_into()?;

            let duplicates: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*)
                FROM punches
                WHERE employee_id = ?
                AND event_time = ?
                AND direction = ?
                AND source = ?
                AND id <> ?
                "#,
            )
            .bind(correction.employee_id)
            .bind(correction.event_time)
            .bind(correction.to.to_string())
            .bind(correction.source.to_string())
            .bind(correction.punch_id)
            .fetch_one(&mut *tx)
            .await?;

            let (updated, outcome) =
                apply_correction(&current, correction, duplicates > 0, actor, now);

            sqlx::query(
                r#"
                UPDATE punches
                SET direction = ?,
                    original_direction = ?,
                    direction_corrected = ?,
                    correction_note = ?,
                    corrected_at = ?,
                    corrected_by = ?
                WHERE id = ?
                "#,
            )
            .bind(updated.direction.to_string())
            .bind(updated.original_direction.map(|d| d.to_string()))
            .bind(updated.direction_corrected)
            .bind(&updated.correction_note)
            .bind(updated.corrected_at)
            .bind(&updated.corrected_by)
            .bind(updated.id)
            .execute(&mut *tx)
            .await?;

            tracing::debug!(
                punch_id = correction.punch_id,
                from = %correction.from,
                to = %correction.to,
                ?outcome,
                "Punch direction correction written"
            );
            report.record(outcome);
        }

        tx.commit().await?;
        Ok(report)
    }
}

impl ScheduleStore for MySqlRepository {
    async fn active_work_schedule(&self) -> Result<Option<WorkSchedule>> {
        let row = sqlx::query_as::<_, WorkScheduleRow>(
            r#"
            SELECT work_start, work_end, ot_end, early_start, auto_close_at
            FROM work_schedules
            ORDER BY COALESCE(updated_at, created_at) DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(WorkSchedule::from))
    }
}

impl AttendanceStore for MySqlRepository {
    async fn upsert_attendance_day(&self, day: &AttendanceDay) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO attendance_days
                (employee_id, work_date, start_time, first_in, last_out,
                 worked_seconds, overtime_seconds, not_working_seconds,
                 had_manual, status, calculated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                start_time = VALUES(start_time),
                first_in = VALUES(first_in),
                last_out = VALUES(last_out),
                worked_seconds = VALUES(worked_seconds),
                overtime_seconds = VALUES(overtime_seconds),
                not_working_seconds = VALUES(not_working_seconds),
                had_manual = VALUES(had_manual),
                status = VALUES(status),
                calculated_at = VALUES(calculated_at)
            "#,
        )
        .bind(day.employee_id)
        .bind(day.work_date)
        .bind(&day.start_time)
        .bind(&day.first_in)
        .bind(&day.last_out)
        .bind(day.worked_seconds)
        .bind(day.overtime_seconds)
        .bind(day.not_working_seconds)
        .bind(day.had_manual)
        .bind(day.status.to_string())
        .bind(day.calculated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_attendance_day(
        &self,
        employee_id: u64,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceDay>> {
        let row = sqlx::query_as::<_, AttendanceDayRow>(
            r#"
            SELECT employee_id, work_date, start_time, first_in, last_out,
                   worked_seconds, overtime_seconds, not_working_seconds,
                   had_manual, status, calculated_at
            FROM attendance_days
            WHERE employee_id = ?
            AND work_date = ?
            "#,
        )
        .bind(employee_id)
        .bind(work_date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AttendanceDay::try_from)
            .transpose()
            .map_err(AttendanceError::from)
    }
}
