use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tracing::{debug, info, instrument};

use super::correction::diff_corrections;
use super::metrics::{base_status, compute_metrics, final_status};
use super::normalizer::normalize;
use super::periods::build_periods;
use crate::error::{AttendanceError, Result};
use crate::model::{AttendanceDay, PunchEvent};
use crate::repository::AttendanceRepository;

pub fn parse_work_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AttendanceError::InvalidWorkDate(raw.to_string()))
}

/// Half-open `[00:00, next day 00:00)` range for a calendar day.
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = date
        .succ_opt()
        .map(|next| next.and_time(NaiveTime::MIN))
        .unwrap_or(NaiveDateTime::MAX);
    (start, end)
}

/// Computes, persists and returns one employee's attendance for `work_date`.
///
/// Safe to repeat: the stored day is overwritten, never accumulated.
#[instrument(skip(repo, actor))]
pub async fn calculate_attendance<R: AttendanceRepository>(
    repo: &R,
    employee_id: u64,
    work_date: &str,
    actor: &str,
) -> Result<AttendanceDay> {
    let date = parse_work_date(work_date)?;
    calculate_for_date(repo, employee_id, date, actor).await
}

pub async fn calculate_for_date<R: AttendanceRepository>(
    repo: &R,
    employee_id: u64,
    date: NaiveDate,
    actor: &str,
) -> Result<AttendanceDay> {
    let schedule = match repo.active_work_schedule().await? {
        Some(s) => s,
        None => {
            debug!("No work schedule configured, using defaults");
            Default::default()
        }
    };
    let windows = schedule.on(date);

    let (day_start, day_end) = day_bounds(date);
    let punches = repo
        .find_punches_for_employee_day(employee_id, day_start, day_end)
        .await?;

    let normalized = normalize(&punches);
    let corrections = diff_corrections(&punches, &normalized.events);
    if !corrections.is_empty() {
        let report = repo.apply_corrections(&corrections, actor, Utc::now()).await?;
        info!(
            employee_id,
            %date,
            flipped = report.flipped,
            skipped = report.skipped,
            "Punch directions corrected"
        );
    }

    let built = build_periods(&normalized.events, &windows);
    let metrics = compute_metrics(&normalized.events, &built.periods, &schedule, &windows);

    // Rows corrected on an earlier run keep the day flagged.
    let had_manual = normalized.adjusted
        || built.auto_closed
        || punches
            .iter()
            .any(|p| p.is_manual() || p.direction_corrected);

    let base = base_status(
        punches.len(),
        built.periods.len(),
        metrics.worked_seconds,
        schedule.scheduled_seconds(),
    );

    let day = AttendanceDay {
        employee_id,
        work_date: date,
        start_time: metrics.start_time.clone(),
        first_in: metrics.first_in_display(),
        last_out: metrics.last_out_display(),
        worked_seconds: metrics.worked_seconds,
        overtime_seconds: metrics.overtime_seconds,
        not_working_seconds: metrics.not_working_seconds,
        had_manual,
        status: final_status(base, had_manual),
        calculated_at: Utc::now(),
    };

    repo.upsert_attendance_day(&day).await?;

    debug!(
        employee_id,
        %date,
        status = %day.status,
        worked = day.worked_seconds,
        overtime = day.overtime_seconds,
        "Attendance day calculated"
    );

    Ok(day)
}

/// Distinct (employee, day) keys touched by a batch of punches, sorted.
pub fn affected_days(punches: &[PunchEvent]) -> Vec<(u64, NaiveDate)> {
    punches
        .iter()
        .map(|p| (p.employee_id, p.event_time.date()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Recalculates each distinct key in order, stopping at the first failure.
pub async fn recalculate_days<R: AttendanceRepository>(
    repo: &R,
    keys: &[(u64, NaiveDate)],
    actor: &str,
) -> Result<Vec<AttendanceDay>> {
    let keys: BTreeSet<_> = keys.iter().copied().collect();
    let mut days = Vec::with_capacity(keys.len());

    for (employee_id, date) in keys {
        days.push(calculate_for_date(repo, employee_id, date, actor).await?);
    }

    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, PunchSource};

    #[test]
    fn work_date_must_be_iso() {
        assert_eq!(
            parse_work_date("2026-01-05").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
        );
        assert!(matches!(
            parse_work_date("05/01/2026"),
            Err(AttendanceError::InvalidWorkDate(_))
        ));
        assert!(parse_work_date("2026-02-30").is_err());
        assert!(parse_work_date("").is_err());
    }

    #[test]
    fn day_bounds_cover_exactly_one_day() {
        let d = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let (start, end) = day_bounds(d);
        assert_eq!(start, d.and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(
            end,
            NaiveDate::from_ymd_opt(2026, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn affected_days_are_distinct_and_sorted() {
        let at = |d: u32, h: u32| {
            NaiveDate::from_ymd_opt(2026, 1, d)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        };
        let punches = vec![
            PunchEvent::new(1, 9, at(6, 8), Direction::In, PunchSource::Device),
            PunchEvent::new(2, 3, at(5, 8), Direction::In, PunchSource::Device),
            PunchEvent::new(3, 9, at(6, 17), Direction::Out, PunchSource::Device),
            PunchEvent::new(4, 3, at(5, 16), Direction::Out, PunchSource::Manual),
        ];
        assert_eq!(
            affected_days(&punches),
            vec![
                (3, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()),
                (9, NaiveDate::from_ymd_opt(2026, 1, 6).unwrap()),
            ]
        );
    }
}
