//! Window overlap arithmetic and day classification.

use chrono::NaiveDateTime;

use super::periods::Period;
use crate::model::{DayStatus, DayWindows, Direction, PunchEvent, WorkSchedule};

const DISPLAY_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayMetrics {
    pub worked_seconds: i64,
    pub overtime_seconds: i64,
    pub not_working_seconds: i64,
    pub first_in: Option<NaiveDateTime>,
    pub last_out: Option<NaiveDateTime>,
    pub start_time: Option<String>,
}

impl DayMetrics {
    pub fn first_in_display(&self) -> Option<String> {
        self.first_in.map(|t| t.format(DISPLAY_FORMAT).to_string())
    }

    pub fn last_out_display(&self) -> Option<String> {
        self.last_out.map(|t| t.format(DISPLAY_FORMAT).to_string())
    }
}

fn clip(t: NaiveDateTime, lo: NaiveDateTime, hi: NaiveDateTime) -> NaiveDateTime {
    t.max(lo).min(hi)
}

fn overlap_ms(
    start: NaiveDateTime,
    end: NaiveDateTime,
    lo: NaiveDateTime,
    hi: NaiveDateTime,
) -> i64 {
    (end.min(hi) - start.max(lo)).num_milliseconds().max(0)
}

fn rounded_seconds(ms: i64) -> i64 {
    (ms as f64 / 1000.0).round() as i64
}

/// Worked/overtime/idle seconds and boundary punches for one day.
///
/// `events` are the normalized punches, `periods` the pairs built from them.
pub fn compute_metrics(
    events: &[PunchEvent],
    periods: &[Period],
    schedule: &WorkSchedule,
    windows: &DayWindows,
) -> DayMetrics {
    let first_in = events
        .iter()
        .filter(|e| e.direction == Direction::In && e.event_time >= windows.early_start)
        .map(|e| e.event_time)
        .min();
    let last_out = events
        .iter()
        .filter(|e| e.direction == Direction::Out)
        .map(|e| e.event_time)
        .max();

    let start_time = first_in.map(|t| {
        if t <= windows.work_start {
            schedule.work_start.format(DISPLAY_FORMAT).to_string()
        } else {
            t.format(DISPLAY_FORMAT).to_string()
        }
    });

    if periods.is_empty() {
        return DayMetrics {
            worked_seconds: 0,
            overtime_seconds: 0,
            not_working_seconds: schedule.scheduled_seconds(),
            first_in,
            last_out,
            start_time,
        };
    }

    let mut worked_ms = 0i64;
    let mut overtime_ms = 0i64;

    for period in periods {
        let start = clip(period.start, windows.work_start, windows.ot_end);
        let end = clip(period.end, windows.work_start, windows.ot_end);
        if end <= start {
            continue;
        }
        worked_ms += overlap_ms(start, end, windows.work_start, windows.work_end);
        overtime_ms += overlap_ms(start, end, windows.work_end, windows.ot_end);
    }

    let worked_seconds = rounded_seconds(worked_ms);
    let overtime_seconds = rounded_seconds(overtime_ms);

    // Idle time is measured against the outer envelope of all periods only.
    let envelope_start = periods
        .iter()
        .map(|p| p.start)
        .min()
        .map(|t| clip(t, windows.work_start, windows.ot_end));
    let envelope_end = periods
        .iter()
        .map(|p| p.end)
        .max()
        .map(|t| clip(t, windows.work_start, windows.ot_end));
    let envelope_seconds = match (envelope_start, envelope_end) {
        (Some(start), Some(end)) => rounded_seconds((end - start).num_milliseconds().max(0)),
        _ => 0,
    };

    DayMetrics {
        worked_seconds,
        overtime_seconds,
        not_working_seconds: (envelope_seconds - worked_seconds - overtime_seconds).max(0),
        first_in,
        last_out,
        start_time,
    }
}

/// Status from hours alone, before the manual override.
pub fn base_status(
    punch_count: usize,
    period_count: usize,
    worked_seconds: i64,
    scheduled_seconds: i64,
) -> DayStatus {
    if punch_count == 0 || period_count == 0 || worked_seconds <= 0 {
        DayStatus::Absent
    } else if worked_seconds < scheduled_seconds {
        DayStatus::Partial
    } else {
        DayStatus::Ok
    }
}

pub fn final_status(base: DayStatus, had_manual: bool) -> DayStatus {
    if had_manual { DayStatus::Manual } else { base }
}
