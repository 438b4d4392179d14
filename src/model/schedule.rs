use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Time-of-day boundaries for a working day. Dates are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WorkSchedule {
    #[schema(example = "08:00:00", value_type = String)]
    pub work_start: NaiveTime,

    #[schema(example = "16:30:00", value_type = String)]
    pub work_end: NaiveTime,

    /// Nothing after this counts as overtime.
    #[schema(example = "20:00:00", value_type = String)]
    pub ot_end: NaiveTime,

    /// Earliest punch that is still accepted as the day's first in.
    #[schema(example = "07:00:00", value_type = String)]
    pub early_start: NaiveTime,

    /// A trailing IN with no OUT is closed here.
    #[schema(example = "20:00:00", value_type = String)]
    pub auto_close_at: NaiveTime,
}

fn hm(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap_or(NaiveTime::MIN)
}

impl Default for WorkSchedule {
    fn default() -> Self {
        Self {
            work_start: hm(8, 0),
            work_end: hm(16, 30),
            ot_end: hm(20, 0),
            early_start: hm(7, 0),
            auto_close_at: hm(20, 0),
        }
    }
}

impl WorkSchedule {
    /// The schedule's boundaries pinned to a calendar day.
    pub fn on(&self, date: NaiveDate) -> DayWindows {
        DayWindows {
            work_start: date.and_time(self.work_start),
            work_end: date.and_time(self.work_end),
            ot_end: date.and_time(self.ot_end),
            early_start: date.and_time(self.early_start),
            auto_close_at: date.and_time(self.auto_close_at),
        }
    }

    pub fn scheduled_seconds(&self) -> i64 {
        (self.work_end - self.work_start).num_seconds().max(0)
    }
}

/// [`WorkSchedule`] resolved against a specific date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindows {
    pub work_start: NaiveDateTime,
    pub work_end: NaiveDateTime,
    pub ot_end: NaiveDateTime,
    pub early_start: NaiveDateTime,
    pub auto_close_at: NaiveDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct WorkScheduleRow {
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub ot_end: NaiveTime,
    pub early_start: NaiveTime,
    pub auto_close_at: Option<NaiveTime>,
}

impl From<WorkScheduleRow> for WorkSchedule {
    fn from(row: WorkScheduleRow) -> Self {
        Self {
            work_start: row.work_start,
            work_end: row.work_end,
            ot_end: row.ot_end,
            early_start: row.early_start,
            auto_close_at: row
                .auto_close_at
                .unwrap_or(WorkSchedule::default().auto_close_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_day() {
        let s = WorkSchedule::default();
        assert_eq!(s.work_start.format("%H:%M").to_string(), "08:00");
        assert_eq!(s.work_end.format("%H:%M").to_string(), "16:30");
        assert_eq!(s.ot_end.format("%H:%M").to_string(), "20:00");
        assert_eq!(s.early_start.format("%H:%M").to_string(), "07:00");
        assert_eq!(s.auto_close_at.format("%H:%M").to_string(), "20:00");
        assert_eq!(s.scheduled_seconds(), 30_600);
    }

    #[test]
    fn missing_auto_close_column_falls_back() {
        let row = WorkScheduleRow {
            work_start: hm(9, 0),
            work_end: hm(17, 0),
            ot_end: hm(21, 0),
            early_start: hm(8, 0),
            auto_close_at: None,
        };
        let s = WorkSchedule::from(row);
        assert_eq!(s.work_start, hm(9, 0));
        assert_eq!(s.auto_close_at, hm(20, 0));
    }
}
