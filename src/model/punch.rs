use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Declared direction of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
        }
    }
}

/// Where a punch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PunchSource {
    Device,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PunchEvent {
    #[schema(example = 42)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2026-01-05T08:00:00", value_type = String, format = "date-time")]
    pub event_time: NaiveDateTime,

    pub direction: Direction,
    pub source: PunchSource,

    /// First direction ever declared for this punch, set on the first correction only.
    pub original_direction: Option<Direction>,
    pub direction_corrected: bool,
    pub correction_note: Option<String>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub corrected_at: Option<DateTime<Utc>>,
    pub corrected_by: Option<String>,
}

impl PunchEvent {
    /// A fresh, never-corrected punch.
    pub fn new(
        id: u64,
        employee_id: u64,
        event_time: NaiveDateTime,
        direction: Direction,
        source: PunchSource,
    ) -> Self {
        Self {
            id,
            employee_id,
            event_time,
            direction,
            source,
            original_direction: None,
            direction_corrected: false,
            correction_note: None,
            corrected_at: None,
            corrected_by: None,
        }
    }

    pub fn is_manual(&self) -> bool {
        self.source == PunchSource::Manual
    }
}

/// Raw `punches` row; enum columns are stored as text.
#[derive(Debug, sqlx::FromRow)]
pub struct PunchRow {
    pub id: u64,
    pub employee_id: u64,
    pub event_time: NaiveDateTime,
    pub direction: String,
    pub source: String,
    pub original_direction: Option<String>,
    pub direction_corrected: bool,
    pub correction_note: Option<String>,
    pub corrected_at: Option<DateTime<Utc>>,
    pub corrected_by: Option<String>,
}

impl TryFrom<PunchRow> for PunchEvent {
    type Error = strum::ParseError;

    fn try_from(row: PunchRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            employee_id: row.employee_id,
            event_time: row.event_time,
            direction: row.direction.parse()?,
            source: row.source.parse()?,
            original_direction: row
                .original_direction
                .as_deref()
                .map(str::parse)
                .transpose()?,
            direction_corrected: row.direction_corrected,
            correction_note: row.correction_note,
            corrected_at: row.corrected_at,
            corrected_by: row.corrected_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_and_source_use_stored_spelling() {
        assert_eq!(Direction::In.to_string(), "IN");
        assert_eq!("OUT".parse::<Direction>().unwrap(), Direction::Out);
        assert_eq!(PunchSource::Manual.to_string(), "manual");
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn row_with_bad_direction_is_rejected() {
        let row = PunchRow {
            id: 1,
            employee_id: 7,
            event_time: chrono::NaiveDate::from_ymd_opt(2026, 1, 5)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            direction: "UP".into(),
            source: "device".into(),
            original_direction: None,
            direction_corrected: false,
            correction_note: None,
            corrected_at: None,
            corrected_by: None,
        };
        assert!(PunchEvent::try_from(row).is_err());
    }
}
