use chrono::NaiveDateTime;

use crate::model::{DayWindows, Direction, PunchEvent};

/// A closed `[start, end)` stretch between an IN and its OUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct Periods {
    pub periods: Vec<Period>,
    /// A trailing IN was closed at the auto-close cutoff.
    pub auto_closed: bool,
}

/// Pairs each IN with the OUT that follows it. Expects normalized input.
pub fn build_periods(events: &[PunchEvent], windows: &DayWindows) -> Periods {
    let mut periods = Vec::new();
    let mut pending: Option<NaiveDateTime> = None;

    for event in events {
        match event.direction {
            Direction::In => pending = Some(event.event_time),
            Direction::Out => {
                if let Some(start) = pending.take() {
                    if event.event_time > start {
                        periods.push(Period {
                            start,
                            end: event.event_time,
                        });
                    }
                }
            }
        }
    }

    let mut auto_closed = false;
    if let Some(start) = pending {
        auto_closed = true;
        if windows.auto_close_at > start {
            periods.push(Period {
                start,
                end: windows.auto_close_at,
            });
        }
    }

    Periods {
        periods,
        auto_closed,
    }
}
