//! Forces a day's punches into strict IN, OUT, IN, OUT alternation.

use crate::model::{Direction, PunchEvent};

#[derive(Debug, Clone)]
pub struct Normalized {
    /// Same punches, same order, directions coerced.
    pub events: Vec<PunchEvent>,
    /// True when at least one direction was rewritten.
    pub adjusted: bool,
}

/// Greedy single pass: the n-th punch of the day is IN when n is even, OUT
/// otherwise. Nothing is dropped, and the source of a punch plays no part.
///
/// `events` must already be sorted by `event_time`.
pub fn normalize(events: &[PunchEvent]) -> Normalized {
    let mut expected = Direction::In;
    let mut adjusted = false;

    let events = events
        .iter()
        .map(|event| {
            let mut event = event.clone();
            if event.direction != expected {
                event.direction = expected;
                adjusted = true;
            }
            expected = expected.flipped();
            event
        })
        .collect();

    Normalized { events, adjusted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PunchSource;
    use chrono::NaiveDate;

    fn punch(id: u64, h: u32, m: u32, direction: Direction) -> PunchEvent {
        let at = NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap();
        PunchEvent::new(id, 1, at, direction, PunchSource::Device)
    }

    fn directions(events: &[PunchEvent]) -> Vec<Direction> {
        events.iter().map(|e| e.direction).collect()
    }

    #[test]
    fn well_formed_day_is_untouched() {
        let input = vec![
            punch(1, 8, 0, Direction::In),
            punch(2, 12, 0, Direction::Out),
            punch(3, 13, 0, Direction::In),
            punch(4, 16, 30, Direction::Out),
        ];
        let out = normalize(&input);
        assert!(!out.adjusted);
        assert_eq!(out.events, input);
    }

    #[test]
    fn double_in_becomes_in_out() {
        let out = normalize(&[punch(1, 8, 0, Direction::In), punch(2, 9, 0, Direction::In)]);
        assert!(out.adjusted);
        assert_eq!(directions(&out.events), vec![Direction::In, Direction::Out]);
    }

    #[test]
    fn leading_out_is_relabelled_not_dropped() {
        let out = normalize(&[
            punch(1, 7, 55, Direction::Out),
            punch(2, 8, 0, Direction::Out),
            punch(3, 9, 0, Direction::Out),
        ]);
        assert!(out.adjusted);
        assert_eq!(out.events.len(), 3);
        assert_eq!(
            directions(&out.events),
            vec![Direction::In, Direction::Out, Direction::In]
        );
        assert_eq!(out.events[0].id, 1);
    }

    #[test]
    fn output_always_alternates_from_in() {
        let patterns: [&[Direction]; 4] = [
            &[Direction::Out; 5],
            &[Direction::In; 6],
            &[Direction::In, Direction::In, Direction::Out, Direction::Out, Direction::In],
            &[Direction::Out, Direction::In],
        ];

        for pattern in patterns {
            let input: Vec<_> = pattern
                .iter()
                .enumerate()
                .map(|(i, d)| punch(i as u64, 8 + i as u32, 0, *d))
                .collect();
            let out = normalize(&input);
            for (i, event) in out.events.iter().enumerate() {
                let want = if i % 2 == 0 { Direction::In } else { Direction::Out };
                assert_eq!(event.direction, want);
            }
        }
    }

    #[test]
    fn empty_day_is_not_adjusted() {
        let out = normalize(&[]);
        assert!(out.events.is_empty());
        assert!(!out.adjusted);
    }
}
