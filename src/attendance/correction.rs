//! Direction corrections: what changed, and how each punch row records it.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::model::{Direction, PunchEvent, PunchSource};

/// One stored punch whose direction disagrees with the normalized sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunchCorrection {
    pub punch_id: u64,
    pub employee_id: u64,
    pub event_time: NaiveDateTime,
    pub source: PunchSource,
    pub from: Direction,
    pub to: Direction,
}

impl PunchCorrection {
    /// Does `other` already carry the signature this punch would take on?
    pub fn collides_with(&self, other: &PunchEvent) -> bool {
        other.id != self.punch_id
            && other.employee_id == self.employee_id
            && other.event_time == self.event_time
            && other.direction == self.to
            && other.source == self.source
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionOutcome {
    Flipped,
    SkippedCollision,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionReport {
    pub flipped: usize,
    pub skipped: usize,
}

impl CorrectionReport {
    pub fn record(&mut self, outcome: CorrectionOutcome) {
        match outcome {
            CorrectionOutcome::Flipped => self.flipped += 1,
            CorrectionOutcome::SkippedCollision => self.skipped += 1,
        }
    }
}

/// Compares stored punches with their normalized counterparts, position by position.
pub fn diff_corrections(stored: &[PunchEvent], normalized: &[PunchEvent]) -> Vec<PunchCorrection> {
    stored
        .iter()
        .zip(normalized)
        .filter(|(before, after)| before.direction != after.direction)
        .map(|(before, after)| PunchCorrection {
            punch_id: before.id,
            employee_id: before.employee_id,
            event_time: before.event_time,
            source: before.source,
            from: before.direction,
            to: after.direction,
        })
        .collect()
}

fn append_note(existing: Option<&str>, line: String) -> String {
    match existing {
        Some(prev) if !prev.is_empty() => format!("{prev}\n{line}"),
        _ => line,
    }
}

/// The row as it should be written back for `correction`.
///
/// `current` is the punch as read inside the correcting transaction.
pub fn apply_correction(
    current: &PunchEvent,
    correction: &PunchCorrection,
    collides: bool,
    actor: &str,
    now: DateTime<Utc>,
) -> (PunchEvent, CorrectionOutcome) {
    let stamp = now.format("%Y-%m-%d %H:%M:%S");
    let mut updated = current.clone();

    let outcome = if collides {
        updated.correction_note = Some(append_note(
            current.correction_note.as_deref(),
            format!(
                "[{stamp}] normalize {}->{} skipped: duplicate punch already exists",
                correction.from, correction.to
            ),
        ));
        CorrectionOutcome::SkippedCollision
    } else {
        updated.direction = correction.to;
        updated.original_direction = current.original_direction.or(Some(current.direction));
        updated.correction_note = Some(append_note(
            current.correction_note.as_deref(),
            format!("[{stamp}] normalized {}->{}", correction.from, correction.to),
        ));
        CorrectionOutcome::Flipped
    };

    updated.direction_corrected = true;
    updated.corrected_at = Some(now);
    updated.corrected_by = Some(actor.to_string());

    (updated, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::normalizer::normalize;
    use chrono::{NaiveDate, TimeZone};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 21, 0, 0).unwrap()
    }

    fn punch(id: u64, h: u32, direction: Direction) -> PunchEvent {
        PunchEvent::new(id, 1, at(h, 0), direction, PunchSource::Device)
    }

    #[test]
    fn diff_lists_only_changed_punches() {
        let stored = vec![
            punch(1, 8, Direction::In),
            punch(2, 9, Direction::In),
            punch(3, 12, Direction::In),
        ];
        let normalized = normalize(&stored).events;
        let diff = diff_corrections(&stored, &normalized);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].punch_id, 2);
        assert_eq!(diff[0].from, Direction::In);
        assert_eq!(diff[0].to, Direction::Out);
    }

    #[test]
    fn first_correction_keeps_original_direction() {
        let current = punch(2, 9, Direction::In);
        let stored = vec![punch(1, 8, Direction::In), current.clone()];
        let diff = diff_corrections(&stored, &normalize(&stored).events);

        let (updated, outcome) = apply_correction(&current, &diff[0], false, "system", now());
        assert_eq!(outcome, CorrectionOutcome::Flipped);
        assert_eq!(updated.direction, Direction::Out);
        assert_eq!(updated.original_direction, Some(Direction::In));
        assert!(updated.direction_corrected);
        assert_eq!(updated.corrected_by.as_deref(), Some("system"));
        assert_eq!(
            updated.correction_note.as_deref(),
            Some("[2026-01-05 21:00:00] normalized IN->OUT")
        );
    }

    #[test]
    fn second_correction_does_not_touch_original_direction() {
        let mut current = punch(2, 9, Direction::Out);
        current.original_direction = Some(Direction::In);
        current.correction_note = Some("earlier".into());

        let correction = PunchCorrection {
            punch_id: 2,
            employee_id: 1,
            event_time: at(9, 0),
            source: PunchSource::Device,
            from: Direction::Out,
            to: Direction::In,
        };
        let (updated, _) = apply_correction(&current, &correction, false, "hr-bot", now());
        assert_eq!(updated.direction, Direction::In);
        assert_eq!(updated.original_direction, Some(Direction::In));
        assert_eq!(
            updated.correction_note.as_deref(),
            Some("earlier\n[2026-01-05 21:00:00] normalized OUT->IN")
        );
    }

    #[test]
    fn collision_keeps_direction_but_marks_row() {
        let current = punch(2, 9, Direction::In);
        let twin = PunchEvent::new(5, 1, at(9, 0), Direction::Out, PunchSource::Device);
        let correction = PunchCorrection {
            punch_id: 2,
            employee_id: 1,
            event_time: at(9, 0),
            source: PunchSource::Device,
            from: Direction::In,
            to: Direction::Out,
        };
        assert!(correction.collides_with(&twin));
        assert!(!correction.collides_with(&current));

        let (updated, outcome) = apply_correction(&current, &correction, true, "system", now());
        assert_eq!(outcome, CorrectionOutcome::SkippedCollision);
        assert_eq!(updated.direction, Direction::In);
        assert_eq!(updated.original_direction, None);
        assert!(updated.direction_corrected);
        assert!(updated.corrected_at.is_some());
        assert!(
            updated
                .correction_note
                .as_deref()
                .unwrap()
                .contains("skipped: duplicate punch")
        );
    }

    #[test]
    fn collision_requires_same_source() {
        let twin = PunchEvent::new(5, 1, at(9, 0), Direction::Out, PunchSource::Manual);
        let correction = PunchCorrection {
            punch_id: 2,
            employee_id: 1,
            event_time: at(9, 0),
            source: PunchSource::Device,
            from: Direction::In,
            to: Direction::Out,
        };
        assert!(!correction.collides_with(&twin));
    }
}
