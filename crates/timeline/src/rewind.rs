//! Backward rewind of index membership over a change log.

use rewind_primitives::{
    ChangeEvent, ChangeKind, Date, MembershipSnapshot, MonthlyState, Timeline, WindowChanges,
    fetch_window, month_end, previous_month_end,
};
use tracing::{debug, warn};

use crate::{MissingJoinerPolicy, TimelineError};

/// Reconstruct monthly index membership going back `n_months`.
///
/// Starting at `month_end(end_date)` with `current` as the membership, each step
/// records the state, then reverses every event dated in `(previous month end,
/// month end]`: leavers are re-added first, joiners are removed after. `events`
/// may be unsorted and may extend outside the reconstructed range.
///
/// # Arguments
/// * `current` - Membership at `end_date`
/// * `events` - Joiner and leaver events
/// * `end_date` - Most recent date, normalized to its month end
/// * `n_months` - Month count; the timeline holds `n_months - 1` states
///
/// # Returns
/// Timeline ordered from most recent to oldest.
///
/// # Errors
/// Returns `TimelineError::InvalidMonths` if `n_months == 0`,
/// `TimelineError::DateOutOfRange` if the history (plus one month of fetch
/// margin) reaches before the first representable date,
/// `TimelineError::EmptySnapshot` if `current` is empty while history is
/// requested, and `TimelineError::InconsistentMembership` if a joiner is
/// reversed for an instrument that is not a member.
pub fn reconstruct(
    current: &MembershipSnapshot,
    events: &[ChangeEvent],
    end_date: Date,
    n_months: u32,
) -> Result<Timeline, TimelineError> {
    rewind(current, events, end_date, n_months, MissingJoinerPolicy::Error)
}

pub(crate) fn rewind(
    current: &MembershipSnapshot,
    events: &[ChangeEvent],
    end_date: Date,
    n_months: u32,
    policy: MissingJoinerPolicy,
) -> Result<Timeline, TimelineError> {
    validate_inputs(current, end_date, n_months)?;

    let mut sorted: Vec<&ChangeEvent> = events.iter().collect();
    sorted.sort_by_key(|event| event.date);

    let mut states = Vec::new();
    let mut changes = Vec::new();

    let mut cursor_date = month_end(end_date);
    let mut cursor_members = current.clone();

    for _ in 1..n_months {
        let window_start = previous_month_end(cursor_date)
            .ok_or(TimelineError::DateOutOfRange { end_date, n_months })?;
        let window = events_in_window(&sorted, window_start, cursor_date);
        let older = rewind_window(&cursor_members, window, window_start, cursor_date, policy)?;

        debug!(
            as_of = %cursor_date,
            events = window.len(),
            members = cursor_members.len(),
            "rewound month"
        );

        changes.push(WindowChanges::between(window_start, cursor_date, &older, &cursor_members));
        states.push(MonthlyState::new(cursor_date, cursor_members));

        cursor_members = older;
        cursor_date = window_start;
    }

    Ok(Timeline::new(states, changes))
}

/// Change-log range for `n_months` back from `end_date`, checked against the calendar.
pub(crate) fn history_window(
    end_date: Date,
    n_months: u32,
) -> Result<(Date, Date), TimelineError> {
    if n_months == 0 {
        return Err(TimelineError::InvalidMonths(n_months));
    }
    fetch_window(end_date, n_months).ok_or(TimelineError::DateOutOfRange { end_date, n_months })
}

pub(crate) fn validate_inputs(
    current: &MembershipSnapshot,
    end_date: Date,
    n_months: u32,
) -> Result<(), TimelineError> {
    history_window(end_date, n_months)?;
    if n_months > 1 && current.is_empty() {
        return Err(TimelineError::EmptySnapshot { n_months });
    }
    Ok(())
}

/// Events dated in `(window_start, window_end]` from a date-sorted slice.
fn events_in_window<'a>(
    sorted: &'a [&'a ChangeEvent],
    window_start: Date,
    window_end: Date,
) -> &'a [&'a ChangeEvent] {
    let lo = sorted.partition_point(|event| event.date <= window_start);
    let hi = sorted.partition_point(|event| event.date <= window_end);
    &sorted[lo..hi.max(lo)]
}

/// Membership just before a window, given membership at its end.
fn rewind_window(
    newer: &MembershipSnapshot,
    window: &[&ChangeEvent],
    window_start: Date,
    window_end: Date,
    policy: MissingJoinerPolicy,
) -> Result<MembershipSnapshot, TimelineError> {
    let mut older = newer.clone();

    for leaver in window.iter().filter(|event| event.kind == ChangeKind::Leaver) {
        if !older.insert(leaver.instrument.clone()) {
            debug!(instrument = %leaver.instrument, date = %leaver.date, "leaver already a member");
        }
    }

    for joiner in window.iter().filter(|event| event.kind == ChangeKind::Joiner) {
        if older.remove(&joiner.instrument) {
            continue;
        }
        match policy {
            MissingJoinerPolicy::Error => {
                return Err(TimelineError::InconsistentMembership {
                    window_start,
                    window_end,
                    instrument: joiner.instrument.clone(),
                });
            }
            MissingJoinerPolicy::Skip => {
                warn!(
                    instrument = %joiner.instrument,
                    date = %joiner.date,
                    %window_start,
                    %window_end,
                    "joiner is not a member, skipping"
                );
            }
        }
    }

    Ok(older)
}

#[cfg(test)]
mod tests {
    use rewind_primitives::InstrumentId;
    use rstest::rstest;

    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    fn set(ids: &[&str]) -> MembershipSnapshot {
        ids.iter().map(|&s| InstrumentId::from(s)).collect()
    }

    #[rstest]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(13, 12)]
    fn length_is_months_minus_one(#[case] n_months: u32, #[case] expected: usize) {
        let timeline = reconstruct(&set(&["A"]), &[], d(2024, 6, 15), n_months).unwrap();
        assert_eq!(timeline.len(), expected);
        assert_eq!(timeline.changes().len(), expected);
    }

    #[test]
    fn dates_step_back_one_normalized_month() {
        let timeline = reconstruct(&set(&["A"]), &[], d(2024, 3, 31), 5).unwrap();
        let dates: Vec<Date> = timeline.iter().map(|s| s.as_of_date).collect();
        assert_eq!(dates, vec![d(2024, 3, 30), d(2024, 2, 29), d(2024, 1, 30), d(2023, 12, 30)]);
    }

    #[rstest]
    #[case(d(2024, 1, 31), d(2024, 1, 30))]
    #[case(d(2024, 2, 29), d(2024, 2, 29))]
    #[case(d(2024, 2, 1), d(2024, 2, 29))]
    fn end_date_is_normalized(#[case] end_date: Date, #[case] expected: Date) {
        let timeline = reconstruct(&set(&["A"]), &[], end_date, 2).unwrap();
        assert_eq!(timeline.latest().unwrap().as_of_date, expected);
    }

    #[test]
    fn no_events_keeps_membership() {
        let current = set(&["A", "B", "C"]);
        let timeline = reconstruct(&current, &[], d(2024, 2, 29), 12).unwrap();
        assert!(timeline.iter().all(|state| state.members == current));
        assert!(timeline.changes().iter().all(WindowChanges::is_empty));
    }

    #[test]
    fn scenario_joiner_and_leaver() {
        // D joined in February, A left in January.
        let events = vec![
            ChangeEvent::joiner(d(2024, 2, 15), "D"),
            ChangeEvent::leaver(d(2024, 1, 10), "A"),
        ];
        let timeline = reconstruct(&set(&["B", "C", "D"]), &events, d(2024, 2, 29), 4).unwrap();

        let states = timeline.states();
        assert_eq!(states.len(), 3);
        assert_eq!(states[0].as_of_date, d(2024, 2, 29));
        assert_eq!(states[0].members, set(&["B", "C", "D"]));
        assert_eq!(states[1].as_of_date, d(2024, 1, 30));
        assert_eq!(states[1].members, set(&["B", "C"]));
        assert_eq!(states[2].as_of_date, d(2023, 12, 30));
        assert_eq!(states[2].members, set(&["A", "B", "C"]));

        assert_eq!(timeline.changes()[0].joined, set(&["D"]));
        assert_eq!(timeline.changes()[1].left, set(&["A"]));
    }

    #[test]
    fn scenario_joiner_absent_from_snapshot_is_inconsistent() {
        let events = vec![
            ChangeEvent::joiner(d(2024, 2, 15), "D"),
            ChangeEvent::leaver(d(2024, 1, 10), "A"),
        ];
        let err = reconstruct(&set(&["A", "B", "C"]), &events, d(2024, 2, 29), 3).unwrap_err();

        match err {
            TimelineError::InconsistentMembership { window_start, window_end, instrument } => {
                assert_eq!(window_start, d(2024, 1, 30));
                assert_eq!(window_end, d(2024, 2, 29));
                assert_eq!(instrument.as_str(), "D");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scenario_skip_policy_tolerates_absent_joiner() {
        let events = vec![
            ChangeEvent::joiner(d(2024, 2, 15), "D"),
            ChangeEvent::leaver(d(2024, 1, 10), "A"),
        ];
        let timeline = rewind(
            &set(&["A", "B", "C"]),
            &events,
            d(2024, 2, 29),
            3,
            MissingJoinerPolicy::Skip,
        )
        .unwrap();

        assert_eq!(timeline.member_counts(), vec![(d(2024, 2, 29), 3), (d(2024, 1, 30), 3)]);
        assert_eq!(timeline.states()[1].members, set(&["A", "B", "C"]));
    }

    #[test]
    fn event_on_window_start_belongs_to_older_window() {
        // 2024-01-30 is the lower bound of the February window.
        let events = vec![ChangeEvent::leaver(d(2024, 1, 30), "X")];
        let timeline = reconstruct(&set(&["A"]), &events, d(2024, 2, 29), 4).unwrap();

        let states = timeline.states();
        assert!(!states[0].contains("X"));
        assert!(!states[1].contains("X"), "boundary event must not affect the February window");
        assert!(states[2].contains("X"));
        assert_eq!(states[2].as_of_date, d(2023, 12, 30));
    }

    #[test]
    fn event_on_window_end_belongs_to_that_window() {
        let events = vec![ChangeEvent::joiner(d(2024, 2, 29), "X")];
        let timeline = reconstruct(&set(&["A", "X"]), &events, d(2024, 2, 29), 3).unwrap();
        assert!(timeline.states()[0].contains("X"));
        assert!(!timeline.states()[1].contains("X"));
    }

    #[test]
    fn joined_and_left_in_one_window_is_absent_before() {
        let events = vec![
            ChangeEvent::joiner(d(2024, 2, 5), "X"),
            ChangeEvent::leaver(d(2024, 2, 20), "X"),
        ];
        let timeline = reconstruct(&set(&["A"]), &events, d(2024, 2, 29), 3).unwrap();
        assert_eq!(timeline.states()[1].members, set(&["A"]));
    }

    #[test]
    fn left_and_rejoined_in_one_window_is_absent_before() {
        // Removal wins when both directions fire for the same id.
        let events = vec![
            ChangeEvent::leaver(d(2024, 2, 5), "X"),
            ChangeEvent::joiner(d(2024, 2, 20), "X"),
        ];
        let timeline = reconstruct(&set(&["A", "X"]), &events, d(2024, 2, 29), 3).unwrap();
        assert_eq!(timeline.states()[0].members, set(&["A", "X"]));
        assert_eq!(timeline.states()[1].members, set(&["A"]));
    }

    #[test]
    fn duplicate_joiner_is_inconsistent() {
        let events =
            vec![ChangeEvent::joiner(d(2024, 2, 5), "X"), ChangeEvent::joiner(d(2024, 2, 6), "X")];
        let err = reconstruct(&set(&["A", "X"]), &events, d(2024, 2, 29), 2).unwrap_err();
        assert!(matches!(err, TimelineError::InconsistentMembership { .. }));
    }

    #[test]
    fn unsorted_and_out_of_range_events() {
        let events = vec![
            ChangeEvent::joiner(d(2030, 1, 5), "FUTURE"),
            ChangeEvent::leaver(d(2023, 12, 1), "B"),
            ChangeEvent::joiner(d(2024, 2, 1), "C"),
            ChangeEvent::leaver(d(1999, 1, 1), "ANCIENT"),
        ];
        let timeline = reconstruct(&set(&["A", "C"]), &events, d(2024, 2, 29), 4).unwrap();
        let members: Vec<_> = timeline.iter().map(|s| s.members.clone()).collect();
        assert_eq!(members, vec![set(&["A", "C"]), set(&["A"]), set(&["A"])]);
    }

    #[test]
    fn zero_months_is_rejected() {
        let err = reconstruct(&set(&["A"]), &[], d(2024, 2, 29), 0).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidMonths(0)));
    }

    #[test]
    fn history_before_calendar_floor_is_rejected() {
        let end_date = Date::MIN + chrono::Days::new(40);
        let err = reconstruct(&set(&["A"]), &[], end_date, 4).unwrap_err();
        assert!(matches!(err, TimelineError::DateOutOfRange { n_months: 4, .. }));
    }

    #[test]
    fn month_count_beyond_calendar_is_rejected() {
        let err = reconstruct(&set(&["A"]), &[], d(2024, 2, 29), u32::MAX).unwrap_err();
        assert!(matches!(err, TimelineError::DateOutOfRange { n_months: u32::MAX, .. }));
    }

    #[test]
    fn history_near_calendar_floor_steps_strictly_back() {
        let end_date = Date::MIN + chrono::Days::new(200);
        let timeline = reconstruct(&set(&["A"]), &[], end_date, 4).unwrap();
        let dates: Vec<Date> = timeline.iter().map(|s| s.as_of_date).collect();
        assert_eq!(dates.len(), 3);
        assert!(dates.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn empty_snapshot_with_history_is_rejected() {
        let err = reconstruct(&set(&[]), &[], d(2024, 2, 29), 2).unwrap_err();
        assert!(matches!(err, TimelineError::EmptySnapshot { n_months: 2 }));
    }

    #[test]
    fn empty_snapshot_without_history_is_allowed() {
        let timeline = reconstruct(&set(&[]), &[], d(2024, 2, 29), 1).unwrap();
        assert!(timeline.is_empty());
    }

    #[test]
    fn input_snapshot_is_not_mutated() {
        let current = set(&["A", "X"]);
        let events = vec![ChangeEvent::joiner(d(2024, 2, 20), "X")];
        let _ = reconstruct(&current, &events, d(2024, 2, 29), 3).unwrap();
        assert_eq!(current, set(&["A", "X"]));
    }

    #[test]
    fn replay_reproduces_latest_membership() {
        let events = vec![
            ChangeEvent::joiner(d(2024, 2, 15), "D"),
            ChangeEvent::leaver(d(2024, 1, 10), "A"),
            ChangeEvent::joiner(d(2023, 11, 3), "B"),
        ];
        let current = set(&["B", "C", "D"]);
        let timeline = reconstruct(&current, &events, d(2024, 2, 29), 6).unwrap();
        assert_eq!(timeline.replay_forward(), Some(current));
    }
}
