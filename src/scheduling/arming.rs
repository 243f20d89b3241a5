use chrono::{Datelike, NaiveDateTime, NaiveTime, TimeDelta};

use crate::reminder::Reminder;

/// Outcome of evaluating whether a reminder should be armed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmDecision {
    Arm {
        initial_countdown: i64,
        interval_seconds: i64,
    },
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotScheduledToday,
    EndTimePassed,
}

/// Decides how to arm `reminder` at the instant `now`.
///
/// The weekday gate uses the evaluation day; start and end times are the
/// reminder's times-of-day recombined with that same day. A sub-second
/// remainder until the start rounds up to the next whole second, so the
/// seed does not lose a tick to truncation. When the start has already
/// passed, the countdown is seeded with a full rearm interval.
pub fn evaluate_arm(reminder: &Reminder, now: NaiveDateTime) -> ArmDecision {
    if !reminder.fires_on(now.weekday()) {
        return ArmDecision::Skip(SkipReason::NotScheduledToday);
    }

    if let Some(end) = reminder.end_time {
        if now > now.date().and_time(end) {
            return ArmDecision::Skip(SkipReason::EndTimePassed);
        }
    }

    let start = now.date().and_time(reminder.start_time);
    let interval_seconds = reminder.interval_seconds();
    let until_start = seconds_until(start, now);
    let initial_countdown = if until_start == 0 {
        interval_seconds
    } else {
        until_start
    };

    ArmDecision::Arm {
        initial_countdown,
        interval_seconds,
    }
}

/// Whole seconds from `now` until `start`, rounded up; zero once the
/// start has passed.
fn seconds_until(start: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let delta = start - now;
    if delta <= TimeDelta::zero() {
        return 0;
    }
    let mut seconds = delta.num_seconds();
    if delta.subsec_nanos() > 0 {
        seconds += 1;
    }
    seconds
}

/// What one tick did to an armed reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub countdown: i64,
    pub fired: bool,
    pub disarm: bool,
}

/// Advances an armed countdown by one second: decrement, fire-and-reset at
/// zero, then check the end-time boundary. A fire and a disarm can happen
/// on the same tick, in that order.
pub fn apply_tick(
    countdown: i64,
    interval_seconds: i64,
    end_time: Option<NaiveTime>,
    now: NaiveDateTime,
) -> TickOutcome {
    let mut countdown = countdown - 1;
    let fired = countdown <= 0;
    if fired {
        countdown = interval_seconds;
    }

    let disarm = end_time.is_some_and(|end| now > now.date().and_time(end));

    TickOutcome {
        countdown,
        fired,
        disarm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::reminder::RepeatUnit;
    use chrono::{NaiveDate, Weekday};
    use proptest::prelude::*;

    fn reminder(start: NaiveTime) -> Reminder {
        Reminder {
            id: 1,
            title: "stretch".to_string(),
            start_time: start,
            end_time: None,
            repeat_every: "10".to_string(),
            repeat_unit: RepeatUnit::Second,
            repeat_days: vec![],
            active: true,
            countdown: 0,
            tasks: vec![],
        }
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        // 2025-06-01 is a Sunday.
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, s).unwrap())
    }

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn future_start_counts_down_to_the_start() {
        let decision = evaluate_arm(&reminder(time(12, 0, 5)), at(12, 0, 0));
        assert_eq!(
            decision,
            ArmDecision::Arm {
                initial_countdown: 5,
                interval_seconds: 10
            }
        );
    }

    #[test]
    fn sub_second_gap_to_the_start_rounds_up() {
        // Evaluated 300ms into the second: 4.7s to go still counts as 5.
        let now = at(12, 0, 0) + TimeDelta::milliseconds(300);
        let decision = evaluate_arm(&reminder(time(12, 0, 5)), now);
        assert_eq!(
            decision,
            ArmDecision::Arm {
                initial_countdown: 5,
                interval_seconds: 10
            }
        );
    }

    #[test]
    fn passed_start_seeds_countdown_with_the_interval() {
        let decision = evaluate_arm(&reminder(time(8, 0, 0)), at(12, 0, 0));
        assert_eq!(
            decision,
            ArmDecision::Arm {
                initial_countdown: 10,
                interval_seconds: 10
            }
        );
    }

    #[test]
    fn wrong_weekday_skips_arming() {
        let mut r = reminder(time(12, 0, 5));
        r.repeat_days = vec![Weekday::Mon, Weekday::Fri];
        assert_eq!(
            evaluate_arm(&r, at(12, 0, 0)),
            ArmDecision::Skip(SkipReason::NotScheduledToday)
        );
    }

    #[test]
    fn listed_weekday_arms() {
        let mut r = reminder(time(12, 0, 5));
        r.repeat_days = vec![Weekday::Sun];
        assert!(matches!(
            evaluate_arm(&r, at(12, 0, 0)),
            ArmDecision::Arm { .. }
        ));
    }

    #[test]
    fn passed_end_time_skips_arming() {
        let mut r = reminder(time(8, 0, 0));
        r.end_time = Some(time(11, 0, 0));
        assert_eq!(
            evaluate_arm(&r, at(12, 0, 0)),
            ArmDecision::Skip(SkipReason::EndTimePassed)
        );
    }

    #[test]
    fn end_time_still_ahead_arms() {
        let mut r = reminder(time(8, 0, 0));
        r.end_time = Some(time(18, 0, 0));
        assert!(matches!(
            evaluate_arm(&r, at(12, 0, 0)),
            ArmDecision::Arm { .. }
        ));
    }

    #[test]
    fn unparseable_magnitude_arms_with_zero_interval() {
        let mut r = reminder(time(8, 0, 0));
        r.repeat_every = "soon".to_string();
        assert_eq!(
            evaluate_arm(&r, at(12, 0, 0)),
            ArmDecision::Arm {
                initial_countdown: 0,
                interval_seconds: 0
            }
        );
    }

    #[test]
    fn tick_decrements_without_firing() {
        let outcome = apply_tick(5, 10, None, at(12, 0, 0));
        assert_eq!(
            outcome,
            TickOutcome {
                countdown: 4,
                fired: false,
                disarm: false
            }
        );
    }

    #[test]
    fn tick_at_zero_fires_and_resets_to_the_interval() {
        let outcome = apply_tick(1, 10, None, at(12, 0, 0));
        assert_eq!(
            outcome,
            TickOutcome {
                countdown: 10,
                fired: true,
                disarm: false
            }
        );
    }

    #[test]
    fn zero_interval_refires_every_tick() {
        let outcome = apply_tick(0, 0, None, at(12, 0, 0));
        assert_eq!(
            outcome,
            TickOutcome {
                countdown: 0,
                fired: true,
                disarm: false
            }
        );
    }

    #[test]
    fn crossing_end_time_disarms_after_the_boundary() {
        let end = Some(time(12, 0, 0));
        let before = apply_tick(5, 10, end, at(11, 59, 59));
        assert!(!before.disarm);
        let boundary = apply_tick(4, 10, end, at(12, 0, 0));
        assert!(!boundary.disarm);
        let after = apply_tick(3, 10, end, at(12, 0, 1));
        assert!(after.disarm);
    }

    #[test]
    fn fire_and_disarm_can_land_on_the_same_tick() {
        let outcome = apply_tick(1, 10, Some(time(12, 0, 0)), at(12, 0, 1));
        assert!(outcome.fired);
        assert!(outcome.disarm);
    }

    fn time_strategy() -> impl Strategy<Value = NaiveTime> {
        (0u32..24, 0u32..60, 0u32..60).prop_map(|(h, m, s)| NaiveTime::from_hms_opt(h, m, s).unwrap())
    }

    proptest! {
        #[test]
        fn initial_countdown_is_never_negative(
            start in time_strategy(),
            now in time_strategy(),
        ) {
            let r = reminder(start);
            let now = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_time(now);
            if let ArmDecision::Arm { initial_countdown, .. } = evaluate_arm(&r, now) {
                prop_assert!(initial_countdown >= 0);
                prop_assert!(initial_countdown <= 86400);
            }
        }

        #[test]
        fn ticked_countdown_is_never_negative(
            countdown in 0i64..=i64::MAX,
            interval in 0i64..=i64::MAX,
        ) {
            let outcome = apply_tick(countdown, interval, None, at(12, 0, 0));
            prop_assert!(outcome.countdown >= 0);
        }
    }
}
