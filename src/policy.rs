//! Rotation schedule for keys with an expiry.
//!
//! A key is due for rotation [`ROTATION_LEAD_TIME`] before it expires, and
//! overdue once [`OVERDUE_GRACE_PERIOD`] has passed since then. Separately, an
//! expiry is too long when it lies past [`latest_acceptable_expiry`].

use jiff::{tz::TimeZone, SignedDuration, Timestamp};
use snafu::{ensure, ResultExt, Snafu};

const SECONDS_PER_DAY: i64 = 86_400;

const fn days(days: i64) -> SignedDuration {
    SignedDuration::from_secs(days * SECONDS_PER_DAY)
}

/// How long before expiry a key should be rotated
pub const ROTATION_LEAD_TIME: SignedDuration = days(30);

/// How long after the rotation time a key counts as overdue
pub const OVERDUE_GRACE_PERIOD: SignedDuration = days(10);

/// Distance from the start of the current month used to find the next month
pub const CEILING_LOOKAHEAD: SignedDuration = days(45);

/// Added to the first of next month to get the latest acceptable expiry
pub const CEILING_GRACE_PERIOD: SignedDuration = days(30);

#[derive(Debug, Snafu)]
pub enum PolicyError {
    #[snafu(display("days until expiry requested, but {expiry} has already passed at {now}"))]
    AlreadyExpired { expiry: Timestamp, now: Timestamp },
    #[snafu(display("days since expiry requested, but {expiry} is still ahead of {now}"))]
    NotYetExpired { expiry: Timestamp, now: Timestamp },
    #[snafu(display("computing month boundary from {timestamp}"))]
    Calendar {
        timestamp: Timestamp,
        source: jiff::Error,
    },
}

/// Where a key with an expiry stands in its rotation schedule.
///
/// Only the most severe state applies: expired, then overdue, then due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationState {
    /// Rotation time has passed
    Due,
    /// More than [`OVERDUE_GRACE_PERIOD`] past the rotation time
    Overdue { days_until_expiry: u64 },
    /// Expiry has passed
    Expired { days_since_expiry: u64 },
}

/// 30 days before the expiry
pub fn next_rotation_time(expiry: Timestamp) -> Timestamp {
    expiry.saturating_sub(ROTATION_LEAD_TIME)
}

pub fn is_expired(expiry: Timestamp, now: Timestamp) -> bool {
    expiry < now
}

/// `now` is more than 10 days after `next_rotation`
pub fn is_overdue_for_rotation(next_rotation: Timestamp, now: Timestamp) -> bool {
    next_rotation.saturating_add(OVERDUE_GRACE_PERIOD) < now
}

/// `now` is any time after `next_rotation`
pub fn is_due_for_rotation(next_rotation: Timestamp, now: Timestamp) -> bool {
    next_rotation < now
}

/// Classify `expiry` at `now`, `None` while the key is comfortably inside its
/// rotation window.
pub fn rotation_state(
    expiry: Timestamp,
    now: Timestamp,
) -> Result<Option<RotationState>, PolicyError> {
    let next_rotation = next_rotation_time(expiry);

    let state = if is_expired(expiry, now) {
        Some(RotationState::Expired {
            days_since_expiry: days_since(expiry, now)?,
        })
    } else if is_overdue_for_rotation(next_rotation, now) {
        Some(RotationState::Overdue {
            days_until_expiry: days_until(expiry, now)?,
        })
    } else if is_due_for_rotation(next_rotation, now) {
        Some(RotationState::Due)
    } else {
        None
    };

    Ok(state)
}

/// Whole 24-hour periods left until `expiry`
pub fn days_until(expiry: Timestamp, now: Timestamp) -> Result<u64, PolicyError> {
    let remaining = expiry.duration_since(now);
    ensure!(!remaining.is_negative(), AlreadyExpiredSnafu { expiry, now });
    Ok(whole_days(remaining))
}

/// Whole 24-hour periods elapsed since `expiry`
pub fn days_since(expiry: Timestamp, now: Timestamp) -> Result<u64, PolicyError> {
    let elapsed = now.duration_since(expiry);
    ensure!(!elapsed.is_negative(), NotYetExpiredSnafu { expiry, now });
    Ok(whole_days(elapsed))
}

fn whole_days(duration: SignedDuration) -> u64 {
    (duration.as_secs() / SECONDS_PER_DAY).unsigned_abs()
}

/// Latest expiry which is not considered too long at `now`:
/// 30 days after the 1st of next month.
///
/// If today is 15th September, this is 1st October + 30 days. The value stays
/// the same for a whole calendar month, so an expiry set to it is never flagged
/// right away and can only get shorter after that point.
pub fn latest_acceptable_expiry(now: Timestamp) -> Result<Timestamp, PolicyError> {
    let first_of_next_month = first_of_next_month(now)?;
    first_of_next_month
        .checked_add(CEILING_GRACE_PERIOD)
        .context(CalendarSnafu {
            timestamp: first_of_next_month,
        })
}

/// `expiry` lies past [`latest_acceptable_expiry`]
pub fn is_expiry_too_long(expiry: Timestamp, now: Timestamp) -> Result<bool, PolicyError> {
    Ok(expiry > latest_acceptable_expiry(now)?)
}

fn first_of_next_month(now: Timestamp) -> Result<Timestamp, PolicyError> {
    let first_of_this_month = beginning_of_month(now)?;
    let ahead = first_of_this_month
        .checked_add(CEILING_LOOKAHEAD)
        .context(CalendarSnafu {
            timestamp: first_of_this_month,
        })?;
    beginning_of_month(ahead)
}

fn beginning_of_month(timestamp: Timestamp) -> Result<Timestamp, PolicyError> {
    let zoned = timestamp
        .to_zoned(TimeZone::UTC)
        .date()
        .first_of_month()
        .to_zoned(TimeZone::UTC)
        .context(CalendarSnafu { timestamp })?;
    Ok(zoned.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn now() -> Timestamp {
        ts("2018-09-15T12:00:00Z")
    }

    mod schedule {
        use super::*;

        #[test]
        fn rotation_is_thirty_days_before_expiry() {
            assert_eq!(
                next_rotation_time(ts("2018-10-31T00:00:00Z")),
                ts("2018-10-01T00:00:00Z")
            );
        }

        #[test]
        fn expired_is_strictly_before_now() {
            assert!(is_expired(ts("2018-09-15T11:59:59Z"), now()));
            assert!(!is_expired(now(), now()));
        }

        #[test]
        fn overdue_implies_due() {
            let candidates = [-40, -20, -11, -10, -5, -1, 0, 1, 5, 10, 30];
            for offset in candidates {
                let next_rotation = now().saturating_add(days(offset));
                if is_overdue_for_rotation(next_rotation, now()) {
                    assert!(is_due_for_rotation(next_rotation, now()), "offset {offset}");
                }
            }
        }

        #[test]
        fn overdue_boundary_is_exclusive() {
            let exactly_ten_days = now().saturating_sub(OVERDUE_GRACE_PERIOD);
            assert!(!is_overdue_for_rotation(exactly_ten_days, now()));
            assert!(is_due_for_rotation(exactly_ten_days, now()));

            let one_second_more =
                exactly_ten_days.saturating_sub(SignedDuration::from_secs(1));
            assert!(is_overdue_for_rotation(one_second_more, now()));
        }
    }

    mod state {
        use super::*;

        #[test]
        fn far_expiry_has_no_state() {
            let expiry = now().saturating_add(days(31));
            assert_eq!(rotation_state(expiry, now()).unwrap(), None);
        }

        #[test]
        fn inside_rotation_window_is_due() {
            let expiry = now().saturating_add(days(25));
            assert_eq!(
                rotation_state(expiry, now()).unwrap(),
                Some(RotationState::Due)
            );
        }

        #[test]
        fn past_grace_period_is_overdue() {
            let expiry = now().saturating_add(days(19));
            assert_eq!(
                rotation_state(expiry, now()).unwrap(),
                Some(RotationState::Overdue {
                    days_until_expiry: 19
                })
            );
        }

        #[test]
        fn expiry_at_now_is_overdue_with_zero_days() {
            assert_eq!(
                rotation_state(now(), now()).unwrap(),
                Some(RotationState::Overdue {
                    days_until_expiry: 0
                })
            );
        }

        #[test]
        fn past_expiry_is_expired() {
            let expiry = now().saturating_sub(days(40));
            assert_eq!(
                rotation_state(expiry, now()).unwrap(),
                Some(RotationState::Expired {
                    days_since_expiry: 40
                })
            );
        }
    }

    mod day_counts {
        use super::*;

        #[test]
        fn partial_days_are_truncated() {
            let expiry = now().saturating_add(SignedDuration::from_hours(24 * 3 + 23));
            assert_eq!(days_until(expiry, now()).unwrap(), 3);

            let expiry = now().saturating_sub(SignedDuration::from_hours(47));
            assert_eq!(days_since(expiry, now()).unwrap(), 1);
        }

        #[test]
        fn only_one_direction_is_valid() {
            let future = now().saturating_add(days(2));
            assert_eq!(days_until(future, now()).unwrap(), 2);
            assert!(matches!(
                days_since(future, now()),
                Err(PolicyError::NotYetExpired { expiry, .. }) if expiry == future
            ));

            let past = now().saturating_sub(days(2));
            assert_eq!(days_since(past, now()).unwrap(), 2);
            assert!(matches!(
                days_until(past, now()),
                Err(PolicyError::AlreadyExpired { expiry, .. }) if expiry == past
            ));
        }

        #[test]
        fn one_second_in_the_past_is_already_expired() {
            let past = now().saturating_sub(SignedDuration::from_secs(1));
            assert!(days_until(past, now()).is_err());
        }

        #[test]
        fn error_message_names_both_instants() {
            let past = ts("2018-09-01T00:00:00Z");
            let err = days_until(past, now()).unwrap_err();
            assert_eq!(
                err.to_string(),
                "days until expiry requested, but 2018-09-01T00:00:00Z has already passed at 2018-09-15T12:00:00Z"
            );
        }
    }

    mod ceiling {
        use super::*;

        #[test]
        fn middle_of_month() {
            assert_eq!(
                latest_acceptable_expiry(now()).unwrap(),
                ts("2018-10-31T00:00:00Z")
            );
        }

        #[test]
        fn stable_for_a_whole_month() {
            let expected = ts("2018-10-31T00:00:00Z");
            for now in ["2018-09-01T00:00:00Z", "2018-09-30T23:59:59Z"] {
                assert_eq!(latest_acceptable_expiry(ts(now)).unwrap(), expected);
            }
        }

        #[test]
        fn january_skips_over_short_february() {
            assert_eq!(
                latest_acceptable_expiry(ts("2018-01-31T10:00:00Z")).unwrap(),
                ts("2018-03-03T00:00:00Z")
            );
        }

        #[test]
        fn december_rolls_over_the_year() {
            assert_eq!(
                latest_acceptable_expiry(ts("2018-12-20T00:00:00Z")).unwrap(),
                ts("2019-01-31T00:00:00Z")
            );
        }

        #[test]
        fn boundary_is_exclusive() {
            let ceiling = ts("2018-10-31T00:00:00Z");
            assert!(!is_expiry_too_long(ceiling, now()).unwrap());

            let one_second_later = ceiling.saturating_add(SignedDuration::from_secs(1));
            assert!(is_expiry_too_long(one_second_later, now()).unwrap());
        }

        #[test]
        fn short_expiry_is_fine() {
            let expiry = now().saturating_add(days(10));
            assert!(!is_expiry_too_long(expiry, now()).unwrap());
        }
    }
}
