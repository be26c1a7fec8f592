//! Decide whether we have to tell the parents.
//!
//! Starting from what the API told us, stop at the first of:
//!
//! 1. nothing came back
//! 2. the student is not on the bus
//! 3. the student is on the bus, too far or close enough
//!
//! Only the first status is looked at, the API is supposed to send at most one.
//!

use std::fmt::{Display, Formatter};

use tracing::{debug, trace};

use tagwatch_common::round_meters;
use tagwatch_sources::StudentStatus;

use crate::Settings;

/// Result of the evaluation of one batch of statuses.
///
/// Distances are rounded to the meter.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Empty list from the API
    NoData,
    /// Student not on the bus, whatever the distance
    NotInTransit,
    /// On the bus but still too far
    StillFar { meters: u64 },
    /// On the bus and close enough to notify
    WithinThreshold { meters: u64 },
}

impl Decision {
    #[inline]
    pub fn should_notify(&self) -> bool {
        matches!(self, Decision::WithinThreshold { .. })
    }

    /// Distance from home if we got that far.
    ///
    pub fn meters(&self) -> Option<u64> {
        match self {
            Decision::StillFar { meters } | Decision::WithinThreshold { meters } => Some(*meters),
            _ => None,
        }
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::NoData => write!(f, "No statuses found"),
            Decision::NotInTransit => write!(f, "Student not on bus"),
            Decision::StillFar { meters } => write!(f, "Student still {meters} meters from home."),
            Decision::WithinThreshold { meters } => {
                write!(f, "Student {meters} meters from home, arriving shortly.")
            }
        }
    }
}

/// Look at the statuses and decide.
///
/// The position of the student comes from `StudentStatus::location()` which never fails: a
/// garbled position is the origin and will be reported as `StillFar` for any sensible home.
///
#[tracing::instrument(skip(statuses))]
pub fn evaluate(statuses: &[StudentStatus], settings: &Settings) -> Decision {
    trace!("evaluate");

    let Some(status) = statuses.first() else {
        return Decision::NoData;
    };
    if statuses.len() > 1 {
        debug!("{} statuses, ignoring all but the first", statuses.len());
    }

    if !status.is_on_bus() {
        return Decision::NotInTransit;
    }

    let here = status.location();
    let meters = round_meters(here.distance_to(&settings.home));
    debug!("student at {here}, {meters}m from home");

    if meters as f64 <= settings.meters_to_notify {
        Decision::WithinThreshold { meters }
    } else {
        Decision::StillFar { meters }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use tagwatch_common::Location;

    use super::*;

    #[fixture]
    fn settings() -> Settings {
        Settings {
            home: Location::new(-122.0, 47.0),
            meters_to_notify: 500.,
        }
    }

    fn status(location: &str, flag: i64) -> StudentStatus {
        StudentStatus {
            last_known_location: Some(location.to_string()),
            student_on_bus: flag,
            ..StudentStatus::default()
        }
    }

    #[rstest]
    fn test_no_data(settings: Settings) {
        let d = evaluate(&[], &settings);
        assert_eq!(Decision::NoData, d);
        assert!(!d.should_notify());
        assert_eq!(None, d.meters());
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(-1)]
    fn test_not_on_bus(settings: Settings, #[case] flag: i64) {
        // Right at home, does not matter
        let d = evaluate(&[status("-122.0,47.0", flag)], &settings);
        assert_eq!(Decision::NotInTransit, d);
        assert!(!d.should_notify());
    }

    #[rstest]
    fn test_within_threshold(settings: Settings) {
        let d = evaluate(&[status("-122.001,47.001", 1)], &settings);
        assert_eq!(Decision::WithinThreshold { meters: 135 }, d);
        assert!(d.should_notify());
        assert_eq!(Some(135), d.meters());
    }

    #[rstest]
    fn test_at_home(settings: Settings) {
        let d = evaluate(&[status("-122.0,47.0", 1)], &settings);
        assert_eq!(Decision::WithinThreshold { meters: 0 }, d);
    }

    #[rstest]
    fn test_still_far(settings: Settings) {
        // 0.01° of latitude north of home, ~1113m
        let d = evaluate(&[status("-122.0,47.01", 1)], &settings);
        assert_eq!(Decision::StillFar { meters: 1113 }, d);
        assert!(!d.should_notify());
    }

    #[rstest]
    #[case(135., Decision::WithinThreshold { meters: 135 })]
    #[case(135.5, Decision::WithinThreshold { meters: 135 })]
    #[case(134., Decision::StillFar { meters: 135 })]
    #[case(0., Decision::StillFar { meters: 135 })]
    fn test_threshold_boundary(#[case] threshold: f64, #[case] want: Decision) {
        let settings = Settings {
            home: Location::new(-122.0, 47.0),
            meters_to_notify: threshold,
        };
        assert_eq!(want, evaluate(&[status("-122.001,47.001", 1)], &settings));
    }

    #[rstest]
    #[case("")]
    #[case("garbage")]
    #[case("abc,def")]
    fn test_garbled_location_is_far(settings: Settings, #[case] location: &str) {
        // Origin is ~12,000km away
        let d = evaluate(&[status(location, 1)], &settings);
        assert!(matches!(d, Decision::StillFar { meters } if meters > 9_000_000));
    }

    #[rstest]
    #[case("nan,nan")]
    #[case("NaN,47.0")]
    #[case("inf,0")]
    #[case("-122.0,infinity")]
    fn test_non_finite_location_is_far(settings: Settings, #[case] location: &str) {
        let d = evaluate(&[status(location, 1)], &settings);
        assert!(matches!(d, Decision::StillFar { .. }));
        assert!(!d.should_notify());
    }

    #[rstest]
    fn test_garbled_location_home_at_origin() {
        let settings = Settings {
            home: Location::default(),
            meters_to_notify: 10.,
        };
        let d = evaluate(&[status("", 1)], &settings);
        assert_eq!(Decision::WithinThreshold { meters: 0 }, d);
    }

    #[rstest]
    fn test_only_first_status(settings: Settings) {
        let list = vec![status("-122.0,47.01", 1), status("-122.0,47.0", 1)];
        assert_eq!(Decision::StillFar { meters: 1113 }, evaluate(&list, &settings));

        let list = vec![status("-122.0,47.0", 0), status("-122.0,47.0", 1)];
        assert_eq!(Decision::NotInTransit, evaluate(&list, &settings));
    }

    #[test]
    fn test_display() {
        assert_eq!("No statuses found", Decision::NoData.to_string());
        assert_eq!("Student not on bus", Decision::NotInTransit.to_string());
        assert_eq!(
            "Student still 1113 meters from home.",
            Decision::StillFar { meters: 1113 }.to_string()
        );
    }
}
