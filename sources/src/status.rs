//! What the SmartTag API sends back for a given student.
//!
//! The API returns a JSON array of these, in practice with a single element.  Field names are
//! in `PascalCase` but we also accept `camelCase` as the API has not always been consistent.
//!
//! Only `LastKnownLocation` and `StudentOnBus` are used to decide anything, the rest is kept
//! for logging.
//!

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tagwatch_common::Location;

/// One status report.
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct StudentStatus {
    /// Last known position as `"<longitude>,<latitude>"`
    #[serde(alias = "lastKnownLocation")]
    pub last_known_location: Option<String>,
    /// Disembarkation date, format unknown so kept as-is
    #[serde(alias = "disembarkationDate")]
    pub disembarkation_date: Option<Value>,
    /// Direction of the trip
    #[serde(alias = "direction")]
    pub direction: Option<String>,
    /// Activity ID
    #[serde(alias = "activityId")]
    pub activity_id: i64,
    /// Name of the bus
    #[serde(alias = "busName")]
    pub bus_name: Option<String>,
    /// Name of the driver
    #[serde(alias = "driverName")]
    pub driver_name: Option<String>,
    /// Friendly name of the route
    #[serde(alias = "friendlyRouteDisplay")]
    pub friendly_route_display: Option<String>,
    /// `1` when the student is on the bus
    #[serde(alias = "studentOnBus")]
    pub student_on_bus: i64,
}

impl StudentStatus {
    /// Only `1` means "on the bus", anything else does not.
    ///
    #[inline]
    pub fn is_on_bus(&self) -> bool {
        self.student_on_bus == 1
    }

    /// Position of the student, the origin if it is missing or garbled.
    ///
    pub fn location(&self) -> Location {
        Location::parse_lossy(self.last_known_location.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PAYLOAD: &str = r##"
[
  {
    "LastKnownLocation": "-122.001,47.001",
    "DisembarkationDate": null,
    "Direction": "PM",
    "ActivityId": 123456,
    "BusName": "Bus 42",
    "DriverName": "J. Doe",
    "FriendlyRouteDisplay": "Route 7 - Afternoon",
    "StudentOnBus": 1
  }
]
"##;

    #[test]
    fn test_decode_payload() -> eyre::Result<()> {
        let list: Vec<StudentStatus> = serde_json::from_str(PAYLOAD)?;
        assert_eq!(1, list.len());

        let st = &list[0];
        assert!(st.is_on_bus());
        assert_eq!(Some("Bus 42".to_string()), st.bus_name);
        assert_eq!(123456, st.activity_id);
        assert_eq!(None, st.disembarkation_date);
        assert_eq!(Location::new(-122.001, 47.001), st.location());
        Ok(())
    }

    #[test]
    fn test_decode_camel_case() -> eyre::Result<()> {
        let data = r##"[{"lastKnownLocation": "12.5,45.2", "studentOnBus": 1}]"##;
        let list: Vec<StudentStatus> = serde_json::from_str(data)?;

        assert!(list[0].is_on_bus());
        assert_eq!(Location::new(12.5, 45.2), list[0].location());
        Ok(())
    }

    #[test]
    fn test_decode_missing_fields() -> eyre::Result<()> {
        let list: Vec<StudentStatus> = serde_json::from_str("[{}]")?;

        assert!(!list[0].is_on_bus());
        assert_eq!(Location::default(), list[0].location());
        Ok(())
    }

    #[test]
    fn test_decode_empty() -> eyre::Result<()> {
        let list: Vec<StudentStatus> = serde_json::from_str("[]")?;
        assert!(list.is_empty());
        Ok(())
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(2, false)]
    #[case(-1, false)]
    fn test_is_on_bus(#[case] flag: i64, #[case] on_bus: bool) {
        let st = StudentStatus {
            student_on_bus: flag,
            ..StudentStatus::default()
        };
        assert_eq!(on_bus, st.is_on_bus());
    }

    #[rstest]
    #[case(None, Location::default())]
    #[case(Some(""), Location::default())]
    #[case(Some("abc,45.2"), Location::new(0., 45.2))]
    #[case(Some("12.5"), Location::new(12.5, 0.))]
    fn test_location(#[case] raw: Option<&str>, #[case] loc: Location) {
        let st = StudentStatus {
            last_known_location: raw.map(String::from),
            ..StudentStatus::default()
        };
        assert_eq!(loc, st.location());
    }
}
