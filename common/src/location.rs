//! Location related module
//!
//! Everything here works on `(longitude, latitude)` pairs in decimal degrees, this is the order
//! used by the tag readers when they report a position.
//!
//! The distance is the classic haversine formula on a spherical Earth.  The radius is *not* the
//! mean Earth radius, it is kept at 6,376,500 m so that distances match what has always been
//! reported to parents.
//!
use std::f64::consts::PI;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Earth radius in meters
pub const EARTH_RADIUS: f64 = 6_376_500.0;

/// Degrees to radians
const PI_OVER_180: f64 = PI / 180.0;

/// Actual location
///
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Location {
    /// Longitude
    pub lon: f64,
    /// Latitude
    pub lat: f64,
}

impl Location {
    pub fn new(lon: f64, lat: f64) -> Self {
        Location { lon, lat }
    }

    /// Parse a `"<longitude>,<latitude>"` string as sent by the tag readers.
    ///
    /// This never fails: an empty string, a missing component or something that is not a number
    /// all end up as `0` for the corresponding component.  A broken position is thus reported
    /// as the origin and will look "far away" to the caller.
    ///
    #[tracing::instrument]
    pub fn parse_lossy(raw: &str) -> Self {
        if raw.trim().is_empty() {
            trace!("empty location");
            return Location::default();
        }

        let mut parts = raw.split(',');
        let lon = parts.next().map(component).unwrap_or(0.);
        let lat = parts.next().map(component).unwrap_or(0.);
        Location { lon, lat }
    }

    /// Great-circle distance to `other`, in meters.
    ///
    #[inline]
    pub fn distance_to(&self, other: &Location) -> f64 {
        haversine(self.lon, self.lat, other.lon, other.lat)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

/// One component of a position, `0` if it does not parse or is not a finite number.
///
#[inline]
fn component(s: &str) -> f64 {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.)
}

/// Calculates the distance in meters between two points given as longitude/latitude in degrees.
///
/// Every coordinate is converted to radians before taking the differences, keep it that way
/// as it changes the last bits of the result.
///
pub fn haversine(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let lat1 = lat1 * PI_OVER_180;
    let lon1 = lon1 * PI_OVER_180;
    let lat2 = lat2 * PI_OVER_180;
    let d_lon = (lon2 * PI_OVER_180) - lon1;

    let a = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    EARTH_RADIUS * (2.0 * a.sqrt().atan2((1.0 - a).sqrt()))
}

/// Round a distance to the nearest meter.
///
/// Ties go to the even meter (`2.5` gives `2`, `3.5` gives `4`).
///
#[inline]
pub fn round_meters(dist: f64) -> u64 {
    dist.round_ties_even() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::Result;
    use proptest::prelude::*;
    use rstest::rstest;
    use tracing::info;

    #[inline]
    fn shorten(v: f64) -> String {
        format!("{:.3}", v)
    }

    #[rstest]
    #[case("", (0., 0.))]
    #[case("   ", (0., 0.))]
    #[case("12.5", (12.5, 0.))]
    #[case("12.5,45.2", (12.5, 45.2))]
    #[case("abc,45.2", (0., 45.2))]
    #[case("12.5,abc", (12.5, 0.))]
    #[case(",", (0., 0.))]
    #[case(" -122.001 , 47.001 ", (-122.001, 47.001))]
    #[case("1,2,3", (1., 2.))]
    #[case("nan,nan", (0., 0.))]
    #[case("NaN,47.0", (0., 47.))]
    #[case("inf,0", (0., 0.))]
    #[case("-122.0,infinity", (-122., 0.))]
    #[case("-inf,-Infinity", (0., 0.))]
    fn test_parse_lossy(#[case] raw: &str, #[case] want: (f64, f64)) {
        let loc = Location::parse_lossy(raw);
        assert_eq!(Location::new(want.0, want.1), loc);
    }

    #[test_pretty_log::test]
    fn test_distance_same_point() -> Result<()> {
        let bxl = Location::new(4.4, 50.8);
        assert_eq!(0., bxl.distance_to(&bxl));
        Ok(())
    }

    #[test_pretty_log::test]
    fn test_distance_small_step_north() -> Result<()> {
        info!("origin");
        let home = Location::default();
        let here = Location::new(0., 0.0001);

        let d = home.distance_to(&here);
        assert_eq!("11.129", shorten(d));
        Ok(())
    }

    #[test_pretty_log::test]
    fn test_distance_one_degree() -> Result<()> {
        let d = haversine(0., 0., 0., 1.);
        assert_eq!(shorten(EARTH_RADIUS * PI / 180.), shorten(d));
        assert_eq!("111290.920", shorten(d));
        Ok(())
    }

    #[test_pretty_log::test]
    fn test_distance_antipode() -> Result<()> {
        let d = haversine(0., 0., 180., 0.);
        assert_eq!(shorten(EARTH_RADIUS * PI), shorten(d));
        Ok(())
    }

    #[test_pretty_log::test]
    fn test_distance_seattle() -> Result<()> {
        let home = Location::new(-122.0, 47.0);
        let bus = Location::parse_lossy("-122.001,47.001");

        let d = bus.distance_to(&home);
        assert_eq!("134.709", shorten(d));
        assert_eq!(135, round_meters(d));
        Ok(())
    }

    #[rstest]
    #[case(0., 0)]
    #[case(0.4, 0)]
    #[case(0.5, 0)]
    #[case(1.5, 2)]
    #[case(2.5, 2)]
    #[case(3.5, 4)]
    #[case(134.7085, 135)]
    fn test_round_meters(#[case] d: f64, #[case] m: u64) {
        assert_eq!(m, round_meters(d));
    }

    #[test]
    fn test_location_display() {
        assert_eq!("12.5,45.2", Location::new(12.5, 45.2).to_string());
    }

    proptest! {
        #[test]
        fn test_distance_symmetric(
            lon1 in -60.0f64..60.0, lat1 in -80.0f64..80.0,
            lon2 in -60.0f64..60.0, lat2 in -80.0f64..80.0,
        ) {
            let ab = haversine(lon1, lat1, lon2, lat2);
            let ba = haversine(lon2, lat2, lon1, lat1);
            prop_assert!((ab - ba).abs() < 1e-6);
        }

        #[test]
        fn test_distance_to_self_is_zero(lon in -180.0f64..180.0, lat in -90.0f64..90.0) {
            prop_assert_eq!(0., haversine(lon, lat, lon, lat));
        }
    }
}
