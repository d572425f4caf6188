use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// earth radius in km
const EARTH_RADIUS: f64 = 6371.0;

/// a (lat, lon) pair in degrees
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// geojson positions are [lon, lat]
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lon, lat, ..] => Some(Self::new(*lat, *lon)),
            _ => None,
        }
    }

    pub fn distance_km(&self, other: &LatLon) -> f64 {
        haversine(self.lat, self.lon, other.lat, other.lon)
    }
}

impl std::str::FromStr for LatLon {
    type Err = MapError;

    /// parses "lat,lon"
    fn from_str(s: &str) -> Result<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| MapError::Config(format!("expected lat,lon but got '{}'", s)))?;
        let lat = lat
            .trim()
            .parse()
            .map_err(|_| MapError::Config(format!("bad latitude '{}'", lat)))?;
        let lon = lon
            .trim()
            .parse()
            .map_err(|_| MapError::Config(format!("bad longitude '{}'", lon)))?;
        Ok(Self::new(lat, lon))
    }
}

/// body of a POST to the processing endpoint. the server expects strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: String,
    pub lon: String,
}

impl From<LatLon> for Coordinate {
    fn from(p: LatLon) -> Self {
        Self {
            lat: p.lat.to_string(),
            lon: p.lon.to_string(),
        }
    }
}

/// great-circle distance in km
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.).sin().powi(2) + lat1.cos() * lat2.cos() * (delta_lon / 2.).sin().powi(2);
    let c = 2. * a.sqrt().atan2((1. - a).sqrt());
    EARTH_RADIUS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_city_pairs() {
        let cases = [
            // warsaw - rome
            (52.2296756, 21.0122287, 41.8919300, 12.5113300, 1318.0),
            // anchorage - sydney
            (61.259669, -149.939319, -33.833920, 151.062189, 11832.04),
            // hong kong - tromso
            (22.573438, 114.131640, 69.660905, 18.929955, 7859.32),
            // great falls - bow island
            (47.478928, -111.371140, 49.868640, -111.377673, 265.72),
        ];
        for (lat1, lon1, lat2, lon2, expected) in cases {
            let d = haversine(lat1, lon1, lat2, lon2);
            assert!((d - expected).abs() < 5., "{} != {}", d, expected);
        }
    }

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine(10., 20., 10., 20.), 0.);
    }

    #[test]
    fn parse_latlon() {
        let p: LatLon = "10.5, -20".parse().unwrap();
        assert_eq!(p, LatLon::new(10.5, -20.));
        assert!("10.5".parse::<LatLon>().is_err());
        assert!("a,b".parse::<LatLon>().is_err());
    }

    #[test]
    fn coordinate_is_sent_as_strings() {
        let c = Coordinate::from(LatLon::new(10., 20.5));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json, serde_json::json!({"lat": "10", "lon": "20.5"}));
    }

    #[test]
    fn position_order() {
        assert_eq!(
            LatLon::from_position(&[20., 10.]),
            Some(LatLon::new(10., 20.))
        );
        assert_eq!(LatLon::from_position(&[1.]), None);
    }
}
