use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::errors::RouteError;

/// A point captured while drawing a route, in travel order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lng: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl RoutePoint {
    pub fn new(lat: f64, lng: f64, timestamp: i64) -> Self {
        Self {
            lat,
            lng,
            timestamp,
        }
    }

    /// Checks that the coordinate is finite and on the globe.
    pub fn validate(&self) -> Result<(), RouteError> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lng_ok = self.lng.is_finite() && (-180.0..=180.0).contains(&self.lng);

        if lat_ok && lng_ok {
            Ok(())
        } else {
            Err(RouteError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }

    /// The capture time as a UTC date-time.
    pub fn recorded_at(&self) -> Result<OffsetDateTime, RouteError> {
        OffsetDateTime::UNIX_EPOCH
            .checked_add(Duration::milliseconds(self.timestamp))
            .ok_or(RouteError::InvalidTimestamp(self.timestamp))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Run,
    Bike,
}

impl ActivityType {
    /// Short identifier used in extensions and requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Run => "run",
            ActivityType::Bike => "bike",
        }
    }

    /// Value of the GPX `<type>` element.
    pub fn gpx_type(&self) -> &'static str {
        match self {
            ActivityType::Run => "running",
            ActivityType::Bike => "cycling",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User supplied name and description. Blank values fall back to generated text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteDetails {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RouteDetails {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    /// The user supplied name, if it has any visible content.
    pub fn given_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    pub fn route_name(&self, activity: ActivityType) -> String {
        self.given_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} Route", activity.gpx_type()))
    }

    pub fn route_description(&self, activity: ActivityType) -> String {
        non_blank(self.description.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Generated route for {}", activity.gpx_type()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(RoutePoint::new(45.0, 7.0, 0).validate().is_ok());
        assert!(RoutePoint::new(-90.0, 180.0, 0).validate().is_ok());
        assert!(RoutePoint::new(90.5, 0.0, 0).validate().is_err());
        assert!(RoutePoint::new(0.0, -180.1, 0).validate().is_err());
        assert!(RoutePoint::new(f64::NAN, 0.0, 0).validate().is_err());
    }

    #[test]
    fn test_recorded_at() {
        let point = RoutePoint::new(0.0, 0.0, 1_700_000_000_123);
        let at = point.recorded_at().unwrap();
        assert_eq!(at.unix_timestamp(), 1_700_000_000);
        assert_eq!(at.millisecond(), 123);
    }

    #[test]
    fn test_fallback_details() {
        let details = RouteDetails::default();
        assert_eq!(details.route_name(ActivityType::Run), "running Route");
        assert_eq!(
            details.route_description(ActivityType::Bike),
            "Generated route for cycling"
        );

        let blank = RouteDetails::new("   ", "");
        assert_eq!(blank.given_name(), None);
        assert_eq!(blank.route_name(ActivityType::Bike), "cycling Route");
    }

    #[test]
    fn test_route_point_json() {
        let point: RoutePoint =
            serde_json::from_str(r#"{"lat": 51.5, "lng": -0.12, "timestamp": 1000}"#).unwrap();
        assert_eq!(point, RoutePoint::new(51.5, -0.12, 1000));

        let activity: ActivityType = serde_json::from_str(r#""bike""#).unwrap();
        assert_eq!(activity, ActivityType::Bike);
    }
}
