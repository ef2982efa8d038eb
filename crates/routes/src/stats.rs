//! Route summary shown next to the map while drawing.

use serde::Serialize;

use crate::elevation::{ElevationModel, elevation_gain_m};
use crate::geometry::cumulative_distance_km;
use crate::models::{ActivityType, RoutePoint};
use crate::pace::{Pace, format_duration};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteStats {
    pub activity: ActivityType,
    pub distance_km: f64,
    /// 0 until a pace is chosen.
    pub estimated_time_seconds: f64,
    /// Whole meters, from the same profile the exporter writes.
    pub elevation_gain_m: f64,
}

impl RouteStats {
    pub fn compute(
        points: &[RoutePoint],
        activity: ActivityType,
        pace: Pace,
        elevation: &impl ElevationModel,
    ) -> Self {
        let distance_km = cumulative_distance_km(points);
        let elevation_gain_m = elevation_gain_m(&elevation.profile_for(points));

        Self {
            activity,
            distance_km,
            estimated_time_seconds: pace.total_time_seconds(distance_km),
            elevation_gain_m,
        }
    }

    /// Distance with two decimals, e.g. `5.27`.
    pub fn formatted_distance(&self) -> String {
        format!("{:.2}", self.distance_km)
    }

    pub fn formatted_time(&self) -> String {
        format_duration(self.estimated_time_seconds)
    }

    pub fn formatted_elevation_gain(&self) -> String {
        format!("{:.0}", self.elevation_gain_m)
    }
}
