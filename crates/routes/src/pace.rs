//! Pace and speed resolution.
//!
//! A pace is the number of seconds needed to cover one kilometer. The UI can
//! set it directly (minutes and seconds per km) or derive it from a target
//! finishing time over the drawn distance. Zero means "not set", in which case
//! the activity's default speed applies.

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::errors::RouteError;
use crate::models::ActivityType;

/// Running speed used when no pace is given (6:00/km).
pub const DEFAULT_RUN_SPEED_KMH: f64 = 10.0;

/// Cycling speed used when no pace is given.
pub const DEFAULT_BIKE_SPEED_KMH: f64 = 20.0;

/// Fallback speeds per activity, in km/h.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSpeeds {
    pub run_kmh: f64,
    pub bike_kmh: f64,
}

impl Default for DefaultSpeeds {
    fn default() -> Self {
        Self {
            run_kmh: DEFAULT_RUN_SPEED_KMH,
            bike_kmh: DEFAULT_BIKE_SPEED_KMH,
        }
    }
}

impl DefaultSpeeds {
    /// Configured speed for `activity`, or the built-in constant when the
    /// configured value is not a positive finite number.
    pub fn for_activity(&self, activity: ActivityType) -> f64 {
        let (configured, fallback) = match activity {
            ActivityType::Run => (self.run_kmh, DEFAULT_RUN_SPEED_KMH),
            ActivityType::Bike => (self.bike_kmh, DEFAULT_BIKE_SPEED_KMH),
        };
        if is_usable_speed(configured) {
            configured
        } else {
            fallback
        }
    }

    /// Rejects speeds that would collapse every timestamp onto the first point.
    pub fn validate(&self) -> Result<(), RouteError> {
        for speed in [self.run_kmh, self.bike_kmh] {
            if !is_usable_speed(speed) {
                return Err(RouteError::InvalidSpeed(speed));
            }
        }
        Ok(())
    }
}

fn is_usable_speed(kmh: f64) -> bool {
    kmh.is_finite() && kmh > 0.0
}

/// Seconds per kilometer. `Pace::default()` is unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Pace(f64);

impl Pace {
    /// Validates a raw pace value.
    ///
    /// Negative and non-finite values are rejected, as are paces so close to
    /// zero that the matching speed is not representable.
    pub fn new(seconds_per_km: f64) -> Result<Self, RouteError> {
        let valid = seconds_per_km.is_finite()
            && (seconds_per_km == 0.0
                || (seconds_per_km > 0.0 && (3600.0 / seconds_per_km).is_finite()));

        if valid {
            Ok(Self(seconds_per_km))
        } else {
            Err(RouteError::InvalidPace(seconds_per_km))
        }
    }

    pub fn unset() -> Self {
        Self(0.0)
    }

    /// Direct entry, e.g. `5:30/km` is `from_minutes_seconds(5, 30)`.
    pub fn from_minutes_seconds(minutes: u32, seconds: u32) -> Self {
        Self(f64::from(minutes) * 60.0 + f64::from(seconds))
    }

    /// Pace needed to finish `distance_km` in `target`.
    ///
    /// Unset when the route has no length yet or the target is not positive.
    pub fn from_target_time(target: Duration, distance_km: f64) -> Self {
        let total_seconds = target.as_seconds_f64();
        if distance_km > 0.0 && total_seconds > 0.0 {
            Self(total_seconds / distance_km)
        } else {
            Self::unset()
        }
    }

    pub fn seconds_per_km(&self) -> f64 {
        self.0
    }

    pub fn is_set(&self) -> bool {
        self.0 > 0.0
    }

    /// Speed in km/h, 0 when unset.
    pub fn speed_kmh(&self) -> f64 {
        if self.is_set() { 3600.0 / self.0 } else { 0.0 }
    }

    /// Speed used to time a track: the pace if set, otherwise the activity default.
    pub fn resolve_speed_kmh(&self, activity: ActivityType, defaults: &DefaultSpeeds) -> f64 {
        let speed = self.speed_kmh();
        if self.is_set() && speed.is_finite() {
            speed
        } else {
            defaults.for_activity(activity)
        }
    }

    /// Time to cover `distance_km` at this pace, 0 when unset.
    pub fn total_time_seconds(&self, distance_km: f64) -> f64 {
        if distance_km > 0.0 && self.is_set() {
            distance_km * self.0
        } else {
            0.0
        }
    }

    /// `m:ss` per kilometer.
    pub fn format(&self) -> String {
        let total = self.0.max(0.0).floor() as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }
}

impl TryFrom<f64> for Pace {
    type Error = RouteError;

    fn try_from(seconds_per_km: f64) -> Result<Self, Self::Error> {
        Self::new(seconds_per_km)
    }
}

impl From<Pace> for f64 {
    fn from(pace: Pace) -> Self {
        pace.0
    }
}

/// `h:mm:ss` for an hour or more, `m:ss` otherwise.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() {
        seconds.max(0.0).floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
