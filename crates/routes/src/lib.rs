//! Shared route model for route-tracker.
//!
//! Everything the map sidebar and the GPX exporter must agree on lives here:
//! great-circle distances, pace resolution, the synthetic elevation profile
//! and the elevation gain derived from it.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use routes::prelude::*;
//!
//! let points = vec![
//!     RoutePoint::new(40.0150, -105.2705, 1_700_000_000_000),
//!     RoutePoint::new(40.0160, -105.2695, 1_700_000_000_000),
//! ];
//! let stats = RouteStats::compute(
//!     &points,
//!     ActivityType::Run,
//!     Pace::from_minutes_seconds(5, 30),
//!     &ElevationPolicy::default(),
//! );
//! println!("{} km", stats.formatted_distance());
//! ```

pub mod elevation;
pub mod errors;
pub mod geometry;
pub mod models;
pub mod pace;
pub mod stats;

pub use errors::RouteError;
pub use models::{ActivityType, RouteDetails, RoutePoint};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::elevation::{
        ELEVATION_FLOOR_M, ElevationModel, ElevationPolicy, RandomWalk, WaveProfile,
        elevation_gain_m,
    };
    pub use crate::geometry::{
        Bounds, cumulative_distance_km, cumulative_distances_km, haversine_distance_km,
    };
    pub use crate::pace::{DefaultSpeeds, Pace, format_duration};
    pub use crate::stats::RouteStats;
    pub use crate::{ActivityType, RouteDetails, RouteError, RoutePoint};
}
