//! Configuration for GPX export.

use std::path::Path;

use routes::elevation::ElevationPolicy;
use routes::pace::DefaultSpeeds;
use serde::{Deserialize, Serialize};

use crate::errors::ExportError;

/// Name written to `creator` on the root element.
pub const DEFAULT_CREATOR: &str = "RouteTracker v1.0";

/// Name written to `<metadata><author><name>`.
pub const DEFAULT_AUTHOR: &str = "RouteTracker";

/// Optional parts of the document that fitness apps ignore.
///
/// `<trk><trkseg><trkpt>` with `<ele>` and `<time>` is always written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Decorations {
    /// `<keywords>` in the metadata.
    pub keywords: bool,
    /// `<bounds>` in the metadata.
    pub bounds: bool,
    /// A `<rte>` with a subset of the points as waypoints.
    pub route_waypoints: bool,
    /// Track and point `<extensions>` (distance, pace, speed, course).
    pub extensions: bool,
    /// Every n-th point becomes a route waypoint, plus the first and last.
    pub waypoint_interval: usize,
}

impl Default for Decorations {
    fn default() -> Self {
        Self {
            keywords: true,
            bounds: true,
            route_waypoints: true,
            extensions: true,
            waypoint_interval: 10,
        }
    }
}

impl Decorations {
    /// Only the elements downstream apps actually parse.
    pub fn none() -> Self {
        Self {
            keywords: false,
            bounds: false,
            route_waypoints: false,
            extensions: false,
            ..Default::default()
        }
    }
}

/// Export settings. Missing fields in a config file take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub creator: String,
    pub author: String,
    /// Speeds used when the caller gives no pace.
    pub default_speeds: DefaultSpeeds,
    pub elevation: ElevationPolicy,
    pub decorations: Decorations,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            creator: DEFAULT_CREATOR.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            default_speeds: DefaultSpeeds::default(),
            elevation: ElevationPolicy::default(),
            decorations: Decorations::default(),
        }
    }
}

impl ExportConfig {
    /// Default settings without any optional decoration.
    pub fn minimal() -> Self {
        Self {
            decorations: Decorations::none(),
            ..Default::default()
        }
    }

    pub fn with_elevation(mut self, elevation: ElevationPolicy) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn with_default_speeds(mut self, speeds: DefaultSpeeds) -> Self {
        self.default_speeds = speeds;
        self
    }

    pub fn with_decorations(mut self, decorations: Decorations) -> Self {
        self.decorations = decorations;
        self
    }

    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ExportError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        self.default_speeds.validate()?;
        Ok(())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
