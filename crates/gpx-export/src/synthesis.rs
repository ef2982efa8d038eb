//! Route-to-track synthesis.
//!
//! Turns drawn route points into timed, elevated track points. Each point's
//! time is the first point's capture time plus the time needed to cover the
//! cumulative distance at the resolved speed, so timestamps never go
//! backwards and the file's average speed matches the requested pace.

use routes::elevation::{ElevationModel, elevation_gain_m};
use routes::geometry::{cumulative_distances_km, initial_bearing_deg};
use routes::pace::Pace;
use routes::{ActivityType, RouteDetails, RoutePoint};
use time::macros::format_description;
use time::{Duration, OffsetDateTime, UtcOffset};
use tracing::{debug, warn};

use crate::config::ExportConfig;
use crate::download::{GpxFile, export_file_name};
use crate::errors::ExportError;
use crate::gpx::{TrackMetadata, render_gpx};

/// One exported track point.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedTrackPoint {
    pub lat: f64,
    pub lng: f64,
    pub elevation_m: f64,
    pub time: OffsetDateTime,
    /// Seconds since the first point.
    pub elapsed_seconds: f64,
    /// Distance from the first point along the route.
    pub distance_km: f64,
    pub speed_kmh: f64,
    /// Bearing of travel at this point, degrees clockwise from north.
    pub course_deg: f64,
}

impl SynthesizedTrackPoint {
    pub fn lat_text(&self) -> String {
        format!("{:.6}", self.lat)
    }

    pub fn lon_text(&self) -> String {
        format!("{:.6}", self.lng)
    }

    pub fn elevation_text(&self) -> String {
        format!("{:.1}", self.elevation_m)
    }

    pub fn time_text(&self) -> Result<String, ExportError> {
        iso_timestamp(self.time)
    }
}

/// A fully timed track plus the figures describing it.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedTrack {
    pub activity: ActivityType,
    /// Speed every point is timed at.
    pub speed_kmh: f64,
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    pub points: Vec<SynthesizedTrackPoint>,
}

impl SynthesizedTrack {
    /// Pace implied by the timing, in seconds per km.
    pub fn effective_pace_seconds_per_km(&self) -> f64 {
        if self.speed_kmh > 0.0 {
            3600.0 / self.speed_kmh
        } else {
            0.0
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.elapsed_seconds)
    }
}

/// A rendered GPX document and the track it was rendered from.
#[derive(Debug, Clone)]
pub struct GpxDocument {
    pub xml: String,
    pub file_name: String,
    pub exported_at: OffsetDateTime,
    pub track: SynthesizedTrack,
}

impl GpxDocument {
    pub fn as_str(&self) -> &str {
        &self.xml
    }

    pub fn into_file(self) -> GpxFile {
        GpxFile::new(self.file_name, self.xml.into_bytes())
    }
}

/// Builds GPX documents from drawn routes.
#[derive(Debug, Clone, Default)]
pub struct TrackSynthesizer {
    config: ExportConfig,
}

impl TrackSynthesizer {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Synthesizes and renders a track, stamping the metadata with the current time.
    ///
    /// A missing or zero `pace_seconds_per_km` times the track at the activity's
    /// default speed.
    pub fn synthesize(
        &self,
        points: &[RoutePoint],
        activity: ActivityType,
        details: &RouteDetails,
        pace_seconds_per_km: Option<f64>,
    ) -> Result<GpxDocument, ExportError> {
        self.synthesize_at(
            points,
            activity,
            details,
            pace_seconds_per_km,
            OffsetDateTime::now_utc(),
        )
    }

    /// Like [`synthesize`](Self::synthesize) with an explicit export time.
    pub fn synthesize_at(
        &self,
        points: &[RoutePoint],
        activity: ActivityType,
        details: &RouteDetails,
        pace_seconds_per_km: Option<f64>,
        exported_at: OffsetDateTime,
    ) -> Result<GpxDocument, ExportError> {
        ensure_points(points)?;
        let pace = match pace_seconds_per_km {
            Some(value) => Pace::new(value)?,
            None => Pace::unset(),
        };

        let track = self.track(points, activity, pace)?;
        let exported_at = exported_at.to_offset(UtcOffset::UTC);

        let metadata = TrackMetadata {
            name: details.route_name(activity),
            description: details.route_description(activity),
            exported_at,
        };
        let xml = render_gpx(&track, &metadata, &self.config)?;
        let file_name = export_file_name(details, activity, exported_at.date())?;

        debug!(
            points = track.points.len(),
            distance_km = track.distance_km,
            speed_kmh = track.speed_kmh,
            file_name = %file_name,
            "Synthesized GPX document"
        );

        Ok(GpxDocument {
            xml,
            file_name,
            exported_at,
            track,
        })
    }

    /// Computes elevation, timing and speed for every point.
    pub fn track(
        &self,
        points: &[RoutePoint],
        activity: ActivityType,
        pace: Pace,
    ) -> Result<SynthesizedTrack, ExportError> {
        ensure_points(points)?;

        for point in points {
            point.validate()?;
        }
        let start = points[0].recorded_at()?;

        let speed_kmh = pace.resolve_speed_kmh(activity, &self.config.default_speeds);
        let cumulative = cumulative_distances_km(points);
        let elevations = self.config.elevation.profile(&cumulative);
        let distance_km = cumulative.last().copied().unwrap_or(0.0);

        let mut result = Vec::with_capacity(points.len());

        for (i, point) in points.iter().enumerate() {
            let elapsed_seconds = if speed_kmh > 0.0 {
                (cumulative[i] / speed_kmh) * 3600.0
            } else {
                0.0
            };

            let offset = Duration::milliseconds((elapsed_seconds * 1000.0).round() as i64);
            let time = start
                .checked_add(offset)
                .ok_or(ExportError::ElapsedOutOfRange { elapsed_seconds })?;

            result.push(SynthesizedTrackPoint {
                lat: point.lat,
                lng: point.lng,
                elevation_m: elevations[i],
                time,
                elapsed_seconds,
                distance_km: cumulative[i],
                speed_kmh,
                course_deg: course_at(points, i),
            });
        }

        Ok(SynthesizedTrack {
            activity,
            speed_kmh,
            distance_km,
            elevation_gain_m: elevation_gain_m(&elevations),
            points: result,
        })
    }
}

fn ensure_points(points: &[RoutePoint]) -> Result<(), ExportError> {
    if points.is_empty() {
        warn!("Export requested for an empty route");
        return Err(ExportError::NoRouteData);
    }
    Ok(())
}

/// Direction of travel arriving at point `i`; the first point looks ahead.
fn course_at(points: &[RoutePoint], i: usize) -> f64 {
    match (i.checked_sub(1), points.get(i + 1)) {
        (Some(prev), _) => initial_bearing_deg(&points[prev], &points[i]),
        (None, Some(next)) => initial_bearing_deg(&points[i], next),
        (None, None) => 0.0,
    }
}

/// ISO 8601 UTC with millisecond precision, e.g. `2024-05-01T07:30:00.000Z`.
pub fn iso_timestamp(at: OffsetDateTime) -> Result<String, ExportError> {
    let format = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    Ok(at.to_offset(UtcOffset::UTC).format(&format)?)
}
