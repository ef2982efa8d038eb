//! Example: Export a drawn route as a GPX file.
//!
//! Reads a route request from the JSON file given as the first argument:
//!
//! ```json
//! {
//!   "activity": "run",
//!   "pace": 330,
//!   "name": "Sunday Long Run",
//!   "description": "Along the creek path",
//!   "points": [{ "lat": 40.015, "lng": -105.2705, "timestamp": 1714548600000 }]
//! }
//! ```
//!
//! Without an argument a small loop around Boulder is exported.
//!
//! Run with:
//! ```
//! cargo run -p gpx-export --example export_route -- route.json
//! ```
//!
//! `OUTPUT_DIR` sets the destination (default `./exports`) and
//! `ROUTE_EXPORT_CONFIG` points at an optional JSON export config.

use gpx_export::prelude::*;
use serde::Deserialize;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct RouteRequest {
    activity: ActivityType,
    #[serde(default)]
    pace: Option<f64>,
    #[serde(flatten)]
    details: RouteDetails,
    points: Vec<RoutePoint>,
}

fn sample_request() -> RouteRequest {
    let now_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
    let corners = [
        (40.0150, -105.2705),
        (40.0185, -105.2705),
        (40.0185, -105.2650),
        (40.0150, -105.2650),
        (40.0150, -105.2705),
    ];

    RouteRequest {
        activity: ActivityType::Run,
        pace: Some(330.0),
        details: RouteDetails::new("Boulder Block", "Sample loop around a city block"),
        points: corners
            .iter()
            .map(|&(lat, lng)| RoutePoint::new(lat, lng, now_ms))
            .collect(),
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("ROUTE_EXPORT_CONFIG") {
        Ok(path) => ExportConfig::from_file(&path)?,
        Err(_) => ExportConfig::default(),
    };
    let output_dir = std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "./exports".to_string());

    let request = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(&path)?)?,
        None => sample_request(),
    };

    let stats = RouteStats::compute(
        &request.points,
        request.activity,
        Pace::new(request.pace.unwrap_or(0.0))?,
        &config.elevation,
    );
    tracing::info!(
        "Route: {} km, est. {}, +{} m",
        stats.formatted_distance(),
        stats.formatted_time(),
        stats.formatted_elevation_gain()
    );

    let exporter = RouteExporter::new(config, DirectorySink::new(&output_dir));
    let file = exporter.export(
        &request.points,
        request.activity,
        &request.details,
        request.pace,
    )?;

    tracing::info!("Wrote {}/{}", output_dir, file.file_name);

    Ok(())
}
