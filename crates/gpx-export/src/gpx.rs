//! GPX file generation from synthesized tracks.
//!
//! Generates GPX 1.1 XML in the layout fitness apps accept on upload.

use routes::RoutePoint;
use routes::geometry::{Bounds, bounds};
use time::OffsetDateTime;

use crate::config::ExportConfig;
use crate::errors::ExportError;
use crate::synthesis::{SynthesizedTrack, SynthesizedTrackPoint, iso_timestamp};

/// Document level text for an export.
#[derive(Debug, Clone)]
pub struct TrackMetadata {
    pub name: String,
    pub description: String,
    pub exported_at: OffsetDateTime,
}

/// Generates a GPX 1.1 XML string from a synthesized track.
///
/// The generated GPX always includes:
/// - Standard GPX 1.1 header with schema declarations
/// - Metadata with name, description, author and export time
/// - Single track with a single track segment
/// - Each point with lat, lon (6 decimals), elevation (1 decimal) and timestamp
///
/// Keywords, bounds, route waypoints and extensions follow `config.decorations`.
/// Extension distances are in kilometers.
pub fn render_gpx(
    track: &SynthesizedTrack,
    meta: &TrackMetadata,
    config: &ExportConfig,
) -> Result<String, ExportError> {
    let decorations = &config.decorations;
    let name = escape_xml(&meta.name);
    let description = escape_xml(&meta.description);
    let gpx_type = track.activity.gpx_type();

    let mut gpx = String::new();

    // GPX 1.1 header
    gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    gpx.push('\n');
    gpx.push_str(&format!(
        r#"<gpx version="1.1" creator="{}""#,
        escape_xml(&config.creator)
    ));
    gpx.push_str(r#" xmlns="http://www.topografix.com/GPX/1/1""#);
    gpx.push_str(r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#);
    gpx.push_str(r#" xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd">"#);
    gpx.push('\n');

    // Metadata
    gpx.push_str("  <metadata>\n");
    gpx.push_str(&format!("    <name>{name}</name>\n"));
    gpx.push_str(&format!("    <desc>{description}</desc>\n"));
    gpx.push_str("    <author>\n");
    gpx.push_str(&format!("      <name>{}</name>\n", escape_xml(&config.author)));
    gpx.push_str("    </author>\n");
    gpx.push_str(&format!(
        "    <time>{}</time>\n",
        iso_timestamp(meta.exported_at)?
    ));
    if decorations.keywords {
        gpx.push_str(&format!(
            "    <keywords>{gpx_type}, route, gps, track</keywords>\n"
        ));
    }
    if decorations.bounds
        && let Some(b) = track_bounds(track)
    {
        gpx.push_str(&format!(
            r#"    <bounds minlat="{:.6}" minlon="{:.6}" maxlat="{:.6}" maxlon="{:.6}"/>"#,
            b.min_lat, b.min_lon, b.max_lat, b.max_lon
        ));
        gpx.push('\n');
    }
    gpx.push_str("  </metadata>\n");

    if decorations.route_waypoints {
        push_route(&mut gpx, track, &name, decorations.waypoint_interval)?;
    }

    // Track
    gpx.push_str("  <trk>\n");
    gpx.push_str(&format!("    <name>{name}</name>\n"));
    gpx.push_str(&format!("    <desc>{description}</desc>\n"));
    gpx.push_str(&format!("    <type>{gpx_type}</type>\n"));
    if decorations.extensions {
        gpx.push_str("    <extensions>\n");
        gpx.push_str(&format!(
            "      <distance>{:.3}</distance>\n",
            track.distance_km
        ));
        gpx.push_str(&format!("      <points>{}</points>\n", track.points.len()));
        gpx.push_str(&format!(
            "      <activity>{}</activity>\n",
            track.activity.as_str()
        ));
        gpx.push_str(&format!(
            "      <pace>{:.0}</pace>\n",
            track.effective_pace_seconds_per_km()
        ));
        gpx.push_str(&format!("      <speed>{:.2}</speed>\n", track.speed_kmh));
        gpx.push_str("    </extensions>\n");
    }
    gpx.push_str("    <trkseg>\n");

    for point in &track.points {
        gpx.push_str(&format!(
            r#"      <trkpt lat="{}" lon="{}">"#,
            point.lat_text(),
            point.lon_text()
        ));
        gpx.push('\n');
        gpx.push_str(&format!("        <ele>{}</ele>\n", point.elevation_text()));
        gpx.push_str(&format!("        <time>{}</time>\n", point.time_text()?));

        if decorations.extensions {
            gpx.push_str("        <extensions>\n");
            gpx.push_str(&format!("          <speed>{:.2}</speed>\n", point.speed_kmh));
            gpx.push_str(&format!("          <course>{:.0}</course>\n", point.course_deg));
            gpx.push_str("        </extensions>\n");
        }

        gpx.push_str("      </trkpt>\n");
    }

    gpx.push_str("    </trkseg>\n");
    gpx.push_str("  </trk>\n");
    gpx.push_str("</gpx>\n");

    Ok(gpx)
}

/// Writes a `<rte>` holding the first, last and every `interval`-th point.
fn push_route(
    gpx: &mut String,
    track: &SynthesizedTrack,
    name: &str,
    interval: usize,
) -> Result<(), ExportError> {
    let interval = interval.max(1);
    let last = track.points.len().saturating_sub(1);

    gpx.push_str("  <rte>\n");
    gpx.push_str(&format!("    <name>{name} - Waypoints</name>\n"));
    gpx.push_str(&format!("    <desc>Route waypoints for {name}</desc>\n"));

    let waypoints = track
        .points
        .iter()
        .enumerate()
        .filter(|(i, _)| *i == 0 || *i == last || i % interval == 0)
        .map(|(_, point)| point);

    for (n, point) in waypoints.enumerate() {
        push_route_point(gpx, point, n + 1)?;
    }

    gpx.push_str("  </rte>\n");
    Ok(())
}

fn push_route_point(
    gpx: &mut String,
    point: &SynthesizedTrackPoint,
    number: usize,
) -> Result<(), ExportError> {
    gpx.push_str(&format!(
        r#"    <rtept lat="{}" lon="{}">"#,
        point.lat_text(),
        point.lon_text()
    ));
    gpx.push('\n');
    gpx.push_str(&format!("      <ele>{}</ele>\n", point.elevation_text()));
    gpx.push_str(&format!("      <time>{}</time>\n", point.time_text()?));
    gpx.push_str(&format!("      <name>WP{number}</name>\n"));
    gpx.push_str(&format!("      <desc>Waypoint {number}</desc>\n"));
    gpx.push_str("    </rtept>\n");
    Ok(())
}

fn track_bounds(track: &SynthesizedTrack) -> Option<Bounds> {
    let points: Vec<RoutePoint> = track
        .points
        .iter()
        .map(|p| RoutePoint::new(p.lat, p.lng, 0))
        .collect();
    bounds(&points)
}

/// Escapes XML special characters in a string.
///
/// Control characters XML 1.0 does not allow are dropped.
fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if c < '\u{20}' => {}
            c => escaped.push(c),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use routes::ActivityType;
    use time::Duration;
    use time::macros::datetime;

    fn sample_track(count: usize) -> SynthesizedTrack {
        let start = datetime!(2024-05-01 07:30 UTC);
        let points = (0..count)
            .map(|i| SynthesizedTrackPoint {
                lat: 40.0150 + i as f64 * 0.001,
                lng: -105.2705,
                elevation_m: 100.0 + i as f64,
                time: start + Duration::seconds(i as i64 * 40),
                elapsed_seconds: i as f64 * 40.0,
                distance_km: i as f64 * 0.111,
                speed_kmh: 10.0,
                course_deg: 0.0,
            })
            .collect();

        SynthesizedTrack {
            activity: ActivityType::Run,
            speed_kmh: 10.0,
            distance_km: count.saturating_sub(1) as f64 * 0.111,
            elevation_gain_m: count.saturating_sub(1) as f64,
            points,
        }
    }

    fn metadata(name: &str) -> TrackMetadata {
        TrackMetadata {
            name: name.to_string(),
            description: "Morning loop".to_string(),
            exported_at: datetime!(2024-05-02 18:00 UTC),
        }
    }

    #[test]
    fn test_generate_gpx_basic() {
        let gpx = render_gpx(&sample_track(2), &metadata("Test Activity"), &ExportConfig::minimal())
            .unwrap();

        assert!(gpx.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(gpx.contains(r#"version="1.1" creator="RouteTracker v1.0""#));
        assert!(gpx.contains(r#"xmlns="http://www.topografix.com/GPX/1/1""#));
        assert!(gpx.contains("<name>Test Activity</name>"));
        assert!(gpx.contains("<desc>Morning loop</desc>"));
        assert!(gpx.contains("<name>RouteTracker</name>"));
        assert!(gpx.contains("<time>2024-05-02T18:00:00.000Z</time>"));
        assert!(gpx.contains("<type>running</type>"));
        assert!(gpx.contains(r#"<trkpt lat="40.015000" lon="-105.270500">"#));
        assert!(gpx.contains("<ele>100.0</ele>"));
        assert!(gpx.contains("<time>2024-05-01T07:30:40.000Z</time>"));
        assert_eq!(gpx.matches("<trkpt ").count(), 2);

        assert!(!gpx.contains("<extensions>"));
        assert!(!gpx.contains("<rte>"));
        assert!(!gpx.contains("<bounds"));
        assert!(!gpx.contains("<keywords>"));
    }

    #[test]
    fn test_generate_gpx_escapes_special_chars() {
        let gpx = render_gpx(
            &sample_track(1),
            &metadata("Test & <Activity> \"Name\""),
            &ExportConfig::minimal(),
        )
        .unwrap();

        assert!(gpx.contains("Test &amp; &lt;Activity&gt; &quot;Name&quot;"));
    }

    #[test]
    fn test_generate_gpx_drops_forbidden_control_chars() {
        let mut meta = metadata("Lap\u{0}1\u{1b}");
        meta.description = "Line one\nLine\ttwo\u{7}".to_string();

        let gpx = render_gpx(&sample_track(1), &meta, &ExportConfig::minimal()).unwrap();

        assert!(gpx.contains("<name>Lap1</name>"));
        assert!(gpx.contains("<desc>Line one\nLine\ttwo</desc>"));
        assert!(!gpx.chars().any(|c| c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')));
    }

    #[test]
    fn test_generate_gpx_decorations() {
        let gpx = render_gpx(&sample_track(3), &metadata("Hill"), &ExportConfig::default())
            .unwrap();

        assert!(gpx.contains("<keywords>running, route, gps, track</keywords>"));
        assert!(gpx.contains(
            r#"<bounds minlat="40.015000" minlon="-105.270500" maxlat="40.017000" maxlon="-105.270500"/>"#
        ));
        assert!(gpx.contains("<name>Hill - Waypoints</name>"));
        assert!(gpx.contains("<distance>0.222</distance>"));
        assert!(gpx.contains("<points>3</points>"));
        assert!(gpx.contains("<activity>run</activity>"));
        assert!(gpx.contains("<pace>360</pace>"));
        assert!(gpx.contains("<speed>10.00</speed>"));
        assert!(gpx.contains("<course>0</course>"));
        assert_eq!(gpx.matches("<extensions>").count(), 4);
    }

    #[test]
    fn test_route_waypoint_selection() {
        let gpx = render_gpx(&sample_track(25), &metadata("Long"), &ExportConfig::default())
            .unwrap();

        // indices 0, 10, 20 and the last (24)
        assert_eq!(gpx.matches("<rtept ").count(), 4);
        assert!(gpx.contains("<name>WP4</name>"));
        assert!(!gpx.contains("<name>WP5</name>"));
        assert!(gpx.contains("<desc>Waypoint 1</desc>"));
    }

    #[test]
    fn test_single_point_route_has_one_waypoint() {
        let gpx = render_gpx(&sample_track(1), &metadata("Dot"), &ExportConfig::default())
            .unwrap();
        assert_eq!(gpx.matches("<rtept ").count(), 1);
    }
}
