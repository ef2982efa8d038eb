//! One-call export: synthesize a route and hand the file to a sink.

use routes::{ActivityType, RouteDetails, RoutePoint};
use tracing::info;

use crate::config::ExportConfig;
use crate::download::{FileSink, GpxFile};
use crate::errors::ExportError;
use crate::synthesis::TrackSynthesizer;

pub struct RouteExporter<S: FileSink> {
    synthesizer: TrackSynthesizer,
    sink: S,
}

impl<S: FileSink> RouteExporter<S> {
    pub fn new(config: ExportConfig, sink: S) -> Self {
        Self {
            synthesizer: TrackSynthesizer::new(config),
            sink,
        }
    }

    pub fn synthesizer(&self) -> &TrackSynthesizer {
        &self.synthesizer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Builds the GPX document and saves it.
    ///
    /// Nothing reaches the sink if synthesis fails.
    pub fn export(
        &self,
        points: &[RoutePoint],
        activity: ActivityType,
        details: &RouteDetails,
        pace_seconds_per_km: Option<f64>,
    ) -> Result<GpxFile, ExportError> {
        let document = self
            .synthesizer
            .synthesize(points, activity, details, pace_seconds_per_km)?;

        let file = document.into_file();
        self.sink.save(&file)?;

        info!(
            "Exported {} ({} points, {} route)",
            file.file_name,
            points.len(),
            activity
        );
        Ok(file)
    }
}
