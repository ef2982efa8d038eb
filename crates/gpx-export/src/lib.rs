//! GPX export for route-tracker.
//!
//! This crate turns a route drawn on the map into a GPX 1.1 track that
//! fitness apps accept on upload: every point gets a synthetic elevation and
//! a timestamp consistent with the chosen pace.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gpx_export::prelude::*;
//!
//! let exporter = RouteExporter::new(ExportConfig::default(), DirectorySink::new("exports"));
//! let file = exporter.export(
//!     &points,
//!     ActivityType::Run,
//!     &RouteDetails::named("Sunday Long Run"),
//!     Some(330.0), // 5:30/km
//! )?;
//! println!("saved {}", file.file_name);
//! ```

pub mod config;
pub mod download;
pub mod errors;
pub mod exporter;
pub mod gpx;
pub mod synthesis;

pub use errors::ExportError;

// Re-export the route model
pub use routes::{ActivityType, RouteDetails, RoutePoint};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{Decorations, ExportConfig};
    pub use crate::download::{
        DirectorySink, FileSink, GPX_MIME_TYPE, GpxFile, MemorySink, export_file_name, slugify,
    };
    pub use crate::exporter::RouteExporter;
    pub use crate::synthesis::{
        GpxDocument, SynthesizedTrack, SynthesizedTrackPoint, TrackSynthesizer,
    };
    pub use crate::{ActivityType, ExportError, RouteDetails, RoutePoint};
    pub use routes::prelude::{
        DefaultSpeeds, ElevationModel, ElevationPolicy, Pace, RandomWalk, RouteStats,
        WaveProfile,
    };
}
