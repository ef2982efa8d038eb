use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("Invalid coordinate: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("Invalid pace: {0} seconds per km")]
    InvalidPace(f64),

    #[error("Invalid speed: {0} km/h")]
    InvalidSpeed(f64),

    #[error("Invalid timestamp: {0} ms since epoch")]
    InvalidTimestamp(i64),
}
