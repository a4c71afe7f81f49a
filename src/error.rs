use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("expected at least 3 receivers but got: {count}")]
    InsufficientReceivers { count: usize },
    #[error("expected one reading per receiver ({receivers}) but got: {readings}")]
    MisalignedReadings { receivers: usize, readings: usize },
    #[error("expected pivot in range [0, {receivers}) but got: {pivot}")]
    InvalidPivot { pivot: usize, receivers: usize },
    #[error("receivers are collinear relative to pivot {pivot}: coefficient matrix has null determinant")]
    DegenerateGeometry { pivot: usize },
    #[error("normal equations matrix is not invertible")]
    SingularSystem,
    #[error("expected non-zero attenuation factor but got: {factor}")]
    InvalidAttenuationFactor { factor: f64 },
    #[error("expected finite {name} but got: {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },
    #[error("expected finite distance for receiver {receiver} but got: {distance} (power {power})")]
    UnboundedDistance {
        receiver: usize,
        power: f64,
        distance: f64,
    },
    #[error("coefficient matrix has {rows} rows but result vector has {len}")]
    DimensionMismatch { rows: usize, len: usize },
}
