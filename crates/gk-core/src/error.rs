use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeomError {
    #[error("Degenerate geometry: {0}")]
    Degenerate(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Tolerance violation: {0}")]
    Tolerance(String),
}

pub type Result<T> = std::result::Result<T, GeomError>;
