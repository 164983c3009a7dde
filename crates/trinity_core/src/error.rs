use thiserror::Error;

/// Caller errors detected before any integration step runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreconditionError {
    #[error(
        "dimension mismatch: x has {x_len} entries, matrix is {rows}x{cols}, expected {expected} agents"
    )]
    DimensionMismatch {
        expected: usize,
        x_len: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid parameters: dt={dt} (must be in (0, 1]), steps={steps} (must be > 0)")]
    InvalidParameters { dt: f64, steps: usize },

    #[error("time step must be in (0, 1], got {0}")]
    InvalidTimeStep(f64),

    #[error("at least one agent is required")]
    NoAgents,

    #[error("scaling factor must be finite, got {0}")]
    InvalidScaling(f64),

    #[error("noise standard deviation must be finite and non-negative, got {0}")]
    InvalidNoise(f64),

    #[error("matrix row {row} has {found} entries, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("grid dimension `{0}` is empty")]
    EmptyGridDimension(&'static str),

    #[error("grid is built for {grid} agents but {requested} were requested")]
    AgentCountMismatch { grid: usize, requested: usize },
}

/// Numerical breakdowns during integration.
///
/// These never surface as `Err`: the integrator wraps them in
/// [`IntegrationOutcome::Failed`](crate::simulation::IntegrationOutcome::Failed).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum NumericalFailure {
    #[error("non-finite state produced at step {step}")]
    NonFinite { step: usize },

    #[error("row {row} has zero or non-finite mass and cannot be normalized")]
    DegenerateRow { row: usize },
}

/// Errors reading or writing sweep configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse sweep configuration: {0}")]
    Parse(#[from] serde_saphyr::Error),

    #[error("failed to serialize sweep configuration: {0}")]
    Serialize(#[from] serde_saphyr::ser::Error),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

/// Errors exporting result tables
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
