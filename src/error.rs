use thiserror::Error;

/// Input violates a data-model invariant (§3), e.g. `min > max` or a
/// `trialCount` outside `[1000, 500000]`. Carries a field path so a UI can
/// point at the offending input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{path}: min ({min}) must be <= mostLikely ({most_likely})")]
    MinExceedsMostLikely {
        path: String,
        min: f64,
        most_likely: f64,
    },
    #[error("{path}: mostLikely ({most_likely}) must be <= max ({max})")]
    MostLikelyExceedsMax {
        path: String,
        most_likely: f64,
        max: f64,
    },
    #[error("{path}: three-point estimates must be nonnegative, got {value}")]
    NegativeEstimate { path: String, value: f64 },
    #[error("{path}: sdOverride must be positive, got {value}")]
    NonPositiveSdOverride { path: String, value: f64 },
    #[error("{path}: trialCount {value} is outside [1000, 500000]")]
    TrialCountOutOfRange { path: String, value: u32 },
    #[error("{path}: probability target {value} is outside [0.01, 0.99]")]
    ProbabilityOutOfRange { path: String, value: f64 },
    #[error("{path}: rngSeed must not be empty")]
    EmptySeed { path: String },
    #[error("{path}: actualDuration is required when status=complete")]
    MissingActualDuration { path: String },
    #[error("{path}: actualDuration must be nonnegative, got {value}")]
    NegativeActualDuration { path: String, value: f64 },
    #[error("{path}: could not parse ISO date '{value}'")]
    MalformedDate { path: String, value: String },
    #[error("{path}: unrecognized confidence level '{value}'")]
    UnrecognizedConfidenceLevel { path: String, value: String },
    #[error("{path}: unrecognized distribution type '{value}'")]
    UnrecognizedDistributionType { path: String, value: String },
    #[error("{path}: unrecognized activity status '{value}'")]
    UnrecognizedActivityStatus { path: String, value: String },
}

/// A distribution parameter is inadmissible (e.g. `sigma < 0`, `a > b`).
/// Fails construction before any sampling is attempted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    #[error("uniform distribution requires a <= b, got a={a} b={b}")]
    InvalidUniformBounds { a: f64, b: f64 },
    #[error("triangular distribution requires a <= c <= b and a < b, got a={a} c={c} b={b}")]
    InvalidTriangularBounds { a: f64, c: f64, b: f64 },
    #[error("normal distribution requires sigma >= 0, got {sigma}")]
    NegativeSigma { sigma: f64 },
    #[error("lognormal distribution requires mean > 0, got {mean}")]
    NonPositiveLogNormalMean { mean: f64 },
}

/// A request made of the statistics/inverse-CDF surface that is
/// mathematically undefined for the given input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("percentile requested on an empty sample set")]
    EmptySampleSet,
    #[error("inverseCDF requires p in [0, 1], got {p}")]
    ProbabilityOutOfBounds { p: f64 },
    #[error("lognormal construction requires mean > 0, got {mean}")]
    NonPositiveLogNormalMean { mean: f64 },
}

/// Any exception raised inside the trial loop. Delivered as a single
/// terminal `simulation:error` payload (§6); partial state is always
/// discarded, never surfaced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkerError {
    #[error("activity {activity_id} has no sampling function and is not marked complete")]
    MissingSampler { activity_id: String },
    #[error("validation failed before the trial loop could start: {0}")]
    Validation(#[from] ValidationError),
    #[error("numeric error while constructing a distribution: {0}")]
    Numeric(#[from] NumericError),
}

/// Top-level error type returned by the crate's public functions. Each
/// variant wraps one of the four kinds from §7.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpertError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Numeric(#[from] NumericError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Worker(#[from] WorkerError),
}
