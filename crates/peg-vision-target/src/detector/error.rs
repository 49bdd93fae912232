/// Errors returned when building a peg target detector.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TargetParamsError {
    #[error("polygon approximation epsilon must be positive (got {epsilon})")]
    NonPositiveEpsilon { epsilon: f64 },
    #[error("invalid {name} range [{min}, {max}]")]
    InvalidRange {
        name: &'static str,
        min: f64,
        max: f64,
    },
    #[error(
        "nearly-horizontal slope {horizontal} must be positive and below nearly-vertical slope {vertical}"
    )]
    SlopeOrder { horizontal: f64, vertical: f64 },
}
