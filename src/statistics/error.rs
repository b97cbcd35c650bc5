use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatisticsError {
    #[error("Cannot compute statistics over an empty record sequence")]
    EmptyInput,

    #[error("Threshold step {0} must be a positive, finite number of °C")]
    InvalidThresholdStep(f64),

    #[error("Threshold sweep would need {points} points, at most {max} are allowed")]
    SweepTooLarge { points: u128, max: usize },
}
