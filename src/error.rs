use thiserror::Error;

/// Shape problems between a prediction matrix and its targets.
///
/// Numeric trouble (a zero probability in a backward pass) is never an
/// error: it shows up as `inf`/`NaN` in the returned gradient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LossError {
    #[error("Sample count mismatch: predictions have {predictions} rows but targets have {targets}")]
    SampleCountMismatch { predictions: usize, targets: usize },

    #[error("Class count mismatch: predictions have {expected} classes but targets have {actual}")]
    ClassCountMismatch { expected: usize, actual: usize },

    #[error("Class index {index} of sample {sample} is out of range for {classes} classes")]
    ClassIndexOutOfRange {
        sample: usize,
        index: usize,
        classes: usize,
    },

    #[error("Predictions have no classes")]
    NoClasses,

    #[error("Batch contains no samples")]
    EmptyBatch,
}

pub type Result<T> = std::result::Result<T, LossError>;
