use thiserror::Error;

pub type CommonResult<T> = Result<T, CommonError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommonError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("undefined metric: {0}")]
    UndefinedMetric(String),
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl CommonError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CommonError::InvalidArgument(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CommonError::InvalidInput(message.into())
    }

    pub fn insufficient(message: impl Into<String>) -> Self {
        CommonError::InsufficientData(message.into())
    }

    pub fn mismatch(message: impl Into<String>) -> Self {
        CommonError::DimensionMismatch(message.into())
    }

    pub fn undefined(message: impl Into<String>) -> Self {
        CommonError::UndefinedMetric(message.into())
    }

    pub fn missing_column(name: impl Into<String>) -> Self {
        CommonError::MissingColumn(name.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CommonError::InternalError(message.into())
    }
}
