use thiserror::Error;

/// Reasons a submission is refused before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Selecione um município da lista")]
    NoSelection,

    #[error("Data inválida em {field}: {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("A data final é anterior à data inicial")]
    ReversedPeriod,
}

#[derive(Error, Debug, Clone)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("network error: {0}")]
    Network(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CoreError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            CoreError::Server {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            CoreError::Network(e.to_string())
        }
    }
}
