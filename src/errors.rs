#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("session error: {0}")]
    Session(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("booking API error: {0}")]
    Api(String),

    #[error("failed to fetch bookings: {0}")]
    FetchFailed(String),
}
