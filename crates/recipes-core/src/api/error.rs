use thiserror::Error;

/// Every failure `RecipeManager::get_recipes` can surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipeError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Bad request")]
    BadRequest,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Request timed out")]
    RequestTimeout,

    #[error("Internal server error")]
    InternalServerError,

    #[error("Bad gateway")]
    BadGateway,

    #[error("Service unavailable")]
    ServiceUnavailable,

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl RecipeError {
    /// Map a non-success HTTP status onto the taxonomy.
    ///
    /// 200 is handled by the caller before this is reached; passing it here
    /// yields `Unknown` like any other unlisted code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => RecipeError::BadRequest,
            401 => RecipeError::Unauthorized,
            403 => RecipeError::Forbidden,
            404 => RecipeError::NotFound,
            408 => RecipeError::RequestTimeout,
            500 => RecipeError::InternalServerError,
            502 => RecipeError::BadGateway,
            503 => RecipeError::ServiceUnavailable,
            other => RecipeError::Unknown(format!("unexpected status {}", other)),
        }
    }
}
