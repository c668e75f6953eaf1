use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mqe_mapper::MappingError;
use mqe_template::TemplateError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum FrontdoorError {
    #[error("Missing listen address")]
    MissingListenAddress,

    #[error("Missing templates directory")]
    MissingTemplatesDir,
}

pub type Result<T> = std::result::Result<T, FrontdoorError>;

/// Errors raised while rendering a dataset for a request.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Returns `400 Bad Request`
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Returns `404 Not Found` for a missing view, `500` otherwise
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Returns `500 Internal Server Error`
    #[error("render context requested on a route without the mystique layer")]
    NotInstalled,
}

impl RenderError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Mapping(_) => StatusCode::BAD_REQUEST,
            Self::Template(TemplateError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Template(_) | Self::NotInstalled => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        error!("{}", self);

        let status = self.status();
        match self {
            Self::Mapping(e) => (status, e.to_string()).into_response(),
            Self::Template(TemplateError::NotFound { name, .. }) => {
                (status, format!("View not found: {}", name)).into_response()
            }
            Self::Template(_) | Self::NotInstalled => {
                (status, "Internal Server Error").into_response()
            }
        }
    }
}
