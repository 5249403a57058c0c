use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use stockline_core::{LookupError, QuoteError};

/// Process-level failures mapped to exit codes.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl ServerError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Logging(_) => 2,
            Self::Bind { .. } => 3,
            Self::Serve(_) => 10,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct LookupBody {
    valid: bool,
    message: String,
}

/// JSON error response for the quote history endpoint.
#[derive(Debug)]
pub enum QuoteFailure {
    Quote(QuoteError),
    /// The request could not be decoded into a ticker and query.
    Rejected { status: StatusCode, message: String },
}

impl From<QuoteError> for QuoteFailure {
    fn from(error: QuoteError) -> Self {
        Self::Quote(error)
    }
}

impl From<PathRejection> for QuoteFailure {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for QuoteFailure {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for QuoteFailure {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::Quote(error) => (
                StatusCode::from_u16(error.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                error.to_string(),
            ),
            Self::Rejected { status, message } => (status, message),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

/// JSON `valid: false` response for the symbol lookup endpoint. Always 404.
#[derive(Debug)]
pub enum LookupFailure {
    Lookup(LookupError),
    Rejected { message: String },
}

impl From<LookupError> for LookupFailure {
    fn from(error: LookupError) -> Self {
        Self::Lookup(error)
    }
}

impl From<PathRejection> for LookupFailure {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for LookupFailure {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Lookup(error) => (
                StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::NOT_FOUND),
                error.to_string(),
            ),
            Self::Rejected { message } => (StatusCode::NOT_FOUND, message),
        };
        let body = Json(LookupBody {
            valid: false,
            message,
        });
        (status, body).into_response()
    }
}
